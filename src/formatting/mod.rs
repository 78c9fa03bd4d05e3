use crate::core::Camp;
use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::stdout().is_terminal(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    /// Honour `NO_COLOR`, `CLICOLOR=0` and `CLICOLOR_FORCE=1`.
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        // no-color.org: presence alone disables colour
        if var("NO_COLOR").is_some() {
            config.color = ColorMode::Never;
        }
        if var("CLICOLOR").as_deref() == Some("0") {
            config.color = ColorMode::Never;
        }
        if var("CLICOLOR_FORCE").as_deref() == Some("1") {
            config.color = ColorMode::Always;
        }

        config
    }

    /// No colour at all, for `--plain` and piped output.
    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }

    /// Push the decision into `colored`'s global switch.
    pub fn apply(&self) {
        colored::control::set_override(self.color.should_use_color());
    }
}

/// Camp name in its conventional colour: Biden blue, Trump red.
pub fn camp_label(camp: Camp) -> ColoredString {
    match camp {
        Camp::Biden => camp.as_str().blue().bold(),
        Camp::Trump => camp.as_str().red().bold(),
        Camp::Neutral => camp.as_str().white(),
    }
}

pub fn section_header(text: &str) -> ColoredString {
    text.bold().underline()
}

pub fn skipped(text: &str) -> ColoredString {
    text.yellow()
}

/// Whole numbers without decimals, anything else to two places.
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

pub fn format_score(value: f64) -> String {
    format!("{:+.4}", value)
}

pub fn format_optional(value: Option<f64>, digits: usize) -> String {
    value
        .map(|v| format!("{:.*}", digits, v))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_color_mode_parse() {
        assert_eq!(ColorMode::parse("AUTO"), Some(ColorMode::Auto));
        assert_eq!(ColorMode::parse("never"), Some(ColorMode::Never));
        assert_eq!(ColorMode::parse("sometimes"), None);
    }

    #[test]
    fn test_env_overrides() {
        assert_eq!(FormattingConfig::from_vars(vars(&[])).color, ColorMode::Auto);
        assert_eq!(
            FormattingConfig::from_vars(vars(&[("NO_COLOR", "")])).color,
            ColorMode::Never
        );
        assert_eq!(
            FormattingConfig::from_vars(vars(&[("CLICOLOR", "0")])).color,
            ColorMode::Never
        );
        assert_eq!(
            FormattingConfig::from_vars(vars(&[("NO_COLOR", "1"), ("CLICOLOR_FORCE", "1")])).color,
            ColorMode::Always
        );
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(format_count(1200.0), "1200");
        assert_eq!(format_count(2.5), "2.50");
        assert_eq!(format_score(-0.08), "-0.0800");
        assert_eq!(format_score(0.58), "+0.5800");
        assert_eq!(format_optional(None, 2), "-");
        assert_eq!(format_optional(Some(0.123), 2), "0.12");
    }
}
