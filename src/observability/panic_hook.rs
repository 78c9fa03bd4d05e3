//! Panic hook printing a crash report for a labeling run.
//!
//! The report names the pipeline phase, the input CSV and report section
//! being processed, and how many rows the sentiment model had scored.

use super::context::{get_current_context, get_progress, PipelineContext};
use std::fmt;
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str = "------------------------------------------------------------";

/// Install the crash report hook. Call early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let report = CrashReport::capture(info);
        eprintln!("\n{report}");
        if std::env::var("RUST_BACKTRACE").is_ok() {
            eprintln!("{}", std::backtrace::Backtrace::capture());
        }
    }));
}

/// Everything known about the run at the moment it panicked.
#[derive(Debug, Clone)]
pub struct CrashReport {
    pub message: String,
    pub location: Option<String>,
    pub context: PipelineContext,
    pub rows_scored: usize,
    pub rows_total: usize,
}

impl CrashReport {
    fn capture(info: &PanicHookInfo<'_>) -> Self {
        let (rows_scored, rows_total) = get_progress();
        Self {
            message: panic_message(info),
            location: info
                .location()
                .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
            context: get_current_context(),
            rows_scored,
            rows_total,
        }
    }

    fn rows_line(&self) -> Option<String> {
        if self.rows_total == 0 {
            return None;
        }
        let pct = self.rows_scored as f64 / self.rows_total as f64 * 100.0;
        Some(format!(
            "{} of {} tweets ({:.0}%)",
            self.rows_scored, self.rows_total, pct
        ))
    }
}

impl fmt::Display for CrashReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "tweetalign {VERSION} crashed ({})", std::env::consts::OS)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "panic:    {}", self.message)?;
        if let Some(location) = &self.location {
            writeln!(f, "at:       {location}")?;
        }

        match self.context.phase {
            Some(phase) => writeln!(f, "phase:    {phase}")?,
            None => writeln!(f, "phase:    none (no input loaded yet)")?,
        }
        if let Some(file) = &self.context.current_file {
            writeln!(f, "input:    {}", file.display())?;
        }
        if let Some(section) = &self.context.current_section {
            writeln!(f, "section:  {section}")?;
        }
        if let Some(rows) = self.rows_line() {
            writeln!(f, "scored:   {rows}")?;
        }

        writeln!(f, "{RULE}")?;
        if std::env::var("RUST_BACKTRACE").is_err() {
            writeln!(f, "Run with RUST_BACKTRACE=1 for a stack trace")?;
        }
        Ok(())
    }
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::AnalysisPhase;
    use std::path::PathBuf;

    fn report(context: PipelineContext, rows_scored: usize, rows_total: usize) -> CrashReport {
        CrashReport {
            message: "index out of bounds".to_string(),
            location: Some("src/labeler/camps.rs:10:5".to_string()),
            context,
            rows_scored,
            rows_total,
        }
    }

    #[test]
    fn test_report_names_input_and_scored_rows() {
        let context = PipelineContext {
            phase: Some(AnalysisPhase::SentimentInference),
            current_file: Some(PathBuf::from("Data/trump.csv")),
            current_section: None,
        };
        let text = report(context, 50, 200).to_string();

        assert!(text.contains("panic:    index out of bounds"));
        assert!(text.contains("at:       src/labeler/camps.rs:10:5"));
        assert!(text.contains("phase:    sentiment_inference"));
        assert!(text.contains("input:    Data/trump.csv"));
        assert!(text.contains("scored:   50 of 200 tweets (25%)"));
        assert!(!text.contains("section:"));
    }

    #[test]
    fn test_report_before_loading() {
        let text = report(PipelineContext::new(), 0, 0).to_string();
        assert!(text.contains("phase:    none (no input loaded yet)"));
        assert!(!text.contains("input:"));
        assert!(!text.contains("scored:"));
    }
}
