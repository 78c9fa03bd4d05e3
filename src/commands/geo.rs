use crate::io::{self, DominanceHtmlWriter, LoadOptions, OutputFormat};
use crate::observability::{set_phase, AnalysisPhase};
use crate::report::{build_geo_report, GeoReport};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct GeoConfig {
    pub trump: PathBuf,
    pub biden: PathBuf,
    pub load: LoadOptions,
    pub top: Option<usize>,
    pub levels: usize,
    pub map: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn handle_geo(config: GeoConfig) -> Result<GeoReport> {
    let (trump, biden) = {
        let _phase = set_phase(AnalysisPhase::Loading);
        let trump = io::load_table(&config.trump, &config.load)
            .with_context(|| format!("Failed to load tweets from {}", config.trump.display()))?;
        let biden = io::load_table(&config.biden, &config.load)
            .with_context(|| format!("Failed to load tweets from {}", config.biden.display()))?;
        (trump, biden)
    };

    let report = build_geo_report(&trump, &biden, config.top, config.levels);

    let _phase = set_phase(AnalysisPhase::OutputGeneration);
    {
        let destination = io::open_destination(config.output.as_deref())
            .context("Failed to open report output")?;
        let mut writer = io::create_writer(config.format, destination);
        writer.write_geo_report(&report)?;
    }

    if let Some(path) = &config.map {
        match report.dominance.data() {
            Some(map) => {
                let file = io::open_destination(Some(path))
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let title = format!(
                    "World dominance: {} vs {}",
                    file_label(&config.biden),
                    file_label(&config.trump)
                );
                DominanceHtmlWriter::new(file).with_title(title).write_map(map)?;
                tracing::info!("Wrote dominance map to {}", path.display());
            }
            None => tracing::warn!(
                "Dominance map not written: {}",
                report.dominance.skip_reason().unwrap_or("no data")
            ),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::fs;
    use tempfile::TempDir;

    fn write_inputs(temp: &TempDir) -> (PathBuf, PathBuf) {
        let trump = temp.path().join("trump.csv");
        let biden = temp.path().join("biden.csv");
        fs::write(
            &trump,
            indoc! {"
                user_id,state,country
                1,Texas,United States of America
                2,Texas,United States of America
                3,Ontario,Canada
            "},
        )
        .unwrap();
        fs::write(
            &biden,
            indoc! {"
                user_id,state,country
                4,California,United States of America
                5,Texas,United States of America
                6,,France
            "},
        )
        .unwrap();
        (trump, biden)
    }

    #[test]
    fn test_geo_writes_report_and_map() {
        let temp = TempDir::new().unwrap();
        let (trump, biden) = write_inputs(&temp);
        let map = temp.path().join("maps").join("dominance.html");

        let report = handle_geo(GeoConfig {
            trump,
            biden,
            load: LoadOptions::default(),
            top: None,
            levels: 22,
            map: Some(map.clone()),
            format: OutputFormat::Json,
            output: Some(temp.path().join("geo.json")),
        })
        .unwrap();

        let states = report.states.data().unwrap();
        let names: Vec<&str> = states.rows.iter().map(|r| r.state.as_str()).collect();
        assert_eq!(names, vec!["California", "Texas"]);

        let dominance = report.dominance.data().unwrap();
        assert_eq!(dominance.rows.len(), 3);

        let html = fs::read_to_string(map).unwrap();
        assert!(html.contains("United States of America"));
        assert!(html.contains("France"));
        assert!(html.contains("<title>World dominance: biden vs trump</title>"));
    }

    #[test]
    fn test_missing_country_skips_map() {
        let temp = TempDir::new().unwrap();
        let trump = temp.path().join("trump.csv");
        let biden = temp.path().join("biden.csv");
        fs::write(&trump, "user_id,state\n1,Texas\n").unwrap();
        fs::write(&biden, "user_id,state\n2,Ohio\n").unwrap();
        let map = temp.path().join("dominance.html");

        let report = handle_geo(GeoConfig {
            trump,
            biden,
            load: LoadOptions::default(),
            top: Some(5),
            levels: 22,
            map: Some(map.clone()),
            format: OutputFormat::Markdown,
            output: Some(temp.path().join("geo.md")),
        })
        .unwrap();

        assert!(report.states.data().is_some());
        assert!(report.dominance.skip_reason().is_some());
        assert_eq!(report.diagnostics.len(), 1);
        assert!(!map.exists());
    }
}
