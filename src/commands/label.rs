use crate::core::CampThresholds;
use crate::io::{self, LoadOptions, OutputFormat};
use crate::labeler::PoliticalLabeler;
use crate::observability::{set_current_file, set_phase, AnalysisPhase};
use crate::progress::{ProgressConfig, ProgressManager};
use crate::report::{build_label_report, LabelReport, ReportOptions};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LabelConfig {
    pub input: PathBuf,
    pub load: LoadOptions,
    pub low_quantile: f64,
    pub high_quantile: f64,
    pub report: ReportOptions,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub labeled_csv: Option<PathBuf>,
    pub users_csv: Option<PathBuf>,
    pub verbosity: u8,
}

impl LabelConfig {
    fn progress_config(&self) -> ProgressConfig {
        ProgressConfig::from_env(false, self.verbosity)
    }
}

/// Load, label and report. Returns the report that was written.
pub fn handle_label(config: LabelConfig) -> Result<LabelReport> {
    let _file = set_current_file(&config.input);
    let table = {
        let _phase = set_phase(AnalysisPhase::Loading);
        let spinner = ProgressManager::new(config.progress_config())
            .create_spinner(&format!("Loading {}", config.input.display()));
        let loaded = io::load_table(&config.input, &config.load);
        spinner.finish_and_clear();
        loaded.with_context(|| format!("Failed to load tweets from {}", config.input.display()))?
    };

    let mut labeler = PoliticalLabeler::new(table);
    let thresholds: CampThresholds = labeler
        .run(config.low_quantile, config.high_quantile)
        .context("Camp classification failed")?;

    let report = build_label_report(&labeler, thresholds, &config.report);

    let _phase = set_phase(AnalysisPhase::OutputGeneration);
    {
        let destination = io::open_destination(config.output.as_deref())
            .context("Failed to open report output")?;
        let mut writer = io::create_writer(config.format, destination);
        writer.write_label_report(&report)?;
    }

    if let Some(path) = &config.labeled_csv {
        io::save_table(labeler.table(), path)
            .with_context(|| format!("Failed to write labeled tweets to {}", path.display()))?;
        tracing::info!("Wrote labeled tweets to {}", path.display());
    }
    if let Some(path) = &config.users_csv {
        io::save_users(labeler.users(), path)
            .with_context(|| format!("Failed to write user study to {}", path.display()))?;
        tracing::info!("Wrote user study to {}", path.display());
    }

    Ok(report)
}
