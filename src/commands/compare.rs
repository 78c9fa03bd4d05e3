use super::sentiment::{prepare_table, run_inference};
use crate::core::{columns, TweetTable};
use crate::io::{self, loader, LoadOptions, OutputFormat};
use crate::observability::{set_current_file, set_phase, AnalysisPhase};
use crate::report::{compare_sentiment, SentimentComparison};
use crate::sentiment::SentimentOptions;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub trump: PathBuf,
    pub biden: PathBuf,
    pub load: LoadOptions,
    pub sentiment: SentimentOptions,
    pub neutral_band: f64,
    pub sample: Option<usize>,
    pub seed: Option<u64>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub verbosity: u8,
}

fn load_scored(path: &Path, config: &CompareConfig) -> Result<TweetTable> {
    let _file = set_current_file(path);
    let table = {
        let _phase = set_phase(AnalysisPhase::Loading);
        io::load_table(path, &config.load)
            .with_context(|| format!("Failed to load tweets from {}", path.display()))?
    };
    let unique = loader::unique_users(&table);
    tracing::info!(
        "{}: {} unique users out of {} rows",
        path.display(),
        unique.len(),
        table.len()
    );
    let mut table = prepare_table(
        unique,
        &config.sentiment.text_column,
        false,
        config.sample,
        config.seed,
    );

    if !table.has_column(columns::SENTIMENT) {
        tracing::info!(
            "{} has no sentiment column; scoring with the lexicon model",
            path.display()
        );
        run_inference(
            &mut table,
            config.sentiment.clone(),
            config.neutral_band,
            config.verbosity,
        )?;
    }
    Ok(table)
}

/// Sentiment shares and intensity of the Trump dataset against the Biden one.
pub fn handle_compare(config: CompareConfig) -> Result<SentimentComparison> {
    let trump = load_scored(&config.trump, &config)?;
    let biden = load_scored(&config.biden, &config)?;

    let comparison = {
        let _phase = set_phase(AnalysisPhase::Reporting);
        compare_sentiment(&trump, &biden)
    };

    let _phase = set_phase(AnalysisPhase::OutputGeneration);
    let destination =
        io::open_destination(config.output.as_deref()).context("Failed to open report output")?;
    let mut writer = io::create_writer(config.format, destination);
    writer.write_sentiment_comparison(&comparison)?;

    Ok(comparison)
}
