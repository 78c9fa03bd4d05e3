use crate::cli::configure_thread_pool;
use crate::core::TweetTable;
use crate::io::{self, loader, LoadOptions};
use crate::observability::{set_current_file, set_phase, AnalysisPhase};
use crate::progress::{ProgressConfig, ProgressManager};
use crate::sentiment::{AnalysisStats, LexiconModel, SentimentAnalysis, SentimentOptions};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SentimentCommandConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub load: LoadOptions,
    pub options: SentimentOptions,
    pub neutral_band: f64,
    pub sample: Option<usize>,
    pub seed: Option<u64>,
    pub drop_retweets: bool,
    pub jobs: usize,
    pub verbosity: u8,
}

/// Apply retweet filtering and unique-user sampling.
pub fn prepare_table(
    table: TweetTable,
    text_column: &str,
    drop_retweets: bool,
    sample: Option<usize>,
    seed: Option<u64>,
) -> TweetTable {
    let table = if drop_retweets {
        let before = table.len();
        let kept = loader::drop_retweets(&table, text_column);
        tracing::info!("Dropped {} retweets", before - kept.len());
        kept
    } else {
        table
    };

    match sample {
        Some(n) => {
            let sampled = loader::sample_unique_users(&table, n, seed);
            tracing::info!("Sampled {} unique users", sampled.len());
            sampled
        }
        None => table,
    }
}

/// Score a table with the built-in lexicon model.
pub fn run_inference(
    table: &mut TweetTable,
    options: SentimentOptions,
    neutral_band: f64,
    verbosity: u8,
) -> Result<AnalysisStats> {
    let progress = ProgressManager::new(ProgressConfig::from_env(false, verbosity));
    let analysis =
        SentimentAnalysis::new(LexiconModel::new(neutral_band), options).with_progress(progress);
    analysis
        .analyze_table(table)
        .context("Sentiment inference failed")
}

pub fn handle_sentiment(config: SentimentCommandConfig) -> Result<AnalysisStats> {
    if config.options.parallel {
        configure_thread_pool(config.jobs);
    }

    let _file = set_current_file(&config.input);
    let table = {
        let _phase = set_phase(AnalysisPhase::Loading);
        io::load_table(&config.input, &config.load)
            .with_context(|| format!("Failed to load tweets from {}", config.input.display()))?
    };
    let mut table = prepare_table(
        table,
        &config.options.text_column,
        config.drop_retweets,
        config.sample,
        config.seed,
    );

    let stats = run_inference(
        &mut table,
        config.options.clone(),
        config.neutral_band,
        config.verbosity,
    )?;

    let _phase = set_phase(AnalysisPhase::OutputGeneration);
    io::save_table(&table, &config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    let labels: Vec<String> = stats
        .by_label
        .iter()
        .map(|(label, n)| format!("{label}={n}"))
        .collect();
    println!(
        "Scored {} tweets ({}; {} fallbacks) -> {}",
        stats.analyzed,
        labels.join(", "),
        stats.failed,
        config.output.display()
    );
    Ok(stats)
}
