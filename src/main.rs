use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tweetalign::cli::{init_runtime, Cli, Commands};
use tweetalign::commands::{
    self, CompareConfig, GeoConfig, LabelConfig, SentimentCommandConfig,
};
use tweetalign::config::{resolve_config, TweetalignConfig};
use tweetalign::io::loader::DEFAULT_FALLBACK;
use tweetalign::io::LoadOptions;
use tweetalign::observability::install_panic_hook;
use tweetalign::report::ReportOptions;

fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();
    init_runtime(cli.verbosity, cli.plain);

    let config = resolve_config(cli.config.as_deref()).context("Failed to load configuration")?;
    let delimiter = cli.delimiter.or_else(|| config.delimiter());

    match cli.command {
        Commands::Label {
            input,
            fallback,
            low_quantile,
            high_quantile,
            min_tweets,
            top,
            format,
            output,
            labeled_csv,
            users_csv,
        } => {
            let camps = config.camps();
            let label_config = LabelConfig {
                input,
                load: LoadOptions {
                    delimiter,
                    fallback: Some(resolve_fallback(fallback, &config)),
                },
                low_quantile: low_quantile.unwrap_or(camps.low_quantile),
                high_quantile: high_quantile.unwrap_or(camps.high_quantile),
                report: merge_report_options(config.report_options(), min_tweets, top),
                format,
                output,
                labeled_csv,
                users_csv,
                verbosity: cli.verbosity,
            };
            commands::handle_label(label_config)?;
        }
        Commands::Sentiment {
            input,
            output,
            text_column,
            sample,
            seed,
            clean,
            drop_retweets,
            jobs,
            no_parallel,
        } => {
            let mut options = config.sentiment_options();
            if let Some(column) = text_column {
                options.text_column = column;
            }
            options.clean |= clean;
            options.parallel = !no_parallel;

            let sentiment_config = SentimentCommandConfig {
                input,
                output,
                load: LoadOptions {
                    delimiter,
                    fallback: None,
                },
                options,
                neutral_band: config.sentiment().neutral_band,
                sample,
                seed,
                drop_retweets,
                jobs,
                verbosity: cli.verbosity,
            };
            commands::handle_sentiment(sentiment_config)?;
        }
        Commands::Compare {
            trump,
            biden,
            sample,
            seed,
            format,
            output,
        } => {
            let compare_config = CompareConfig {
                trump,
                biden,
                load: LoadOptions {
                    delimiter,
                    fallback: None,
                },
                sentiment: config.sentiment_options(),
                neutral_band: config.sentiment().neutral_band,
                sample,
                seed,
                format,
                output,
                verbosity: cli.verbosity,
            };
            commands::handle_compare(compare_config)?;
        }
        Commands::Geo {
            trump,
            biden,
            top,
            map,
            format,
            output,
        } => {
            let map_config = config.map();
            let geo_config = GeoConfig {
                trump,
                biden,
                load: LoadOptions {
                    delimiter,
                    fallback: None,
                },
                top: top.or(Some(map_config.top_states)),
                levels: map_config.levels,
                map,
                format,
                output,
            };
            commands::handle_geo(geo_config)?;
        }
        Commands::Init { force } => commands::init_config(force)?,
    }

    Ok(())
}

// Flag, then config file, then the built-in default
fn resolve_fallback(flag: Option<PathBuf>, config: &TweetalignConfig) -> PathBuf {
    flag.or_else(|| config.fallback_path())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FALLBACK))
}

fn merge_report_options(
    base: ReportOptions,
    min_tweets: Option<usize>,
    top: Option<usize>,
) -> ReportOptions {
    ReportOptions {
        min_tweets: min_tweets.unwrap_or(base.min_tweets),
        top_influencers: top.unwrap_or(base.top_influencers),
        ..base
    }
}
