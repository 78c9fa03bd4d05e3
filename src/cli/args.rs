use crate::config::parse_delimiter;
use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tweetalign")]
#[command(about = "Political alignment labeling and sentiment analysis for election tweets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Plain output: no colours
    #[arg(long, global = true)]
    pub plain: bool,

    /// Configuration file (defaults to the nearest .tweetalign.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV delimiter; sniffed from the header line when omitted
    #[arg(long, global = true, value_parser = parse_delimiter_arg)]
    pub delimiter: Option<u8>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score tweets, aggregate users and classify them into camps
    Label {
        /// Labeled tweets CSV (candidate, sentiment, score, user_id, ...)
        input: PathBuf,

        /// Tried once when INPUT does not exist
        #[arg(long)]
        fallback: Option<PathBuf>,

        /// Quantile of mean alignment at or below which users are Biden
        #[arg(long = "low-quantile")]
        low_quantile: Option<f64>,

        /// Quantile of mean alignment at or above which users are Trump
        #[arg(long = "high-quantile")]
        high_quantile: Option<f64>,

        /// Minimum tweets for a user to be listed as an influencer
        #[arg(long = "min-tweets")]
        min_tweets: Option<usize>,

        /// Influencers listed per camp
        #[arg(long)]
        top: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the tweets with alignment_score and camp columns
        #[arg(long = "labeled-csv")]
        labeled_csv: Option<PathBuf>,

        /// Write the per-user study
        #[arg(long = "users-csv")]
        users_csv: Option<PathBuf>,
    },

    /// Run sentiment inference over a tweet CSV
    Sentiment {
        /// Tweet CSV to annotate
        input: PathBuf,

        /// Annotated CSV with sentiment and score columns
        #[arg(short, long)]
        output: PathBuf,

        /// Column holding the tweet text
        #[arg(long = "text-column")]
        text_column: Option<String>,

        /// Keep one tweet per user and sample at most N users
        #[arg(long)]
        sample: Option<usize>,

        /// Seed for --sample
        #[arg(long)]
        seed: Option<u64>,

        /// Score the cleaned text (no URLs, mentions or punctuation)
        #[arg(long)]
        clean: bool,

        /// Drop retweets (text starting with "RT @") before scoring
        #[arg(long = "drop-retweets")]
        drop_retweets: bool,

        /// Number of parallel jobs (0 = all cores)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,

        /// Disable parallel inference
        #[arg(long = "no-parallel")]
        no_parallel: bool,
    },

    /// Compare sentiment of unique users between the Trump and Biden datasets
    Compare {
        /// Tweets collected for Trump
        #[arg(long)]
        trump: PathBuf,

        /// Tweets collected for Biden
        #[arg(long)]
        biden: PathBuf,

        /// Unique users sampled from each dataset
        #[arg(long)]
        sample: Option<usize>,

        /// Seed for --sample
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Per-state counts and the world dominance map
    Geo {
        /// Tweets collected for Trump
        #[arg(long)]
        trump: PathBuf,

        /// Tweets collected for Biden
        #[arg(long)]
        biden: PathBuf,

        /// Keep the N states with the most tweets
        #[arg(long)]
        top: Option<usize>,

        /// Write the dominance map as a standalone HTML page
        #[arg(long)]
        map: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Initialize a .tweetalign.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_delimiter_arg(value: &str) -> Result<u8, String> {
    parse_delimiter(value).ok_or_else(|| format!("expected a single ASCII character, got {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_label_args() {
        let cli = Cli::try_parse_from([
            "tweetalign",
            "label",
            "tweets.csv",
            "--low-quantile",
            "0.3",
            "--format",
            "json",
            "-vv",
            "--delimiter",
            ";",
        ])
        .unwrap();

        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.delimiter, Some(b';'));
        match cli.command {
            Commands::Label {
                input,
                low_quantile,
                high_quantile,
                format,
                ..
            } => {
                assert_eq!(input, PathBuf::from("tweets.csv"));
                assert_eq!(low_quantile, Some(0.3));
                assert_eq!(high_quantile, None);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_sentiment_requires_output() {
        assert!(Cli::try_parse_from(["tweetalign", "sentiment", "in.csv"]).is_err());
    }

    #[test]
    fn test_bad_delimiter_rejected() {
        assert!(Cli::try_parse_from(["tweetalign", "init", "--delimiter", ";;"]).is_err());
    }
}
