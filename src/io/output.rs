use crate::report::{GeoReport, LabelReport, SentimentComparison};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::writers::{JsonWriter, MarkdownWriter, TerminalWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
}

/// Renders the reports of each command in one format.
pub trait OutputWriter {
    fn write_label_report(&mut self, report: &LabelReport) -> anyhow::Result<()>;
    fn write_sentiment_comparison(&mut self, comparison: &SentimentComparison)
        -> anyhow::Result<()>;
    fn write_geo_report(&mut self, report: &GeoReport) -> anyhow::Result<()>;
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
    }
}

/// Buffered file when `path` is given, stdout otherwise.
pub fn open_destination(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
