//! CSV loading and saving for tweet tables.
//!
//! Input files come from ad-hoc scraping exports, so the loader is lenient:
//! the delimiter is sniffed from the header line unless given, ragged rows
//! are accepted, invalid UTF-8 is decoded lossily and unparseable numbers
//! become missing values.

use crate::core::{columns, Error, Result, TweetRecord, TweetTable, UserAggregate};
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Delimiters considered by [`sniff_delimiter`], in tie-break order.
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Fallback input used by `label` when none is configured.
pub const DEFAULT_FALLBACK: &str = "Data/tweets_with_sentiment.csv";

/// Options controlling how a table is read.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit delimiter; sniffed from the header line when `None`.
    pub delimiter: Option<u8>,
    /// Tried once when the primary path does not exist.
    pub fallback: Option<PathBuf>,
}

/// Pick the delimiter occurring most often outside quotes in `header`.
/// Falls back to a comma when nothing matches.
pub fn sniff_delimiter(header: &str) -> u8 {
    let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
    let mut in_quotes = false;

    for byte in header.bytes() {
        if byte == b'"' {
            in_quotes = !in_quotes;
            continue;
        }
        if in_quotes {
            continue;
        }
        if let Some(index) = CANDIDATE_DELIMITERS.iter().position(|d| *d == byte) {
            counts[index] += 1;
        }
    }

    let (best, count) = counts
        .iter()
        .enumerate()
        .fold((0, 0), |(best, best_count), (i, &count)| {
            if count > best_count {
                (i, count)
            } else {
                (best, best_count)
            }
        });

    if count == 0 {
        b','
    } else {
        CANDIDATE_DELIMITERS[best]
    }
}

/// Read `primary`, or `fallback` once if `primary` does not exist.
/// Returns the path actually read together with its bytes.
pub fn read_with_fallback(primary: &Path, fallback: Option<&Path>) -> Result<(PathBuf, Vec<u8>)> {
    match fs::read(primary) {
        Ok(bytes) => Ok((primary.to_path_buf(), bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let Some(fallback) = fallback else {
                return Err(Error::InputNotFound {
                    primary: primary.to_path_buf(),
                    fallback: None,
                });
            };
            tracing::warn!(
                "Input {} not found, trying fallback {}",
                primary.display(),
                fallback.display()
            );
            match fs::read(fallback) {
                Ok(bytes) => Ok((fallback.to_path_buf(), bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::InputNotFound {
                    primary: primary.to_path_buf(),
                    fallback: Some(fallback.to_path_buf()),
                }),
                Err(e) => Err(Error::file_system("Failed to read input", fallback, e)),
            }
        }
        Err(e) => Err(Error::file_system("Failed to read input", primary, e)),
    }
}

/// Load a tweet table from disk.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<TweetTable> {
    let (resolved, bytes) = read_with_fallback(path, options.fallback.as_deref())?;
    let _file = crate::observability::set_current_file(&resolved);

    let table = parse_table(&bytes, options.delimiter)?;
    tracing::info!(
        "Loaded {} tweets ({} columns) from {}",
        table.len(),
        table.headers.len(),
        resolved.display()
    );
    Ok(table)
}

/// Parse CSV bytes into a tweet table.
pub fn parse_table(bytes: &[u8], delimiter: Option<u8>) -> Result<TweetTable> {
    let delimiter = delimiter.unwrap_or_else(|| {
        let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
        let sniffed = sniff_delimiter(&String::from_utf8_lossy(first_line));
        tracing::debug!("Sniffed delimiter {:?}", sniffed as char);
        sniffed
    });

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    let mut row = ByteRecord::new();
    while reader.read_byte_record(&mut row)? {
        records.push(record_from_row(&headers, &row));
    }

    Ok(TweetTable::new(headers, records))
}

fn record_from_row(headers: &[String], row: &ByteRecord) -> TweetRecord {
    let mut record = TweetRecord::default();

    for (header, raw) in headers.iter().zip(row.iter()) {
        let value = String::from_utf8_lossy(raw).into_owned();
        match header.as_str() {
            columns::USER_ID => record.user_id = value.trim().to_string(),
            columns::USER_NAME => record.user_name = non_empty(value),
            columns::USER_FOLLOWERS_COUNT => record.user_followers_count = parse_number(&value),
            columns::CANDIDATE => record.candidate_label = value.trim().to_string(),
            columns::SENTIMENT => record.sentiment = crate::core::Sentiment::from_label(&value),
            columns::SCORE => record.score = parse_number(&value),
            columns::LIKES => record.likes = parse_number(&value),
            columns::RETWEET_COUNT => record.retweet_count = parse_number(&value),
            columns::TWEET => record.tweet = non_empty(value),
            columns::TWEET_ORIGINAL => record.tweet_original = non_empty(value),
            columns::ALIGNMENT_SCORE => record.alignment_score = parse_number(&value),
            columns::CAMP => record.camp = crate::core::Camp::parse(&value),
            _ => {
                record.extra.insert(header.clone(), value);
            }
        }
    }

    record
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Lenient numeric parse; empty or malformed cells are missing.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Write every column of the table, in header order.
pub fn write_table<W: Write>(table: &TweetTable, writer: W) -> Result<()> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(&table.headers)?;
    for record in &table.records {
        csv.write_record(table.headers.iter().map(|h| record.value(h).into_owned()))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn save_table(table: &TweetTable, path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .map_err(|e| Error::file_system("Failed to create output", path, e))?;
    write_table(table, file)
}

/// Write the user study, one row per user.
pub fn save_users(users: &[UserAggregate], path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .map_err(|e| Error::file_system("Failed to create output", path, e))?;
    let mut csv = WriterBuilder::new().from_writer(file);
    for user in users {
        csv.serialize(user)?;
    }
    csv.flush()?;
    Ok(())
}

/// Keep only the first row of each user, in input order.
pub fn unique_users(table: &TweetTable) -> TweetTable {
    let mut seen = HashSet::new();
    let records = table
        .records
        .iter()
        .filter(|r| seen.insert(r.user_id.as_str()))
        .cloned()
        .collect();
    TweetTable::new(table.headers.clone(), records)
}

/// Keep the first row of each user, then sample at most `n` of them.
///
/// Sampling is seeded so runs are reproducible; without a seed the order is
/// drawn from entropy.
pub fn sample_unique_users(table: &TweetTable, n: usize, seed: Option<u64>) -> TweetTable {
    let mut unique = unique_users(table).records;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    unique.shuffle(&mut rng);
    unique.truncate(n.min(unique.len()));

    TweetTable::new(table.headers.clone(), unique)
}

/// Drop rows whose text marks them as retweets.
pub fn drop_retweets(table: &TweetTable, text_column: &str) -> TweetTable {
    let records = table
        .records
        .iter()
        .filter(|r| !r.text(text_column).is_some_and(crate::text::is_retweet))
        .cloned()
        .collect();
    TweetTable::new(table.headers.clone(), records)
}
