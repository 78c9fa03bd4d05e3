use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::accessors::parse_delimiter;
use super::core::{CampsConfig, TweetalignConfig};
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".tweetalign.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a TOML document. Invalid sections are reset to their defaults
/// with a warning rather than rejecting the whole file.
pub fn parse_and_validate_config(contents: &str) -> std::result::Result<TweetalignConfig, String> {
    let mut config = toml::from_str::<TweetalignConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if let Some(ref camps) = config.camps {
        if let Err(e) = camps.validate() {
            log::warn!("Invalid [camps] section: {}. Using defaults.", e);
            config.camps = Some(CampsConfig::default());
        }
    }

    if let Some(input) = config.input.as_mut() {
        if let Some(delimiter) = input.delimiter.as_deref() {
            if parse_delimiter(delimiter).is_none() {
                log::warn!(
                    "Invalid [input] delimiter {:?}: expected one character. Sniffing instead.",
                    delimiter
                );
                input.delimiter = None;
            }
        }
    }

    if let Some(map) = config.map.as_mut() {
        if map.levels == 0 {
            log::warn!("Invalid [map] levels 0. Using {}.", super::core::default_levels());
            map.levels = super::core::default_levels();
        }
    }

    Ok(config)
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<TweetalignConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Only real failures are worth a warning; a missing file is the common case.
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` and its parents, nearest first, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and up to nine parents for `.tweetalign.toml`.
pub fn load_config_from_dir(start: PathBuf) -> TweetalignConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            TweetalignConfig::default()
        })
}

/// Discover the config from the working directory upwards.
pub fn load_config() -> TweetalignConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from_dir(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            TweetalignConfig::default()
        }
    }
}

/// Load an explicitly requested config file. Unlike discovery, a missing
/// or unparseable file is an error.
pub fn load_config_from(path: &Path) -> Result<TweetalignConfig> {
    let contents = read_config_file(path)
        .map_err(|e| Error::file_system("Failed to read config file", path, e))?;
    parse_and_validate_config(&contents).map_err(Error::Configuration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_and_validate_config(indoc! {r#"
            [camps]
            low_quantile = 0.3
            high_quantile = 0.7

            [report]
            min_tweets = 5

            [input]
            fallback = "Data/tweets_with_sentiment.csv"
            delimiter = ";"

            [map]
            levels = 10
        "#})
        .unwrap();

        let camps = config.camps.unwrap();
        assert_eq!(camps.low_quantile, 0.3);
        assert_eq!(camps.high_quantile, 0.7);

        let report = config.report.unwrap();
        assert_eq!(report.min_tweets, 5);
        assert_eq!(report.top_influencers, 10);

        assert_eq!(config.input.unwrap().delimiter.as_deref(), Some(";"));
        assert_eq!(config.map.unwrap().levels, 10);
        assert!(config.sentiment.is_none());
    }

    #[test]
    fn test_invalid_camps_fall_back_to_defaults() {
        let config = parse_and_validate_config(indoc! {"
            [camps]
            low_quantile = 0.9
            high_quantile = 0.1
        "})
        .unwrap();
        assert_eq!(config.camps, Some(CampsConfig::default()));
    }

    #[test]
    fn test_invalid_delimiter_is_dropped() {
        let config = parse_and_validate_config("[input]\ndelimiter = \"ab\"\n").unwrap();
        assert_eq!(config.input.unwrap().delimiter, None);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(parse_and_validate_config("[camps\nlow = ").is_err());
    }

    #[test]
    fn test_directory_ancestors_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
    }

    #[test]
    fn test_discovery_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("one").join("two");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[report]\ntop_sources = 5\n",
        )
        .unwrap();

        let config = load_config_from_dir(nested);
        assert_eq!(config.report.unwrap().top_sources, 5);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(load_config_from(&temp.path().join("nope.toml")).is_err());
    }
}
