//! Rule-based sentiment model over a political-discourse lexicon.

use super::{Prediction, SentimentModel};
use crate::core::{Result, Sentiment};
use std::collections::{HashMap, HashSet};

const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("good", 0.5),
    ("great", 0.7),
    ("best", 0.7),
    ("love", 0.8),
    ("win", 0.6),
    ("winning", 0.6),
    ("won", 0.5),
    ("victory", 0.7),
    ("hope", 0.5),
    ("proud", 0.6),
    ("strong", 0.5),
    ("honest", 0.6),
    ("leader", 0.4),
    ("support", 0.4),
    ("trust", 0.5),
    ("amazing", 0.8),
    ("excellent", 0.8),
    ("happy", 0.6),
    ("thank", 0.5),
    ("thanks", 0.5),
    ("brilliant", 0.7),
    ("hero", 0.7),
    ("safe", 0.4),
    ("unite", 0.5),
    ("healing", 0.5),
    ("decent", 0.5),
    ("landslide", 0.6),
    ("congratulations", 0.7),
    ("congrats", 0.7),
    ("yes", 0.3),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("bad", -0.5),
    ("worst", -0.8),
    ("hate", -0.8),
    ("lose", -0.6),
    ("loser", -0.8),
    ("lost", -0.5),
    ("liar", -0.8),
    ("lie", -0.6),
    ("lies", -0.7),
    ("corrupt", -0.8),
    ("fraud", -0.9),
    ("fake", -0.6),
    ("rigged", -0.8),
    ("weak", -0.5),
    ("stupid", -0.7),
    ("disgrace", -0.8),
    ("disaster", -0.8),
    ("crazy", -0.5),
    ("racist", -0.8),
    ("dangerous", -0.6),
    ("fear", -0.5),
    ("scandal", -0.7),
    ("shame", -0.6),
    ("terrible", -0.8),
    ("sad", -0.5),
    ("angry", -0.6),
    ("steal", -0.7),
    ("stolen", -0.7),
    ("chaos", -0.6),
    ("incompetent", -0.8),
    ("sleepy", -0.4),
    ("no", -0.2),
];

const NEGATIONS: &[&str] = &[
    "not", "never", "neither", "nobody", "nothing", "none", "cannot", "cant", "dont", "doesnt",
    "didnt", "wont", "wouldnt", "shouldnt", "couldnt", "isnt", "arent", "wasnt", "werent",
    "hardly", "barely",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("really", 1.4),
    ("extremely", 1.8),
    ("so", 1.3),
    ("totally", 1.5),
    ("absolutely", 1.7),
    ("most", 1.3),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

/// Number of preceding tokens a negation reaches.
const NEGATION_WINDOW: usize = 3;

/// Lexicon sentiment model.
///
/// Each lexicon hit is weighted, flipped when a negation appears within the
/// previous three tokens and scaled by an immediately preceding intensifier.
/// The label comes from the mean weight: inside `neutral_band` it is neutral,
/// otherwise the sign decides. Confidence is the clamped magnitude for
/// polar labels and `1 - |mean|` for neutral ones.
pub struct LexiconModel {
    words: HashMap<String, f64>,
    negations: HashSet<String>,
    intensifiers: HashMap<String, f64>,
    neutral_band: f64,
}

impl Default for LexiconModel {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl LexiconModel {
    pub fn new(neutral_band: f64) -> Self {
        let words = POSITIVE_WORDS
            .iter()
            .chain(NEGATIVE_WORDS)
            .map(|(w, s)| (w.to_string(), *s))
            .collect();
        let negations = NEGATIONS.iter().map(|w| w.to_string()).collect();
        let intensifiers = INTENSIFIERS.iter().map(|(w, s)| (w.to_string(), *s)).collect();

        Self {
            words,
            negations,
            intensifiers,
            neutral_band: neutral_band.abs(),
        }
    }

    /// Add or override a lexicon entry.
    pub fn with_word(mut self, word: &str, weight: f64) -> Self {
        self.words.insert(word.to_lowercase(), weight.clamp(-1.0, 1.0));
        self
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .replace('\'', "")
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Mean weighted polarity of the lexicon hits, `None` without hits.
    pub fn polarity(&self, text: &str) -> Option<f64> {
        let tokens = Self::tokenize(text);
        let mut hits = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&weight) = self.words.get(token) else {
                continue;
            };

            let negated = tokens[i.saturating_sub(NEGATION_WINDOW)..i]
                .iter()
                .any(|t| self.negations.contains(t));
            let boost = i
                .checked_sub(1)
                .and_then(|prev| self.intensifiers.get(&tokens[prev]))
                .copied()
                .unwrap_or(1.0);

            let value = weight * boost * if negated { -1.0 } else { 1.0 };
            hits.push(value.clamp(-1.0, 1.0));
        }

        crate::stats::mean(&hits)
    }
}

impl SentimentModel for LexiconModel {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn predict(&self, text: &str) -> Result<Prediction> {
        let polarity = self.polarity(text).unwrap_or(0.0);
        let magnitude = polarity.abs().min(1.0);

        let prediction = if magnitude < self.neutral_band {
            Prediction::new(Sentiment::Neutral, 1.0 - magnitude)
        } else if polarity > 0.0 {
            Prediction::new(Sentiment::Positive, magnitude)
        } else {
            Prediction::new(Sentiment::Negative, magnitude)
        };
        Ok(prediction)
    }
}
