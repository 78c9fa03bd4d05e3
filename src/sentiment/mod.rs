//! Sentiment inference over tweet text.
//!
//! Models sit behind [`SentimentModel`] so the pipeline does not care whether
//! predictions come from the built-in [`LexiconModel`] or an external
//! classifier. [`SentimentAnalysis`] drives a model over a whole table and
//! never lets a single failed prediction abort the run.

mod analysis;
mod lexicon;

pub use analysis::{AnalysisStats, SentimentAnalysis, SentimentOptions};
pub use lexicon::LexiconModel;

use crate::core::{Result, Sentiment};
use serde::Serialize;

/// A model's verdict for one text: label plus confidence in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Sentiment,
    pub score: f64,
}

impl Prediction {
    pub fn new(label: Sentiment, score: f64) -> Self {
        Self {
            label,
            score: score.clamp(0.0, 1.0),
        }
    }

    /// Substitute used when a model invocation fails.
    pub fn fallback() -> Self {
        Self::new(Sentiment::Neutral, 0.0)
    }
}

/// Anything that can label a text with a sentiment.
pub trait SentimentModel: Send + Sync {
    fn name(&self) -> &str;
    fn predict(&self, text: &str) -> Result<Prediction>;
}

impl<T: SentimentModel + ?Sized> SentimentModel for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn predict(&self, text: &str) -> Result<Prediction> {
        (**self).predict(text)
    }
}
