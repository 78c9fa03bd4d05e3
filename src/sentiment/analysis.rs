use super::{Prediction, SentimentModel};
use crate::core::{columns, Error, Result, Sentiment, TweetTable};
use crate::observability::{increment_processed, set_phase, set_progress, AnalysisPhase};
use crate::progress::{ProgressManager, TEMPLATE_INFERENCE};
use crate::text::{clean_text, fix_mojibake};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

/// How text is prepared and scheduled for inference.
#[derive(Debug, Clone)]
pub struct SentimentOptions {
    /// Column holding the text to score.
    pub text_column: String,
    /// Texts are truncated to this many characters before inference.
    pub max_chars: usize,
    /// Run [`clean_text`] before inference.
    pub clean: bool,
    /// Score rows on the rayon pool.
    pub parallel: bool,
}

impl Default for SentimentOptions {
    fn default() -> Self {
        Self {
            text_column: columns::TWEET.to_string(),
            max_chars: 512,
            clean: false,
            parallel: true,
        }
    }
}

/// Outcome counters for one inference pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisStats {
    pub analyzed: usize,
    /// Rows whose prediction failed and were substituted with neutral/0.0.
    pub failed: usize,
    pub by_label: BTreeMap<Sentiment, usize>,
}

/// Runs a [`SentimentModel`] over every row of a table.
pub struct SentimentAnalysis<M: SentimentModel> {
    model: M,
    options: SentimentOptions,
    progress: ProgressManager,
}

impl<M: SentimentModel> SentimentAnalysis<M> {
    pub fn new(model: M, options: SentimentOptions) -> Self {
        Self {
            model,
            options,
            progress: ProgressManager::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = progress;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    fn prepare_text(&self, raw: Option<&str>) -> String {
        let text = fix_mojibake(raw.unwrap_or_default());
        let text = if self.options.clean {
            clean_text(&text)
        } else {
            text
        };
        text.chars().take(self.options.max_chars).collect()
    }

    /// Predict one text, substituting neutral/0.0 when the model fails.
    /// The flag reports whether the substitution happened.
    pub fn predict_or_fallback(&self, text: &str) -> (Prediction, bool) {
        let result = match self.model.predict(text) {
            Ok(prediction) => (prediction, false),
            Err(e) => {
                tracing::warn!("{} model failed, using neutral: {}", self.model.name(), e);
                (Prediction::fallback(), true)
            }
        };
        increment_processed();
        result
    }

    /// Score every row and write `sentiment` and `score` onto it.
    pub fn analyze_table(&self, table: &mut TweetTable) -> Result<AnalysisStats> {
        if !table.has_column(&self.options.text_column) {
            return Err(Error::MissingColumn(self.options.text_column.clone()));
        }
        let _phase = set_phase(AnalysisPhase::SentimentInference);

        let texts: Vec<String> = table
            .records
            .iter()
            .map(|r| self.prepare_text(r.text(&self.options.text_column)))
            .collect();
        set_progress(0, texts.len());

        let bar = self.progress.create_bar(texts.len() as u64, TEMPLATE_INFERENCE);
        bar.set_message(format!("Scoring tweets with {}", self.model.name()));

        let results: Vec<(Prediction, bool)> = if self.options.parallel {
            texts
                .par_iter()
                .progress_with(bar.clone())
                .map(|text| self.predict_or_fallback(text))
                .collect()
        } else {
            texts
                .iter()
                .map(|text| {
                    bar.inc(1);
                    self.predict_or_fallback(text)
                })
                .collect()
        };
        bar.finish_and_clear();

        let mut stats = AnalysisStats::default();
        for (record, (prediction, failed)) in table.records.iter_mut().zip(results) {
            record.sentiment = prediction.label;
            record.score = Some(prediction.score);
            stats.analyzed += 1;
            stats.failed += usize::from(failed);
            *stats.by_label.entry(prediction.label).or_insert(0) += 1;
        }
        table.ensure_column(columns::SENTIMENT);
        table.ensure_column(columns::SCORE);

        tracing::info!(
            "Scored {} tweets ({} fallbacks)",
            stats.analyzed,
            stats.failed
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TweetRecord;
    use crate::sentiment::LexiconModel;

    /// Fails on any text mentioning "boom".
    struct FlakyModel;

    impl SentimentModel for FlakyModel {
        fn name(&self) -> &str {
            "flaky"
        }

        fn predict(&self, text: &str) -> Result<Prediction> {
            if text.contains("boom") {
                Err(Error::Sentiment("model crashed".into()))
            } else {
                Ok(Prediction::new(Sentiment::Positive, 0.9))
            }
        }
    }

    /// Echoes the received text length as the score.
    struct LengthModel;

    impl SentimentModel for LengthModel {
        fn name(&self) -> &str {
            "length"
        }

        fn predict(&self, text: &str) -> Result<Prediction> {
            Ok(Prediction::new(
                Sentiment::Positive,
                text.chars().count() as f64 / 1000.0,
            ))
        }
    }

    fn table_of(texts: &[&str]) -> TweetTable {
        let records = texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let mut r = TweetRecord::new(i.to_string());
                r.tweet = Some(t.to_string());
                r
            })
            .collect();
        TweetTable::from_records(records)
    }

    #[test]
    fn test_failures_are_substituted_not_propagated() {
        let mut table = table_of(&["fine", "boom", "also fine"]);
        let analysis = SentimentAnalysis::new(FlakyModel, SentimentOptions::default());

        let stats = analysis.analyze_table(&mut table).unwrap();

        assert_eq!(stats.analyzed, 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(table.records[1].sentiment, Sentiment::Neutral);
        assert_eq!(table.records[1].score, Some(0.0));
        assert_eq!(table.records[0].sentiment, Sentiment::Positive);
        assert_eq!(table.records[2].score, Some(0.9));
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let texts = ["great win", "corrupt liar", "tuesday", "not honest", "very good"];
        let model = LexiconModel::default();

        let mut parallel = table_of(&texts);
        SentimentAnalysis::new(LexiconModel::default(), SentimentOptions::default())
            .analyze_table(&mut parallel)
            .unwrap();

        let mut sequential = table_of(&texts);
        let options = SentimentOptions {
            parallel: false,
            ..Default::default()
        };
        SentimentAnalysis::new(model, options)
            .analyze_table(&mut sequential)
            .unwrap();

        assert_eq!(parallel.records, sequential.records);
    }

    #[test]
    fn test_text_is_truncated() {
        let long = "a".repeat(2000);
        let mut table = table_of(&[&long]);
        SentimentAnalysis::new(LengthModel, SentimentOptions::default())
            .analyze_table(&mut table)
            .unwrap();
        assert_eq!(table.records[0].score, Some(0.512));
    }

    #[test]
    fn test_missing_text_column_is_an_error() {
        let mut table = TweetTable::new(vec!["user_id".into()], vec![TweetRecord::new("1")]);
        let err = SentimentAnalysis::new(LexiconModel::default(), SentimentOptions::default())
            .analyze_table(&mut table)
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn(c) if c == "tweet"));
    }

    #[test]
    fn test_adds_sentiment_columns() {
        let mut table = TweetTable::new(vec!["user_id".into(), "tweet".into()], vec![]);
        SentimentAnalysis::new(LexiconModel::default(), SentimentOptions::default())
            .analyze_table(&mut table)
            .unwrap();
        assert!(table.has_column("sentiment"));
        assert!(table.has_column("score"));
    }
}
