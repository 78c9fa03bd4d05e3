use crate::io::output::OutputWriter;
use crate::report::{GeoReport, LabelReport, SentimentComparison};
use serde::Serialize;
use std::io::Write;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_json<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_label_report(&mut self, report: &LabelReport) -> anyhow::Result<()> {
        self.write_json(report)
    }

    fn write_sentiment_comparison(
        &mut self,
        comparison: &SentimentComparison,
    ) -> anyhow::Result<()> {
        self.write_json(comparison)
    }

    fn write_geo_report(&mut self, report: &GeoReport) -> anyhow::Result<()> {
        self.write_json(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Sentiment, TweetRecord, TweetTable};
    use crate::report::sentiment_compare::compare_sentiment;

    #[test]
    fn test_comparison_json_shape() {
        let mut record = TweetRecord::new("1");
        record.sentiment = Sentiment::Positive;
        record.score = Some(0.9);
        let trump = TweetTable::from_records(vec![record]);

        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer)
            .write_sentiment_comparison(&compare_sentiment(&trump, &TweetTable::default()))
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["candidates"][0]["candidate"], "trump");
        assert_eq!(value["candidates"][0]["shares"][0]["sentiment"], "positive");
        assert_eq!(value["candidates"][0]["shares"][0]["percent"], 100.0);
        assert_eq!(value["candidates"][1]["tweets"], 0);
    }
}
