use crate::core::Camp;
use crate::formatting::{format_count, format_optional, format_score};
use crate::io::output::OutputWriter;
use crate::report::{
    CampInfluencers, GeoReport, LabelReport, Section, SentimentComparison, SourceDistribution,
    TemporalVolume,
};
use std::io::Write;

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_skipped<T>(&mut self, section: &Section<T>) -> anyhow::Result<bool> {
        if let Some(reason) = section.skip_reason() {
            writeln!(self.writer, "_Skipped: {}_", escape(reason))?;
            writeln!(self.writer)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn write_summary(&mut self, report: &LabelReport) -> anyhow::Result<()> {
        let t = &report.thresholds;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(self.writer, "| Tweets | {} |", report.total_tweets)?;
        writeln!(self.writer, "| Users | {} |", report.total_users)?;
        writeln!(
            self.writer,
            "| Low threshold (q={}) | {} |",
            t.low_quantile,
            format_score(t.low)
        )?;
        writeln!(
            self.writer,
            "| High threshold (q={}) | {} |",
            t.high_quantile,
            format_score(t.high)
        )?;
        for size in &report.camps {
            writeln!(self.writer, "| {} users | {} |", size.camp, size.users)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_influencers(&mut self, groups: &[CampInfluencers]) -> anyhow::Result<()> {
        writeln!(self.writer, "## Top Influencers")?;
        writeln!(self.writer)?;
        for group in groups {
            writeln!(self.writer, "### {}", group.camp)?;
            writeln!(self.writer)?;
            if group.influencers.is_empty() {
                writeln!(self.writer, "_No qualifying users_")?;
                writeln!(self.writer)?;
                continue;
            }
            writeln!(self.writer, "| User | Name | Followers | Tweets | Alignment |")?;
            writeln!(self.writer, "|------|------|-----------|--------|-----------|")?;
            for i in &group.influencers {
                writeln!(
                    self.writer,
                    "| {} | {} | {} | {} | {} |",
                    escape(&i.user_id),
                    escape(i.user_name.as_deref().unwrap_or("-")),
                    format_count(i.followers),
                    i.tweet_count,
                    format_score(i.alignment_score)
                )?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_temporal(&mut self, section: &Section<TemporalVolume>) -> anyhow::Result<()> {
        writeln!(self.writer, "## Tweet Volume")?;
        writeln!(self.writer)?;
        if self.write_skipped(section)? {
            return Ok(());
        }
        let Some(volume) = section.data() else {
            return Ok(());
        };

        writeln!(
            self.writer,
            "Daily tweets per camp from `{}`, {}-day rolling mean in parentheses.",
            volume.date_column, volume.window
        )?;
        writeln!(self.writer)?;

        let camps: Vec<String> = volume.series.iter().map(|s| s.camp.to_string()).collect();
        writeln!(self.writer, "| Date | {} |", camps.join(" | "))?;
        writeln!(self.writer, "|------|{}", "------|".repeat(camps.len()))?;
        for (day_index, day) in volume.days.iter().enumerate() {
            let cells: Vec<String> = volume
                .series
                .iter()
                .map(|s| format!("{} ({:.2})", s.counts[day_index], s.rolling_mean[day_index]))
                .collect();
            writeln!(self.writer, "| {} | {} |", day, cells.join(" | "))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_sources(&mut self, section: &Section<SourceDistribution>) -> anyhow::Result<()> {
        writeln!(self.writer, "## Sources")?;
        writeln!(self.writer)?;
        if self.write_skipped(section)? {
            return Ok(());
        }
        let Some(dist) = section.data() else {
            return Ok(());
        };

        writeln!(self.writer, "| Source | Total | Biden | Trump | Neutral |")?;
        writeln!(self.writer, "|--------|-------|-------|-------|---------|")?;
        for row in &dist.sources {
            let count = |camp: Camp| row.by_camp.get(&camp).copied().unwrap_or(0);
            writeln!(
                self.writer,
                "| {} | {} | {} | {} | {} |",
                escape(&row.source),
                row.total,
                count(Camp::Biden),
                count(Camp::Trump),
                count(Camp::Neutral)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_label_report(&mut self, report: &LabelReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Political Alignment Report")?;
        writeln!(self.writer)?;
        self.write_summary(report)?;
        self.write_influencers(&report.influencers)?;
        self.write_temporal(&report.temporal_volume)?;
        self.write_sources(&report.sources)?;

        writeln!(self.writer, "## Top Hashtags")?;
        writeln!(self.writer)?;
        for group in &report.hashtags {
            let tags: Vec<String> = group
                .hashtags
                .iter()
                .map(|h| format!("`#{}` ({})", h.hashtag, h.count))
                .collect();
            let tags = if tags.is_empty() {
                "_none_".to_string()
            } else {
                tags.join(", ")
            };
            writeln!(self.writer, "- **{}**: {}", group.camp, tags)?;
        }
        writeln!(self.writer)?;

        if !report.diagnostics.is_empty() {
            writeln!(self.writer, "## Diagnostics")?;
            writeln!(self.writer)?;
            for d in &report.diagnostics {
                writeln!(self.writer, "- {}", escape(d))?;
            }
            writeln!(self.writer)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn write_sentiment_comparison(
        &mut self,
        comparison: &SentimentComparison,
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "# Sentiment Comparison")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Candidate | Tweets | Positive % | Negative % | Neutral % |")?;
        writeln!(self.writer, "|-----------|--------|------------|------------|-----------|")?;
        for c in &comparison.candidates {
            let percents: Vec<String> = c.shares.iter().map(|s| format!("{:.1}", s.percent)).collect();
            writeln!(
                self.writer,
                "| {} | {} | {} |",
                c.candidate.as_str(),
                c.tweets,
                percents.join(" | ")
            )?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "## Intensity")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Candidate | Sentiment | Count | Mean | Median | Histogram (0-1, 10 bins) |")?;
        writeln!(self.writer, "|-----------|-----------|-------|------|--------|--------------------------|")?;
        for c in &comparison.candidates {
            for i in &c.intensity {
                let bins: Vec<String> = i.histogram.iter().map(|n| n.to_string()).collect();
                writeln!(
                    self.writer,
                    "| {} | {} | {} | {} | {} | {} |",
                    c.candidate.as_str(),
                    i.sentiment,
                    i.count,
                    format_optional(i.mean, 3),
                    format_optional(i.median, 3),
                    bins.join(" ")
                )?;
            }
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_geo_report(&mut self, report: &GeoReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Geography")?;
        writeln!(self.writer)?;

        writeln!(self.writer, "## Tweets per US State")?;
        writeln!(self.writer)?;
        if !self.write_skipped(&report.states)? {
            if let Some(states) = report.states.data() {
                writeln!(self.writer, "| State | {} |", states.labels.join(" | "))?;
                writeln!(self.writer, "|-------|{}", "------|".repeat(states.labels.len()))?;
                for row in &states.rows {
                    let cells: Vec<String> = states
                        .labels
                        .iter()
                        .map(|l| row.counts.get(l).copied().unwrap_or(0).to_string())
                        .collect();
                    writeln!(self.writer, "| {} | {} |", escape(&row.state), cells.join(" | "))?;
                }
                writeln!(self.writer)?;
            }
        }

        writeln!(self.writer, "## World Dominance")?;
        writeln!(self.writer)?;
        if !self.write_skipped(&report.dominance)? {
            if let Some(map) = report.dominance.data() {
                writeln!(
                    self.writer,
                    "`(Biden - Trump) / (Biden + Trump)`, scale ±{:.2}",
                    map.scale.max_abs
                )?;
                writeln!(self.writer)?;
                writeln!(self.writer, "| Country | Biden | Trump | Dominance | Colour |")?;
                writeln!(self.writer, "|---------|-------|-------|-----------|--------|")?;
                for row in &map.rows {
                    writeln!(
                        self.writer,
                        "| {} | {} | {} | {} | `{}` |",
                        escape(&row.country),
                        row.biden,
                        row.trump,
                        format_optional(row.rel_diff, 3),
                        row.color
                    )?;
                }
                writeln!(self.writer)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('|', "\\|")
}
