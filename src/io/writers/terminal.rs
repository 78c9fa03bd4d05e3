use crate::core::Camp;
use crate::formatting::{
    camp_label, format_count, format_optional, format_score, section_header, skipped,
};
use crate::io::output::OutputWriter;
use crate::report::{
    CampInfluencers, GeoReport, LabelReport, Section, SentimentComparison, SourceDistribution,
    TemporalVolume,
};
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::io::Write;

const RULE: &str = "═══════════════════════════════════════════";

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn banner(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", RULE.cyan())?;
        writeln!(self.writer, "{}", title.bold().cyan())?;
        writeln!(self.writer, "{}", RULE.cyan())?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn heading(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", section_header(title))?;
        Ok(())
    }

    fn table(&mut self, table: &Table) -> anyhow::Result<()> {
        writeln!(self.writer, "{table}")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn skipped<T>(&mut self, section: &Section<T>) -> anyhow::Result<bool> {
        if let Some(reason) = section.skip_reason() {
            writeln!(self.writer, "  {}", skipped(&format!("skipped: {reason}")))?;
            writeln!(self.writer)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn write_influencers(&mut self, groups: &[CampInfluencers]) -> anyhow::Result<()> {
        for group in groups {
            self.heading(&format!("Top influencers: {}", group.camp))?;
            if group.influencers.is_empty() {
                writeln!(self.writer, "  {}", skipped("no qualifying users"))?;
                writeln!(self.writer)?;
                continue;
            }
            let mut table = new_table(&["#", "User", "Name", "Followers", "Tweets", "Alignment"]);
            for (rank, i) in group.influencers.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(rank + 1),
                    Cell::new(&i.user_id),
                    Cell::new(i.user_name.as_deref().unwrap_or("-")),
                    Cell::new(format_count(i.followers)).set_alignment(CellAlignment::Right),
                    Cell::new(i.tweet_count).set_alignment(CellAlignment::Right),
                    score_cell(i.alignment_score),
                ]);
            }
            self.table(&table)?;
        }
        Ok(())
    }

    fn write_temporal(&mut self, section: &Section<TemporalVolume>) -> anyhow::Result<()> {
        self.heading("Tweet volume per day")?;
        if self.skipped(section)? {
            return Ok(());
        }
        let Some(volume) = section.data() else {
            return Ok(());
        };

        let mut header = vec!["Date".to_string()];
        for series in &volume.series {
            header.push(format!("{} ({}d avg)", series.camp, volume.window));
        }
        let mut table = new_table(&header.iter().map(String::as_str).collect::<Vec<_>>());
        for (day_index, day) in volume.days.iter().enumerate() {
            let mut row = vec![Cell::new(day)];
            for series in &volume.series {
                row.push(
                    Cell::new(format!(
                        "{} ({:.2})",
                        series.counts[day_index], series.rolling_mean[day_index]
                    ))
                    .set_alignment(CellAlignment::Right)
                    .fg(camp_color(series.camp)),
                );
            }
            table.add_row(row);
        }
        self.table(&table)?;
        if volume.dropped > 0 {
            writeln!(
                self.writer,
                "  {}",
                skipped(&format!("{} rows with unparseable dates ignored", volume.dropped))
            )?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_sources(&mut self, section: &Section<SourceDistribution>) -> anyhow::Result<()> {
        self.heading("Top sources")?;
        if self.skipped(section)? {
            return Ok(());
        }
        let Some(dist) = section.data() else {
            return Ok(());
        };

        let mut table = new_table(&["Source", "Total", "Biden", "Trump", "Neutral"]);
        for row in &dist.sources {
            let count = |camp: Camp| row.by_camp.get(&camp).copied().unwrap_or(0);
            table.add_row(vec![
                Cell::new(&row.source),
                Cell::new(row.total).set_alignment(CellAlignment::Right),
                Cell::new(count(Camp::Biden)).fg(Color::Blue),
                Cell::new(count(Camp::Trump)).fg(Color::Red),
                Cell::new(count(Camp::Neutral)),
            ]);
        }
        self.table(&table)
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_label_report(&mut self, report: &LabelReport) -> anyhow::Result<()> {
        self.banner("       POLITICAL ALIGNMENT REPORT")?;

        let t = &report.thresholds;
        writeln!(
            self.writer,
            "Tweets: {}   Users: {}",
            report.total_tweets.to_string().bold(),
            report.total_users.to_string().bold()
        )?;
        writeln!(
            self.writer,
            "Thresholds: low {} (q={})   high {} (q={})",
            format_score(t.low),
            t.low_quantile,
            format_score(t.high),
            t.high_quantile
        )?;
        let sizes: Vec<String> = report
            .camps
            .iter()
            .map(|s| format!("{} {}", camp_label(s.camp), s.users))
            .collect();
        writeln!(self.writer, "Camps: {}", sizes.join("   "))?;
        writeln!(self.writer)?;

        self.write_influencers(&report.influencers)?;
        self.write_temporal(&report.temporal_volume)?;
        self.write_sources(&report.sources)?;

        self.heading("Top hashtags")?;
        for group in &report.hashtags {
            let tags: Vec<String> = group
                .hashtags
                .iter()
                .map(|h| format!("#{} ({})", h.hashtag, h.count))
                .collect();
            writeln!(
                self.writer,
                "  {}: {}",
                camp_label(group.camp),
                if tags.is_empty() {
                    "-".to_string()
                } else {
                    tags.join(", ")
                }
            )?;
        }
        writeln!(self.writer)?;

        if !report.diagnostics.is_empty() {
            self.heading("Diagnostics")?;
            for d in &report.diagnostics {
                writeln!(self.writer, "  {} {}", "!".yellow().bold(), d)?;
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
        self.banner("     SENTIMENT COMPARISON: TRUMP VS BIDEN")?;

        self.heading("Sentiment share (%)")?;
        let mut table = new_table(&["Candidate", "Tweets", "Positive", "Negative", "Neutral"]);
        for c in &comparison.candidates {
            let mut row = vec![Cell::new(c.candidate.as_str()), Cell::new(c.tweets)];
            row.extend(
                c.shares
                    .iter()
                    .map(|s| Cell::new(format!("{:.1}", s.percent)).set_alignment(CellAlignment::Right)),
            );
            table.add_row(row);
        }
        self.table(&table)?;

        self.heading("Intensity")?;
        let mut table = new_table(&["Candidate", "Sentiment", "Count", "Mean", "Median", "Histogram 0..1"]);
        for c in &comparison.candidates {
            for i in &c.intensity {
                table.add_row(vec![
                    Cell::new(c.candidate.as_str()),
                    Cell::new(i.sentiment),
                    Cell::new(i.count).set_alignment(CellAlignment::Right),
                    Cell::new(format_optional(i.mean, 3)),
                    Cell::new(format_optional(i.median, 3)),
                    Cell::new(sparkline(&i.histogram)),
                ]);
            }
        }
        self.table(&table)?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_geo_report(&mut self, report: &GeoReport) -> anyhow::Result<()> {
        self.banner("           GEOGRAPHY REPORT")?;

        self.heading("Tweets per US state")?;
        if !self.skipped(&report.states)? {
            if let Some(states) = report.states.data() {
                let mut header = vec!["State"];
                header.extend(states.labels.iter().map(String::as_str));
                let mut table = new_table(&header);
                for row in &states.rows {
                    let mut cells = vec![Cell::new(&row.state)];
                    cells.extend(states.labels.iter().map(|l| {
                        Cell::new(row.counts.get(l).copied().unwrap_or(0))
                            .set_alignment(CellAlignment::Right)
                    }));
                    table.add_row(cells);
                }
                self.table(&table)?;
            }
        }

        self.heading("World dominance (Biden - Trump) / (Biden + Trump)")?;
        if !self.skipped(&report.dominance)? {
            if let Some(map) = report.dominance.data() {
                let mut table = new_table(&["Country", "Biden", "Trump", "Dominance"]);
                for row in &map.rows {
                    let dominance = Cell::new(format_optional(row.rel_diff, 3))
                        .set_alignment(CellAlignment::Right);
                    let dominance = match row.rel_diff {
                        Some(v) if v > 0.0 => dominance.fg(Color::Blue),
                        Some(v) if v < 0.0 => dominance.fg(Color::Red),
                        _ => dominance,
                    };
                    table.add_row(vec![
                        Cell::new(&row.country),
                        Cell::new(row.biden).set_alignment(CellAlignment::Right),
                        Cell::new(row.trump).set_alignment(CellAlignment::Right),
                        dominance,
                    ]);
                }
                self.table(&table)?;
            }
        }
        self.writer.flush()?;
        Ok(())
    }
}

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(h)).collect::<Vec<_>>());
    if colored::control::SHOULD_COLORIZE.should_colorize() {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }
    table
}

fn camp_color(camp: Camp) -> Color {
    match camp {
        Camp::Biden => Color::Blue,
        Camp::Trump => Color::Red,
        Camp::Neutral => Color::Reset,
    }
}

fn score_cell(score: f64) -> Cell {
    let cell = Cell::new(format_score(score)).set_alignment(CellAlignment::Right);
    if score > 0.0 {
        cell.fg(Color::Red)
    } else if score < 0.0 {
        cell.fg(Color::Blue)
    } else {
        cell
    }
}

/// One block character per bin, scaled to the largest bin.
fn sparkline(bins: &[usize]) -> String {
    const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    let max = bins.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return BLOCKS[0].to_string().repeat(bins.len());
    }
    bins.iter()
        .map(|&n| BLOCKS[(n * (BLOCKS.len() - 1)) / max])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Sentiment, TweetRecord, TweetTable};
    use crate::report::sentiment_compare::compare_sentiment;

    #[test]
    fn test_sparkline() {
        assert_eq!(sparkline(&[0, 0, 0]), "▁▁▁");
        assert_eq!(sparkline(&[0, 7, 14]), "▁▄█");
    }

    #[test]
    fn test_comparison_renders_both_candidates() {
        colored::control::set_override(false);
        let mut record = TweetRecord::new("1");
        record.sentiment = Sentiment::Negative;
        record.score = Some(0.4);
        let table = TweetTable::from_records(vec![record]);

        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer)
            .write_sentiment_comparison(&compare_sentiment(&table, &table))
            .unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("SENTIMENT COMPARISON"));
        assert!(text.contains("trump"));
        assert!(text.contains("biden"));
        assert!(text.contains("100.0"));
    }
}
