use crate::formatting::format_optional;
use crate::report::DominanceMap;
use anyhow::Result;
use chrono::Utc;
use html_escape::{encode_double_quoted_attribute, encode_script, encode_text};
use std::io::Write;

/// Standalone HTML page for the world dominance map: double legend, the
/// step colour scale and one swatch per country.
pub struct DominanceHtmlWriter<W: Write> {
    writer: W,
    title: String,
    template: &'static str,
}

impl<W: Write> DominanceHtmlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            title: "World dominance: Biden vs Trump".to_string(),
            template: include_str!("templates/dominance_map.html"),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn write_map(&mut self, map: &DominanceMap) -> Result<()> {
        let html = self.render(map)?;
        write!(self.writer, "{}", html)?;
        self.writer.flush()?;
        Ok(())
    }

    fn render(&self, map: &DominanceMap) -> Result<String> {
        let json_data = serde_json::to_string(map)?;

        let scale: String = map
            .scale
            .colors
            .iter()
            .map(|c| {
                format!(
                    "<span style=\"background:{}\"></span>",
                    encode_double_quoted_attribute(c)
                )
            })
            .collect();

        let rows: Vec<String> = map
            .rows
            .iter()
            .map(|row| {
                format!(
                    "    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                     <td><span class=\"swatch\" style=\"background:{}\"></span></td></tr>",
                    encode_text(&row.country),
                    row.biden,
                    row.trump,
                    format_optional(row.rel_diff, 3),
                    encode_double_quoted_attribute(&row.color)
                )
            })
            .collect();

        let html = self
            .template
            .replace("{{{TITLE}}}", &encode_text(&self.title))
            .replace("{{{MAX_ABS}}}", &format!("{:.2}", map.scale.max_abs))
            .replace("{{{COUNTRY_COUNT}}}", &map.rows.len().to_string())
            .replace("{{{LEVELS}}}", &map.scale.colors.len().to_string())
            .replace(
                "{{{TIMESTAMP}}}",
                &Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            )
            .replace("{{{SCALE}}}", &scale)
            .replace("{{{ROWS}}}", &rows.join("\n"))
            .replace("{{{JSON_DATA}}}", &encode_script(&json_data));

        Ok(html)
    }
}
