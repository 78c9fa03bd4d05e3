//! Tweet text normalisation helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid URL regex"));
static MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+").expect("valid mention regex"));
static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("valid hashtag regex"));
static PUNCT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid punct regex"));
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Repair UTF-8 text that was decoded as latin-1 somewhere upstream
/// (`Ã©` back to `é`). Text without the telltale characters is returned
/// unchanged; undecodable bytes are dropped.
pub fn fix_mojibake(text: &str) -> String {
    if !text.contains('Ã') && !text.contains('Â') {
        return text.to_string();
    }

    let bytes: Vec<u8> = text
        .chars()
        .filter_map(|c| u8::try_from(u32::from(c)).ok())
        .collect();

    String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect()
}

/// Full clean-up of tweet text ahead of sentiment inference: strips URLs and
/// mentions, unwraps hashtags, lowercases, drops emoji and punctuation and
/// collapses whitespace.
pub fn clean_text(text: &str) -> String {
    let text = URL_RE.replace_all(text, " ");
    let text = MENTION_RE.replace_all(&text, " ");
    let text = HASHTAG_RE.replace_all(&text, "$1");
    let text = text.to_lowercase();
    let text = PUNCT_RE.replace_all(&text, " ");
    WS_RE.replace_all(&text, " ").trim().to_string()
}

pub fn is_retweet(text: &str) -> bool {
    text.starts_with("RT @")
}

/// Most common hashtags (lowercased, without `#`), most frequent first.
/// Ties keep first-seen order.
pub fn top_hashtags<'a, I>(texts: I, top_n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for text in texts {
        let lowered = text.to_lowercase();
        for capture in HASHTAG_RE.captures_iter(&lowered) {
            let tag = capture[1].to_string();
            let count = counts.entry(tag.clone()).or_insert(0);
            if *count == 0 {
                order.push(tag);
            }
            *count += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|tag| {
            let count = counts[&tag];
            (tag, count)
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_pipeline() {
        let raw = "RT @joe: Vote #Biden2020 now!!! https://t.co/xyz 🇺🇸  www.example.com";
        assert_eq!(clean_text(raw), "rt vote biden2020 now");
    }

    #[test]
    fn test_clean_text_keeps_accents() {
        assert_eq!(clean_text("Élection   présidentielle!"), "élection présidentielle");
    }

    #[test]
    fn test_fix_mojibake() {
        assert_eq!(fix_mojibake("Ã©lection"), "élection");
        assert_eq!(fix_mojibake("plain text"), "plain text");
    }

    #[test]
    fn test_is_retweet() {
        assert!(is_retweet("RT @user: text"));
        assert!(!is_retweet("not RT @user"));
    }

    #[test]
    fn test_top_hashtags_counts_and_ties() {
        let texts = ["#MAGA rally #Trump", "#trump again", "#Vote #maga", "#vote"];
        let top = top_hashtags(texts.iter().copied(), 2);
        assert_eq!(
            top,
            vec![("maga".to_string(), 2), ("trump".to_string(), 2)]
        );
    }
}
