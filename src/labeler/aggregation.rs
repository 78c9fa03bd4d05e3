//! Grouping tweets into the per-user study.

use crate::core::{TweetRecord, TweetTable, UserAggregate};
use crate::stats;
use std::collections::BTreeMap;

#[derive(Default)]
struct UserAccumulator {
    user_name: Option<String>,
    followers: Option<f64>,
    likes: f64,
    retweets: f64,
    alignment: Vec<f64>,
    texts: Vec<String>,
}

impl UserAccumulator {
    fn push(&mut self, record: &TweetRecord) {
        if self.user_name.is_none() {
            self.user_name = record.user_name.clone();
        }
        if let Some(followers) = record.user_followers_count {
            self.followers = Some(self.followers.map_or(followers, |f| f.max(followers)));
        }
        self.likes += record.likes.unwrap_or(0.0);
        self.retweets += record.retweet_count.unwrap_or(0.0);
        self.alignment.push(record.alignment_score.unwrap_or(0.0));

        if let Some(text) = record
            .tweet_original
            .as_deref()
            .or(record.tweet.as_deref())
        {
            self.texts.push(text.to_string());
        }
    }

    fn finish(self, user_id: String) -> UserAggregate {
        UserAggregate {
            user_id,
            user_name: self.user_name,
            user_followers_count: self.followers,
            likes: self.likes,
            retweet_count: self.retweets,
            tweet_count: self.alignment.len(),
            alignment_score: stats::mean(&self.alignment).unwrap_or(0.0),
            stability: stats::sample_std_dev(&self.alignment),
            corpus: self.texts.join(" "),
            camp: None,
        }
    }
}

/// One aggregate per distinct `user_id`, ordered by `user_id`.
///
/// Rows without an alignment score contribute 0.0; run
/// [`compute_alignment_scores`](super::compute_alignment_scores) first.
pub fn aggregate_users(table: &TweetTable) -> Vec<UserAggregate> {
    let mut groups: BTreeMap<&str, UserAccumulator> = BTreeMap::new();

    for record in &table.records {
        groups
            .entry(record.user_id.as_str())
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|(user_id, acc)| acc.finish(user_id.to_string()))
        .collect()
}
