//! Most-followed active users per camp.

use crate::core::{Camp, UserAggregate};
use serde::Serialize;
use std::cmp::Ordering;

pub const DEFAULT_MIN_TWEETS: usize = 3;
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Influencer {
    pub user_id: String,
    pub user_name: Option<String>,
    pub followers: f64,
    pub tweet_count: usize,
    pub alignment_score: f64,
    pub likes: f64,
}

impl From<&UserAggregate> for Influencer {
    fn from(user: &UserAggregate) -> Self {
        Self {
            user_id: user.user_id.clone(),
            user_name: user.user_name.clone(),
            followers: user.user_followers_count.unwrap_or(0.0),
            tweet_count: user.tweet_count,
            alignment_score: user.alignment_score,
            likes: user.likes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampInfluencers {
    pub camp: Camp,
    pub influencers: Vec<Influencer>,
}

/// Users of `camp` with at least `min_tweets` tweets, `top_n` largest by
/// followers. Ties keep user order.
pub fn top_influencers(
    users: &[UserAggregate],
    camp: Camp,
    min_tweets: usize,
    top_n: usize,
) -> Vec<Influencer> {
    let mut selected: Vec<Influencer> = users
        .iter()
        .filter(|u| u.camp == Some(camp) && u.tweet_count >= min_tweets)
        .map(Influencer::from)
        .collect();

    selected.sort_by(|a, b| {
        b.followers
            .partial_cmp(&a.followers)
            .unwrap_or(Ordering::Equal)
    });
    selected.truncate(top_n);
    selected
}

pub fn influencers_by_camp(
    users: &[UserAggregate],
    min_tweets: usize,
    top_n: usize,
) -> Vec<CampInfluencers> {
    Camp::ALL
        .iter()
        .map(|&camp| CampInfluencers {
            camp,
            influencers: top_influencers(users, camp, min_tweets, top_n),
        })
        .collect()
}
