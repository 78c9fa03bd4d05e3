use crate::core::{Camp, UserAggregate};
use crate::text;
use serde::Serialize;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashtagCount {
    pub hashtag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampHashtags {
    pub camp: Camp,
    pub hashtags: Vec<HashtagCount>,
}

/// Most used hashtags in the corpora of each camp's users.
pub fn hashtags_by_camp(users: &[UserAggregate], top_n: usize) -> Vec<CampHashtags> {
    Camp::ALL
        .iter()
        .map(|&camp| {
            let corpora = users
                .iter()
                .filter(|u| u.camp == Some(camp))
                .map(|u| u.corpus.as_str());
            CampHashtags {
                camp,
                hashtags: text::top_hashtags(corpora, top_n)
                    .into_iter()
                    .map(|(hashtag, count)| HashtagCount { hashtag, count })
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(camp: Camp, corpus: &str) -> UserAggregate {
        UserAggregate {
            user_id: "u".into(),
            user_name: None,
            user_followers_count: None,
            likes: 0.0,
            retweet_count: 0.0,
            tweet_count: 1,
            alignment_score: 0.0,
            stability: None,
            corpus: corpus.into(),
            camp: Some(camp),
        }
    }

    #[test]
    fn test_hashtags_split_by_camp() {
        let users = vec![
            user(Camp::Trump, "#MAGA rally #maga #Trump2020"),
            user(Camp::Biden, "#Biden2020 #VoteBlue"),
            user(Camp::Trump, "#Trump2020 #MAGA"),
        ];
        let groups = hashtags_by_camp(&users, 2);

        assert_eq!(groups[1].camp, Camp::Trump);
        assert_eq!(
            groups[1].hashtags,
            vec![
                HashtagCount { hashtag: "maga".into(), count: 3 },
                HashtagCount { hashtag: "trump2020".into(), count: 2 },
            ]
        );
        assert_eq!(groups[0].hashtags.len(), 2);
        assert!(groups[2].hashtags.is_empty());
    }
}
