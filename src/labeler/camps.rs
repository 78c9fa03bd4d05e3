//! Quantile-based camp classification.

use crate::core::{columns, Camp, CampThresholds, Error, Result, TweetTable, UserAggregate};
use crate::stats;
use std::collections::HashMap;

fn validate_quantiles(low_q: f64, high_q: f64) -> Result<()> {
    let in_range = |q: f64| (0.0..=1.0).contains(&q);
    if !in_range(low_q) || !in_range(high_q) || low_q > high_q {
        return Err(Error::InvalidQuantile {
            low: low_q,
            high: high_q,
        });
    }
    Ok(())
}

/// Derive thresholds from the users' mean alignment scores without
/// labeling anyone.
pub fn compute_thresholds(users: &[UserAggregate], low_q: f64, high_q: f64) -> Result<CampThresholds> {
    validate_quantiles(low_q, high_q)?;

    let scores: Vec<f64> = users.iter().map(|u| u.alignment_score).collect();
    let sorted = stats::sorted_finite(&scores);

    let low = stats::quantile_sorted(&sorted, low_q).ok_or(Error::EmptyPopulation)?;
    let high = stats::quantile_sorted(&sorted, high_q).ok_or(Error::EmptyPopulation)?;

    Ok(CampThresholds {
        low,
        high,
        low_quantile: low_q,
        high_quantile: high_q,
    })
}

/// Label every user and return the thresholds used.
///
/// Users scoring at or below `low` are Biden, at or above `high` Trump,
/// everyone between is Neutral.
pub fn define_camps(users: &mut [UserAggregate], low_q: f64, high_q: f64) -> Result<CampThresholds> {
    let thresholds = compute_thresholds(users, low_q, high_q)?;

    for user in users.iter_mut() {
        user.camp = Some(thresholds.classify(user.alignment_score));
    }

    tracing::info!(
        "Camp thresholds: low={:.4} (q={}), high={:.4} (q={})",
        thresholds.low,
        low_q,
        thresholds.high,
        high_q
    );
    Ok(thresholds)
}

/// Copy each user's camp onto all of that user's tweets.
///
/// Tweets whose user has no camp keep `None`.
pub fn propagate_camps(table: &mut TweetTable, users: &[UserAggregate]) {
    let camps: HashMap<&str, Camp> = users
        .iter()
        .filter_map(|u| u.camp.map(|camp| (u.user_id.as_str(), camp)))
        .collect();

    for record in &mut table.records {
        record.camp = camps.get(record.user_id.as_str()).copied();
    }
    table.ensure_column(columns::CAMP);
}

/// Number of users per camp, in `Camp::ALL` order.
pub fn camp_sizes(users: &[UserAggregate]) -> Vec<(Camp, usize)> {
    Camp::ALL
        .iter()
        .map(|&camp| (camp, users.iter().filter(|u| u.camp == Some(camp)).count()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TweetRecord;
    use proptest::prelude::*;

    fn user(id: &str, score: f64) -> UserAggregate {
        UserAggregate {
            user_id: id.to_string(),
            user_name: None,
            user_followers_count: None,
            likes: 0.0,
            retweet_count: 0.0,
            tweet_count: 1,
            alignment_score: score,
            stability: None,
            corpus: String::new(),
            camp: None,
        }
    }

    #[test]
    fn test_three_user_example() {
        let mut users = vec![user("u1", -0.8), user("u2", 0.1), user("u3", 0.9)];
        let thresholds = define_camps(&mut users, 0.4, 0.8).unwrap();

        assert!((thresholds.low - -0.08).abs() < 1e-12);
        assert!((thresholds.high - 0.58).abs() < 1e-12);

        let camps: Vec<Option<Camp>> = users.iter().map(|u| u.camp).collect();
        assert_eq!(
            camps,
            vec![Some(Camp::Biden), Some(Camp::Neutral), Some(Camp::Trump)]
        );
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let thresholds = CampThresholds {
            low: -0.1,
            high: 0.1,
            low_quantile: 0.4,
            high_quantile: 0.8,
        };
        assert_eq!(thresholds.classify(-0.1), Camp::Biden);
        assert_eq!(thresholds.classify(0.1), Camp::Trump);
        assert_eq!(thresholds.classify(0.0), Camp::Neutral);
    }

    #[test]
    fn test_identical_scores_go_to_biden() {
        let mut users = vec![user("a", 0.0), user("b", 0.0)];
        define_camps(&mut users, 0.4, 0.8).unwrap();
        assert!(users.iter().all(|u| u.camp == Some(Camp::Biden)));
    }

    #[test]
    fn test_invalid_quantiles_rejected() {
        let mut users = vec![user("a", 0.0)];
        assert!(matches!(
            define_camps(&mut users, 0.9, 0.1),
            Err(Error::InvalidQuantile { .. })
        ));
        assert!(matches!(
            define_camps(&mut users, -0.1, 0.5),
            Err(Error::InvalidQuantile { .. })
        ));
        assert!(matches!(
            define_camps(&mut users, 0.2, 1.5),
            Err(Error::InvalidQuantile { .. })
        ));
        assert_eq!(users[0].camp, None);
    }

    #[test]
    fn test_empty_population_is_an_error() {
        let mut users: Vec<UserAggregate> = Vec::new();
        assert!(matches!(
            define_camps(&mut users, 0.4, 0.8),
            Err(Error::EmptyPopulation)
        ));
    }

    #[test]
    fn test_propagate_camps_left_join() {
        let mut users = vec![user("a", -1.0), user("b", 1.0)];
        users[0].camp = Some(Camp::Biden);
        users[1].camp = Some(Camp::Trump);

        let mut table = TweetTable::from_records(vec![
            TweetRecord::new("a"),
            TweetRecord::new("b"),
            TweetRecord::new("a"),
            TweetRecord::new("ghost"),
        ]);
        propagate_camps(&mut table, &users);

        let camps: Vec<Option<Camp>> = table.records.iter().map(|r| r.camp).collect();
        assert_eq!(
            camps,
            vec![Some(Camp::Biden), Some(Camp::Trump), Some(Camp::Biden), None]
        );
        assert!(table.has_column("camp"));
    }

    #[test]
    fn test_camp_sizes() {
        let mut users = vec![user("a", -0.8), user("b", 0.1), user("c", 0.9)];
        define_camps(&mut users, 0.4, 0.8).unwrap();
        assert_eq!(
            camp_sizes(&users),
            vec![(Camp::Biden, 1), (Camp::Trump, 1), (Camp::Neutral, 1)]
        );
    }

    proptest! {
        #[test]
        fn thresholds_are_ordered(
            scores in prop::collection::vec(-1.0..=1.0f64, 1..50),
            low_q in 0.0..=1.0f64,
            delta in 0.0..=1.0f64,
        ) {
            let high_q = (low_q + delta).min(1.0);
            let users: Vec<UserAggregate> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| user(&i.to_string(), *s))
                .collect();
            let thresholds = compute_thresholds(&users, low_q, high_q).unwrap();
            prop_assert!(thresholds.low <= thresholds.high);
        }

        #[test]
        fn every_user_gets_a_camp(scores in prop::collection::vec(-1.0..=1.0f64, 1..50)) {
            let mut users: Vec<UserAggregate> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| user(&i.to_string(), *s))
                .collect();
            define_camps(&mut users, 0.4, 0.8).unwrap();
            prop_assert!(users.iter().all(|u| u.camp.is_some()));
        }
    }
}
