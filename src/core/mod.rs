pub mod errors;
mod types;

pub use errors::{Error, Result, ResultExt};
pub use types::{
    columns, Camp, CampThresholds, Candidate, Sentiment, TweetRecord, TweetTable, UserAggregate,
};
