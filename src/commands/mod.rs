//! Command implementations behind the `tweetalign` subcommands.
//!
//! - **label**: alignment scores, user study, camps and the label report
//! - **sentiment**: lexicon inference over a tweet CSV
//! - **compare**: sentiment of the Trump dataset against the Biden one
//! - **geo**: per-state counts and the world dominance map
//! - **init**: write a default `.tweetalign.toml`

pub mod compare;
pub mod geo;
pub mod init;
pub mod label;
pub mod sentiment;

pub use compare::{handle_compare, CompareConfig};
pub use geo::{handle_geo, GeoConfig};
pub use init::{init_config, init_config_in};
pub use label::{handle_label, LabelConfig};
pub use sentiment::{handle_sentiment, SentimentCommandConfig};
