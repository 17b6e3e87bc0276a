pub mod matching;

pub use matching::{normalize, MatchConfidence, MatchPolicy};
