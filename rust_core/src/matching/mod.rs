//! Matching configured team names against feed records

pub mod team;

pub use team::{ResolvedEvent, TeamResolver};
