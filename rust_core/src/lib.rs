//! Yardboard Core - live passing-yards leaderboard for college football.
//!
//! This crate provides:
//! - Team name normalization and matching policies
//! - Resolution of configured teams to ESPN scoreboard events and boxscores
//! - Passing-yards extraction from loosely-typed stat lists
//! - Game state, score and kickoff reading
//! - Concurrent refresh cycles with per-matchup failure isolation
//! - Deterministic ranking and increase detection
//! - A single-flight poller publishing snapshots over a watch channel

pub mod change_tracker;
pub mod circuit_breaker;
pub mod clients;
pub mod error;
pub mod game_state;
pub mod matching;
pub mod models;
pub mod orchestrator;
pub mod poller;
pub mod providers;
pub mod ranking;
pub mod stats;
pub mod utils;

pub use change_tracker::ChangeTracker;
pub use clients::{EspnClient, EspnClientConfig};
pub use error::{CycleError, FetchError};
pub use game_state::{GameStateFields, GameStateReader};
pub use matching::{ResolvedEvent, TeamResolver};
pub use models::{GameState, LeaderboardSnapshot, Matchup, MatchupResult, ResolutionOutcome};
pub use orchestrator::Orchestrator;
pub use poller::{LeaderboardView, Poller};
pub use providers::{EventSummary, FeedFetcher, ScoreboardFeed};
pub use utils::matching::{normalize, MatchPolicy};
