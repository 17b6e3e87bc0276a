//! Error types for feed access and refresh cycles.

use thiserror::Error;

/// Failure talking to the upstream feed
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0} API circuit breaker is open")]
    CircuitOpen(String),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Failure of a whole refresh cycle. Per-matchup failures never become one of these.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("scoreboard fetch failed: {0}")]
    Scoreboard(#[from] FetchError),
}
