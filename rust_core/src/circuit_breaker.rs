//! Circuit breaker guarding calls to the upstream feed.
//!
//! Once the feed has failed `failure_threshold` times in a row the breaker
//! opens and requests fail fast until `recovery_timeout` has elapsed. The
//! next request is then let through as a probe (half-open); enough probe
//! successes close the breaker again, any probe failure re-opens it.

use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Breaker position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCircuitState {
    /// Requests flow normally
    Closed,
    /// Requests are rejected without touching the network
    Open,
    /// Probing whether the feed has recovered
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct ApiCircuitBreakerConfig {
    /// Consecutive failures that open the breaker
    pub failure_threshold: u32,
    /// How long to stay open before probing
    pub recovery_timeout: Duration,
    /// Probe successes needed to close again
    pub success_threshold: u32,
}

impl Default for ApiCircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            recovery_timeout: Duration::from_secs(30),
            success_threshold: 2,
        }
    }
}

#[derive(Debug)]
struct BreakerInner {
    state: ApiCircuitState,
    consecutive_failures: u32,
    probe_successes: u32,
    opened_at: Option<Instant>,
}

#[derive(Debug)]
pub struct ApiCircuitBreaker {
    name: String,
    config: ApiCircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl ApiCircuitBreaker {
    pub fn new(name: &str, config: ApiCircuitBreakerConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            inner: Mutex::new(BreakerInner {
                state: ApiCircuitState::Closed,
                consecutive_failures: 0,
                probe_successes: 0,
                opened_at: None,
            }),
        }
    }

    /// Whether a request may be sent now. Moves Open -> HalfOpen once the
    /// recovery timeout has passed.
    pub fn is_available(&self) -> bool {
        let mut inner = self.inner.lock();
        let state = inner.state;
        match state {
            ApiCircuitState::Closed | ApiCircuitState::HalfOpen => true,
            ApiCircuitState::Open => {
                let recovered = inner
                    .opened_at
                    .map(|t| t.elapsed() >= self.config.recovery_timeout)
                    .unwrap_or(true);
                if recovered {
                    inner.state = ApiCircuitState::HalfOpen;
                    inner.probe_successes = 0;
                }
                recovered
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures = 0;

        if inner.state == ApiCircuitState::HalfOpen {
            inner.probe_successes += 1;
            if inner.probe_successes < self.config.success_threshold {
                return;
            }
            info!(
                "{} circuit breaker closed after {} successful probes",
                self.name, inner.probe_successes
            );
        }

        inner.state = ApiCircuitState::Closed;
        inner.opened_at = None;
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures += 1;
        let failures = inner.consecutive_failures;
        let state = inner.state;

        match state {
            ApiCircuitState::Closed if failures >= self.config.failure_threshold => {
                warn!(
                    "{} circuit breaker OPENED after {} consecutive failures",
                    self.name, failures
                );
                inner.state = ApiCircuitState::Open;
                inner.opened_at = Some(Instant::now());
            }
            ApiCircuitState::HalfOpen => {
                warn!("{} circuit breaker re-opened by failed probe", self.name);
                inner.state = ApiCircuitState::Open;
                inner.opened_at = Some(Instant::now());
            }
            _ => {}
        }
    }

    pub fn state(&self) -> ApiCircuitState {
        self.inner.lock().state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn failure_count(&self) -> u32 {
        self.inner.lock().consecutive_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(failures: u32, recovery_ms: u64, successes: u32) -> ApiCircuitBreaker {
        ApiCircuitBreaker::new(
            "espn",
            ApiCircuitBreakerConfig {
                failure_threshold: failures,
                recovery_timeout: Duration::from_millis(recovery_ms),
                success_threshold: successes,
            },
        )
    }

    #[test]
    fn test_opens_after_threshold() {
        let cb = breaker(3, 10_000, 1);
        assert!(cb.is_available());

        cb.record_failure();
        cb.record_failure();
        assert!(cb.is_available());
        assert_eq!(cb.failure_count(), 2);

        cb.record_failure();
        assert_eq!(cb.state(), ApiCircuitState::Open);
        assert!(!cb.is_available());
    }

    #[test]
    fn test_success_resets_failure_streak() {
        let cb = breaker(2, 10_000, 1);
        cb.record_failure();
        cb.record_success();
        cb.record_failure();
        assert_eq!(cb.state(), ApiCircuitState::Closed);
    }

    #[test]
    fn test_half_open_closes_after_probes() {
        let cb = breaker(1, 10, 2);
        cb.record_failure();
        assert_eq!(cb.state(), ApiCircuitState::Open);

        std::thread::sleep(Duration::from_millis(20));
        assert!(cb.is_available());
        assert_eq!(cb.state(), ApiCircuitState::HalfOpen);

        cb.record_success();
        assert_eq!(cb.state(), ApiCircuitState::HalfOpen);
        cb.record_success();
        assert_eq!(cb.state(), ApiCircuitState::Closed);
    }

    #[test]
    fn test_failed_probe_reopens() {
        let cb = breaker(1, 10, 1);
        cb.record_failure();
        std::thread::sleep(Duration::from_millis(20));
        assert!(cb.is_available());

        cb.record_failure();
        assert_eq!(cb.state(), ApiCircuitState::Open);
        assert!(!cb.is_available());
    }
}
