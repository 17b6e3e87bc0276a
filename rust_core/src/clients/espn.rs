use crate::circuit_breaker::{ApiCircuitBreaker, ApiCircuitBreakerConfig, ApiCircuitState};
use crate::error::FetchError;
use crate::providers::{EventSummary, FeedFetcher, ScoreboardFeed};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// College football on ESPN's public site API
pub const DEFAULT_BASE_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/football/college-football";

/// ESPN group id for FBS; without it the scoreboard only lists featured games
pub const DEFAULT_SCOREBOARD_GROUPS: &str = "80";

const SCOREBOARD_LIMIT: u32 = 300;

#[derive(Debug, Clone)]
pub struct EspnClientConfig {
    pub base_url: String,
    /// `groups` query parameter; `None` leaves ESPN's default view
    pub scoreboard_groups: Option<String>,
    pub request_timeout: Duration,
    /// Attempts per request, including the first
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub circuit_breaker: ApiCircuitBreakerConfig,
}

impl Default for EspnClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            scoreboard_groups: Some(DEFAULT_SCOREBOARD_GROUPS.to_string()),
            request_timeout: Duration::from_secs(10),
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            circuit_breaker: ApiCircuitBreakerConfig::default(),
        }
    }
}

#[derive(Clone)]
pub struct EspnClient {
    client: Client,
    config: EspnClientConfig,
    circuit_breaker: Arc<ApiCircuitBreaker>,
}

impl std::fmt::Debug for EspnClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EspnClient")
            .field("base_url", &self.config.base_url)
            .field("circuit_breaker_state", &self.circuit_breaker.state())
            .finish()
    }
}

impl Default for EspnClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EspnClient {
    pub fn new() -> Self {
        Self::with_config(EspnClientConfig::default())
    }

    pub fn with_config(config: EspnClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            circuit_breaker: Arc::new(ApiCircuitBreaker::new(
                "espn",
                config.circuit_breaker.clone(),
            )),
            config,
        }
    }

    pub fn circuit_state(&self) -> ApiCircuitState {
        self.circuit_breaker.state()
    }

    pub fn scoreboard_url(&self, date: NaiveDate) -> String {
        let mut url = format!(
            "{}/scoreboard?dates={}&limit={}",
            self.base(),
            date.format("%Y%m%d"),
            SCOREBOARD_LIMIT
        );
        if let Some(groups) = self
            .config
            .scoreboard_groups
            .as_deref()
            .filter(|g| !g.is_empty())
        {
            url.push_str("&groups=");
            url.push_str(groups);
        }
        url
    }

    pub fn summary_url(&self, event_id: &str) -> String {
        format!("{}/summary?event={}", self.base(), event_id)
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// GET with the circuit breaker in front and a fixed-delay retry behind it
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        if !self.circuit_breaker.is_available() {
            return Err(FetchError::CircuitOpen(
                self.circuit_breaker.name().to_string(),
            ));
        }

        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_once(url).await {
                Ok(data) => {
                    self.circuit_breaker.record_success();
                    return Ok(data);
                }
                Err(e) => {
                    self.circuit_breaker.record_failure();
                    if attempt >= attempts || !self.circuit_breaker.is_available() {
                        return Err(e);
                    }
                    warn!(
                        "ESPN request failed (attempt {}/{}): {}",
                        attempt, attempts, e
                    );
                    tokio::time::sleep(self.config.retry_delay).await;
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Value, FetchError> {
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.json::<Value>().await.map_err(|e| FetchError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl FeedFetcher for EspnClient {
    async fn fetch_scoreboard(&self, date: NaiveDate) -> Result<ScoreboardFeed, FetchError> {
        let url = self.scoreboard_url(date);
        let data = self.fetch(&url).await?;
        let feed = ScoreboardFeed::new(data);
        debug!("Scoreboard for {} lists {} events", date, feed.events().len());
        Ok(feed)
    }

    async fn fetch_summary(&self, event_id: &str) -> Result<EventSummary, FetchError> {
        let url = self.summary_url(event_id);
        Ok(EventSummary::new(self.fetch(&url).await?))
    }

    fn provider_name(&self) -> &str {
        "ESPN"
    }
}
