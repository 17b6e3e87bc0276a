//! Configuration and environment loading for the leaderboard service
//!
//! This module manages all runtime configuration:
//! - Matchup list (JSON file or inline pairs)
//! - Target date and polling interval
//! - Team matching policy
//! - ESPN client, retry and circuit breaker settings
//! - Output format

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use yardboard_core::circuit_breaker::ApiCircuitBreakerConfig;
use yardboard_core::clients::espn::{DEFAULT_BASE_URL, DEFAULT_SCOREBOARD_GROUPS};
use yardboard_core::{EspnClientConfig, MatchPolicy, Matchup};

/// Default polling interval in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// ESPN rate limits aggressive pollers; stay at or above this
pub const MIN_POLL_INTERVAL_SECS: u64 = 5;

pub const MAX_POLL_INTERVAL_SECS: u64 = 600;

/// Default attempts per ESPN request
pub const DEFAULT_ESPN_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable rows in the log
    #[default]
    Table,
    /// One JSON document per refresh on stdout
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" | "" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => bail!("unknown output format '{}' (expected table or json)", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub matchups: Vec<Matchup>,
    pub target_date: NaiveDate,
    pub poll_interval: Duration,
    pub match_policy: MatchPolicy,
    pub espn: EspnClientConfig,
    pub output_format: OutputFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let matchups = load_matchups()?;

        let target_date = match env::var("TARGET_DATE") {
            Ok(raw) if !raw.trim().is_empty() => parse_target_date(&raw)?,
            _ => Utc::now().date_naive(),
        };

        let poll_interval = clamp_poll_interval(
            env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        );

        let match_policy = match env::var("TEAM_MATCH_POLICY") {
            Ok(raw) if !raw.trim().is_empty() => raw
                .parse::<MatchPolicy>()
                .map_err(|e| anyhow::anyhow!(e))
                .context("Invalid TEAM_MATCH_POLICY")?,
            _ => MatchPolicy::default(),
        };

        let output_format = env::var("OUTPUT_FORMAT")
            .unwrap_or_default()
            .parse::<OutputFormat>()
            .context("Invalid OUTPUT_FORMAT")?;

        Ok(Self {
            matchups,
            target_date,
            poll_interval,
            match_policy,
            espn: load_espn_config(),
            output_format,
        })
    }
}

/// MATCHUPS_FILE wins over MATCHUPS
fn load_matchups() -> Result<Vec<Matchup>> {
    let matchups = if let Ok(path) = env::var("MATCHUPS_FILE") {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read matchups file {}", path))?;
        parse_matchups_json(&contents).with_context(|| format!("Failed to parse {}", path))?
    } else if let Ok(inline) = env::var("MATCHUPS") {
        parse_matchups_inline(&inline).context("Failed to parse MATCHUPS")?
    } else {
        bail!("No matchups configured: set MATCHUPS_FILE or MATCHUPS");
    };

    validate_matchups(matchups)
}

/// `[{"participant": "Alice", "team": "Alabama"}, ...]`
pub fn parse_matchups_json(contents: &str) -> Result<Vec<Matchup>> {
    let matchups: Vec<Matchup> = serde_json::from_str(contents)?;
    Ok(matchups)
}

/// `Alice:Alabama,Bob:Georgia`
pub fn parse_matchups_inline(raw: &str) -> Result<Vec<Matchup>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(':') {
            Some((participant, team)) => Ok(Matchup::new(participant.trim(), team.trim())),
            None => bail!("expected Participant:Team, got '{}'", entry),
        })
        .collect()
}

/// Non-empty list, no blank names, no participant twice
pub fn validate_matchups(matchups: Vec<Matchup>) -> Result<Vec<Matchup>> {
    if matchups.is_empty() {
        bail!("Matchup list is empty");
    }

    let mut seen = HashSet::new();
    for matchup in &matchups {
        if matchup.participant_name.trim().is_empty() {
            bail!("Matchup for team '{}' has no participant", matchup.configured_team_name);
        }
        if matchup.configured_team_name.trim().is_empty() {
            bail!("Participant '{}' has no team", matchup.participant_name);
        }
        if !seen.insert(matchup.participant_name.trim()) {
            bail!("Participant '{}' is listed more than once", matchup.participant_name);
        }
    }

    Ok(matchups)
}

/// `20240907` or `2024-09-07`
pub fn parse_target_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .with_context(|| format!("Invalid TARGET_DATE '{}' (expected YYYYMMDD or YYYY-MM-DD)", raw))
}

pub fn clamp_poll_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(MIN_POLL_INTERVAL_SECS, MAX_POLL_INTERVAL_SECS))
}

/// ESPN client settings, including its circuit breaker
pub fn load_espn_config() -> EspnClientConfig {
    let base_url = env::var("ESPN_BASE_URL")
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Set but empty means no groups filter
    let scoreboard_groups = match env::var("ESPN_SCOREBOARD_GROUPS") {
        Ok(v) if v.trim().is_empty() => None,
        Ok(v) => Some(v.trim().to_string()),
        Err(_) => Some(DEFAULT_SCOREBOARD_GROUPS.to_string()),
    };

    let max_attempts = env::var("ESPN_MAX_ATTEMPTS")
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_ESPN_MAX_ATTEMPTS)
        .max(1);

    EspnClientConfig {
        base_url,
        scoreboard_groups,
        max_attempts,
        circuit_breaker: load_espn_circuit_breaker_config(),
        ..EspnClientConfig::default()
    }
}

/// Load ESPN circuit breaker configuration from environment
pub fn load_espn_circuit_breaker_config() -> ApiCircuitBreakerConfig {
    let defaults = ApiCircuitBreakerConfig::default();
    ApiCircuitBreakerConfig {
        failure_threshold: env::var("ESPN_CB_FAILURE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.failure_threshold),
        recovery_timeout: env::var("ESPN_CB_RECOVERY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.recovery_timeout),
        success_threshold: defaults.success_threshold,
    }
}
