//! One refresh cycle: fetch the scoreboard, resolve every matchup
//! concurrently, rank the rows.
//!
//! Only a scoreboard failure fails the cycle. Anything that goes wrong for
//! a single matchup becomes that matchup's row and nothing else.

use crate::error::CycleError;
use crate::game_state::GameStateReader;
use crate::matching::TeamResolver;
use crate::models::{LeaderboardSnapshot, Matchup, MatchupResult, ResolutionOutcome};
use crate::providers::{FeedFetcher, ScoreboardFeed};
use crate::ranking;
use crate::stats::extract_passing_yards;
use chrono::NaiveDate;
use futures_util::future::join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Orchestrator {
    fetcher: Arc<dyn FeedFetcher>,
    resolver: TeamResolver,
    reader: GameStateReader,
    target_date: NaiveDate,
}

impl Orchestrator {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        resolver: TeamResolver,
        reader: GameStateReader,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            fetcher,
            resolver,
            reader,
            target_date,
        }
    }

    pub fn target_date(&self) -> NaiveDate {
        self.target_date
    }

    /// Fresh ranked snapshot, or the scoreboard failure that sank the cycle
    pub async fn run_cycle(
        &self,
        matchups: &[Matchup],
    ) -> Result<LeaderboardSnapshot, CycleError> {
        let results = self.collect_results(matchups).await?;

        let failed = results.iter().filter(|r| r.outcome.is_failed()).count();
        let missing = results
            .iter()
            .filter(|r| r.outcome == ResolutionOutcome::NotFound)
            .count();
        info!(
            "Cycle complete: {} matchups, {} not found, {} failed",
            results.len(),
            missing,
            failed
        );

        Ok(LeaderboardSnapshot::new(ranking::rank(results)))
    }

    /// One row per matchup, in configured order
    pub async fn collect_results(
        &self,
        matchups: &[Matchup],
    ) -> Result<Vec<MatchupResult>, CycleError> {
        let feed = self.fetcher.fetch_scoreboard(self.target_date).await?;
        debug!(
            "{} scoreboard for {}: {} events",
            self.fetcher.provider_name(),
            self.target_date,
            feed.events().len()
        );

        // join_all keeps input order regardless of completion order
        let rows = matchups
            .iter()
            .map(|matchup| self.resolve_matchup(matchup, &feed));
        Ok(join_all(rows).await)
    }

    async fn resolve_matchup(&self, matchup: &Matchup, feed: &ScoreboardFeed) -> MatchupResult {
        let Some(resolved) = self.resolver.resolve(&matchup.configured_team_name, feed) else {
            debug!(
                "No event for {} ({}) on {}",
                matchup.participant_name, matchup.configured_team_name, self.target_date
            );
            return MatchupResult::not_found(matchup);
        };

        let fields = self.reader.read_state(&resolved.raw_event, &resolved.team_name);

        let passing_yards = match resolved.event_id.as_deref() {
            Some(event_id) => match self.fetcher.fetch_summary(event_id).await {
                Ok(summary) => self
                    .resolver
                    .resolve_boxscore_entry(&resolved, &matchup.configured_team_name, &summary)
                    .and_then(|team| extract_passing_yards(&team["statistics"])),
                Err(e) => {
                    warn!(
                        "Summary fetch failed for {} (event {}): {}",
                        matchup.participant_name, event_id, e
                    );
                    return MatchupResult::failed(
                        matchup,
                        resolved.event_id.clone(),
                        e.to_string(),
                    );
                }
            },
            None => None,
        };

        MatchupResult {
            participant_name: matchup.participant_name.clone(),
            configured_team_name: matchup.configured_team_name.clone(),
            event_id: resolved.event_id,
            passing_yards,
            team_score: fields.team_score,
            opponent_score: fields.opponent_score,
            lead_margin: fields.lead_margin,
            game_state: fields.game_state,
            status_text: fields.status_text,
            scheduled_start: fields.scheduled_start,
            outcome: ResolutionOutcome::Resolved,
        }
    }
}
