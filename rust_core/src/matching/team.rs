//! Team Resolver
//!
//! Finds the scoreboard event, and later the boxscore record, belonging to a
//! configured team name. Both lookups run under the same `MatchPolicy`.

use crate::providers::{event_competitors, EventSummary, ScoreboardFeed};
use crate::utils::matching::{keys_match, normalize, MatchConfidence, MatchPolicy};
use serde_json::Value;
use tracing::debug;

/// Team name fields ESPN fills in, in no particular order of reliability
pub const TEAM_NAME_FIELDS: [&str; 4] = ["location", "shortDisplayName", "displayName", "name"];

/// An event matched to a configured team for the current cycle
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEvent {
    pub event_id: Option<String>,
    /// ESPN team id of the matched competitor
    pub team_id: Option<String>,
    /// Display name of the matched competitor
    pub team_name: String,
    pub raw_event: Value,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TeamResolver {
    policy: MatchPolicy,
}

impl TeamResolver {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Event whose competitor matches `configured_team_name`, or `None`.
    ///
    /// `None` is the normal outcome for a team with no game on the date.
    pub fn resolve(
        &self,
        configured_team_name: &str,
        feed: &ScoreboardFeed,
    ) -> Option<ResolvedEvent> {
        let target = normalize(configured_team_name);

        for &pass in self.policy.passes() {
            for event in feed.events() {
                for competitor in event_competitors(event) {
                    let team = &competitor["team"];
                    if !team_matches(team, &target, pass) {
                        continue;
                    }

                    let resolved = ResolvedEvent {
                        event_id: json_string(&event["id"]),
                        team_id: json_string(&team["id"]),
                        team_name: display_name(team)
                            .unwrap_or(configured_team_name)
                            .to_string(),
                        raw_event: event.clone(),
                    };
                    debug!(
                        "Resolved '{}' to event {:?} ({}, {:?} match)",
                        configured_team_name, resolved.event_id, resolved.team_name, pass
                    );
                    return Some(resolved);
                }
            }
        }

        None
    }

    /// Boxscore team entry (`{ team, statistics }`) for the competitor
    /// matched on the scoreboard: by team id when both sides carry one,
    /// otherwise by name under the resolver's policy
    pub fn resolve_boxscore_entry<'a>(
        &self,
        resolved: &ResolvedEvent,
        configured_team_name: &str,
        summary: &'a EventSummary,
    ) -> Option<&'a Value> {
        let by_id = resolved.team_id.as_deref().and_then(|id| {
            summary
                .boxscore_teams()
                .iter()
                .find(|entry| json_string(&entry["team"]["id"]).as_deref() == Some(id))
        });

        by_id.or_else(|| self.resolve_boxscore_team(configured_team_name, summary))
    }

    /// Boxscore team entry (`{ team, statistics }`) for `configured_team_name`
    pub fn resolve_boxscore_team<'a>(
        &self,
        configured_team_name: &str,
        summary: &'a EventSummary,
    ) -> Option<&'a Value> {
        let target = normalize(configured_team_name);

        self.policy.passes().iter().find_map(|&pass| {
            summary
                .boxscore_teams()
                .iter()
                .find(|entry| team_matches(&entry["team"], &target, pass))
        })
    }
}

/// Whether any name field of `team` matches the normalized `target`
pub fn team_matches(team: &Value, target: &str, pass: MatchConfidence) -> bool {
    TEAM_NAME_FIELDS
        .iter()
        .filter_map(|field| team[*field].as_str())
        .any(|candidate| keys_match(&normalize(candidate), target, pass))
}

/// Most readable name ESPN gave for a team
pub fn display_name(team: &Value) -> Option<&str> {
    ["displayName", "shortDisplayName", "location", "name"]
        .iter()
        .filter_map(|field| team[*field].as_str())
        .find(|name| !name.trim().is_empty())
}

/// ESPN sends ids as strings but has been seen sending bare numbers
pub fn json_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
