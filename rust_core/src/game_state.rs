//! Game state, score and status text for a resolved event.
//!
//! Scores are only surfaced once a game has left the Scheduled state, so a
//! game that has not kicked off shows no score rather than 0-0.

use crate::matching::team::TEAM_NAME_FIELDS;
use crate::models::GameState;
use crate::providers::event_competitors;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use std::fmt::Display;

/// Everything the leaderboard shows about a game besides the stat itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStateFields {
    pub game_state: GameState,
    pub team_score: Option<i64>,
    pub opponent_score: Option<i64>,
    pub lead_margin: Option<i64>,
    pub status_text: String,
    pub scheduled_start: Option<DateTime<Utc>>,
}

/// Reads game state out of a scoreboard event
#[derive(Debug, Clone, Copy, Default)]
pub struct GameStateReader {
    /// Display offset for kickoff times; the host's local zone when unset
    display_offset: Option<FixedOffset>,
}

impl GameStateReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(offset: FixedOffset) -> Self {
        Self {
            display_offset: Some(offset),
        }
    }

    pub fn read_state(&self, event: &Value, resolved_team_name: &str) -> GameStateFields {
        let competition = &event["competitions"][0];

        let status = if competition["status"].is_object() {
            &competition["status"]
        } else {
            &event["status"]
        };
        let game_state = status["type"]["state"]
            .as_str()
            .map(GameState::from_espn_state)
            .unwrap_or(GameState::Unknown);

        let scheduled_start = competition["date"]
            .as_str()
            .or_else(|| event["date"].as_str())
            .and_then(parse_espn_date);

        let (team_score, opponent_score) = if game_state.is_scheduled() {
            (None, None)
        } else {
            read_scores(event, resolved_team_name)
        };
        let lead_margin = match (team_score, opponent_score) {
            (Some(ours), Some(theirs)) => Some(ours - theirs),
            _ => None,
        };

        let status_text = if game_state.is_scheduled() {
            if competition["timeValid"].as_bool() == Some(false) {
                "TBD".to_string()
            } else {
                match (scheduled_start, self.display_offset) {
                    (Some(start), Some(offset)) => format_start_time(start, &offset),
                    (Some(start), None) => format_start_time(start, &Local),
                    (None, _) => upstream_description(status).unwrap_or("Scheduled").to_string(),
                }
            }
        } else {
            upstream_description(status)
                .unwrap_or("Status unavailable")
                .to_string()
        };

        GameStateFields {
            game_state,
            team_score,
            opponent_score,
            lead_margin,
            status_text,
            scheduled_start,
        }
    }
}

/// (tracked team, opponent) scores
fn read_scores(event: &Value, resolved_team_name: &str) -> (Option<i64>, Option<i64>) {
    let competitors = event_competitors(event);
    let ours = competitors.iter().position(|c| {
        TEAM_NAME_FIELDS
            .iter()
            .any(|field| c["team"][*field].as_str() == Some(resolved_team_name))
    });

    match ours {
        Some(index) => {
            let opponent = competitors
                .iter()
                .enumerate()
                .find(|(i, _)| *i != index)
                .map(|(_, c)| c);
            (
                parse_score(&competitors[index]["score"]),
                opponent.and_then(|c| parse_score(&c["score"])),
            )
        }
        None => (None, None),
    }
}

/// Scoreboard sends "21", summaries sometimes a number or `{ value, displayValue }`
fn parse_score(score: &Value) -> Option<i64> {
    match score {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::Object(_) => {
            parse_score(&score["value"]).or_else(|| parse_score(&score["displayValue"]))
        }
        _ => None,
    }
}

fn upstream_description(status: &Value) -> Option<&str> {
    ["shortDetail", "detail", "description"]
        .iter()
        .filter_map(|field| status["type"][*field].as_str())
        .find(|text| !text.trim().is_empty())
}

/// ESPN dates: "2024-09-07T19:30Z" (no seconds) or full RFC 3339
pub fn parse_espn_date(date_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%MZ")
        .or_else(|_| NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%SZ"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// Kickoff as shown on the board, e.g. "Sat 9/7 3:30 PM"
pub fn format_start_time<Tz>(start: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    start
        .with_timezone(tz)
        .format("%a %-m/%-d %-I:%M %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(state: &str, home_score: &str, away_score: &str) -> Value {
        json!({
            "id": "401",
            "date": "2024-09-07T19:30Z",
            "competitions": [{
                "date": "2024-09-07T19:30Z",
                "status": {"type": {
                    "state": state,
                    "description": "In Progress",
                    "detail": "3rd Quarter - 5:12",
                    "shortDetail": "5:12 - 3rd",
                }},
                "competitors": [
                    {"homeAway": "home", "score": home_score,
                     "team": {"displayName": "Alabama Crimson Tide", "location": "Alabama"}},
                    {"homeAway": "away", "score": away_score,
                     "team": {"displayName": "Georgia Bulldogs", "location": "Georgia"}},
                ]
            }]
        })
    }

    fn utc_reader() -> GameStateReader {
        GameStateReader::with_offset(FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn test_in_progress_scores_and_margin() {
        let fields = utc_reader().read_state(&event("in", "17", "24"), "Alabama Crimson Tide");
        assert_eq!(fields.game_state, GameState::InProgress);
        assert_eq!(fields.team_score, Some(17));
        assert_eq!(fields.opponent_score, Some(24));
        assert_eq!(fields.lead_margin, Some(-7));
        assert_eq!(fields.status_text, "5:12 - 3rd");
    }

    #[test]
    fn test_away_team_perspective() {
        let fields = utc_reader().read_state(&event("post", "17", "24"), "Georgia Bulldogs");
        assert_eq!(fields.game_state, GameState::Completed);
        assert_eq!(fields.team_score, Some(24));
        assert_eq!(fields.opponent_score, Some(17));
        assert_eq!(fields.lead_margin, Some(7));
    }

    #[test]
    fn test_scheduled_hides_scores_and_shows_kickoff() {
        let fields = utc_reader().read_state(&event("pre", "0", "0"), "Alabama Crimson Tide");
        assert_eq!(fields.game_state, GameState::Scheduled);
        assert_eq!(fields.team_score, None);
        assert_eq!(fields.opponent_score, None);
        assert_eq!(fields.lead_margin, None);
        assert_eq!(fields.status_text, "Sat 9/7 7:30 PM");
        assert_eq!(
            fields.scheduled_start,
            Some(Utc.with_ymd_and_hms(2024, 9, 7, 19, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_scheduled_with_offset() {
        let eastern = GameStateReader::with_offset(FixedOffset::west_opt(4 * 3600).unwrap());
        let fields = eastern.read_state(&event("pre", "", ""), "Alabama Crimson Tide");
        assert_eq!(fields.status_text, "Sat 9/7 3:30 PM");
    }

    #[test]
    fn test_tbd_kickoff() {
        let mut ev = event("pre", "0", "0");
        ev["competitions"][0]["timeValid"] = json!(false);
        let fields = utc_reader().read_state(&ev, "Alabama Crimson Tide");
        assert_eq!(fields.status_text, "TBD");
    }

    #[test]
    fn test_missing_fields_degrade() {
        let fields = utc_reader().read_state(&json!({}), "Alabama");
        assert_eq!(fields.game_state, GameState::Unknown);
        assert_eq!(fields.team_score, None);
        assert_eq!(fields.scheduled_start, None);
        assert_eq!(fields.status_text, "Status unavailable");
    }

    #[test]
    fn test_unknown_state_keeps_description() {
        let fields = utc_reader().read_state(&event("postponed", "0", "0"), "Alabama Crimson Tide");
        assert_eq!(fields.game_state, GameState::Unknown);
        assert_eq!(fields.team_score, Some(0));
        assert_eq!(fields.status_text, "5:12 - 3rd");
    }

    #[test]
    fn test_event_level_status_fallback() {
        let ev = json!({
            "status": {"type": {"state": "in", "detail": "Halftime"}},
            "competitions": [{"competitors": [
                {"score": 14, "team": {"displayName": "Alabama Crimson Tide"}},
                {"score": {"value": 10.0}, "team": {"displayName": "Georgia Bulldogs"}},
            ]}]
        });
        let fields = utc_reader().read_state(&ev, "Alabama Crimson Tide");
        assert_eq!(fields.game_state, GameState::InProgress);
        assert_eq!(fields.status_text, "Halftime");
        assert_eq!(fields.lead_margin, Some(4));
    }

    #[test]
    fn test_parse_espn_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 19, 0, 0).unwrap();
        assert_eq!(parse_espn_date("2024-01-15T19:00Z"), Some(expected));
        assert_eq!(parse_espn_date("2024-01-15T19:00:00Z"), Some(expected));
        assert_eq!(parse_espn_date("2024-01-15T14:00:00-05:00"), Some(expected));
        assert_eq!(parse_espn_date("next saturday"), None);
    }
}
