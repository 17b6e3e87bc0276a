//! Leaderboard ordering.
//!
//! 1. Rows with passing yards, most yards first (0 is a real value).
//! 2. Rows without yards whose game is Scheduled, earliest kickoff first.
//! 3. Everything else (not found, failed, unknown), in configured order.
//!
//! The sort is stable, so ties keep configured order.

use crate::models::MatchupResult;
use std::cmp::Ordering;

fn tier(result: &MatchupResult) -> u8 {
    match (result.passing_yards, result.game_state.is_scheduled()) {
        (Some(_), _) => 0,
        (None, true) => 1,
        (None, false) => 2,
    }
}

/// Total order used by [`rank`]
pub fn compare(a: &MatchupResult, b: &MatchupResult) -> Ordering {
    tier(a).cmp(&tier(b)).then_with(|| match tier(a) {
        0 => b.passing_yards.cmp(&a.passing_yards),
        // Unknown kickoff goes after every known one
        1 => match (a.scheduled_start, b.scheduled_start) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        _ => Ordering::Equal,
    })
}

pub fn rank(mut results: Vec<MatchupResult>) -> Vec<MatchupResult> {
    results.sort_by(compare);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameState, Matchup, ResolutionOutcome};
    use chrono::{DateTime, TimeZone, Utc};

    fn row(
        name: &str,
        yards: Option<i64>,
        state: GameState,
        start: Option<DateTime<Utc>>,
    ) -> MatchupResult {
        let mut result = MatchupResult::not_found(&Matchup::new(name, name));
        result.outcome = ResolutionOutcome::Resolved;
        result.passing_yards = yards;
        result.game_state = state;
        result.scheduled_start = start;
        result
    }

    fn names(results: &[MatchupResult]) -> Vec<&str> {
        results.iter().map(|r| r.participant_name.as_str()).collect()
    }

    #[test]
    fn test_yards_then_kickoff_order() {
        let t1 = Utc.with_ymd_and_hms(2024, 9, 7, 23, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 9, 7, 16, 0, 0).unwrap();

        let ranked = rank(vec![
            row("a", Some(250), GameState::InProgress, None),
            row("b", None, GameState::Scheduled, Some(t1)),
            row("c", None, GameState::Scheduled, Some(t2)),
            row("d", Some(0), GameState::InProgress, None),
        ]);

        assert_eq!(names(&ranked), vec!["a", "d", "c", "b"]);
    }

    #[test]
    fn test_missing_rows_last_in_config_order() {
        let start = Utc.with_ymd_and_hms(2024, 9, 7, 16, 0, 0).unwrap();
        let mut failed = row("x", None, GameState::Unknown, None);
        failed.outcome = ResolutionOutcome::Failed("boom".to_string());

        let ranked = rank(vec![
            failed,
            row("y", None, GameState::Completed, None),
            row("z", None, GameState::Scheduled, Some(start)),
            row("w", Some(12), GameState::Completed, None),
            MatchupResult::not_found(&Matchup::new("v", "v")),
        ]);

        assert_eq!(names(&ranked), vec!["w", "z", "x", "y", "v"]);
    }

    #[test]
    fn test_equal_yards_keep_config_order() {
        let ranked = rank(vec![
            row("first", Some(100), GameState::InProgress, None),
            row("second", Some(300), GameState::InProgress, None),
            row("third", Some(100), GameState::Completed, None),
        ]);
        assert_eq!(names(&ranked), vec!["second", "first", "third"]);
    }

    #[test]
    fn test_scheduled_without_kickoff_after_known() {
        let start = Utc.with_ymd_and_hms(2024, 9, 7, 16, 0, 0).unwrap();
        let ranked = rank(vec![
            row("tbd", None, GameState::Scheduled, None),
            row("noon", None, GameState::Scheduled, Some(start)),
        ]);
        assert_eq!(names(&ranked), vec!["noon", "tbd"]);
    }

    #[test]
    fn test_scheduled_with_yards_ranks_by_yards() {
        let start = Utc.with_ymd_and_hms(2024, 9, 7, 16, 0, 0).unwrap();
        let ranked = rank(vec![
            row("pre", None, GameState::Scheduled, Some(start)),
            row("zero", Some(0), GameState::Scheduled, Some(start)),
        ]);
        assert_eq!(names(&ranked), vec!["zero", "pre"]);
    }
}
