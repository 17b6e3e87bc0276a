//! Remembers each team's last passing-yards reading so the board can
//! highlight rows that just went up.

use crate::models::MatchupResult;
use crate::utils::matching::normalize;
use std::collections::{HashMap, HashSet};

/// Last known passing yards per normalized team name.
///
/// Lives for the whole process; nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct ChangeTracker {
    last_values: HashMap<String, i64>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `new_value` is present and above the last reading (0 if
    /// never seen). Absent readings leave the stored value alone.
    pub fn record_and_check(&mut self, identity: &str, new_value: Option<i64>) -> bool {
        let Some(value) = new_value else {
            return false;
        };

        let key = normalize(identity);
        let previous = self.last_values.get(&key).copied().unwrap_or(0);
        self.last_values.insert(key, value);
        value > previous
    }

    /// Record a ranked result set, returning participants whose yards went up.
    ///
    /// Each team is checked once per cycle; every participant on a team that
    /// went up is flagged.
    pub fn record_results(&mut self, results: &[MatchupResult]) -> HashSet<String> {
        let mut team_increased: HashMap<String, bool> = HashMap::new();
        let mut increased = HashSet::new();

        for result in results {
            if result.passing_yards.is_none() {
                continue;
            }
            let key = normalize(&result.configured_team_name);
            let went_up = match team_increased.get(&key) {
                Some(&went_up) => went_up,
                None => {
                    let went_up =
                        self.record_and_check(&result.configured_team_name, result.passing_yards);
                    team_increased.insert(key, went_up);
                    went_up
                }
            };
            if went_up {
                increased.insert(result.participant_name.clone());
            }
        }

        increased
    }

    pub fn last_value(&self, identity: &str) -> Option<i64> {
        self.last_values.get(&normalize(identity)).copied()
    }

    pub fn len(&self) -> usize {
        self.last_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Matchup;

    #[test]
    fn test_first_reading_compares_against_zero() {
        let mut tracker = ChangeTracker::new();
        assert!(tracker.record_and_check("A", Some(100)));
        assert!(tracker.record_and_check("A", Some(150)));
        assert_eq!(tracker.last_value("A"), Some(150));
    }

    #[test]
    fn test_unchanged_reading_is_not_an_increase() {
        let mut tracker = ChangeTracker::new();
        tracker.record_and_check("A", Some(100));
        assert!(!tracker.record_and_check("A", Some(100)));
    }

    #[test]
    fn test_absent_reading_keeps_previous() {
        let mut tracker = ChangeTracker::new();
        tracker.record_and_check("A", Some(150));
        assert!(!tracker.record_and_check("A", None));
        assert_eq!(tracker.last_value("A"), Some(150));
    }

    #[test]
    fn test_zero_is_not_an_increase_from_default() {
        let mut tracker = ChangeTracker::new();
        assert!(!tracker.record_and_check("A", Some(0)));
        assert_eq!(tracker.last_value("A"), Some(0));
    }

    #[test]
    fn test_decrease_is_stored() {
        let mut tracker = ChangeTracker::new();
        tracker.record_and_check("A", Some(120));
        assert!(!tracker.record_and_check("A", Some(110)));
        assert!(tracker.record_and_check("A", Some(115)));
    }

    #[test]
    fn test_identity_is_normalized() {
        let mut tracker = ChangeTracker::new();
        tracker.record_and_check("Texas A&M", Some(90));
        assert_eq!(tracker.last_value("texas am"), Some(90));
        assert!(!tracker.record_and_check("TEXAS A&M", Some(90)));
    }

    #[test]
    fn test_record_results() {
        let mut tracker = ChangeTracker::new();
        let mut alice = MatchupResult::not_found(&Matchup::new("Alice", "Alabama"));
        alice.passing_yards = Some(80);
        let bob = MatchupResult::not_found(&Matchup::new("Bob", "Georgia"));

        let increased = tracker.record_results(&[alice.clone(), bob.clone()]);
        assert!(increased.contains("Alice"));
        assert!(!increased.contains("Bob"));
        assert_eq!(tracker.len(), 1);

        let increased = tracker.record_results(&[alice, bob]);
        assert!(increased.is_empty());
    }

    #[test]
    fn test_shared_team_flags_every_participant() {
        let mut tracker = ChangeTracker::new();
        let rows = |yards: i64| {
            let mut alice = MatchupResult::not_found(&Matchup::new("Alice", "Alabama"));
            alice.passing_yards = Some(yards);
            let mut bob = MatchupResult::not_found(&Matchup::new("Bob", "alabama"));
            bob.passing_yards = Some(yards);
            vec![alice, bob]
        };

        let increased = tracker.record_results(&rows(80));
        assert_eq!(
            increased,
            HashSet::from(["Alice".to_string(), "Bob".to_string()])
        );
        assert_eq!(tracker.len(), 1);

        assert!(tracker.record_results(&rows(80)).is_empty());
        assert_eq!(tracker.record_results(&rows(95)).len(), 2);
    }

    #[test]
    fn test_shared_team_absent_row_does_not_mask_reading() {
        let mut tracker = ChangeTracker::new();
        let failed = MatchupResult::failed(
            &Matchup::new("Alice", "Alabama"),
            Some("1".to_string()),
            "timeout".to_string(),
        );
        let mut bob = MatchupResult::not_found(&Matchup::new("Bob", "Alabama"));
        bob.passing_yards = Some(120);

        let increased = tracker.record_results(&[failed, bob]);
        assert_eq!(increased, HashSet::from(["Bob".to_string()]));
    }
}
