//! Team name normalization and the match policies used to compare them.
//!
//! ESPN spells the same school differently across endpoints ("Ohio State",
//! "Ohio St", "Ohio State Buckeyes"), so every comparison goes through
//! [`normalize`] and one of the [`MatchPolicy`] rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical comparison key for a team name.
///
/// Lower-cases and drops everything outside `[a-z0-9]`. Only ever used for
/// comparisons; display strings stay untouched.
pub fn normalize(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// How strongly two names agreed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchConfidence {
    /// One normalized name contains the other
    Substring = 1,
    /// Normalized names are identical
    Exact = 2,
}

/// Team-name matching policy.
///
/// Chosen once at startup and applied to both the scoreboard lookup and the
/// boxscore-team lookup, so the two steps can never pick different records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Normalized candidate must equal the configured name
    Exact,
    /// Either normalized name may contain the other
    Substring,
    /// Exact pass over the whole list first, substring pass only if nothing matched
    #[default]
    ExactThenSubstring,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPolicy::Exact => "exact",
            MatchPolicy::Substring => "substring",
            MatchPolicy::ExactThenSubstring => "exact_then_substring",
        }
    }

    /// The comparison passes to run, in order. A later pass only runs when
    /// the earlier one found nothing anywhere in the candidate list.
    pub fn passes(&self) -> &'static [MatchConfidence] {
        match self {
            MatchPolicy::Exact => &[MatchConfidence::Exact],
            MatchPolicy::Substring => &[MatchConfidence::Substring],
            MatchPolicy::ExactThenSubstring => {
                &[MatchConfidence::Exact, MatchConfidence::Substring]
            }
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "exact" => Ok(MatchPolicy::Exact),
            "substring" | "fuzzy" => Ok(MatchPolicy::Substring),
            "exact_then_substring" | "default" => Ok(MatchPolicy::ExactThenSubstring),
            other => Err(format!("unknown team match policy: {}", other)),
        }
    }
}

/// Compare two already-normalized names under a single pass.
///
/// Empty keys never match: an empty string is a substring of everything.
pub fn keys_match(candidate: &str, target: &str, pass: MatchConfidence) -> bool {
    if candidate.is_empty() || target.is_empty() {
        return false;
    }

    match pass {
        MatchConfidence::Exact => candidate == target,
        MatchConfidence::Substring => candidate.contains(target) || target.contains(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("Texas A&M"), "texasam");
        assert_eq!(normalize("  Miami (OH) "), "miamioh");
        assert_eq!(normalize("San José State"), "sanjosstate");
        assert_eq!(normalize("UL-Monroe 2"), "ulmonroe2");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_exact_does_not_match_longer_name() {
        let washington = normalize("Washington");
        let washington_state = normalize("Washington State");
        assert!(!keys_match(&washington_state, &washington, MatchConfidence::Exact));
        assert!(keys_match(&washington, &washington, MatchConfidence::Exact));
    }

    #[test]
    fn test_substring_matches_both_directions() {
        assert!(keys_match("ohiostatebuckeyes", "ohiostate", MatchConfidence::Substring));
        assert!(keys_match("ohiostate", "ohiostatebuckeyes", MatchConfidence::Substring));
        assert!(!keys_match("michigan", "ohiostate", MatchConfidence::Substring));
    }

    #[test]
    fn test_empty_keys_never_match() {
        assert!(!keys_match("", "alabama", MatchConfidence::Substring));
        assert!(!keys_match("alabama", "", MatchConfidence::Substring));
        assert!(!keys_match("", "", MatchConfidence::Exact));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("exact".parse::<MatchPolicy>(), Ok(MatchPolicy::Exact));
        assert_eq!("Substring".parse::<MatchPolicy>(), Ok(MatchPolicy::Substring));
        assert_eq!(
            "exact-then-substring".parse::<MatchPolicy>(),
            Ok(MatchPolicy::ExactThenSubstring)
        );
        assert!("closest".parse::<MatchPolicy>().is_err());
        assert_eq!(MatchPolicy::default(), MatchPolicy::ExactThenSubstring);
    }

    #[test]
    fn test_policy_passes() {
        assert_eq!(MatchPolicy::Exact.passes(), &[MatchConfidence::Exact]);
        assert_eq!(
            MatchPolicy::ExactThenSubstring.passes(),
            &[MatchConfidence::Exact, MatchConfidence::Substring]
        );
    }
}
