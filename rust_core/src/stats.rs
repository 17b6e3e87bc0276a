//! Stat extraction from ESPN boxscore statistics lists.
//!
//! Team statistics arrive as `[{ name, displayValue?, value?, label? }]`
//! with no guarantee on naming or value types. A matching entry with an
//! unreadable value counts as 0; no matching entry at all is `None`. The
//! ranking relies on that difference.

use crate::utils::matching::normalize;
use serde_json::Value;

/// Row names ESPN uses for passing yards when the key omits "yds"/"yards"
const PASSING_YARDS_LABELS: [&str; 2] = ["passing", "netpassing"];

/// Passing yards from a boxscore `statistics` value
pub fn extract_passing_yards(stats: &Value) -> Option<i64> {
    let entries = stats.as_array()?;

    let entry = entries
        .iter()
        .find(|entry| is_passing_yards_key(stat_name(entry)))
        .or_else(|| {
            entries
                .iter()
                .find(|entry| PASSING_YARDS_LABELS.contains(&normalize(stat_name(entry)).as_str()))
        })?;

    Some(stat_value(entry))
}

fn stat_name(entry: &Value) -> &str {
    entry["name"].as_str().unwrap_or_default()
}

/// "netPassingYards", "Passing Yards", "passYds"
fn is_passing_yards_key(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("pass") && (name.contains("yd") || name.contains("yard"))
}

/// Integer value of a stat entry, preferring the display string
fn stat_value(entry: &Value) -> i64 {
    if let Some(display) = entry["displayValue"].as_str() {
        return parse_stat_text(display);
    }

    match &entry["value"] {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.round() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_stat_text(s),
        _ => 0,
    }
}

/// Keep digits and '-', parse, and fall back to 0
fn parse_stat_text(text: &str) -> i64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();
    cleaned.parse().unwrap_or(0)
}
