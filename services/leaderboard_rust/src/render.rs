//! Turns a published view into table rows or a JSON line.

use anyhow::Result;
use serde::Serialize;
use yardboard_core::{LeaderboardView, MatchupResult};

/// Marker next to yards that went up since the last cycle
const INCREASE_MARKER: &str = "+";

pub fn render_table(view: &LeaderboardView) -> Vec<String> {
    let mut lines = Vec::with_capacity(view.snapshot.results.len() + 2);

    let refreshed = view
        .snapshot
        .refreshed_at
        .map(|t| t.format("%H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    lines.push(format!(
        "Passing yards leaderboard (refreshed {}, {} rows)",
        refreshed,
        view.snapshot.results.len()
    ));
    if let Some(error) = &view.snapshot.error {
        lines.push(format!("Last refresh failed: {}", error));
    }

    for (i, result) in view.snapshot.results.iter().enumerate() {
        let increased = view.increased.contains(&result.participant_name);
        lines.push(format_row(i + 1, result, increased));
    }

    lines
}

fn format_row(rank: usize, result: &MatchupResult, increased: bool) -> String {
    let yards = result
        .passing_yards
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string());
    let marker = if increased { INCREASE_MARKER } else { " " };
    let score = match (result.team_score, result.opponent_score) {
        (Some(ours), Some(theirs)) => format!("{}-{}", ours, theirs),
        _ => String::new(),
    };

    format!(
        "{:>2}. {:<16} {:<20} {:>5}{} {:<7} {}",
        rank,
        result.participant_name,
        result.configured_team_name,
        yards,
        marker,
        score,
        result.status_text
    )
}

#[derive(Serialize)]
struct JsonRow<'a> {
    rank: usize,
    #[serde(flatten)]
    result: &'a MatchupResult,
    increased: bool,
}

#[derive(Serialize)]
struct JsonView<'a> {
    refreshed_at: Option<String>,
    error: Option<&'a str>,
    results: Vec<JsonRow<'a>>,
}

/// Single-line JSON document for the presentation layer
pub fn render_json(view: &LeaderboardView) -> Result<String> {
    let doc = JsonView {
        refreshed_at: view.snapshot.refreshed_at.map(|t| t.to_rfc3339()),
        error: view.snapshot.error.as_deref(),
        results: view
            .snapshot
            .results
            .iter()
            .enumerate()
            .map(|(i, result)| JsonRow {
                rank: i + 1,
                result,
                increased: view.increased.contains(&result.participant_name),
            })
            .collect(),
    };
    Ok(serde_json::to_string(&doc)?)
}
