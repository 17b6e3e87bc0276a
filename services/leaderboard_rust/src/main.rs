mod config;
mod render;

use crate::config::{Config, OutputFormat};
use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use yardboard_core::{
    ChangeTracker, EspnClient, GameStateReader, LeaderboardView, Orchestrator, Poller, TeamResolver,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!("Starting passing-yards leaderboard...");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Tracking {} matchups for {} (poll every {:?}, match policy {})",
        config.matchups.len(),
        config.target_date,
        config.poll_interval,
        config.match_policy
    );

    let espn = EspnClient::with_config(config.espn.clone());
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(espn),
        TeamResolver::new(config.match_policy),
        GameStateReader::new(),
        config.target_date,
    ));

    let mut poller = Poller::new(orchestrator, config.matchups.clone(), ChangeTracker::new());
    let mut view_rx = poller.subscribe();
    poller.start(config.poll_interval);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = view_rx.changed() => {
                if changed.is_err() {
                    error!("Poller channel closed unexpectedly");
                    break;
                }
                let view = view_rx.borrow_and_update().clone();
                if !view.loading {
                    publish(&view, config.output_format);
                }
            }
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutdown signal received");
                break;
            }
        }
    }

    poller.stop().await;
    info!("Leaderboard stopped");
    Ok(())
}

fn publish(view: &LeaderboardView, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            for line in render::render_table(view) {
                info!("{}", line);
            }
        }
        OutputFormat::Json => match render::render_json(view) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to serialize leaderboard: {}", e),
        },
    }
}
