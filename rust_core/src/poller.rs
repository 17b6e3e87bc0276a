//! Periodic refresh driver.
//!
//! Runs one cycle at a time on a fixed interval and publishes the latest
//! [`LeaderboardView`] on a watch channel. A cycle that overruns the
//! interval pushes the next tick back instead of overlapping it.

use crate::change_tracker::ChangeTracker;
use crate::models::{LeaderboardSnapshot, Matchup};
use crate::orchestrator::Orchestrator;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// What the presentation layer sees
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaderboardView {
    pub snapshot: LeaderboardSnapshot,
    /// A cycle is in flight
    pub loading: bool,
    /// Participants whose passing yards went up in the latest cycle
    pub increased: HashSet<String>,
}

pub struct Poller {
    orchestrator: Arc<Orchestrator>,
    matchups: Arc<Vec<Matchup>>,
    tracker: Arc<Mutex<ChangeTracker>>,
    view_tx: Arc<watch::Sender<LeaderboardView>>,
    shutdown_tx: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    /// `tracker` is the process-wide change memory; the poller is its only writer.
    pub fn new(
        orchestrator: Arc<Orchestrator>,
        matchups: Vec<Matchup>,
        tracker: ChangeTracker,
    ) -> Self {
        let (view_tx, _) = watch::channel(LeaderboardView::default());
        Self {
            orchestrator,
            matchups: Arc::new(matchups),
            tracker: Arc::new(Mutex::new(tracker)),
            view_tx: Arc::new(view_tx),
            shutdown_tx: None,
            task: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LeaderboardView> {
        self.view_tx.subscribe()
    }

    pub fn latest(&self) -> LeaderboardView {
        self.view_tx.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Start polling; the first cycle runs immediately
    pub fn start(&mut self, interval: Duration) {
        if self.is_running() {
            warn!("Poller already running, ignoring start");
            return;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let worker = PollWorker {
            orchestrator: self.orchestrator.clone(),
            matchups: self.matchups.clone(),
            tracker: self.tracker.clone(),
            view_tx: self.view_tx.clone(),
        };

        info!(
            "Poller started: {} matchups every {:?}",
            self.matchups.len(),
            interval
        );
        self.task = Some(tokio::spawn(worker.run(interval, shutdown_rx)));
        self.shutdown_tx = Some(shutdown_tx);
    }

    /// Cancel the pending tick and wait for the loop to exit. A cycle already
    /// in flight finishes, but its result is dropped.
    pub async fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(true);
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Poller task ended abnormally: {}", e);
            }
        }
        info!("Poller stopped");
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(true);
        }
    }
}

struct PollWorker {
    orchestrator: Arc<Orchestrator>,
    matchups: Arc<Vec<Matchup>>,
    tracker: Arc<Mutex<ChangeTracker>>,
    view_tx: Arc<watch::Sender<LeaderboardView>>,
}

impl PollWorker {
    async fn run(self, interval: Duration, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown_rx.changed() => break,
            }
            if *shutdown_rx.borrow() {
                break;
            }

            self.view_tx.send_modify(|view| view.loading = true);
            let outcome = self.orchestrator.run_cycle(&self.matchups).await;

            if *shutdown_rx.borrow() {
                info!("Poller stopped during a cycle, discarding its result");
                break;
            }

            match outcome {
                Ok(snapshot) => {
                    let increased = self.tracker.lock().record_results(&snapshot.results);
                    self.view_tx.send_replace(LeaderboardView {
                        snapshot,
                        loading: false,
                        increased,
                    });
                }
                Err(e) => {
                    warn!("Refresh cycle failed, keeping last snapshot: {}", e);
                    self.view_tx.send_modify(|view| {
                        view.snapshot = view.snapshot.with_error(e.to_string());
                        view.loading = false;
                        view.increased.clear();
                    });
                }
            }
        }

        self.view_tx.send_modify(|view| view.loading = false);
    }
}
