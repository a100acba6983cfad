//! Background jobs: periodic leaderboard reconciliation and maintenance
//! sweeps, with watch-channel shutdown.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::config::JobsConfig;
use crate::service::{LeaderboardSync, Ledger, SkipTracker};

/// Owns the background task handles and their shutdown signal.
pub struct JobController {
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
    running: bool,
}

impl JobController {
    #[must_use]
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            shutdown,
            handles: Vec::new(),
            running: false,
        }
    }

    /// Spawn the periodic jobs. The leaderboard loop ticks immediately,
    /// so startup performs one reconciliation before the first interval.
    pub fn start(
        &mut self,
        config: &JobsConfig,
        leaderboard: LeaderboardSync,
        skips: SkipTracker,
        ledger: Ledger,
    ) {
        if self.running {
            return;
        }
        self.running = true;

        let sync_period = Duration::from_secs(config.leaderboard_sync_interval_secs);
        let mut rx = self.shutdown.subscribe();
        self.handles.push(tokio::spawn(async move {
            let mut ticker = interval(sync_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = leaderboard.sync_to_db().await {
                            warn!(error = %e, "Leaderboard sync failed");
                        }
                    }
                    _ = rx.changed() => break,
                }
            }
            info!("Leaderboard sync job stopped");
        }));

        let sweep_period = Duration::from_secs(config.maintenance_interval_secs);
        let mut rx = self.shutdown.subscribe();
        self.handles.push(tokio::spawn(async move {
            let mut ticker = interval(sweep_period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = skips.cleanup_expired().await {
                            warn!(error = %e, "Skip cleanup failed");
                        }
                        if let Err(e) = ledger.prune_expired_holds().await {
                            warn!(error = %e, "Hold pruning failed");
                        }
                    }
                    _ = rx.changed() => break,
                }
            }
            info!("Maintenance job stopped");
        }));

        info!(
            leaderboard_interval_secs = config.leaderboard_sync_interval_secs,
            maintenance_interval_secs = config.maintenance_interval_secs,
            "Background jobs started"
        );
    }

    /// Signal shutdown and wait for the jobs to finish.
    pub async fn stop(&mut self) {
        if !self.running {
            return;
        }
        let _ = self.shutdown.send(true);
        for handle in self.handles.drain(..) {
            let _ = handle.await;
        }
        self.running = false;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for JobController {
    fn default() -> Self {
        Self::new()
    }
}
