//! Sync loop for the selected game.
//!
//! DESIGN
//! ======
//! Idle: no session, no timer. Active: exactly one poller task per selection.
//! The poller's interval fires immediately on start, then every
//! `poll_interval`; each tick spawns an independent cycle so a slow cycle
//! never delays the next one. Overlapping cycles are fine because every
//! cycle is a full GET-only refetch and the last commit wins.
//!
//! Each cycle is tagged with the epoch of the selection it was issued for.
//! Commit happens only if that epoch is still current, which keeps a late
//! cycle for a previous game from clobbering the new one. Stopping the loop
//! aborts the timer only; in-flight cycles finish and are discarded.

#[cfg(test)]
#[path = "sync_loop_test.rs"]
mod sync_loop_test;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::Dashboard;
use crate::state::projection::fetch_snapshot;

/// Result of one cycle, from the dashboard's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Snapshot replaced and connection marked healthy.
    Committed,
    /// At least one request failed; snapshot kept, connection unhealthy.
    Failed,
    /// The selection changed before the cycle finished (or never matched).
    Discarded,
}

impl Dashboard {
    pub(super) fn spawn_poller(&self, epoch: u64) -> JoinHandle<()> {
        let weak = Arc::downgrade(&self.inner);
        let period = self.inner.config.poll_interval;
        debug!(epoch, ?period, "sync loop started");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                let dashboard = Dashboard { inner };
                tokio::spawn(async move {
                    dashboard.run_cycle(epoch).await;
                });
            }
        })
    }

    /// Run one cycle for the current selection right now.
    ///
    /// Does not touch the timer. Returns `None` when no game is selected.
    pub async fn refresh(&self) -> Option<CycleOutcome> {
        let epoch = self.with_state(|s| s.session.as_ref().map(|x| x.epoch))?;
        Some(self.run_cycle(epoch).await)
    }

    pub(crate) async fn run_cycle(&self, epoch: u64) -> CycleOutcome {
        let Some(game_id) = self.with_state(|s| s.session_at(epoch).map(|x| x.game.id.clone())) else {
            return CycleOutcome::Discarded;
        };

        let result = fetch_snapshot(self.transport(), &game_id).await;

        let mut state = self.lock();
        let Some(session) = state.session_at(epoch) else {
            debug!(%game_id, epoch, "discarding sync result for stale selection");
            return CycleOutcome::Discarded;
        };
        match result {
            Ok(snapshot) => {
                session.commit(snapshot);
                CycleOutcome::Committed
            }
            Err(e) => {
                warn!(error = %e, %game_id, epoch, "sync cycle failed");
                session.mark_unhealthy();
                CycleOutcome::Failed
            }
        }
    }
}
