//! Periodic expiry sweep across the shared trackers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use interact_core::{ConfirmationWorkflow, CooldownTracker, PermissionLedger};

use crate::providers::Clock;

/// What one sweep pass removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub cooldowns: usize,
    pub confirmations: usize,
    pub permissions: usize,
}

impl SweepReport {
    pub fn total(&self) -> usize {
        self.cooldowns + self.confirmations + self.permissions
    }
}

/// Commands accepted by [`SweepWorker`].
pub enum Command {
    /// Sweep immediately, replying with what was removed.
    SweepNow { reply: oneshot::Sender<SweepReport> },
    /// Stop the worker.
    Shutdown,
}

/// Reclaims expired cooldowns, pending confirmations, and timed permission
/// grants.
///
/// The sweep is memory hygiene only: every read path revalidates against
/// the current time, so correctness never depends on this cadence.
pub struct SweepWorker {
    cooldowns: Arc<CooldownTracker>,
    confirmations: Arc<ConfirmationWorkflow>,
    permissions: Arc<PermissionLedger>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    command_rx: mpsc::Receiver<Command>,
}

impl SweepWorker {
    pub fn new(
        cooldowns: Arc<CooldownTracker>,
        confirmations: Arc<ConfirmationWorkflow>,
        permissions: Arc<PermissionLedger>,
        clock: Arc<dyn Clock>,
        interval: Duration,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            cooldowns,
            confirmations,
            permissions,
            clock,
            interval,
            command_rx,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        info!("SweepWorker started: interval={:?}", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep();
                }
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::SweepNow { reply }) => {
                            let _ = reply.send(self.sweep());
                        }
                        Some(Command::Shutdown) | None => break,
                    }
                }
            }
        }

        info!("SweepWorker stopped");
    }

    fn sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let report = SweepReport {
            cooldowns: self.cooldowns.sweep(now),
            confirmations: self.confirmations.sweep(now),
            permissions: self.permissions.sweep(now),
        };
        if report.total() > 0 {
            debug!(
                cooldowns = report.cooldowns,
                confirmations = report.confirmations,
                permissions = report.permissions,
                "sweep removed expired entries"
            );
        }
        report
    }
}
