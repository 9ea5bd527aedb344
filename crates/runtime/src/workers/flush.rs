//! Background write-through of cooldown state to durable storage.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use interact_core::CooldownTracker;

use crate::repository::{CooldownRepository, Result};

/// Commands accepted by [`FlushWorker`].
pub enum Command {
    /// Flush immediately, replying once the write completes.
    FlushNow { reply: oneshot::Sender<Result<()>> },
    /// Stop after a final flush.
    Shutdown,
}

/// Periodically persists the cooldown tracker's live entries.
///
/// Only already-committed state is written; the tracker hands out a
/// consistent snapshot, so a flush never races an in-flight `commit`.
pub struct FlushWorker {
    cooldowns: Arc<CooldownTracker>,
    repository: Arc<dyn CooldownRepository>,
    interval: Duration,
    command_rx: mpsc::Receiver<Command>,
}

impl FlushWorker {
    pub fn new(
        cooldowns: Arc<CooldownTracker>,
        repository: Arc<dyn CooldownRepository>,
        interval: Duration,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            cooldowns,
            repository,
            interval,
            command_rx,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        info!("FlushWorker started: interval={:?}", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; skip it so startup does not
        // rewrite the file that was just loaded.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.flush() {
                        error!("cooldown flush failed: {e}");
                    }
                }
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::FlushNow { reply }) => {
                            let _ = reply.send(self.flush());
                        }
                        Some(Command::Shutdown) | None => break,
                    }
                }
            }
        }

        // Final flush so committed cooldowns survive the restart.
        if let Err(e) = self.flush() {
            error!("final cooldown flush failed: {e}");
        }
        info!("FlushWorker stopped");
    }

    fn flush(&self) -> Result<()> {
        let entries = self.cooldowns.entries();
        self.repository.save(&entries)?;
        debug!("flushed {} cooldown entries", entries.len());
        Ok(())
    }
}
