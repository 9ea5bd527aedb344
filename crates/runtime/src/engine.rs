//! Engine assembly: persisted-state loading, worker lifecycle, and the
//! public surface consumed by the host's event-listener adapter.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use interact_core::{
    ActionProfile, ActorId, ClickKind, ConfirmationWorkflow, CooldownTracker, DurationMs,
    EntityId, Outcome, PermissionLedger, PermissionNode, ProfileStore, format_remaining,
};

use crate::config::EngineConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{EngineError, Result};
use crate::providers::{
    ActionExecutor, Clock, Economy, Messenger, NoopMessenger, PermissionBackend, SystemClock,
};
use crate::repository::{CooldownRepository, InMemoryCooldownRepository, ProfileRepository};
use crate::workers::{FlushWorker, SweepReport, SweepWorker, flush, sweep};

/// The assembled interaction engine.
///
/// Owns the shared trackers and the background flush/sweep workers. The
/// host's click listener calls [`Engine::handle_click`]; admin surfaces use
/// the profile passthroughs; [`Engine::shutdown`] flushes and joins the
/// workers.
pub struct Engine {
    dispatcher: Dispatcher,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    flush_tx: mpsc::Sender<flush::Command>,
    sweep_tx: mpsc::Sender<sweep::Command>,
    flush_handle: JoinHandle<()>,
    sweep_handle: JoinHandle<()>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Handles one interaction event (see [`Dispatcher::handle_click`]).
    pub async fn handle_click(
        &self,
        actor: &ActorId,
        entity: EntityId,
        click: ClickKind,
        modifier_held: bool,
    ) -> Outcome {
        self.dispatcher
            .handle_click(actor, entity, click, modifier_held)
            .await
    }

    /// Explicit confirm signal for the actor's pending priced interaction.
    pub async fn confirm(&self, actor: &ActorId) -> Outcome {
        self.dispatcher.confirm(actor).await
    }

    /// Explicit cancel signal for the actor's pending priced interaction.
    pub async fn cancel(&self, actor: &ActorId) -> Outcome {
        self.dispatcher.cancel(actor).await
    }

    /// Remaining cooldown for the pair, if any.
    pub fn remaining(&self, actor: &ActorId, entity: EntityId) -> Option<DurationMs> {
        self.dispatcher.remaining(actor, entity)
    }

    /// Renders a remaining duration in the configured display format.
    pub fn format_remaining(&self, remaining: DurationMs) -> String {
        format_remaining(remaining, self.dispatcher.config.display_format)
    }

    /// Whether the actor holds `node` (ledger or platform backend).
    pub async fn is_granted(&self, actor: &ActorId, node: &str) -> bool {
        self.dispatcher.is_granted(actor, node).await
    }

    /// Grants `node` on the engine ledger, optionally time-bound.
    pub fn grant(&self, actor: &ActorId, node: impl Into<PermissionNode>, ttl: Option<DurationMs>) {
        let now = self.dispatcher.clock.now();
        self.dispatcher.permissions.grant(actor, node, ttl, now);
    }

    /// Revokes `node` from the engine ledger.
    pub fn revoke(&self, actor: &ActorId, node: &str) -> bool {
        self.dispatcher.permissions.revoke(actor, node)
    }

    /// Read access to the profile store for status surfaces.
    pub fn profiles(&self) -> &ProfileStore {
        &self.dispatcher.profiles
    }

    /// Binds `profile` to `entity` and persists the new snapshot.
    ///
    /// The in-memory store is updated first; a persistence failure is
    /// surfaced but does not roll the published snapshot back.
    pub fn replace_profile(&self, entity: EntityId, profile: ActionProfile) -> Result<()> {
        self.dispatcher.profiles.replace(entity, profile);
        self.persist_profiles()
    }

    /// Unbinds `entity` and persists the new snapshot.
    pub fn remove_profile(&self, entity: EntityId) -> Result<bool> {
        let removed = self.dispatcher.profiles.remove(entity);
        if removed {
            self.persist_profiles()?;
        }
        Ok(removed)
    }

    /// Re-reads the profile repository and publishes it as one snapshot.
    ///
    /// On any load failure the store keeps its previous snapshot; the
    /// reload is rejected wholesale.
    pub fn reload_profiles(&self) -> Result<usize> {
        let Some(repo) = &self.profile_repo else {
            return Ok(self.dispatcher.profiles.len());
        };
        let profiles = repo.load()?;
        let count = profiles.len();
        self.dispatcher.profiles.reload(profiles);
        info!("reloaded {count} action profiles");
        Ok(count)
    }

    fn persist_profiles(&self) -> Result<()> {
        let Some(repo) = &self.profile_repo else {
            return Ok(());
        };
        let snapshot = self.dispatcher.profiles.current();
        let profiles = snapshot
            .iter()
            .map(|(&entity, profile)| (entity, profile.as_ref().clone()))
            .collect();
        repo.save(&profiles)?;
        Ok(())
    }

    /// Flushes cooldown state to the repository now.
    pub async fn flush_now(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.flush_tx
            .send(flush::Command::FlushNow { reply: reply_tx })
            .await
            .map_err(|_| EngineError::CommandChannelClosed)?;
        reply_rx
            .await
            .map_err(|_| EngineError::CommandChannelClosed)?
            .map_err(EngineError::Repository)
    }

    /// Runs an expiry sweep now and reports what was removed.
    pub async fn sweep_now(&self) -> Result<SweepReport> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sweep_tx
            .send(sweep::Command::SweepNow { reply: reply_tx })
            .await
            .map_err(|_| EngineError::CommandChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::CommandChannelClosed)
    }

    /// Shuts the workers down gracefully, flushing cooldowns a final time.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.flush_tx.send(flush::Command::Shutdown).await;
        let _ = self.sweep_tx.send(sweep::Command::Shutdown).await;

        self.flush_handle.await.map_err(EngineError::WorkerJoin)?;
        self.sweep_handle.await.map_err(EngineError::WorkerJoin)?;
        Ok(())
    }
}

/// Builder for [`Engine`] with flexible collaborator wiring.
pub struct EngineBuilder {
    config: EngineConfig,
    executor: Option<Arc<dyn ActionExecutor>>,
    economy: Option<Arc<dyn Economy>>,
    backend: Option<Arc<dyn PermissionBackend>>,
    messenger: Option<Arc<dyn Messenger>>,
    clock: Option<Arc<dyn Clock>>,
    cooldown_repo: Option<Arc<dyn CooldownRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            executor: None,
            economy: None,
            backend: None,
            messenger: None,
            clock: None,
            cooldown_repo: None,
            profile_repo: None,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn executor(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn economy(mut self, economy: Arc<dyn Economy>) -> Self {
        self.economy = Some(economy);
        self
    }

    pub fn permission_backend(mut self, backend: Arc<dyn PermissionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn messenger(mut self, messenger: Arc<dyn Messenger>) -> Self {
        self.messenger = Some(messenger);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn cooldown_repository(mut self, repo: Arc<dyn CooldownRepository>) -> Self {
        self.cooldown_repo = Some(repo);
        self
    }

    pub fn profile_repository(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    /// Loads persisted state, spawns the workers, and assembles the engine.
    ///
    /// Must be called within a Tokio runtime.
    pub fn build(self) -> Result<Engine> {
        let executor = self.executor.ok_or(EngineError::MissingExecutor)?;
        let messenger = self.messenger.unwrap_or_else(|| Arc::new(NoopMessenger));
        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let cooldown_repo = self
            .cooldown_repo
            .unwrap_or_else(|| Arc::new(InMemoryCooldownRepository::new()));

        let profiles = Arc::new(ProfileStore::new());
        let cooldowns = Arc::new(CooldownTracker::new());
        let confirmations = Arc::new(ConfirmationWorkflow::new());
        let permissions = Arc::new(PermissionLedger::new());

        let restored = cooldown_repo.load()?;
        let restored_count = restored.len();
        cooldowns.restore(restored);

        let mut profile_count = 0;
        if let Some(repo) = &self.profile_repo {
            let loaded = repo.load()?;
            profile_count = loaded.len();
            profiles.reload(loaded);
        }

        let (flush_tx, flush_rx) = mpsc::channel(8);
        let (sweep_tx, sweep_rx) = mpsc::channel(8);

        let flush_worker = FlushWorker::new(
            Arc::clone(&cooldowns),
            Arc::clone(&cooldown_repo),
            self.config.flush_interval,
            flush_rx,
        );
        let sweep_worker = SweepWorker::new(
            Arc::clone(&cooldowns),
            Arc::clone(&confirmations),
            Arc::clone(&permissions),
            Arc::clone(&clock),
            self.config.sweep_interval,
            sweep_rx,
        );

        let flush_handle = tokio::spawn(flush_worker.run());
        let sweep_handle = tokio::spawn(sweep_worker.run());

        info!(
            "engine started: {profile_count} profiles, {restored_count} persisted cooldowns"
        );

        let dispatcher = Dispatcher {
            profiles,
            cooldowns,
            confirmations,
            permissions,
            executor,
            economy: self.economy,
            backend: self.backend,
            messenger,
            clock,
            config: self.config,
        };

        Ok(Engine {
            dispatcher,
            profile_repo: self.profile_repo,
            flush_tx,
            sweep_tx,
            flush_handle,
            sweep_handle,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
