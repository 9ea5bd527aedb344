//! The click-triggered dispatch pipeline.
//!
//! Each interaction runs the same gauntlet: resolve the profile snapshot,
//! check the required permission, reserve the cooldown key, advance the
//! confirmation workflow when priced, withdraw, execute the ordered action
//! sequence, and commit the cooldown. Every early exit releases the
//! reservation so a rejected interaction mutates nothing.

use std::sync::Arc;

use tracing::{debug, warn};

use interact_core::{
    Action, ActionFailure, ActionProfile, ActorId, ClickKind, ConfirmTake, ConfirmationStep,
    ConfirmationWorkflow, CooldownBlock, CooldownTracker, DurationMs, EntityId, Outcome,
    PendingConfirmation, PermissionLedger, PermissionUpdate, ProfileStore, Timestamp,
    expand_template,
};

use crate::config::{ConfirmMode, EngineConfig};
use crate::providers::{
    ActionExecutor, Clock, Economy, ExecError, Messenger, PermissionBackend, WithdrawError,
};

/// Orchestrates the shared trackers and collaborators for each interaction.
pub struct Dispatcher {
    pub(crate) profiles: Arc<ProfileStore>,
    pub(crate) cooldowns: Arc<CooldownTracker>,
    pub(crate) confirmations: Arc<ConfirmationWorkflow>,
    pub(crate) permissions: Arc<PermissionLedger>,
    pub(crate) executor: Arc<dyn ActionExecutor>,
    pub(crate) economy: Option<Arc<dyn Economy>>,
    pub(crate) backend: Option<Arc<dyn PermissionBackend>>,
    pub(crate) messenger: Arc<dyn Messenger>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) config: EngineConfig,
}

impl Dispatcher {
    /// Handles one interaction event.
    ///
    /// `modifier_held` is the platform's confirm modifier state (e.g.
    /// sneaking) for this click; it only matters for priced entities under
    /// [`ConfirmMode::ModifierClick`].
    pub async fn handle_click(
        &self,
        actor: &ActorId,
        entity: EntityId,
        click: ClickKind,
        modifier_held: bool,
    ) -> Outcome {
        let Some(profile) = self.profiles.get(entity) else {
            return Outcome::NoProfile;
        };

        let (category, actions) = profile.resolve(click);
        if actions.is_empty() {
            return Outcome::Empty;
        }
        debug!(%actor, %entity, click = click.as_str(), ?category, "dispatching interaction");

        if let Some(node) = &profile.required_permission
            && !self.is_granted(actor, node).await
        {
            return Outcome::PermissionDenied(node.clone());
        }

        let now = self.clock.now();
        let reserved = !self.bypasses_cooldown(actor).await;
        if reserved && let Err(block) = self.cooldowns.try_begin(actor, entity, now) {
            return Outcome::OnCooldown(self.blocked_remaining(block, &profile));
        }

        // Priced interactions go through the confirmation handshake; without
        // an economy collaborator the price is ignored and the click
        // executes directly.
        if profile.price > 0.0 && self.economy.is_some() {
            let confirming = match self.config.confirm_mode {
                ConfirmMode::ModifierClick => modifier_held,
                ConfirmMode::Command => false,
            };
            let step = self.confirmations.advance(
                actor,
                entity,
                click,
                profile.price,
                self.config.confirm_ttl,
                confirming,
                now,
            );
            match step {
                ConfirmationStep::NotYetConfirmed(pending) => {
                    if reserved {
                        self.cooldowns.release(actor, entity);
                    }
                    self.messenger
                        .prompt_confirmation(actor, entity, pending.price)
                        .await;
                    return Outcome::AwaitingConfirmation {
                        entity,
                        price: pending.price,
                    };
                }
                ConfirmationStep::PendingElsewhere(other) => {
                    if reserved {
                        self.cooldowns.release(actor, entity);
                    }
                    return Outcome::AwaitingOtherConfirmation(other);
                }
                ConfirmationStep::Confirmed(pending) => {
                    return self
                        .finish(actor, entity, &profile, actions, Some(pending.price), reserved)
                        .await;
                }
            }
        }

        self.finish(actor, entity, &profile, actions, None, reserved)
            .await
    }

    /// Handles the explicit confirm signal (e.g. a confirm command).
    pub async fn confirm(&self, actor: &ActorId) -> Outcome {
        let now = self.clock.now();
        let pending = match self.confirmations.take(actor, now) {
            ConfirmTake::Valid(pending) => pending,
            ConfirmTake::Expired => return Outcome::ConfirmationExpired,
            ConfirmTake::NonePending => return Outcome::NothingPending,
        };
        self.resume_confirmed(actor, pending, now).await
    }

    /// Handles the explicit cancel signal.
    pub async fn cancel(&self, actor: &ActorId) -> Outcome {
        match self.confirmations.cancel(actor) {
            Some(pending) => Outcome::Cancelled {
                entity: pending.entity,
            },
            None => Outcome::NothingPending,
        }
    }

    /// Whether the actor holds `node`, per the ledger or the platform
    /// backend.
    pub async fn is_granted(&self, actor: &ActorId, node: &str) -> bool {
        if self.permissions.is_granted(actor, node, self.clock.now()) {
            return true;
        }
        match &self.backend {
            Some(backend) => backend.has(actor, node).await,
            None => false,
        }
    }

    /// Remaining time reported for a refused reservation. A concurrent
    /// in-flight interaction is about to commit the profile's cooldown, so
    /// the losing click reports that duration rather than zero.
    fn blocked_remaining(&self, block: CooldownBlock, profile: &ActionProfile) -> DurationMs {
        match block {
            CooldownBlock::Cooling(remaining) => remaining,
            CooldownBlock::InFlight => profile.cooldown.unwrap_or(self.config.default_cooldown),
        }
    }

    async fn bypasses_cooldown(&self, actor: &ActorId) -> bool {
        match &self.config.bypass_permission {
            Some(node) => self.is_granted(actor, node).await,
            None => false,
        }
    }

    /// Resumes the pipeline from the withdrawal step after a detached
    /// confirm signal.
    async fn resume_confirmed(
        &self,
        actor: &ActorId,
        pending: PendingConfirmation,
        now: Timestamp,
    ) -> Outcome {
        let Some(profile) = self.profiles.get(pending.entity) else {
            return Outcome::NoProfile;
        };
        let (_, actions) = profile.resolve(pending.click);
        if actions.is_empty() {
            return Outcome::Empty;
        }

        // The confirm signal is a second qualifying interaction: it passes
        // the same permission gate as the click that created the entry. A
        // grant may have lapsed while the confirmation was pending.
        if let Some(node) = &profile.required_permission
            && !self.is_granted(actor, node).await
        {
            return Outcome::PermissionDenied(node.clone());
        }

        let reserved = !self.bypasses_cooldown(actor).await;
        if reserved && let Err(block) = self.cooldowns.try_begin(actor, pending.entity, now) {
            return Outcome::OnCooldown(self.blocked_remaining(block, &profile));
        }

        self.finish(
            actor,
            pending.entity,
            &profile,
            actions,
            Some(pending.price),
            reserved,
        )
        .await
    }

    /// Withdrawal, execution, and cooldown commit: the part every confirmed
    /// or unpriced path shares. `reserved` says whether a cooldown
    /// reservation is held and must be committed or released.
    async fn finish(
        &self,
        actor: &ActorId,
        entity: EntityId,
        profile: &ActionProfile,
        actions: &[Action],
        price: Option<f64>,
        reserved: bool,
    ) -> Outcome {
        if let (Some(price), Some(economy)) = (price, &self.economy)
            && let Err(error) = economy.withdraw(actor, price).await
        {
            if reserved {
                self.cooldowns.release(actor, entity);
            }
            match error {
                WithdrawError::InsufficientFunds => {
                    debug!(%actor, %entity, price, "withdrawal declined")
                }
                WithdrawError::Unavailable(reason) => {
                    warn!(%actor, %entity, price, %reason, "economy unavailable")
                }
            }
            return Outcome::InsufficientFunds { price };
        }

        let warnings = self.run_actions(actor, actions).await;

        if reserved {
            let duration = profile.cooldown.unwrap_or(self.config.default_cooldown);
            self.cooldowns
                .commit(actor, entity, duration, self.clock.now());
        }

        Outcome::Executed { warnings }
    }

    /// Runs the ordered sequence best-effort: a failed action is logged and
    /// recorded, and the remaining actions still run.
    async fn run_actions(&self, actor: &ActorId, actions: &[Action]) -> Vec<ActionFailure> {
        let mut warnings = Vec::new();
        for (index, action) in actions.iter().enumerate() {
            if let Err(error) = self.run_action(actor, action).await {
                warn!(
                    %actor,
                    index,
                    kind = action.kind(),
                    %error,
                    "action failed; continuing with remaining sequence"
                );
                warnings.push(ActionFailure {
                    index,
                    kind: action.kind(),
                    reason: error.to_string(),
                });
            }
        }
        warnings
    }

    async fn run_action(&self, actor: &ActorId, action: &Action) -> Result<(), ExecError> {
        match action {
            Action::ConsoleCommand { template } => {
                self.executor
                    .console_command(&expand_template(template, actor))
                    .await
            }
            Action::ActorCommand { template } => {
                self.executor
                    .actor_command(actor, &expand_template(template, actor))
                    .await
            }
            Action::PermissionChange { node, mode } => {
                let update =
                    self.permissions
                        .apply(actor, node.clone(), *mode, None, self.clock.now());
                let Some(backend) = &self.backend else {
                    return Ok(());
                };
                match update {
                    PermissionUpdate::Granted => backend.grant(actor, node).await,
                    PermissionUpdate::Revoked => backend.revoke(actor, node).await,
                }
            }
            Action::ServerSwitch { target } => self.executor.server_switch(actor, target).await,
            Action::ChatMessage { text } => {
                self.executor
                    .chat_message(actor, &expand_template(text, actor))
                    .await
            }
            Action::SoundCue { id } => self.executor.sound_cue(actor, id).await,
        }
    }

    /// Remaining cooldown for a pair, for status surfaces.
    pub fn remaining(&self, actor: &ActorId, entity: EntityId) -> Option<DurationMs> {
        self.cooldowns.remaining(actor, entity, self.clock.now())
    }
}
