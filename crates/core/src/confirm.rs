//! The price-confirmation handshake.
//!
//! States: none → pending → {confirmed, expired, cancelled} → none. An actor
//! has at most one live pending entry system-wide; a priced interaction with
//! a different entity is rejected until the earlier one resolves or lapses.
//! Expiry is checked against the caller's `now` on every transition, so the
//! periodic sweep is memory hygiene only.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::action::ClickKind;
use crate::types::{ActorId, DurationMs, EntityId, Timestamp};

/// A live confirmation awaiting the actor's qualifying signal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingConfirmation {
    pub entity: EntityId,
    /// Click kind that created the entry, replayed by an explicit confirm.
    pub click: ClickKind,
    /// Price quoted to the actor; this is the amount withdrawn on confirm,
    /// even if the profile is re-priced in between.
    pub price: f64,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Result of advancing the workflow for a priced interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmationStep {
    /// A pending entry now exists (fresh, or still outstanding after a
    /// non-qualifying repeat); the actor should be prompted.
    NotYetConfirmed(PendingConfirmation),
    /// The qualifying signal arrived in time; the entry is destroyed and the
    /// dispatcher proceeds to withdrawal.
    Confirmed(PendingConfirmation),
    /// The actor already has a pending confirmation for another entity.
    PendingElsewhere(EntityId),
}

/// Result of an explicit confirm signal arriving on its own.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfirmTake {
    /// A live entry existed; it is destroyed and returned for execution.
    Valid(PendingConfirmation),
    /// The entry had lapsed; it is destroyed and the actor must re-trigger.
    Expired,
    /// Nothing was pending for this actor.
    NonePending,
}

/// State machine gating priced interactions behind an explicit confirm step.
#[derive(Debug, Default)]
pub struct ConfirmationWorkflow {
    pending: Mutex<HashMap<ActorId, PendingConfirmation>>,
}

impl ConfirmationWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ActorId, PendingConfirmation>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Advances the workflow for a priced interaction.
    ///
    /// `confirming` is whether this interaction carries the qualifying
    /// confirm signal. A lapsed entry discovered here is destroyed and the
    /// interaction is treated as a fresh creation, never an automatic
    /// confirmation.
    pub fn advance(
        &self,
        actor: &ActorId,
        entity: EntityId,
        click: ClickKind,
        price: f64,
        ttl: DurationMs,
        confirming: bool,
        now: Timestamp,
    ) -> ConfirmationStep {
        let mut pending = self.lock();

        match pending.get(actor).cloned() {
            Some(existing) if existing.expires_at >= now => {
                if existing.entity != entity {
                    return ConfirmationStep::PendingElsewhere(existing.entity);
                }
                if confirming {
                    pending.remove(actor);
                    return ConfirmationStep::Confirmed(existing);
                }
                // Non-qualifying repeat: keep the original deadline.
                return ConfirmationStep::NotYetConfirmed(existing);
            }
            Some(_) => {
                pending.remove(actor);
            }
            None => {}
        }

        let fresh = PendingConfirmation {
            entity,
            click,
            price,
            created_at: now,
            expires_at: now + ttl,
        };
        pending.insert(actor.clone(), fresh.clone());
        ConfirmationStep::NotYetConfirmed(fresh)
    }

    /// Consumes the actor's pending entry for an explicit confirm signal.
    pub fn take(&self, actor: &ActorId, now: Timestamp) -> ConfirmTake {
        let mut pending = self.lock();
        match pending.remove(actor) {
            Some(entry) if entry.expires_at >= now => ConfirmTake::Valid(entry),
            Some(_) => ConfirmTake::Expired,
            None => ConfirmTake::NonePending,
        }
    }

    /// Destroys the actor's pending entry on an explicit cancel signal.
    pub fn cancel(&self, actor: &ActorId) -> Option<PendingConfirmation> {
        self.lock().remove(actor)
    }

    /// Read-only view of the actor's live entry, if any.
    pub fn pending(&self, actor: &ActorId, now: Timestamp) -> Option<PendingConfirmation> {
        self.lock()
            .get(actor)
            .filter(|entry| entry.expires_at >= now)
            .cloned()
    }

    /// Drops all entries expired at `now`; returns how many were removed.
    pub fn sweep(&self, now: Timestamp) -> usize {
        let mut pending = self.lock();
        let before = pending.len();
        pending.retain(|_, entry| entry.expires_at >= now);
        before - pending.len()
    }
}
