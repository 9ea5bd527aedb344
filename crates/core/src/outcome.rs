//! Results surfaced by the click dispatcher.

use crate::types::{DurationMs, EntityId, PermissionNode};

/// Failure of one action inside an executed sequence.
///
/// Execution is best-effort: a failed action is recorded and the remaining
/// actions still run, so these surface as warnings on [`Outcome::Executed`]
/// rather than as a hard failure of the interaction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("action #{index} ({kind}) failed: {reason}")]
pub struct ActionFailure {
    /// Position in the ordered sequence.
    pub index: usize,
    /// Tag from [`crate::Action::kind`].
    pub kind: &'static str,
    pub reason: String,
}

/// What a single interaction (or confirm/cancel signal) resolved to.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// No profile is bound to the entity; silent no-op.
    NoProfile,
    /// The resolved action list is empty; silent no-op.
    Empty,
    /// The actor lacks the profile's required permission. Nothing mutated.
    PermissionDenied(PermissionNode),
    /// The pair is still cooling down. Nothing mutated.
    OnCooldown(DurationMs),
    /// A pending confirmation was created or is still outstanding; the
    /// prompt is the only side effect.
    AwaitingConfirmation { entity: EntityId, price: f64 },
    /// The actor must first resolve a pending confirmation for another
    /// entity, or let it expire.
    AwaitingOtherConfirmation(EntityId),
    /// The pending confirmation lapsed before the signal arrived; the entry
    /// is destroyed and the actor must re-trigger.
    ConfirmationExpired,
    /// A confirm or cancel signal arrived with nothing pending.
    NothingPending,
    /// The pending confirmation was cancelled.
    Cancelled { entity: EntityId },
    /// The withdrawal was declined; no actions ran and no cooldown was set.
    InsufficientFunds { price: f64 },
    /// The sequence ran to completion; individual failures, if any, are
    /// carried as warnings.
    Executed { warnings: Vec<ActionFailure> },
}

impl Outcome {
    /// Whether the interaction executed its action sequence.
    pub fn executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }
}
