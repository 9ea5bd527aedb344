//! Per (actor, entity) cooldown tracking.
//!
//! Reads always compare against the caller's `now`; the periodic sweep only
//! reclaims memory and is never required for correctness. The
//! `try_begin`/`commit`/`release` triple gives each interaction an atomic
//! check-and-set over its key, so two concurrent interactions for the same
//! (actor, entity) pair can never both pass the cooldown gate.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use crate::types::{ActorId, DurationMs, EntityId, Timestamp};

type Key = (ActorId, EntityId);

/// One durable cooldown record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownEntry {
    pub actor: ActorId,
    pub entity: EntityId,
    pub expires_at: Timestamp,
}

/// Why [`CooldownTracker::try_begin`] refused a reservation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownBlock {
    /// The pair is cooling down for this much longer.
    Cooling(DurationMs),
    /// Another interaction for the pair holds the reservation right now.
    InFlight,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<Key, Timestamp>,
    /// Keys reserved by interactions currently executing.
    in_flight: HashSet<Key>,
}

/// Tracks when each actor may trigger each entity again.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    inner: Mutex<Inner>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remaining cooldown for the pair, or `None` when it may trigger.
    pub fn remaining(
        &self,
        actor: &ActorId,
        entity: EntityId,
        now: Timestamp,
    ) -> Option<DurationMs> {
        let inner = self.lock();
        inner
            .entries
            .get(&(actor.clone(), entity))
            .and_then(|&expires_at| expires_at.checked_sub(now))
            .filter(|&remaining| remaining > 0)
    }

    /// Reserves the key for an in-flight interaction.
    ///
    /// Fails when the pair is still cooling down or when another
    /// interaction currently holds the key. Expired entries are dropped on
    /// the way through.
    pub fn try_begin(
        &self,
        actor: &ActorId,
        entity: EntityId,
        now: Timestamp,
    ) -> Result<(), CooldownBlock> {
        let mut inner = self.lock();
        let key = (actor.clone(), entity);
        if let Some(&expires_at) = inner.entries.get(&key) {
            if expires_at > now {
                return Err(CooldownBlock::Cooling(expires_at - now));
            }
            inner.entries.remove(&key);
        }
        if !inner.in_flight.insert(key) {
            return Err(CooldownBlock::InFlight);
        }
        Ok(())
    }

    /// Completes a reserved interaction, writing the new expiry.
    ///
    /// A zero duration releases the reservation without writing an entry.
    pub fn commit(&self, actor: &ActorId, entity: EntityId, duration: DurationMs, now: Timestamp) {
        let mut inner = self.lock();
        let key = (actor.clone(), entity);
        inner.in_flight.remove(&key);
        if duration > 0 {
            inner.entries.insert(key, now + duration);
        }
    }

    /// Releases a reservation without setting a cooldown (aborted interaction).
    pub fn release(&self, actor: &ActorId, entity: EntityId) {
        self.lock().in_flight.remove(&(actor.clone(), entity));
    }

    /// Unconditional write, used by the admin surface and restore paths.
    pub fn set(&self, actor: &ActorId, entity: EntityId, duration: DurationMs, now: Timestamp) {
        self.lock()
            .entries
            .insert((actor.clone(), entity), now + duration);
    }

    /// Removes the entry for the pair. Returns whether one existed.
    pub fn clear(&self, actor: &ActorId, entity: EntityId) -> bool {
        self.lock().entries.remove(&(actor.clone(), entity)).is_some()
    }

    /// Drops all entries expired at `now`; returns how many were removed.
    pub fn sweep(&self, now: Timestamp) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|_, &mut expires_at| expires_at > now);
        before - inner.entries.len()
    }

    /// Snapshot of all live entries, for the persistence flush.
    pub fn entries(&self) -> Vec<CooldownEntry> {
        self.lock()
            .entries
            .iter()
            .map(|((actor, entity), &expires_at)| CooldownEntry {
                actor: actor.clone(),
                entity: *entity,
                expires_at,
            })
            .collect()
    }

    /// Restores persisted entries at startup. Later duplicates win.
    pub fn restore(&self, entries: impl IntoIterator<Item = CooldownEntry>) {
        let mut inner = self.lock();
        for entry in entries {
            inner
                .entries
                .insert((entry.actor, entry.entity), entry.expires_at);
        }
    }
}
