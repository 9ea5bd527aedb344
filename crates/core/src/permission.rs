//! Time-bound permission grant ledger.
//!
//! `is_granted` revalidates every lookup against the caller's `now` rather
//! than trusting the sweep cadence; an expired grant is indistinguishable
//! from an absent one.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::action::PermissionMode;
use crate::types::{ActorId, DurationMs, PermissionNode, Timestamp};

/// One grant held by an actor. `expires_at = None` is permanent until
/// explicitly revoked.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PermissionGrant {
    pub node: PermissionNode,
    pub expires_at: Option<Timestamp>,
}

/// Direction a [`PermissionMode`] application resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermissionUpdate {
    Granted,
    Revoked,
}

/// Grant/revoke/toggle ledger over (actor, node) pairs.
#[derive(Debug, Default)]
pub struct PermissionLedger {
    grants: Mutex<HashMap<ActorId, HashMap<PermissionNode, Option<Timestamp>>>>,
}

impl PermissionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<ActorId, HashMap<PermissionNode, Option<Timestamp>>>>
    {
        self.grants.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Grants `node`, optionally expiring `ttl` after `now`. Re-granting
    /// overwrites any previous deadline.
    pub fn grant(
        &self,
        actor: &ActorId,
        node: impl Into<PermissionNode>,
        ttl: Option<DurationMs>,
        now: Timestamp,
    ) {
        self.lock()
            .entry(actor.clone())
            .or_default()
            .insert(node.into(), ttl.map(|ttl| now + ttl));
    }

    /// Removes the grant. Returns whether one existed (expired or not).
    pub fn revoke(&self, actor: &ActorId, node: &str) -> bool {
        let mut grants = self.lock();
        let Some(nodes) = grants.get_mut(actor) else {
            return false;
        };
        let removed = nodes.remove(node).is_some();
        if nodes.is_empty() {
            grants.remove(actor);
        }
        removed
    }

    /// Whether the actor currently holds the node.
    pub fn is_granted(&self, actor: &ActorId, node: &str, now: Timestamp) -> bool {
        self.lock()
            .get(actor)
            .and_then(|nodes| nodes.get(node))
            .is_some_and(|expires_at| match expires_at {
                Some(expires_at) => *expires_at > now,
                None => true,
            })
    }

    /// Applies a mode: grant and revoke are unconditional, toggle flips the
    /// current (revalidated) state. Returns the direction taken.
    pub fn apply(
        &self,
        actor: &ActorId,
        node: impl Into<PermissionNode>,
        mode: PermissionMode,
        ttl: Option<DurationMs>,
        now: Timestamp,
    ) -> PermissionUpdate {
        let node = node.into();
        match mode {
            PermissionMode::Grant => {
                self.grant(actor, node, ttl, now);
                PermissionUpdate::Granted
            }
            PermissionMode::Revoke => {
                self.revoke(actor, &node);
                PermissionUpdate::Revoked
            }
            PermissionMode::Toggle => {
                if self.is_granted(actor, &node, now) {
                    self.revoke(actor, &node);
                    PermissionUpdate::Revoked
                } else {
                    self.grant(actor, node, ttl, now);
                    PermissionUpdate::Granted
                }
            }
        }
    }

    /// All of an actor's live grants at `now`.
    pub fn grants(&self, actor: &ActorId, now: Timestamp) -> Vec<PermissionGrant> {
        self.lock()
            .get(actor)
            .map(|nodes| {
                nodes
                    .iter()
                    .filter(|(_, expires_at)| match expires_at {
                        Some(expires_at) => *expires_at > now,
                        None => true,
                    })
                    .map(|(node, expires_at)| PermissionGrant {
                        node: node.clone(),
                        expires_at: *expires_at,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drops all grants expired at `now`; returns how many were removed.
    pub fn sweep(&self, now: Timestamp) -> usize {
        let mut grants = self.lock();
        let mut removed = 0;
        grants.retain(|_, nodes| {
            nodes.retain(|_, expires_at| {
                let live = match expires_at {
                    Some(expires_at) => *expires_at > now,
                    None => true,
                };
                if !live {
                    removed += 1;
                }
                live
            });
            !nodes.is_empty()
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> ActorId {
        ActorId::new("uuid-1")
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let ledger = PermissionLedger::new();
        let before = ledger.is_granted(&actor(), "shop.vip", 0);

        ledger.apply(&actor(), "shop.vip", PermissionMode::Toggle, None, 0);
        ledger.apply(&actor(), "shop.vip", PermissionMode::Toggle, None, 0);

        assert_eq!(ledger.is_granted(&actor(), "shop.vip", 0), before);
    }

    #[test]
    fn toggle_reports_direction() {
        let ledger = PermissionLedger::new();
        assert_eq!(
            ledger.apply(&actor(), "fly", PermissionMode::Toggle, None, 0),
            PermissionUpdate::Granted
        );
        assert_eq!(
            ledger.apply(&actor(), "fly", PermissionMode::Toggle, None, 0),
            PermissionUpdate::Revoked
        );
    }

    #[test]
    fn timed_grant_lapses_without_sweep() {
        let ledger = PermissionLedger::new();
        ledger.grant(&actor(), "event.reward", Some(10_000), 0);

        assert!(ledger.is_granted(&actor(), "event.reward", 9_999));
        assert!(!ledger.is_granted(&actor(), "event.reward", 10_000));
    }

    #[test]
    fn permanent_grant_survives_sweep() {
        let ledger = PermissionLedger::new();
        ledger.grant(&actor(), "keep.me", None, 0);
        ledger.grant(&actor(), "drop.me", Some(5_000), 0);

        assert_eq!(ledger.sweep(60_000), 1);
        assert!(ledger.is_granted(&actor(), "keep.me", 60_000));
        assert!(!ledger.is_granted(&actor(), "drop.me", 60_000));
    }

    #[test]
    fn grants_lists_only_live_entries() {
        let ledger = PermissionLedger::new();
        ledger.grant(&actor(), "forever", None, 0);
        ledger.grant(&actor(), "brief", Some(5_000), 0);

        let mut live: Vec<_> = ledger
            .grants(&actor(), 10_000)
            .into_iter()
            .map(|grant| grant.node)
            .collect();
        live.sort();
        assert_eq!(live, vec!["forever".to_owned()]);

        let before_expiry = ledger.grants(&actor(), 4_000);
        assert_eq!(before_expiry.len(), 2);
    }

    #[test]
    fn revoke_removes_regardless_of_deadline() {
        let ledger = PermissionLedger::new();
        ledger.grant(&actor(), "tmp", Some(100_000), 0);

        assert!(ledger.revoke(&actor(), "tmp"));
        assert!(!ledger.revoke(&actor(), "tmp"));
        assert!(!ledger.is_granted(&actor(), "tmp", 0));
        assert!(ledger.grants(&actor(), 0).is_empty());
    }
}
