//! Identifier and time primitives shared across the engine.
//!
//! Time enters the core as plain [`Timestamp`] values so every tracker can be
//! exercised with a caller-controlled clock. Cooldowns must survive process
//! restarts, which rules out monotonic clocks; all timestamps are wall-clock
//! milliseconds since the Unix epoch.

use std::fmt;

/// Unix timestamp in milliseconds.
pub type Timestamp = u64;

/// Duration in milliseconds.
pub type DurationMs = u64;

/// Capability node string, e.g. `shop.vip`.
pub type PermissionNode = String;

/// Stable identifier of an interactive entity (e.g. an NPC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of the triggering actor (e.g. a player UUID or name).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ActorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
