//! Persistence contracts for the engine's durable state.
//!
//! Two records survive restarts: cooldown entries keyed by (actor, entity)
//! and the full action-profile snapshot. File formats are operator-editable
//! JSON; implementations must write atomically so a crash mid-flush never
//! leaves a torn file.

mod error;
mod file;
mod memory;

use std::collections::HashMap;

use interact_core::{ActionProfile, CooldownEntry, EntityId};

pub use error::{RepositoryError, Result};
pub use file::{FileCooldownRepository, FileProfileRepository};
pub use memory::{InMemoryCooldownRepository, InMemoryProfileRepository};

/// Durable store for cooldown records.
///
/// Loaded once at engine start and rewritten wholesale by the flush worker;
/// in-memory reads never go through this.
pub trait CooldownRepository: Send + Sync {
    fn load(&self) -> Result<Vec<CooldownEntry>>;
    fn save(&self, entries: &[CooldownEntry]) -> Result<()>;
}

/// Durable store for the full profile snapshot.
///
/// A failed `load` must leave the caller's previous snapshot untouched;
/// reloads are rejected wholesale, never partially applied.
pub trait ProfileRepository: Send + Sync {
    fn load(&self) -> Result<HashMap<EntityId, ActionProfile>>;
    fn save(&self, profiles: &HashMap<EntityId, ActionProfile>) -> Result<()>;
}
