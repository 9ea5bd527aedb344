//! In-memory repository implementations for tests and ephemeral hosts.

use std::collections::HashMap;
use std::sync::RwLock;

use interact_core::{ActionProfile, CooldownEntry, EntityId};

use super::{CooldownRepository, ProfileRepository, RepositoryError, Result};

/// In-memory implementation of [`CooldownRepository`].
#[derive(Default)]
pub struct InMemoryCooldownRepository {
    entries: RwLock<Vec<CooldownEntry>>,
}

impl InMemoryCooldownRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<CooldownEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }
}

impl CooldownRepository for InMemoryCooldownRepository {
    fn load(&self) -> Result<Vec<CooldownEntry>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(entries.clone())
    }

    fn save(&self, entries: &[CooldownEntry]) -> Result<()> {
        let mut stored = self
            .entries
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *stored = entries.to_vec();
        Ok(())
    }
}

/// In-memory implementation of [`ProfileRepository`].
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<EntityId, ActionProfile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: HashMap<EntityId, ActionProfile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn load(&self) -> Result<HashMap<EntityId, ActionProfile>> {
        let profiles = self
            .profiles
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(profiles.clone())
    }

    fn save(&self, profiles: &HashMap<EntityId, ActionProfile>) -> Result<()> {
        let mut stored = self
            .profiles
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        *stored = profiles.clone();
        Ok(())
    }
}
