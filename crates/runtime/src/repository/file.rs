//! File-based repository implementations.
//!
//! # File Formats
//!
//! Both stores are pretty-printed JSON so operators can inspect and hand-fix
//! them:
//!
//! - cooldowns: an array of `{actor, entity, expires_at}` records
//! - profiles: an array of `{entity, profile}` records
//!
//! Writes go to a `.tmp` sibling followed by an atomic rename, mirroring the
//! crash-safety discipline of the checkpoint store this is modeled on.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use interact_core::{ActionProfile, CooldownEntry, EntityId};

use super::{CooldownRepository, ProfileRepository, RepositoryError, Result};

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    let json =
        serde_json::to_string_pretty(value).map_err(|e| RepositoryError::Json(e.to_string()))?;
    fs::write(&temp_path, json).map_err(RepositoryError::Io)?;

    // Atomic rename
    fs::rename(&temp_path, path).map_err(RepositoryError::Io)?;

    tracing::debug!("Saved {}", path.display());
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path).map_err(RepositoryError::Io)?;
    let value = serde_json::from_str(&json).map_err(|e| RepositoryError::Json(e.to_string()))?;
    Ok(Some(value))
}

/// File-based implementation of [`CooldownRepository`].
pub struct FileCooldownRepository {
    path: PathBuf,
}

impl FileCooldownRepository {
    /// Creates the repository, ensuring the parent directory exists.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }
        Ok(Self { path })
    }
}

impl CooldownRepository for FileCooldownRepository {
    fn load(&self) -> Result<Vec<CooldownEntry>> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    fn save(&self, entries: &[CooldownEntry]) -> Result<()> {
        write_atomic(&self.path, &entries)
    }
}

#[derive(Serialize, Deserialize)]
struct ProfileRecord {
    entity: EntityId,
    profile: ActionProfile,
}

/// File-based implementation of [`ProfileRepository`].
pub struct FileProfileRepository {
    path: PathBuf,
}

impl FileProfileRepository {
    /// Creates the repository, ensuring the parent directory exists.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(RepositoryError::Io)?;
        }
        Ok(Self { path })
    }
}

impl ProfileRepository for FileProfileRepository {
    fn load(&self) -> Result<HashMap<EntityId, ActionProfile>> {
        let records: Vec<ProfileRecord> = read_json(&self.path)?.unwrap_or_default();
        Ok(records
            .into_iter()
            .map(|record| (record.entity, record.profile))
            .collect())
    }

    fn save(&self, profiles: &HashMap<EntityId, ActionProfile>) -> Result<()> {
        let mut records: Vec<ProfileRecord> = profiles
            .iter()
            .map(|(&entity, profile)| ProfileRecord {
                entity,
                profile: profile.clone(),
            })
            .collect();
        // Stable on-disk order keeps diffs readable.
        records.sort_by_key(|record| record.entity);
        write_atomic(&self.path, &records)
    }
}
