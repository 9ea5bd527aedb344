//! Canonical data model and state trackers for the interaction engine.
//!
//! `interact-core` defines the per-entity action configuration and the three
//! concurrent trackers the dispatcher consults on every click: cooldowns,
//! pending price confirmations, and permission grants. The crate performs no
//! I/O and never reads a clock; every time-dependent operation takes an
//! explicit `now` so callers (and tests) control time. Orchestration,
//! persistence, and collaborator seams live in `interact-runtime`.
pub mod action;
pub mod confirm;
pub mod cooldown;
pub mod display;
pub mod outcome;
pub mod permission;
pub mod profile;
pub mod types;

pub use action::{Action, ActionCategory, ClickKind, PermissionMode, expand_template};
pub use confirm::{ConfirmTake, ConfirmationStep, ConfirmationWorkflow, PendingConfirmation};
pub use cooldown::{CooldownBlock, CooldownEntry, CooldownTracker};
pub use display::{DisplayFormat, format_remaining};
pub use outcome::{ActionFailure, Outcome};
pub use permission::{PermissionGrant, PermissionLedger, PermissionUpdate};
pub use profile::{ActionProfile, ClickActions, ProfileSnapshot, ProfileStore};
pub use types::{ActorId, DurationMs, EntityId, PermissionNode, Timestamp};
