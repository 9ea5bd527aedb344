//! Runtime orchestration for the interaction execution engine.
//!
//! This crate wires the `interact-core` trackers together with the host's
//! collaborators (economy, command executor, permission primitive, prompt
//! delivery) and the background flush/sweep tasks into a cohesive engine.
//! Hosts embed [`Engine`]: a thin event-listener adapter forwards clicks to
//! [`Engine::handle_click`], admin surfaces drive the profile passthroughs,
//! and status commands read `remaining`/`is_granted`.
//!
//! Modules are organized by responsibility:
//! - [`dispatcher`] hosts the click pipeline
//! - [`engine`] assembles stores, workers, and collaborators
//! - [`providers`] defines the collaborator seams hosts implement
//! - [`repository`] persists cooldowns and profiles across restarts
//! - `workers` keeps the background tasks internal to the crate
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod providers;
pub mod repository;

mod workers;

pub use config::{ConfirmMode, EngineConfig};
pub use dispatcher::Dispatcher;
pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, Result};
pub use providers::{
    ActionExecutor, Clock, Economy, ExecError, Messenger, NoopMessenger, PermissionBackend,
    SystemClock, WithdrawError,
};
pub use repository::{
    CooldownRepository, FileCooldownRepository, FileProfileRepository, InMemoryCooldownRepository,
    InMemoryProfileRepository, ProfileRepository, RepositoryError,
};
pub use workers::SweepReport;
