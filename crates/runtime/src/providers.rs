//! Collaborator seams consumed by the dispatcher.
//!
//! Host adapters plug in implementations for the economy, the platform
//! command executor, the underlying permission primitive, and prompt
//! delivery. The engine consumes these; it never implements them.

use async_trait::async_trait;

use interact_core::{ActorId, EntityId, Timestamp};

/// A platform-side action failed to execute.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ExecError(pub String);

impl ExecError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Why a withdrawal did not complete.
#[derive(Debug, thiserror::Error)]
pub enum WithdrawError {
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("economy unavailable: {0}")]
    Unavailable(String),
}

/// Economy collaborator. Withdrawal is a blocking external call on the
/// dispatch path with no retry policy: a single failure aborts the
/// interaction.
#[async_trait]
pub trait Economy: Send + Sync {
    async fn withdraw(&self, actor: &ActorId, amount: f64) -> Result<(), WithdrawError>;
}

/// Executes platform-side actions on behalf of the engine.
///
/// Command templates arrive with placeholders already expanded.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn console_command(&self, command: &str) -> Result<(), ExecError>;
    async fn actor_command(&self, actor: &ActorId, command: &str) -> Result<(), ExecError>;
    async fn server_switch(&self, actor: &ActorId, target: &str) -> Result<(), ExecError>;
    async fn chat_message(&self, actor: &ActorId, text: &str) -> Result<(), ExecError>;
    async fn sound_cue(&self, actor: &ActorId, id: &str) -> Result<(), ExecError>;
}

/// Host-platform permission primitive underlying the engine's ledger.
///
/// The ledger remains authoritative for time-bound grants; the backend is
/// told about every applied change so the platform view stays in step.
#[async_trait]
pub trait PermissionBackend: Send + Sync {
    async fn grant(&self, actor: &ActorId, node: &str) -> Result<(), ExecError>;
    async fn revoke(&self, actor: &ActorId, node: &str) -> Result<(), ExecError>;
    async fn has(&self, actor: &ActorId, node: &str) -> bool;
}

/// Delivers confirmation prompts to actors.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// The actor triggered a priced entity and must confirm the charge.
    async fn prompt_confirmation(&self, actor: &ActorId, entity: EntityId, price: f64);
}

/// Messenger that drops every prompt. Useful for tests and headless hosts.
pub struct NoopMessenger;

#[async_trait]
impl Messenger for NoopMessenger {
    async fn prompt_confirmation(&self, _actor: &ActorId, _entity: EntityId, _price: f64) {}
}

/// Source of wall-clock time; swapped out by tests.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0)
    }
}
