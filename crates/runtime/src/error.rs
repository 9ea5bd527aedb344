//! Error types for engine assembly and lifecycle.

use crate::repository::RepositoryError;

/// Errors surfaced by engine construction, admin operations, and shutdown.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no action executor configured")]
    MissingExecutor,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("worker task panicked: {0}")]
    WorkerJoin(#[from] tokio::task::JoinError),

    #[error("worker command channel closed")]
    CommandChannelClosed,
}

pub type Result<T> = std::result::Result<T, EngineError>;
