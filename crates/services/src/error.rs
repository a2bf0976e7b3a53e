//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{Category, ValidationError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::sessions::SessionPhase;

/// Errors emitted by the quiz session and its orchestration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("cannot {action} while {phase:?}")]
    InvalidTransition {
        phase: SessionPhase,
        action: &'static str,
    },
    #[error("unknown category: {0}")]
    UnknownCategory(Category),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
