use thiserror::Error;

use crate::storage::StorageError;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(msg) => LedgerError::Conflict(msg),
            StorageError::Unavailable(msg) => LedgerError::StorageUnavailable(msg),
            other => LedgerError::Internal(other.to_string()),
        }
    }
}
