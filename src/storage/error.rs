use rusqlite::ffi;
use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error(
        "database schema version mismatch (found {found}, expected {expected}); please run with --reset option"
    )]
    SchemaMismatch { found: i64, expected: i64 },
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg) => {
                let detail = msg.clone().unwrap_or_else(|| code.to_string());
                match code.code {
                    ffi::ErrorCode::ConstraintViolation
                        if code.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                            || code.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
                    {
                        StorageError::Conflict(detail)
                    }
                    ffi::ErrorCode::DatabaseBusy
                    | ffi::ErrorCode::DatabaseLocked
                    | ffi::ErrorCode::CannotOpen
                    | ffi::ErrorCode::ReadOnly
                    | ffi::ErrorCode::DiskFull
                    | ffi::ErrorCode::SystemIoFailure
                    | ffi::ErrorCode::NotADatabase
                    | ffi::ErrorCode::DatabaseCorrupt => StorageError::Unavailable(detail),
                    _ => StorageError::Sqlite(err),
                }
            }
            rusqlite::Error::FromSqlConversionFailure(col, _, source) => {
                StorageError::Corrupt(format!("column {col}: {source}"))
            }
            _ => StorageError::Sqlite(err),
        }
    }
}
