use rusqlite::ffi;
use thiserror::Error;

use crate::models::EntityKind;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("unique constraint violated on {field}")]
    UniqueConstraintViolation { field: String },

    #[error("{parent} {id} does not exist")]
    ForeignKeyViolation { parent: EntityKind, id: i64 },

    #[error("invalid site type '{value}' (expected AUTO, RENT, BUY or FREE)")]
    InvalidEnum { value: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i64 },

    #[error("database is busy: {0}")]
    LockContention(String),

    #[error("required field is empty: {field}")]
    EmptyField { field: &'static str },

    #[error("storage error: {0}")]
    Storage(rusqlite::Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, ref message) = err {
            let detail = message.clone().unwrap_or_else(|| code.to_string());
            match code.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return AppError::UniqueConstraintViolation {
                        field: constraint_field(&detail),
                    };
                }
                ffi::SQLITE_CONSTRAINT_CHECK => {
                    return AppError::InvalidEnum {
                        value: constraint_field(&detail),
                    };
                }
                _ => {}
            }
            if matches!(
                code.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ) {
                return AppError::LockContention(detail);
            }
        }
        AppError::Storage(err)
    }
}

/// Extracts the offending column from an engine message such as
/// "UNIQUE constraint failed: channels.url".
fn constraint_field(message: &str) -> String {
    message.rsplit(": ").next().unwrap_or(message).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_field_extracts_column() {
        assert_eq!(
            constraint_field("UNIQUE constraint failed: channels.url"),
            "channels.url"
        );
        assert_eq!(constraint_field("no colon here"), "no colon here");
    }

    #[test]
    fn busy_maps_to_lock_contention() {
        let err = rusqlite::Error::SqliteFailure(
            ffi::Error {
                code: rusqlite::ErrorCode::DatabaseBusy,
                extended_code: ffi::SQLITE_BUSY,
            },
            Some("database is locked".into()),
        );
        assert!(matches!(AppError::from(err), AppError::LockContention(_)));
    }
}
