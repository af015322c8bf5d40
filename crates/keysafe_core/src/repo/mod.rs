//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for accounts and secret records.
//! - Isolate SQLite query details from the vault store.
//! - Tell business rejections (constraint, missing row, validation) apart
//!   from storage malfunctions.
//!
//! # Invariants
//! - Write paths call `validate()` on the model before SQL mutations.
//! - Repositories never open transactions; the caller scopes them.

use crate::db::DbError;
use crate::model::account::AccountId;
use crate::model::record::RecordId;
use crate::model::ValidationError;
use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_repo;
pub mod record_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Identity of a row a repository call expected to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityRef {
    Account(AccountId),
    Record(RecordId),
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Account(id) => write!(f, "account {id}"),
            Self::Record(id) => write!(f, "record {id}"),
        }
    }
}

#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    /// Unique, foreign-key or not-null constraint rejected the write.
    Constraint(String),
    NotFound(EntityRef),
    /// Entity was never persisted, so it has no identifier to act on.
    Unsaved(&'static str),
    /// `new` side of an edit carries a different identity than `old`.
    IdentityMismatch {
        expected: RecordId,
        actual: RecordId,
    },
    Db(DbError),
    InvalidData(String),
}

impl RepoError {
    /// Short stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Constraint(_) => "constraint",
            Self::NotFound(_) => "not_found",
            Self::Unsaved(_) => "unsaved",
            Self::IdentityMismatch { .. } => "identity_mismatch",
            Self::Db(_) => "db",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Constraint(message) => write!(f, "constraint violation: {message}"),
            Self::NotFound(target) => write!(f, "{target} not found"),
            Self::Unsaved(kind) => write!(f, "{kind} has no store identifier"),
            Self::IdentityMismatch { expected, actual } => {
                write!(f, "edit targets record {expected} but carries record {actual}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                Self::Constraint(message.unwrap_or_else(|| failure.to_string()))
            }
            other => Self::Db(DbError::Sqlite(other)),
        }
    }
}
