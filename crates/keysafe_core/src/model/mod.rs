//! Domain model for accounts and the secret records they own.
//!
//! # Responsibility
//! - Define the value types handed between the vault store and its callers.
//! - Define field-level validation shared by every write path.
//!
//! # Invariants
//! - Identifiers are assigned by the store; `None` means "not persisted yet".
//! - Values are detached copies of stored rows; mutating them changes nothing
//!   until an explicit store call.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account;
pub mod record;

/// Field-level contract violation detected before touching storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Account login is empty or whitespace only.
    EmptyLogin,
    /// Secret record name is empty or whitespace only.
    EmptyRecordName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLogin => f.write_str("account login must not be empty"),
            Self::EmptyRecordName => f.write_str("record name must not be empty"),
        }
    }
}

impl Error for ValidationError {}
