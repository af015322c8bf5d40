//! Account domain model.
//!
//! # Invariants
//! - `login` is non-empty and unique across the vault (enforced by the store).
//! - `credential` is opaque to the core and compared by exact equality.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-generated account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An authenticated identity owning zero or more secret records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// `None` until the store registers this account.
    pub id: Option<AccountId>,
    /// Case-sensitive unique login.
    pub login: String,
    /// Stored exactly as supplied.
    #[serde(skip_serializing, default)]
    pub credential: String,
}

impl Account {
    /// Creates an unregistered account.
    pub fn new(login: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            id: None,
            login: login.into(),
            credential: credential.into(),
        }
    }

    /// Returns whether the store has assigned an identifier.
    pub fn is_registered(&self) -> bool {
        self.id.is_some()
    }

    /// Ordered column values for `INSERT INTO accounts (login, credential)`.
    pub fn to_params(&self) -> [&str; 2] {
        [self.login.as_str(), self.credential.as_str()]
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.login.trim().is_empty() {
            return Err(ValidationError::EmptyLogin);
        }
        Ok(())
    }
}
