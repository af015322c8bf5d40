//! Secret record domain model.
//!
//! # Invariants
//! - `name` is non-empty and unique across the whole vault, not per owner.
//! - `id` survives edits; only name/login/secret change in place.

use super::account::AccountId;
use super::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Store-generated record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named login/secret pair owned by exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    pub id: Option<RecordId>,
    pub name: String,
    pub login: String,
    pub secret: String,
    /// Set by the store when the record is attached to an account.
    pub owner_id: Option<AccountId>,
}

impl SecretRecord {
    /// Creates a record that is neither persisted nor owned yet.
    pub fn new(
        name: impl Into<String>,
        login: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            login: login.into(),
            secret: secret.into(),
            owner_id: None,
        }
    }

    /// Returns a copy carrying this record's identity with replaced fields.
    ///
    /// Used to build the `new` side of an edit.
    pub fn revised(
        &self,
        name: impl Into<String>,
        login: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            id: self.id,
            name: name.into(),
            login: login.into(),
            secret: secret.into(),
            owner_id: self.owner_id,
        }
    }

    /// Ordered column values for `(name, login, secret)`.
    pub fn to_params(&self) -> [&str; 3] {
        [self.name.as_str(), self.login.as_str(), self.secret.as_str()]
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyRecordName);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordId, SecretRecord};
    use crate::model::account::AccountId;
    use crate::model::ValidationError;

    #[test]
    fn revised_keeps_identity_and_owner() {
        let mut record = SecretRecord::new("github", "me", "pw");
        record.id = Some(RecordId(4));
        record.owner_id = Some(AccountId(2));

        let edited = record.revised("gitlab", "you", "pw2");
        assert_eq!(edited.id, Some(RecordId(4)));
        assert_eq!(edited.owner_id, Some(AccountId(2)));
        assert_eq!(edited.to_params(), ["gitlab", "you", "pw2"]);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            SecretRecord::new("", "me", "pw").validate(),
            Err(ValidationError::EmptyRecordName)
        );
        assert_eq!(
            SecretRecord::new(" \t", "me", "pw").validate(),
            Err(ValidationError::EmptyRecordName)
        );
    }
}
