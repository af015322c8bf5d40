//! Shell-facing session over a vault store.
//!
//! # Responsibility
//! - Hold the "current account" a terminal or windowed shell works on.
//! - Digest credentials before they reach the store, on every path.
//! - Return outcomes a shell can turn into its own messages.
//!
//! # Invariants
//! - Record operations act only on the signed-in account.
//! - Account removal requires re-entering the credential.

use crate::credential::digest;
use crate::model::account::Account;
use crate::model::record::SecretRecord;
use crate::model::ValidationError;
use crate::service::vault_store::{VaultError, VaultStore};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    /// A record or account operation was attempted without signing in.
    NotSignedIn,
    Vault(VaultError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSignedIn => f.write_str("no account is signed in"),
            Self::Vault(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotSignedIn => None,
            Self::Vault(err) => Some(err),
        }
    }
}

impl From<VaultError> for SessionError {
    fn from(value: VaultError) -> Self {
        Self::Vault(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    Registered(Account),
    AlreadyExists,
    ConfirmationMismatch,
    Invalid(ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(SecretRecord),
    /// The signed-in account already has a record with this name.
    NameTaken,
    /// The store refused the record; another account holds the name.
    Rejected,
    Invalid(ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Updated(SecretRecord),
    NotFound,
    /// The store refused the edit, usually a name collision.
    Rejected,
    Invalid(ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    CredentialMismatch,
    NotFound,
}

/// Field replacements for an edit; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordChanges {
    pub name: Option<String>,
    pub login: Option<String>,
    pub secret: Option<String>,
}

/// Current-account state over a borrowed store.
pub struct VaultSession<'store> {
    store: &'store mut VaultStore,
    current: Option<Account>,
}

impl<'store> VaultSession<'store> {
    pub fn new(store: &'store mut VaultStore) -> Self {
        Self {
            store,
            current: None,
        }
    }

    pub fn current_account(&self) -> Option<&Account> {
        self.current.as_ref()
    }

    /// Registers an account; does not sign it in.
    pub fn register(
        &mut self,
        login: &str,
        credential: &str,
        confirmation: &str,
    ) -> SessionResult<RegisterOutcome> {
        if credential != confirmation {
            return Ok(RegisterOutcome::ConfirmationMismatch);
        }

        let account = Account::new(login, digest(credential));
        if let Err(err) = account.validate() {
            return Ok(RegisterOutcome::Invalid(err));
        }

        Ok(match self.store.register(&account)? {
            Some(stored) => RegisterOutcome::Registered(stored),
            None => RegisterOutcome::AlreadyExists,
        })
    }

    /// Signs in; returns `false` for unknown login or wrong credential.
    ///
    /// A failed attempt leaves any previous session signed out.
    pub fn login(&mut self, login: &str, credential: &str) -> SessionResult<bool> {
        self.current = self.store.authenticate(login, &digest(credential))?;
        Ok(self.current.is_some())
    }

    /// Signs out; returns `false` when nobody was signed in.
    pub fn logout(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn list(&self) -> SessionResult<Vec<SecretRecord>> {
        let account = self.signed_in()?;
        Ok(self.store.list_records(account)?)
    }

    pub fn show(&self, name: &str) -> SessionResult<Option<SecretRecord>> {
        let account = self.signed_in()?;
        Ok(self.store.find_record(account, name)?)
    }

    /// Prefix search; an empty prefix lists everything.
    pub fn search(&self, prefix: &str) -> SessionResult<Vec<SecretRecord>> {
        let account = self.signed_in()?;
        Ok(self.store.search_records(account, prefix)?)
    }

    pub fn add(&mut self, name: &str, login: &str, secret: &str) -> SessionResult<AddOutcome> {
        let account = self.signed_in()?.clone();
        let record = SecretRecord::new(name, login, secret);
        if let Err(err) = record.validate() {
            return Ok(AddOutcome::Invalid(err));
        }
        if self.store.find_record(&account, name)?.is_some() {
            return Ok(AddOutcome::NameTaken);
        }

        Ok(match self.store.add_record(&account, &record)? {
            Some(stored) => AddOutcome::Added(stored),
            None => AddOutcome::Rejected,
        })
    }

    pub fn edit(&mut self, name: &str, changes: RecordChanges) -> SessionResult<EditOutcome> {
        let account = self.signed_in()?.clone();
        let Some(old) = self.store.find_record(&account, name)? else {
            return Ok(EditOutcome::NotFound);
        };

        let new = old.revised(
            changes.name.unwrap_or_else(|| old.name.clone()),
            changes.login.unwrap_or_else(|| old.login.clone()),
            changes.secret.unwrap_or_else(|| old.secret.clone()),
        );
        if let Err(err) = new.validate() {
            return Ok(EditOutcome::Invalid(err));
        }

        Ok(if self.store.edit_record(&old, &new)? {
            EditOutcome::Updated(new)
        } else {
            EditOutcome::Rejected
        })
    }

    /// Deletes the named record; returns `false` when the account has none.
    pub fn delete(&mut self, name: &str) -> SessionResult<bool> {
        let account = self.signed_in()?.clone();
        match self.store.find_record(&account, name)? {
            Some(record) => Ok(self.store.delete_record(&record)?),
            None => Ok(false),
        }
    }

    /// Removes the signed-in account after the credential is re-entered.
    ///
    /// Signs the session out on success.
    pub fn remove_account(&mut self, credential: &str) -> SessionResult<RemoveOutcome> {
        let account = self.signed_in()?.clone();
        if account.credential != digest(credential) {
            return Ok(RemoveOutcome::CredentialMismatch);
        }

        if !self.store.remove_account(&account)? {
            return Ok(RemoveOutcome::NotFound);
        }
        self.current = None;
        info!(
            "event=session_remove_account module=session status=ok account_id={}",
            account.id.map_or(-1, |id| id.0)
        );
        Ok(RemoveOutcome::Removed)
    }

    fn signed_in(&self) -> SessionResult<&Account> {
        self.current.as_ref().ok_or(SessionError::NotSignedIn)
    }
}
