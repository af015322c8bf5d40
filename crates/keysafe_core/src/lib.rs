//! Core domain logic for KeySafe, a personal credential vault.
//! This crate is the single source of truth for account and record invariants.

pub mod credential;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::StoreLocation;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{Account, AccountId};
pub use model::record::{RecordId, SecretRecord};
pub use model::ValidationError;
pub use service::session::{
    AddOutcome, EditOutcome, RecordChanges, RegisterOutcome, RemoveOutcome, SessionError,
    SessionResult, VaultSession,
};
pub use service::vault_store::{VaultError, VaultResult, VaultStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
