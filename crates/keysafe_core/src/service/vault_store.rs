//! Vault store: the single gateway to persisted accounts and records.
//!
//! # Responsibility
//! - Own the SQLite connection for the lifetime of the process.
//! - Expose account and record operations with ownership checks.
//! - Translate business rejections into `bool`/`Option`/empty results.
//!
//! # Invariants
//! - Every mutating operation runs in one `IMMEDIATE` transaction, so the
//!   uniqueness check and the write cannot interleave with another writer.
//! - Only storage malfunctions leave this module as `Err`.
//! - Owner-scoped reads never return another account's records.
//! - Credentials, secrets and record names are never logged.

use crate::db::{open_location, DbError, StoreLocation};
use crate::model::account::{Account, AccountId};
use crate::model::record::{RecordId, SecretRecord};
use crate::repo::account_repo::{AccountRepository, SqliteAccountRepository};
use crate::repo::record_repo::{RecordRepository, SqliteRecordRepository};
use crate::repo::{RepoError, RepoResult};
use log::{debug, error, info};
use rusqlite::{Connection, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type VaultResult<T> = Result<T, VaultError>;

/// Failure that is not a business outcome.
#[derive(Debug)]
pub enum VaultError {
    /// Engine, I/O or schema failure.
    Storage(DbError),
    /// A stored row could not be decoded into the domain model.
    InvalidData(String),
}

impl Display for VaultError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "vault storage failure: {err}"),
            Self::InvalidData(message) => write!(f, "vault data is corrupt: {message}"),
        }
    }
}

impl Error for VaultError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for VaultError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for VaultError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

/// Owned handle over the vault database.
///
/// The connection is released when the store is dropped; `close` does the
/// same but reports a failing close to the caller.
pub struct VaultStore {
    conn: Connection,
    location: StoreLocation,
}

impl VaultStore {
    /// Opens (or creates) the vault and ensures its schema exists.
    ///
    /// Re-opening an existing vault keeps all data.
    pub fn open(location: StoreLocation) -> VaultResult<Self> {
        let conn = open_location(&location)?;
        Ok(Self { conn, location })
    }

    /// Releases the connection.
    pub fn close(self) -> VaultResult<()> {
        let Self { conn, location } = self;
        conn.close().map_err(|(_, err)| {
            error!("event=store_close module=vault status=error location={location} error={err}");
            VaultError::from(err)
        })?;
        info!("event=store_close module=vault status=ok location={location}");
        Ok(())
    }

    /// Registers a new account.
    ///
    /// Returns the stored account with its assigned id, or `None` when the
    /// login is already taken or empty.
    pub fn register(&mut self, account: &Account) -> VaultResult<Option<Account>> {
        self.write("register", |conn| {
            SqliteAccountRepository::new(conn).create_account(account)
        })
    }

    /// Returns the account whose login and credential both match exactly.
    ///
    /// Unknown login and wrong credential yield the same `None`.
    pub fn authenticate(&self, login: &str, credential: &str) -> VaultResult<Option<Account>> {
        let found = self
            .read("authenticate", |conn| {
                SqliteAccountRepository::new(conn).find_by_credentials(login, credential)
            })?
            .flatten();
        match &found {
            Some(account) => info!(
                "event=authenticate module=vault status=ok account_id={}",
                id_field(account.id)
            ),
            None => info!("event=authenticate module=vault status=rejected"),
        }
        Ok(found)
    }

    /// Removes the account and every record it owns in one transaction.
    pub fn remove_account(&mut self, account: &Account) -> VaultResult<bool> {
        let removed = self.write("remove_account", |conn| {
            let id = account_id(account)?;
            let records = SqliteAccountRepository::new(conn).delete_account(id)?;
            debug!("event=remove_account module=vault account_id={id} records_removed={records}");
            Ok(())
        })?;
        Ok(removed.is_some())
    }

    pub fn account_exists(&self, login: &str) -> VaultResult<bool> {
        let exists = self.read("account_exists", |conn| {
            SqliteAccountRepository::new(conn).login_exists(login)
        })?;
        Ok(exists.unwrap_or(false))
    }

    /// Returns whether `account` matches a stored row on login and credential,
    /// and on id too when one is set.
    pub fn validate(&self, account: &Account) -> VaultResult<bool> {
        let stored = self
            .read("validate", |conn| {
                SqliteAccountRepository::new(conn)
                    .find_by_credentials(&account.login, &account.credential)
            })?
            .flatten();
        Ok(match (stored, account.id) {
            (Some(stored), Some(id)) => stored.id == Some(id),
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    pub fn get_account(&self, login: &str) -> VaultResult<Option<Account>> {
        Ok(self
            .read("get_account", |conn| {
                SqliteAccountRepository::new(conn).get_account_by_login(login)
            })?
            .flatten())
    }

    /// Lists the account's records in insertion order.
    pub fn list_records(&self, account: &Account) -> VaultResult<Vec<SecretRecord>> {
        Ok(self
            .read("list_records", |conn| {
                SqliteRecordRepository::new(conn).list_records(account_id(account)?)
            })?
            .unwrap_or_default())
    }

    /// Returns the named record only if `account` owns it.
    pub fn find_record(&self, account: &Account, name: &str) -> VaultResult<Option<SecretRecord>> {
        Ok(self
            .read("find_record", |conn| {
                SqliteRecordRepository::new(conn).find_record(account_id(account)?, name)
            })?
            .flatten())
    }

    /// Looks a record up by identity, regardless of owner.
    pub fn get_record(&self, id: RecordId) -> VaultResult<Option<SecretRecord>> {
        Ok(self
            .read("get_record", |conn| {
                SqliteRecordRepository::new(conn).get_record(id)
            })?
            .flatten())
    }

    /// Returns the account's records whose name starts with `prefix`.
    ///
    /// An empty prefix matches every record of the account.
    pub fn search_records(
        &self,
        account: &Account,
        prefix: &str,
    ) -> VaultResult<Vec<SecretRecord>> {
        Ok(self
            .read("search_records", |conn| {
                SqliteRecordRepository::new(conn).search_records(account_id(account)?, prefix)
            })?
            .unwrap_or_default())
    }

    /// Stores `record` under `account`.
    ///
    /// Returns `None` when the name already exists anywhere in the vault,
    /// the name is empty, or the account is not registered.
    pub fn add_record(
        &mut self,
        account: &Account,
        record: &SecretRecord,
    ) -> VaultResult<Option<SecretRecord>> {
        self.write("add_record", |conn| {
            SqliteRecordRepository::new(conn).create_record(account_id(account)?, record)
        })
    }

    /// Overwrites name/login/secret of the row identified by `old`.
    ///
    /// `new` must carry the same identity as `old` or none at all.
    pub fn edit_record(&mut self, old: &SecretRecord, new: &SecretRecord) -> VaultResult<bool> {
        let edited = self.write("edit_record", |conn| {
            let id = record_id(old)?;
            if let Some(actual) = new.id.filter(|actual| *actual != id) {
                return Err(RepoError::IdentityMismatch {
                    expected: id,
                    actual,
                });
            }
            SqliteRecordRepository::new(conn).update_record(id, new)
        })?;
        Ok(edited.is_some())
    }

    pub fn delete_record(&mut self, record: &SecretRecord) -> VaultResult<bool> {
        let deleted = self.write("delete_record", |conn| {
            SqliteRecordRepository::new(conn).delete_record(record_id(record)?)
        })?;
        Ok(deleted.is_some())
    }

    fn read<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> VaultResult<Option<T>> {
        settle(event, Instant::now(), op(&self.conn))
    }

    fn write<T>(
        &mut self,
        event: &'static str,
        op: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> VaultResult<Option<T>> {
        let started_at = Instant::now();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Dropping the transaction on any error path rolls it back.
        let conn: &Connection = &tx;
        let value = match settle(event, started_at, op(conn))? {
            Some(value) => value,
            None => return Ok(None),
        };
        tx.commit().map_err(|err| {
            error!("event={event} module=vault status=error error_code=commit_failed error={err}");
            VaultError::from(err)
        })?;
        Ok(Some(value))
    }
}

/// Maps a repository outcome onto the store contract.
fn settle<T>(
    event: &'static str,
    started_at: Instant,
    result: RepoResult<T>,
) -> VaultResult<Option<T>> {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(value) => {
            debug!("event={event} module=vault status=ok duration_ms={duration_ms}");
            Ok(Some(value))
        }
        Err(RepoError::Db(err)) => {
            error!(
                "event={event} module=vault status=error duration_ms={duration_ms} error_code=storage error={err}"
            );
            Err(VaultError::Storage(err))
        }
        Err(RepoError::InvalidData(message)) => {
            error!(
                "event={event} module=vault status=error duration_ms={duration_ms} error_code=invalid_data"
            );
            Err(VaultError::InvalidData(message))
        }
        Err(rejection) => {
            info!(
                "event={event} module=vault status=rejected duration_ms={duration_ms} reason={}",
                rejection.code()
            );
            Ok(None)
        }
    }
}

fn account_id(account: &Account) -> RepoResult<AccountId> {
    account.id.ok_or(RepoError::Unsaved("account"))
}

fn record_id(record: &SecretRecord) -> RepoResult<RecordId> {
    record.id.ok_or(RepoError::Unsaved("record"))
}

fn id_field(id: Option<AccountId>) -> String {
    id.map_or_else(|| "none".to_string(), |id| id.to_string())
}
