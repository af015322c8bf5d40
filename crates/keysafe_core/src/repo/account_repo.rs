//! Account repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist and look up accounts by login.
//! - Remove an account together with every record it owns.
//!
//! # Invariants
//! - `login` uniqueness is enforced by the `accounts.login` UNIQUE constraint.
//! - `delete_account` removes owned records explicitly before the account row,
//!   so the cascade holds even on connections without `foreign_keys=ON`.
//!   Callers must run it inside one transaction.

use crate::model::account::{Account, AccountId};
use crate::repo::{EntityRef, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ACCOUNT_SELECT_SQL: &str = "SELECT id, login, credential FROM accounts";

/// Repository interface for account operations.
pub trait AccountRepository {
    /// Inserts the account and returns the stored copy with its new id.
    fn create_account(&self, account: &Account) -> RepoResult<Account>;
    /// Deletes the account and its records; returns the number of records removed.
    fn delete_account(&self, id: AccountId) -> RepoResult<usize>;
    fn get_account_by_login(&self, login: &str) -> RepoResult<Option<Account>>;
    /// Exact match on both login and credential.
    fn find_by_credentials(&self, login: &str, credential: &str) -> RepoResult<Option<Account>>;
    fn login_exists(&self, login: &str) -> RepoResult<bool>;
}

/// SQLite-backed account repository.
///
/// Borrowing a `Transaction` works too, since it derefs to `Connection`.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, account: &Account) -> RepoResult<Account> {
        account.validate()?;

        self.conn.execute(
            "INSERT INTO accounts (login, credential) VALUES (?1, ?2);",
            account.to_params(),
        )?;

        Ok(Account {
            id: Some(AccountId(self.conn.last_insert_rowid())),
            login: account.login.clone(),
            credential: account.credential.clone(),
        })
    }

    fn delete_account(&self, id: AccountId) -> RepoResult<usize> {
        let removed_records = self
            .conn
            .execute("DELETE FROM records WHERE owner_id = ?1;", [id.0])?;
        let changed = self
            .conn
            .execute("DELETE FROM accounts WHERE id = ?1;", [id.0])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Account(id)));
        }

        Ok(removed_records)
    }

    fn get_account_by_login(&self, login: &str) -> RepoResult<Option<Account>> {
        let row = self
            .conn
            .query_row(
                &format!("{ACCOUNT_SELECT_SQL} WHERE login = ?1;"),
                [login],
                parse_account_row,
            )
            .optional()?;
        Ok(row)
    }

    fn find_by_credentials(&self, login: &str, credential: &str) -> RepoResult<Option<Account>> {
        let row = self
            .conn
            .query_row(
                &format!("{ACCOUNT_SELECT_SQL} WHERE login = ?1 AND credential = ?2;"),
                params![login, credential],
                parse_account_row,
            )
            .optional()?;
        Ok(row)
    }

    fn login_exists(&self, login: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE login = ?1);",
            [login],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_account_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: Some(AccountId(row.get("id")?)),
        login: row.get("login")?,
        credential: row.get("credential")?,
    })
}
