//! Secret record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and owner-scoped lookup over `records`.
//! - Keep prefix search semantics inside the persistence boundary.
//!
//! # Invariants
//! - Owner-scoped reads always filter on `owner_id`.
//! - `name` uniqueness is global and enforced by the UNIQUE constraint.
//! - Prefix search is a plain `LIKE ?prefix || '%'`; wildcard characters in
//!   the prefix are not escaped.

use crate::model::account::AccountId;
use crate::model::record::{RecordId, SecretRecord};
use crate::repo::{EntityRef, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const RECORD_SELECT_SQL: &str = "SELECT id, name, login, secret, owner_id FROM records";

/// Repository interface for secret record operations.
pub trait RecordRepository {
    /// Inserts the record under `owner` and returns the stored copy.
    fn create_record(&self, owner: AccountId, record: &SecretRecord) -> RepoResult<SecretRecord>;
    /// Overwrites name/login/secret of the row identified by `id`.
    fn update_record(&self, id: RecordId, record: &SecretRecord) -> RepoResult<()>;
    fn delete_record(&self, id: RecordId) -> RepoResult<()>;
    fn get_record(&self, id: RecordId) -> RepoResult<Option<SecretRecord>>;
    /// Exact name match restricted to `owner`.
    fn find_record(&self, owner: AccountId, name: &str) -> RepoResult<Option<SecretRecord>>;
    fn list_records(&self, owner: AccountId) -> RepoResult<Vec<SecretRecord>>;
    fn search_records(&self, owner: AccountId, prefix: &str) -> RepoResult<Vec<SecretRecord>>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_records(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<SecretRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn create_record(&self, owner: AccountId, record: &SecretRecord) -> RepoResult<SecretRecord> {
        record.validate()?;

        let [name, login, secret] = record.to_params();
        self.conn.execute(
            "INSERT INTO records (name, login, secret, owner_id) VALUES (?1, ?2, ?3, ?4);",
            params![name, login, secret, owner.0],
        )?;

        Ok(SecretRecord {
            id: Some(RecordId(self.conn.last_insert_rowid())),
            owner_id: Some(owner),
            ..record.clone()
        })
    }

    fn update_record(&self, id: RecordId, record: &SecretRecord) -> RepoResult<()> {
        record.validate()?;

        let [name, login, secret] = record.to_params();
        let changed = self.conn.execute(
            "UPDATE records SET name = ?1, login = ?2, secret = ?3 WHERE id = ?4;",
            params![name, login, secret, id.0],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Record(id)));
        }

        Ok(())
    }

    fn delete_record(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM records WHERE id = ?1;", [id.0])?;

        if changed == 0 {
            return Err(RepoError::NotFound(EntityRef::Record(id)));
        }

        Ok(())
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<SecretRecord>> {
        self.conn
            .query_row(
                &format!("{RECORD_SELECT_SQL} WHERE id = ?1;"),
                [id.0],
                |row| Ok(parse_record_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn find_record(&self, owner: AccountId, name: &str) -> RepoResult<Option<SecretRecord>> {
        self.conn
            .query_row(
                &format!("{RECORD_SELECT_SQL} WHERE name = ?1 AND owner_id = ?2;"),
                params![name, owner.0],
                |row| Ok(parse_record_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_records(&self, owner: AccountId) -> RepoResult<Vec<SecretRecord>> {
        self.query_records(
            &format!("{RECORD_SELECT_SQL} WHERE owner_id = ?1 ORDER BY id ASC;"),
            [owner.0],
        )
    }

    fn search_records(&self, owner: AccountId, prefix: &str) -> RepoResult<Vec<SecretRecord>> {
        self.query_records(
            &format!(
                "{RECORD_SELECT_SQL} WHERE owner_id = ?1 AND name LIKE ?2 || '%' ORDER BY id ASC;"
            ),
            params![owner.0, prefix],
        )
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<SecretRecord> {
    let id: i64 = row.get("id")?;
    let name: String = row.get("name")?;
    if name.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty name in records.name for id {id}"
        )));
    }

    Ok(SecretRecord {
        id: Some(RecordId(id)),
        name,
        login: row.get("login")?,
        // Nullable column; absent secret reads as empty.
        secret: row.get::<_, Option<String>>("secret")?.unwrap_or_default(),
        owner_id: Some(AccountId(row.get("owner_id")?)),
    })
}

#[cfg(test)]
mod tests {
    use super::{RecordRepository, SqliteRecordRepository};
    use crate::db::open_db_in_memory;
    use crate::model::account::{Account, AccountId};
    use crate::model::record::{RecordId, SecretRecord};
    use crate::repo::account_repo::{AccountRepository, SqliteAccountRepository};
    use crate::repo::{EntityRef, RepoError};
    use rusqlite::Connection;

    fn seed_owner(conn: &Connection, login: &str) -> AccountId {
        SqliteAccountRepository::new(conn)
            .create_account(&Account::new(login, "pw"))
            .unwrap()
            .id
            .unwrap()
    }

    #[test]
    fn create_and_get_roundtrip() {
        let conn = open_db_in_memory().unwrap();
        let owner = seed_owner(&conn, "alice");
        let repo = SqliteRecordRepository::new(&conn);

        let stored = repo
            .create_record(owner, &SecretRecord::new("github", "me", "pw"))
            .unwrap();
        assert_eq!(stored.owner_id, Some(owner));

        let loaded = repo.get_record(stored.id.unwrap()).unwrap().unwrap();
        assert_eq!(loaded, stored);
    }

    #[test]
    fn unknown_owner_is_a_constraint_rejection() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteRecordRepository::new(&conn);

        let err = repo
            .create_record(AccountId(99), &SecretRecord::new("github", "me", "pw"))
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(ref msg) if msg.contains("FOREIGN KEY")));
    }

    #[test]
    fn null_secret_reads_as_empty() {
        let conn = open_db_in_memory().unwrap();
        let owner = seed_owner(&conn, "alice");
        conn.execute(
            "INSERT INTO records (name, login, secret, owner_id) VALUES ('bare', 'u', NULL, ?1);",
            [owner.0],
        )
        .unwrap();

        let repo = SqliteRecordRepository::new(&conn);
        let record = repo.find_record(owner, "bare").unwrap().unwrap();
        assert_eq!(record.secret, "");
    }

    #[test]
    fn update_and_delete_missing_rows_report_not_found() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteRecordRepository::new(&conn);

        let update = repo
            .update_record(RecordId(5), &SecretRecord::new("x", "y", "z"))
            .unwrap_err();
        assert!(matches!(
            update,
            RepoError::NotFound(EntityRef::Record(RecordId(5)))
        ));

        let delete = repo.delete_record(RecordId(5)).unwrap_err();
        assert!(matches!(delete, RepoError::NotFound(_)));
    }

    #[test]
    fn search_leaves_wildcards_unescaped() {
        let conn = open_db_in_memory().unwrap();
        let owner = seed_owner(&conn, "alice");
        let repo = SqliteRecordRepository::new(&conn);
        repo.create_record(owner, &SecretRecord::new("github", "u", "p"))
            .unwrap();
        repo.create_record(owner, &SecretRecord::new("email", "u", "p"))
            .unwrap();

        let all = repo.search_records(owner, "%").unwrap();
        assert_eq!(all.len(), 2);

        let single_char = repo.search_records(owner, "_mail").unwrap();
        assert_eq!(single_char.len(), 1);
        assert_eq!(single_char[0].name, "email");
    }

    #[test]
    fn prefix_search_follows_like_case_folding() {
        let conn = open_db_in_memory().unwrap();
        let owner = seed_owner(&conn, "alice");
        let repo = SqliteRecordRepository::new(&conn);
        repo.create_record(owner, &SecretRecord::new("github", "u", "p"))
            .unwrap();

        assert_eq!(repo.search_records(owner, "GIT").unwrap().len(), 1);
        assert!(repo.find_record(owner, "GitHub").unwrap().is_none());
    }
}
