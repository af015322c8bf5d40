//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure the single SQLite connection owned by the vault.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No account or record is read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory, open_location};

/// Placeholder accepted wherever a storage path is parsed from text.
pub const IN_MEMORY_PLACEHOLDER: &str = ":memory:";

pub type DbResult<T> = Result<T, DbError>;

/// Storage malfunction: I/O, engine or schema-version failure.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "vault schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Where the vault keeps its state.
///
/// `InMemory` is ephemeral and lives only as long as the owning connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    InMemory,
}

impl StoreLocation {
    /// Parses a user-supplied location; `":memory:"` selects the in-memory store.
    pub fn parse(value: &str) -> Self {
        if value.trim() == IN_MEMORY_PLACEHOLDER {
            Self::InMemory
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::InMemory => "memory",
        }
    }
}

impl Display for StoreLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::InMemory => f.write_str(IN_MEMORY_PLACEHOLDER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StoreLocation;
    use std::path::PathBuf;

    #[test]
    fn parse_recognizes_memory_placeholder() {
        assert_eq!(StoreLocation::parse(":memory:"), StoreLocation::InMemory);
        assert_eq!(StoreLocation::parse(" :memory: "), StoreLocation::InMemory);
    }

    #[test]
    fn parse_treats_everything_else_as_file() {
        assert_eq!(
            StoreLocation::parse("vault.sqlite3"),
            StoreLocation::File(PathBuf::from("vault.sqlite3"))
        );
        assert_eq!(StoreLocation::parse("vault.sqlite3").to_string(), "vault.sqlite3");
    }
}
