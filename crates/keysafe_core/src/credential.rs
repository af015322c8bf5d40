//! Credential digest applied before a credential reaches the store.
//!
//! The store compares credentials as opaque strings. Every session path
//! (register, login, account removal) digests through `digest` so the same
//! input always produces the same stored value.

use sha2::{Digest, Sha256};

/// Returns the lowercase hex SHA-256 of `raw`.
pub fn digest(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
