//! Core use-case services.
//!
//! # Responsibility
//! - `vault_store` owns the connection and enforces every vault invariant.
//! - `session` keeps the "current account" state shells need and phrases
//!   store results as outcomes a shell can branch on.

pub mod session;
pub mod vault_store;
