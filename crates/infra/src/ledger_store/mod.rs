//! Append-only ledger store boundary.
//!
//! This module defines the persistence collaborator for the ledger engine
//! without making storage assumptions: an in-memory implementation serves
//! tests and development, a SQL-backed one would implement the same trait.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use r#trait::{LedgerSnapshot, LedgerStore, StoreError, UncommittedPosting};
