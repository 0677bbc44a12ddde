//! Infrastructure layer: persistence collaborator + ledger orchestration.
//!
//! The domain crates stay pure; everything that holds state or assigns
//! sequence ids lives here, behind the [`ledger_store::LedgerStore`] trait.

pub mod engine;
pub mod ledger_store;

pub use engine::LedgerEngine;
pub use ledger_store::{
    InMemoryLedgerStore, LedgerSnapshot, LedgerStore, StoreError, UncommittedPosting,
};
