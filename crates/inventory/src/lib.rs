//! Inventory module (per-product stock snapshots).
//!
//! Stock is not a ledger entity: levels are mutated by sale/purchase posting
//! and only have to respect their own invariants (no negative availability).

pub mod stock;

pub use stock::StockLevel;
