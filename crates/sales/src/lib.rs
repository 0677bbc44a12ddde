//! Sales module: shift sales, credit sales and purchases.
//!
//! Domain transactions here do not touch the ledger directly; each one
//! describes its ledger effect as a [`forecourt_ledger::PostingPlan`] that
//! the engine commits atomically.

pub mod purchase;
pub mod sale;
pub mod shift;

pub use purchase::{Purchase, Settlement};
pub use sale::{fuel_amount, CreditSale, ShiftSale};
pub use shift::{DispenserReading, MeterReading, Shift, Volume};
