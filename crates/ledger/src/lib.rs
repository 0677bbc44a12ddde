//! Ledger module (double-entry postings over a chart of accounts).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.
//! Balances are never stored; they are derived from the immutable
//! transaction log by the functions in [`statement`].

pub mod account;
pub mod error;
pub mod group;
pub mod posting;
pub mod statement;
pub mod transaction;
pub mod voucher;

pub use account::{Account, AccountNumber, Status};
pub use error::LedgerError;
pub use group::{ChartOfAccounts, Group, GroupCode};
pub use posting::{PostingInstruction, PostingPlan};
pub use statement::{
    balance_as_of, compute_statement, receivables, GroupRollup, Receivables, RollupLine,
    Statement, StatementRow,
};
pub use transaction::{PaymentMeta, TransactionRecord, TransactionType};
pub use voucher::{check_voucher_legs, VoucherKind, VoucherRecord};
