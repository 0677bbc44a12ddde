//! Ledger error taxonomy.

use thiserror::Error;

use forecourt_core::Money;

use crate::account::AccountNumber;
use crate::group::GroupCode;

/// Deterministic business-rule rejections surfaced by the ledger.
///
/// None of these are retriable transient failures: `ConcurrentModification`
/// asks the caller to re-fetch and retry, everything else is a rejection of
/// bad input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Posting amount was zero or negative.
    #[error("invalid amount: {0} (must be positive)")]
    InvalidAmount(Money),

    /// No account exists under the given number.
    #[error("account {0} not found")]
    AccountNotFound(AccountNumber),

    /// The account exists but is closed to postings.
    #[error("account {0} is inactive")]
    AccountInactive(AccountNumber),

    /// No group exists under the given code.
    #[error("group {0} not found")]
    GroupNotFound(GroupCode),

    /// The two legs of a voucher do not form a balanced pair.
    ///
    /// Cannot happen when legs are built from one amount; asserted
    /// defensively after every transfer.
    #[error("voucher legs do not balance: {0}")]
    VoucherImbalance(String),

    /// Lock/version conflict on an account during posting.
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),

    /// Persistence collaborator failure that is not one of the above.
    #[error("store failure: {0}")]
    Store(String),
}
