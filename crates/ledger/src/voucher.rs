use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use forecourt_core::{Money, TransactionId};

use crate::account::AccountNumber;
use crate::error::LedgerError;
use crate::transaction::{TransactionRecord, TransactionType};

/// Direction of a voucher transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherKind {
    /// Money leaves the from-account: Dr on from, Cr on to.
    Payment,
    /// Money arrives at the from-account: Cr on from, Dr on to.
    Received,
}

impl VoucherKind {
    /// Posting types for the (from, to) legs.
    pub fn legs(self) -> (TransactionType, TransactionType) {
        match self {
            VoucherKind::Payment => (TransactionType::Dr, TransactionType::Cr),
            VoucherKind::Received => (TransactionType::Cr, TransactionType::Dr),
        }
    }
}

/// A committed two-leg transfer between accounts.
///
/// Both legs share `transaction_id` and carry the same amount, so the net
/// balance change across the two accounts is always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherRecord {
    pub transaction_id: TransactionId,
    pub kind: VoucherKind,
    pub from_account: AccountNumber,
    pub to_account: AccountNumber,
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
    /// Sequence ids of the committed legs (from-leg, to-leg).
    pub from_seq: u64,
    pub to_seq: u64,
}

/// Defensive balance assertion over the two committed legs of a voucher.
///
/// By construction both legs are cut from one amount, so this can only fire
/// on a store defect; it is still checked after every transfer.
pub fn check_voucher_legs(
    first: &TransactionRecord,
    second: &TransactionRecord,
) -> Result<(), LedgerError> {
    if first.transaction_id != second.transaction_id {
        return Err(LedgerError::VoucherImbalance(format!(
            "legs carry different transaction ids ({} vs {})",
            first.transaction_id, second.transaction_id
        )));
    }
    if first.transaction_type == second.transaction_type {
        return Err(LedgerError::VoucherImbalance(format!(
            "both legs are {} postings",
            first.transaction_type
        )));
    }
    if first.amount != second.amount {
        return Err(LedgerError::VoucherImbalance(format!(
            "Dr {} vs Cr {}",
            first.amount.max(second.amount),
            first.amount.min(second.amount)
        )));
    }
    Ok(())
}
