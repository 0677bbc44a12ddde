use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use forecourt_core::{Money, TransactionId, ValueObject};

use crate::account::AccountNumber;

/// The two sides of a posting.
///
/// Sign convention (cash/bank perspective): `Cr` increases an account's
/// balance ("money in"), `Dr` decreases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Dr,
    Cr,
}

impl TransactionType {
    /// Apply the sign convention to a positive posting amount.
    pub fn signed(self, amount: Money) -> Money {
        match self {
            TransactionType::Cr => amount,
            TransactionType::Dr => -amount,
        }
    }
}

impl core::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            TransactionType::Dr => "Dr",
            TransactionType::Cr => "Cr",
        })
    }
}

/// Payment instrument details attached to a posting, where applicable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMeta {
    Cheque {
        number: String,
        bank: String,
    },
    MobileBanking {
        provider: String,
        reference: String,
    },
}

impl ValueObject for PaymentMeta {}

/// One immutable ledger posting.
///
/// Records are append-only: mistakes are corrected by posting an offsetting
/// record, never by editing. `seq` is assigned by the store at append time
/// and is the final tie-breaker in statement ordering; `transaction_id` is
/// shared by the legs of one compound operation (voucher, sale).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub seq: u64,
    pub transaction_id: TransactionId,
    pub account: AccountNumber,
    pub transaction_type: TransactionType,
    /// Strictly positive; the sign lives in `transaction_type`.
    pub amount: Money,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub description: String,
    pub payment: Option<PaymentMeta>,
    pub recorded_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Statement ordering key: `(date, time, seq)` ascending.
    ///
    /// `seq` breaks same-instant ties deterministically, so recomputing a
    /// statement always yields identical output.
    pub fn ordering_key(&self) -> (NaiveDate, NaiveTime, u64) {
        (self.date, self.time, self.seq)
    }

    /// The posting's contribution to its account balance.
    pub fn signed_amount(&self) -> Money {
        self.transaction_type.signed(self.amount)
    }
}
