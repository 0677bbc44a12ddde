use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use forecourt_core::{ExpectedVersion, Money, TransactionId};
use forecourt_ledger::{
    Account, AccountNumber, ChartOfAccounts, Group, GroupCode, LedgerError, PaymentMeta,
    PostingInstruction, Status, TransactionRecord, TransactionType,
};

/// A posting ready to be appended (not yet assigned a sequence id).
///
/// The store assigns `seq` and the recorded-at timestamp during append;
/// everything else is fixed by the caller and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncommittedPosting {
    pub transaction_id: TransactionId,
    pub account: AccountNumber,
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub description: String,
    pub payment: Option<PaymentMeta>,
}

impl UncommittedPosting {
    /// Build a posting from a plan leg, binding it to a shared transaction id.
    pub fn from_instruction(
        transaction_id: TransactionId,
        date: NaiveDate,
        time: NaiveTime,
        instruction: PostingInstruction,
    ) -> Self {
        Self {
            transaction_id,
            account: instruction.account,
            transaction_type: instruction.transaction_type,
            amount: instruction.amount,
            date,
            time,
            description: instruction.description,
            payment: instruction.payment,
        }
    }
}

/// Ledger store operation error.
///
/// Infrastructure-level failures (concurrency, unknown keys, bad appends) as
/// opposed to the business-rule rejections in [`LedgerError`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("account {0} already exists")]
    DuplicateAccount(AccountNumber),

    #[error("account {0} does not exist")]
    UnknownAccount(AccountNumber),

    #[error("group {0} does not exist")]
    UnknownGroup(GroupCode),

    #[error("invalid append: {0}")]
    InvalidAppend(String),
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Concurrency(msg) => LedgerError::ConcurrentModification(msg),
            StoreError::UnknownAccount(number) => LedgerError::AccountNotFound(number),
            StoreError::UnknownGroup(code) => LedgerError::GroupNotFound(code),
            other => LedgerError::Store(other.to_string()),
        }
    }
}

/// A consistent point-in-time view across accounts and the transaction log.
///
/// Multi-account reads (group rollups) work from one snapshot so the listed
/// postings always reconcile with the reported totals.
#[derive(Debug, Clone)]
pub struct LedgerSnapshot {
    pub chart: ChartOfAccounts,
    pub accounts: Vec<Account>,
    pub transactions: Vec<TransactionRecord>,
}

/// Persistence collaborator for the ledger engine.
///
/// Implementations must:
/// - enforce account-number uniqueness (natural key)
/// - serialize account-number allocation (no duplicate numbers under
///   concurrent account creation)
/// - enforce per-account optimistic concurrency against the stream version
/// - append batches atomically (all legs of a voucher or none)
/// - assign globally monotone sequence ids, never reused
pub trait LedgerStore: Send + Sync {
    fn insert_group(&self, group: Group) -> Result<(), StoreError>;

    fn find_group(&self, code: &GroupCode) -> Result<Option<Group>, StoreError>;

    /// Insert an account under an explicit, caller-chosen number (seed data).
    fn insert_account(&self, account: Account) -> Result<(), StoreError>;

    /// Open an account under the next sequential number.
    ///
    /// Allocation and insertion happen under one lock, so two concurrent
    /// openings can never receive the same number.
    fn allocate_account(
        &self,
        name: &str,
        group: GroupCode,
        opened_on: NaiveDate,
    ) -> Result<Account, StoreError>;

    fn set_account_status(
        &self,
        number: AccountNumber,
        status: Status,
    ) -> Result<(), StoreError>;

    fn find_account(&self, number: AccountNumber) -> Result<Option<Account>, StoreError>;

    /// Current stream version of an account (number of postings against it).
    fn account_version(&self, number: AccountNumber) -> Result<u64, StoreError>;

    /// Append a batch of postings atomically.
    ///
    /// `expected` carries one version expectation per touched account; a
    /// mismatch fails the whole batch with `Concurrency` and nothing is
    /// persisted.
    fn append(
        &self,
        postings: Vec<UncommittedPosting>,
        expected: &[(AccountNumber, ExpectedVersion)],
    ) -> Result<Vec<TransactionRecord>, StoreError>;

    /// All postings for one account in `(date, time, seq)` order.
    ///
    /// Taken under a single read lock: the result is a consistent snapshot
    /// for that account.
    fn transactions_for_account(
        &self,
        number: AccountNumber,
    ) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Consistent snapshot across the whole store.
    fn snapshot(&self) -> Result<LedgerSnapshot, StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn insert_group(&self, group: Group) -> Result<(), StoreError> {
        (**self).insert_group(group)
    }

    fn find_group(&self, code: &GroupCode) -> Result<Option<Group>, StoreError> {
        (**self).find_group(code)
    }

    fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        (**self).insert_account(account)
    }

    fn allocate_account(
        &self,
        name: &str,
        group: GroupCode,
        opened_on: NaiveDate,
    ) -> Result<Account, StoreError> {
        (**self).allocate_account(name, group, opened_on)
    }

    fn set_account_status(
        &self,
        number: AccountNumber,
        status: Status,
    ) -> Result<(), StoreError> {
        (**self).set_account_status(number, status)
    }

    fn find_account(&self, number: AccountNumber) -> Result<Option<Account>, StoreError> {
        (**self).find_account(number)
    }

    fn account_version(&self, number: AccountNumber) -> Result<u64, StoreError> {
        (**self).account_version(number)
    }

    fn append(
        &self,
        postings: Vec<UncommittedPosting>,
        expected: &[(AccountNumber, ExpectedVersion)],
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        (**self).append(postings, expected)
    }

    fn transactions_for_account(
        &self,
        number: AccountNumber,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        (**self).transactions_for_account(number)
    }

    fn snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        (**self).snapshot()
    }
}
