//! Balance derivation over the transaction log.
//!
//! Everything here is a pure function of an account's postings: running
//! balances, statements, receivables and group rollups are computed on read,
//! never cached on the account row. Recomputing with the same inputs yields
//! identical output.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use forecourt_core::{Money, TransactionId};

use crate::account::AccountNumber;
use crate::group::GroupCode;
use crate::transaction::{TransactionRecord, TransactionType};

/// One line of an account statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub seq: u64,
    pub transaction_id: TransactionId,
    pub description: String,
    /// Posting amount when the row is a debit, zero otherwise.
    pub debit: Money,
    /// Posting amount when the row is a credit, zero otherwise.
    pub credit: Money,
    pub running_balance: Money,
}

/// An ordered account statement over a date range, with reconciled totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub account: AccountNumber,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Signed sum of all postings dated before `start`.
    pub opening_balance: Money,
    pub rows: Vec<StatementRow>,
    pub total_debit: Money,
    pub total_credit: Money,
    /// Always `opening_balance + total_credit - total_debit`.
    pub closing_balance: Money,
}

/// Signed balance of an account from all postings dated on or before `as_of`.
///
/// Order-independent: a plain signed sum.
pub fn balance_as_of(
    account: AccountNumber,
    transactions: &[TransactionRecord],
    as_of: NaiveDate,
) -> Money {
    transactions
        .iter()
        .filter(|t| t.account == account && t.date <= as_of)
        .map(|t| t.signed_amount())
        .sum()
}

/// Compute the statement for one account over `[start, end]` inclusive.
///
/// Rows are ordered strictly by `(date, time, seq)` ascending; the sequence
/// id breaks same-instant ties so the result is deterministic. Postings for
/// other accounts in the input slice are ignored.
pub fn compute_statement(
    account: AccountNumber,
    transactions: &[TransactionRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Statement {
    let mut own: Vec<&TransactionRecord> = transactions
        .iter()
        .filter(|t| t.account == account)
        .collect();
    own.sort_by_key(|t| t.ordering_key());

    let opening_balance: Money = own
        .iter()
        .filter(|t| t.date < start)
        .map(|t| t.signed_amount())
        .sum();

    let mut running = opening_balance;
    let mut total_debit = Money::ZERO;
    let mut total_credit = Money::ZERO;
    let mut rows = Vec::new();

    for t in own.iter().filter(|t| t.date >= start && t.date <= end) {
        let (debit, credit) = match t.transaction_type {
            TransactionType::Dr => (t.amount, Money::ZERO),
            TransactionType::Cr => (Money::ZERO, t.amount),
        };
        total_debit += debit;
        total_credit += credit;
        running += t.signed_amount();

        rows.push(StatementRow {
            date: t.date,
            time: t.time,
            seq: t.seq,
            transaction_id: t.transaction_id,
            description: t.description.clone(),
            debit,
            credit,
            running_balance: running,
        });
    }

    Statement {
        account,
        start,
        end,
        opening_balance,
        rows,
        total_debit,
        total_credit,
        closing_balance: opening_balance + total_credit - total_debit,
    }
}

/// Derived receivable position of a customer (or payable of a supplier).
///
/// On a customer account, debits raise what the customer owes and credits
/// record payments received, so `net = total_dr - total_cr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receivables {
    pub total_dr: Money,
    pub total_cr: Money,
    /// Signed net; negative means the account is overpaid.
    pub net: Money,
}

impl Receivables {
    /// Outstanding due floored at zero.
    ///
    /// Display rule: the due never shows negative unless the caller chooses
    /// to surface overpayment via `net` explicitly.
    pub fn due_or_zero(&self) -> Money {
        if self.net.is_negative() {
            Money::ZERO
        } else {
            self.net
        }
    }
}

/// Derive the receivable position from an account's postings.
pub fn receivables(account: AccountNumber, transactions: &[TransactionRecord]) -> Receivables {
    let mut total_dr = Money::ZERO;
    let mut total_cr = Money::ZERO;
    for t in transactions.iter().filter(|t| t.account == account) {
        match t.transaction_type {
            TransactionType::Dr => total_dr += t.amount,
            TransactionType::Cr => total_cr += t.amount,
        }
    }
    Receivables {
        total_dr,
        total_cr,
        net: total_dr - total_cr,
    }
}

/// Balance of one account within a group rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupLine {
    pub account: AccountNumber,
    pub account_name: String,
    pub balance: Money,
}

/// Aggregated balance across every account under a group subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRollup {
    pub group: GroupCode,
    pub as_of: NaiveDate,
    pub lines: Vec<RollupLine>,
    pub total: Money,
}
