use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info};

use forecourt_core::{ExpectedVersion, Money, TransactionId};
use forecourt_ledger::{
    Account, AccountNumber, balance_as_of, compute_statement, receivables, GroupCode,
    GroupRollup, LedgerError, PaymentMeta, PostingPlan, Receivables, RollupLine, Statement,
    TransactionRecord, TransactionType, VoucherKind, VoucherRecord, check_voucher_legs,
};

use crate::ledger_store::{LedgerStore, UncommittedPosting};

/// Orchestrates ledger operations over a [`LedgerStore`].
///
/// The engine owns no state of its own: it resolves accounts, enforces the
/// business rules the pure domain types cannot (existence, active status,
/// concurrency expectations) and delegates persistence to the store.
pub struct LedgerEngine<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> LedgerEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Open a new account under the next sequential number.
    pub fn open_account(
        &self,
        name: &str,
        group: GroupCode,
        opened_on: NaiveDate,
    ) -> Result<Account, LedgerError> {
        if self.store.find_group(&group)?.is_none() {
            return Err(LedgerError::GroupNotFound(group));
        }
        let account = self.store.allocate_account(name, group, opened_on)?;
        info!(account = %account.number, name = %account.name, "opened account");
        Ok(account)
    }

    /// Post a single transaction against one account.
    #[allow(clippy::too_many_arguments)]
    pub fn post_transaction(
        &self,
        account: AccountNumber,
        transaction_type: TransactionType,
        amount: Money,
        date: NaiveDate,
        time: NaiveTime,
        description: impl Into<String>,
        payment: Option<PaymentMeta>,
    ) -> Result<TransactionRecord, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        self.resolve_active(account)?;
        let version = self.store.account_version(account)?;

        let posting = UncommittedPosting {
            transaction_id: TransactionId::new(),
            account,
            transaction_type,
            amount,
            date,
            time,
            description: description.into(),
            payment,
        };
        let mut committed = self
            .store
            .append(vec![posting], &[(account, ExpectedVersion::Exact(version))])?;
        let record = committed.remove(0);
        debug!(
            account = %account,
            seq = record.seq,
            %transaction_type,
            %amount,
            "posted transaction"
        );
        Ok(record)
    }

    /// Transfer an amount between two accounts as an atomic two-leg voucher.
    ///
    /// Both legs share one transaction id and commit together or not at all;
    /// the net balance change across the pair is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn post_voucher_transfer(
        &self,
        from: AccountNumber,
        to: AccountNumber,
        amount: Money,
        date: NaiveDate,
        time: NaiveTime,
        kind: VoucherKind,
        description: impl Into<String>,
    ) -> Result<VoucherRecord, LedgerError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if from == to {
            return Err(LedgerError::VoucherImbalance(
                "transfer requires two distinct accounts".to_string(),
            ));
        }
        self.resolve_active(from)?;
        self.resolve_active(to)?;
        let from_version = self.store.account_version(from)?;
        let to_version = self.store.account_version(to)?;

        let description = description.into();
        let transaction_id = TransactionId::new();
        let (from_type, to_type) = kind.legs();
        let legs = vec![
            UncommittedPosting {
                transaction_id,
                account: from,
                transaction_type: from_type,
                amount,
                date,
                time,
                description: description.clone(),
                payment: None,
            },
            UncommittedPosting {
                transaction_id,
                account: to,
                transaction_type: to_type,
                amount,
                date,
                time,
                description: description.clone(),
                payment: None,
            },
        ];
        let committed = self.store.append(
            legs,
            &[
                (from, ExpectedVersion::Exact(from_version)),
                (to, ExpectedVersion::Exact(to_version)),
            ],
        )?;
        check_voucher_legs(&committed[0], &committed[1])?;

        info!(
            %from,
            %to,
            %amount,
            transaction = %transaction_id,
            "posted voucher transfer"
        );
        Ok(VoucherRecord {
            transaction_id,
            kind,
            from_account: from,
            to_account: to,
            amount,
            date,
            description,
            from_seq: committed[0].seq,
            to_seq: committed[1].seq,
        })
    }

    /// Post every leg of a plan atomically under one shared transaction id.
    pub fn post_plan(&self, plan: &PostingPlan) -> Result<Vec<TransactionRecord>, LedgerError> {
        plan.validate()?;

        let mut expected = Vec::new();
        for instruction in &plan.instructions {
            self.resolve_active(instruction.account)?;
            if expected
                .iter()
                .all(|(number, _)| *number != instruction.account)
            {
                let version = self.store.account_version(instruction.account)?;
                expected.push((instruction.account, ExpectedVersion::Exact(version)));
            }
        }

        let transaction_id = TransactionId::new();
        let postings = plan
            .instructions
            .iter()
            .cloned()
            .map(|instruction| {
                UncommittedPosting::from_instruction(transaction_id, plan.date, plan.time, instruction)
            })
            .collect();
        let committed = self.store.append(postings, &expected)?;
        debug!(
            transaction = %transaction_id,
            legs = committed.len(),
            "posted plan"
        );
        Ok(committed)
    }

    /// Statement for an account over `[start, end]` inclusive.
    pub fn account_statement(
        &self,
        account: AccountNumber,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Statement, LedgerError> {
        self.resolve(account)?;
        let txns = self.store.transactions_for_account(account)?;
        Ok(compute_statement(account, &txns, start, end))
    }

    /// Signed balance from all postings dated on or before `as_of`.
    pub fn account_balance(
        &self,
        account: AccountNumber,
        as_of: NaiveDate,
    ) -> Result<Money, LedgerError> {
        self.resolve(account)?;
        let txns = self.store.transactions_for_account(account)?;
        Ok(balance_as_of(account, &txns, as_of))
    }

    /// Receivable position of a customer (or payable of a supplier).
    pub fn account_receivables(
        &self,
        account: AccountNumber,
    ) -> Result<Receivables, LedgerError> {
        self.resolve(account)?;
        let txns = self.store.transactions_for_account(account)?;
        Ok(receivables(account, &txns))
    }

    /// Aggregate balances across every account under a group subtree.
    ///
    /// Works from one store snapshot so the per-account lines and the total
    /// cannot disagree.
    pub fn group_rollup(
        &self,
        group: &GroupCode,
        as_of: NaiveDate,
    ) -> Result<GroupRollup, LedgerError> {
        let snapshot = self.store.snapshot()?;
        if !snapshot.chart.contains(group) {
            return Err(LedgerError::GroupNotFound(group.clone()));
        }
        let member_groups = snapshot.chart.subtree(group);

        let mut lines = Vec::new();
        let mut total = Money::ZERO;
        for account in snapshot
            .accounts
            .iter()
            .filter(|a| member_groups.contains(&a.group))
        {
            let balance = balance_as_of(account.number, &snapshot.transactions, as_of);
            total += balance;
            lines.push(RollupLine {
                account: account.number,
                account_name: account.name.clone(),
                balance,
            });
        }
        Ok(GroupRollup {
            group: group.clone(),
            as_of,
            lines,
            total,
        })
    }

    /// The account must exist; inactive accounts are fine for reads.
    fn resolve(&self, number: AccountNumber) -> Result<Account, LedgerError> {
        self.store
            .find_account(number)?
            .ok_or(LedgerError::AccountNotFound(number))
    }

    /// The account must exist and accept postings.
    fn resolve_active(&self, number: AccountNumber) -> Result<Account, LedgerError> {
        let account = self.resolve(number)?;
        if !account.can_post() {
            return Err(LedgerError::AccountInactive(number));
        }
        Ok(account)
    }
}
