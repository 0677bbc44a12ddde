use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use chrono::{NaiveDate, Utc};

use forecourt_core::ExpectedVersion;
use forecourt_ledger::{
    Account, AccountNumber, ChartOfAccounts, Group, GroupCode, Status, TransactionRecord,
};

use super::r#trait::{LedgerSnapshot, LedgerStore, StoreError, UncommittedPosting};

/// In-memory ledger store for tests and development.
///
/// One `RwLock` guards the whole state; every trait method takes the lock
/// exactly once, so each call observes and produces a consistent state.
/// Appends validate the full batch first and mutate only after every check
/// has passed.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    chart: ChartOfAccounts,
    accounts: BTreeMap<AccountNumber, Account>,
    log: Vec<TransactionRecord>,
    versions: HashMap<AccountNumber, u64>,
    next_seq: u64,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            chart: ChartOfAccounts::new(),
            accounts: BTreeMap::new(),
            log: Vec::new(),
            versions: HashMap::new(),
            next_seq: 1,
        }
    }
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::InvalidAppend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::InvalidAppend("lock poisoned".to_string()))
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn insert_group(&self, group: Group) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        inner
            .chart
            .insert(group)
            .map_err(|e| StoreError::InvalidAppend(e.to_string()))
    }

    fn find_group(&self, code: &GroupCode) -> Result<Option<Group>, StoreError> {
        Ok(self.read()?.chart.get(code).cloned())
    }

    fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if !inner.chart.contains(&account.group) {
            return Err(StoreError::UnknownGroup(account.group.clone()));
        }
        if inner.accounts.contains_key(&account.number) {
            return Err(StoreError::DuplicateAccount(account.number));
        }
        inner.accounts.insert(account.number, account);
        Ok(())
    }

    fn allocate_account(
        &self,
        name: &str,
        group: GroupCode,
        opened_on: NaiveDate,
    ) -> Result<Account, StoreError> {
        let mut inner = self.write()?;
        if !inner.chart.contains(&group) {
            return Err(StoreError::UnknownGroup(group));
        }
        let number = match inner.accounts.keys().next_back() {
            Some(last) => last.next().ok_or_else(|| {
                StoreError::InvalidAppend("account number space is exhausted".to_string())
            })?,
            None => AccountNumber::FIRST,
        };
        let account = Account::new(number, name, group, opened_on)
            .map_err(|e| StoreError::InvalidAppend(e.to_string()))?;
        inner.accounts.insert(number, account.clone());
        Ok(account)
    }

    fn set_account_status(
        &self,
        number: AccountNumber,
        status: Status,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        match inner.accounts.get_mut(&number) {
            Some(account) => {
                account.status = status;
                Ok(())
            }
            None => Err(StoreError::UnknownAccount(number)),
        }
    }

    fn find_account(&self, number: AccountNumber) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(&number).cloned())
    }

    fn account_version(&self, number: AccountNumber) -> Result<u64, StoreError> {
        let inner = self.read()?;
        if !inner.accounts.contains_key(&number) {
            return Err(StoreError::UnknownAccount(number));
        }
        Ok(inner.versions.get(&number).copied().unwrap_or(0))
    }

    fn append(
        &self,
        postings: Vec<UncommittedPosting>,
        expected: &[(AccountNumber, ExpectedVersion)],
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        if postings.is_empty() {
            return Err(StoreError::InvalidAppend(
                "append requires at least one posting".to_string(),
            ));
        }

        let mut inner = self.write()?;

        // Validate the whole batch before touching any state.
        for posting in &postings {
            if !posting.amount.is_positive() {
                return Err(StoreError::InvalidAppend(format!(
                    "posting amount must be positive, got {}",
                    posting.amount
                )));
            }
            if !inner.accounts.contains_key(&posting.account) {
                return Err(StoreError::UnknownAccount(posting.account));
            }
        }
        for (account, expectation) in expected {
            let current = inner.versions.get(account).copied().unwrap_or(0);
            if !expectation.matches(current) {
                return Err(StoreError::Concurrency(format!(
                    "account {account}: expected {expectation:?}, stream is at {current}"
                )));
            }
        }

        let recorded_at = Utc::now();
        let mut committed = Vec::with_capacity(postings.len());
        for posting in postings {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            *inner.versions.entry(posting.account).or_insert(0) += 1;

            let record = TransactionRecord {
                seq,
                transaction_id: posting.transaction_id,
                account: posting.account,
                transaction_type: posting.transaction_type,
                amount: posting.amount,
                date: posting.date,
                time: posting.time,
                description: posting.description,
                payment: posting.payment,
                recorded_at,
            };
            inner.log.push(record.clone());
            committed.push(record);
        }
        Ok(committed)
    }

    fn transactions_for_account(
        &self,
        number: AccountNumber,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let inner = self.read()?;
        if !inner.accounts.contains_key(&number) {
            return Err(StoreError::UnknownAccount(number));
        }
        let mut own: Vec<TransactionRecord> = inner
            .log
            .iter()
            .filter(|t| t.account == number)
            .cloned()
            .collect();
        own.sort_by_key(|t| t.ordering_key());
        Ok(own)
    }

    fn snapshot(&self) -> Result<LedgerSnapshot, StoreError> {
        let inner = self.read()?;
        Ok(LedgerSnapshot {
            chart: inner.chart.clone(),
            accounts: inner.accounts.values().cloned().collect(),
            transactions: inner.log.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use forecourt_core::{Money, TransactionId};
    use forecourt_ledger::TransactionType;

    fn seeded_store() -> InMemoryLedgerStore {
        let store = InMemoryLedgerStore::new();
        store
            .insert_group(Group::root("1".parse().unwrap(), "Assets").unwrap())
            .unwrap();
        store
    }

    fn open(store: &InMemoryLedgerStore, name: &str) -> Account {
        store
            .allocate_account(
                name,
                "1".parse().unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .unwrap()
    }

    fn posting(account: AccountNumber, ttype: TransactionType, major: i64) -> UncommittedPosting {
        UncommittedPosting {
            transaction_id: TransactionId::new(),
            account,
            transaction_type: ttype,
            amount: Money::from_major(major),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            description: "test posting".to_string(),
            payment: None,
        }
    }

    #[test]
    fn allocation_is_sequential_from_first() {
        let store = seeded_store();
        let a = open(&store, "Cash");
        let b = open(&store, "Bank");
        assert_eq!(a.number, AccountNumber::FIRST);
        assert_eq!(b.number, AccountNumber::FIRST.next().unwrap());
    }

    #[test]
    fn allocation_stops_when_the_number_width_is_exhausted() {
        let store = seeded_store();
        let last = Account::new(
            AccountNumber::MAX,
            "Last possible",
            "1".parse().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();
        store.insert_account(last).unwrap();

        let err = store
            .allocate_account(
                "One too many",
                "1".parse().unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidAppend(_)));
    }

    #[test]
    fn allocation_requires_a_known_group() {
        let store = seeded_store();
        let err = store
            .allocate_account(
                "Orphan",
                "999".parse().unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            )
            .unwrap_err();
        match err {
            StoreError::UnknownGroup(_) => {}
            other => panic!("expected UnknownGroup, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_account_numbers_are_rejected() {
        let store = seeded_store();
        let first = open(&store, "Cash");
        let clone = Account::new(
            first.number,
            "Impostor",
            "1".parse().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();
        assert!(matches!(
            store.insert_account(clone),
            Err(StoreError::DuplicateAccount(_))
        ));
    }

    #[test]
    fn append_assigns_monotone_seq_and_bumps_versions() {
        let store = seeded_store();
        let acc = open(&store, "Cash").number;

        let first = store
            .append(
                vec![posting(acc, TransactionType::Cr, 100)],
                &[(acc, ExpectedVersion::Exact(0))],
            )
            .unwrap();
        let second = store
            .append(
                vec![posting(acc, TransactionType::Dr, 40)],
                &[(acc, ExpectedVersion::Exact(1))],
            )
            .unwrap();

        assert_eq!(first[0].seq, 1);
        assert_eq!(second[0].seq, 2);
        assert_eq!(store.account_version(acc).unwrap(), 2);
    }

    #[test]
    fn stale_expected_version_fails_the_whole_batch() {
        let store = seeded_store();
        let a = open(&store, "Cash").number;
        let b = open(&store, "Bank").number;

        store
            .append(
                vec![posting(a, TransactionType::Cr, 100)],
                &[(a, ExpectedVersion::Exact(0))],
            )
            .unwrap();

        // Two-leg batch where one expectation is stale: nothing commits.
        let err = store
            .append(
                vec![
                    posting(a, TransactionType::Dr, 50),
                    posting(b, TransactionType::Cr, 50),
                ],
                &[(a, ExpectedVersion::Exact(0)), (b, ExpectedVersion::Exact(0))],
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Concurrency(_)));
        assert_eq!(store.account_version(a).unwrap(), 1);
        assert_eq!(store.account_version(b).unwrap(), 0);
        assert!(store.transactions_for_account(b).unwrap().is_empty());
    }

    #[test]
    fn append_rejects_unknown_accounts_without_partial_commit() {
        let store = seeded_store();
        let a = open(&store, "Cash").number;
        let ghost: AccountNumber = "9000000000009".parse().unwrap();

        let err = store
            .append(
                vec![
                    posting(a, TransactionType::Cr, 10),
                    posting(ghost, TransactionType::Dr, 10),
                ],
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownAccount(_)));
        assert!(store.transactions_for_account(a).unwrap().is_empty());
    }

    #[test]
    fn transactions_for_account_come_back_ordered() {
        let store = seeded_store();
        let acc = open(&store, "Cash").number;

        let mut early = posting(acc, TransactionType::Cr, 10);
        early.date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut late = posting(acc, TransactionType::Cr, 20);
        late.date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();

        // Append the later-dated posting first.
        store.append(vec![late], &[]).unwrap();
        store.append(vec![early], &[]).unwrap();

        let txns = store.transactions_for_account(acc).unwrap();
        assert_eq!(txns.len(), 2);
        assert!(txns[0].date < txns[1].date);
    }

    #[test]
    fn expected_any_always_passes() {
        let store = seeded_store();
        let acc = open(&store, "Cash").number;
        for _ in 0..3 {
            store
                .append(
                    vec![posting(acc, TransactionType::Cr, 5)],
                    &[(acc, ExpectedVersion::Any)],
                )
                .unwrap();
        }
        assert_eq!(store.account_version(acc).unwrap(), 3);
    }
}
