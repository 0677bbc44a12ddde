use chrono::NaiveDate;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use forecourt_core::{DomainError, Entity, ValueObject};

use crate::group::GroupCode;

/// Fixed width of an account number (zero-padded decimal digits).
pub const ACCOUNT_NUMBER_WIDTH: usize = 13;

/// Natural key of an account: a zero-padded 13-digit number.
///
/// Postings join to accounts by this business key, never by a surrogate id.
/// Stored as the underlying integer; `Display` re-pads to fixed width.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountNumber(u64);

impl AccountNumber {
    /// The first number issued when the chart is seeded.
    pub const FIRST: AccountNumber = AccountNumber(1_000_000_000_001);

    /// The largest number representable at the fixed width.
    pub const MAX: AccountNumber = AccountNumber(9_999_999_999_999);

    /// The next sequential number, or `None` once the fixed width is
    /// exhausted (allocation itself is serialized by the store).
    pub fn next(self) -> Option<AccountNumber> {
        if self.0 >= Self::MAX.0 {
            None
        } else {
            Some(AccountNumber(self.0 + 1))
        }
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl ValueObject for AccountNumber {}

impl core::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:0width$}", self.0, width = ACCOUNT_NUMBER_WIDTH)
    }
}

impl FromStr for AccountNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ACCOUNT_NUMBER_WIDTH || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_id(format!(
                "AccountNumber: expected {ACCOUNT_NUMBER_WIDTH} digits, got {s:?}"
            )));
        }
        let n = s
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("AccountNumber: {e}")))?;
        Ok(AccountNumber(n))
    }
}

/// Active/inactive lifecycle shared by accounts and groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn is_active(self) -> bool {
        self == Status::Active
    }
}

/// A ledger account: customer, supplier, cash box, bank, expense head.
///
/// Carries no balance fields. Balances, dues and payments are derived from
/// the transaction log (see [`crate::statement`]); the account row itself
/// never drifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub number: AccountNumber,
    pub name: String,
    pub group: GroupCode,
    pub status: Status,
    pub opened_on: NaiveDate,
}

impl Account {
    pub fn new(
        number: AccountNumber,
        name: impl Into<String>,
        group: GroupCode,
        opened_on: NaiveDate,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("account name cannot be empty"));
        }
        Ok(Self {
            number,
            name,
            group,
            status: Status::Active,
            opened_on,
        })
    }

    /// Whether postings against this account are accepted.
    pub fn can_post(&self) -> bool {
        self.status.is_active()
    }
}

impl Entity for Account {
    type Id = AccountNumber;

    fn id(&self) -> &Self::Id {
        &self.number
    }
}
