//! Fixed-point monetary amounts.
//!
//! All monetary arithmetic in the ledger is exact 2-decimal fixed point over
//! integer minor units. No floating point, ever: statement totals must
//! reconcile to the paisa across arbitrarily long posting histories.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Minor units per major unit (2 decimal places).
const SCALE: i128 = 100;

/// A signed monetary amount in minor units (2-decimal fixed point).
///
/// Posting amounts are validated to be strictly positive at the ledger
/// boundary; `Money` itself is signed so running balances and rollups can be
/// expressed with the same type. Sums are carried in `i128`, wide enough that
/// overflow is not a practical concern for a station ledger.
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money {
    minor: i128,
}

impl Money {
    pub const ZERO: Money = Money { minor: 0 };

    /// Amount from minor units (e.g. `12345` => `123.45`).
    pub const fn from_minor(minor: i128) -> Self {
        Self { minor }
    }

    /// Amount from whole major units (e.g. `500` => `500.00`).
    pub const fn from_major(major: i64) -> Self {
        Self {
            minor: major as i128 * SCALE,
        }
    }

    pub const fn minor_units(&self) -> i128 {
        self.minor
    }

    pub const fn is_zero(&self) -> bool {
        self.minor == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.minor > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.minor < 0
    }

    pub const fn abs(&self) -> Self {
        Self {
            minor: self.minor.abs(),
        }
    }
}

impl crate::ValueObject for Money {}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money {
            minor: self.minor + rhs.minor,
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.minor += rhs.minor;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money {
            minor: self.minor - rhs.minor,
        }
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.minor -= rhs.minor;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money { minor: -self.minor }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / SCALE as u128, abs % SCALE as u128)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    /// Parse `"123"`, `"123.4"`, `"123.45"`, or `"-123.45"`.
    ///
    /// More than two decimal places is rejected rather than rounded: amounts
    /// enter the system already quantized to the paisa.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::validation(format!("invalid money amount: {s:?}"));

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() || frac.len() > 2 {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let major: i128 = whole.parse().map_err(|_| invalid())?;
        let mut cents: i128 = if frac.is_empty() {
            0
        } else {
            frac.parse().map_err(|_| invalid())?
        };
        if frac.len() == 1 {
            cents *= 10;
        }

        let minor = major * SCALE + cents;
        Ok(Money {
            minor: if negative { -minor } else { minor },
        })
    }
}
