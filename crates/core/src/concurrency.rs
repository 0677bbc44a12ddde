//! Optimistic concurrency primitives.

use crate::error::{DomainError, DomainResult};

/// Version expectation for an append against a per-account stream.
///
/// Postings against one account must serialize; the store checks the
/// caller's expectation against the account's current stream version and
/// rejects stale writers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for idempotent writes, migrations, etc.).
    Any,
    /// Require the stream to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_matches_every_version() {
        assert!(ExpectedVersion::Any.matches(0));
        assert!(ExpectedVersion::Any.matches(42));
        assert!(ExpectedVersion::Any.check(7).is_ok());
    }

    #[test]
    fn exact_rejects_stale_version() {
        assert!(ExpectedVersion::Exact(3).matches(3));
        assert!(!ExpectedVersion::Exact(3).matches(4));

        let err = ExpectedVersion::Exact(3).check(4).unwrap_err();
        match err {
            DomainError::Conflict(_) => {}
            _ => panic!("expected Conflict"),
        }
    }
}
