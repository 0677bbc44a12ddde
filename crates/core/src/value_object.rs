//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two instances
/// with the same attributes are interchangeable. `Money` is the canonical
/// example — a posting amount has no identity, only a value.
///
/// Contrast with [`crate::Entity`], where two instances with the same id are
/// the same thing even if their attributes differ.
///
/// To "modify" a value object, construct a new one. This keeps them safe to
/// share across threads and safe to copy into records that must stay
/// immutable (ledger postings).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
