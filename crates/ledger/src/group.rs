use std::collections::BTreeMap;

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use forecourt_core::{DomainError, Entity, ValueObject};

use crate::account::Status;

/// Unique code of a chart-of-accounts group (e.g. `"101"` for Cash in hand).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct GroupCode(String);

impl GroupCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for GroupCode {}

impl core::fmt::Display for GroupCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GroupCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > 16 || !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(DomainError::invalid_id(format!(
                "GroupCode: expected 1-16 alphanumeric characters, got {s:?}"
            )));
        }
        Ok(GroupCode(s.to_string()))
    }
}

/// A node in the hierarchical chart of accounts.
///
/// The parent link is an explicit typed reference, not an encoded prefix of
/// the code: classification never parses code strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub code: GroupCode,
    pub name: String,
    pub parent: Option<GroupCode>,
    pub status: Status,
}

impl Group {
    pub fn root(code: GroupCode, name: impl Into<String>) -> Result<Self, DomainError> {
        Self::build(code, name, None)
    }

    pub fn child(
        code: GroupCode,
        name: impl Into<String>,
        parent: GroupCode,
    ) -> Result<Self, DomainError> {
        Self::build(code, name, Some(parent))
    }

    fn build(
        code: GroupCode,
        name: impl Into<String>,
        parent: Option<GroupCode>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("group name cannot be empty"));
        }
        if parent.as_ref() == Some(&code) {
            return Err(DomainError::validation("group cannot be its own parent"));
        }
        Ok(Self {
            code,
            name,
            parent,
            status: Status::Active,
        })
    }
}

impl Entity for Group {
    type Id = GroupCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

/// The group tree: classification backbone for accounts and rollups.
///
/// Insertion requires the parent to already exist, so the structure is a
/// forest by construction and traversal cannot loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOfAccounts {
    groups: BTreeMap<GroupCode, Group>,
}

impl ChartOfAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: Group) -> Result<(), DomainError> {
        if self.groups.contains_key(&group.code) {
            return Err(DomainError::conflict(format!(
                "group {} already exists",
                group.code
            )));
        }
        if let Some(parent) = &group.parent {
            if !self.groups.contains_key(parent) {
                return Err(DomainError::validation(format!(
                    "parent group {parent} does not exist"
                )));
            }
        }
        self.groups.insert(group.code.clone(), group);
        Ok(())
    }

    pub fn get(&self, code: &GroupCode) -> Option<&Group> {
        self.groups.get(code)
    }

    pub fn contains(&self, code: &GroupCode) -> bool {
        self.groups.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Chain of parents from `code` (exclusive) up to its root.
    pub fn ancestors(&self, code: &GroupCode) -> Vec<GroupCode> {
        let mut chain = Vec::new();
        let mut current = self.groups.get(code).and_then(|g| g.parent.clone());
        while let Some(parent) = current {
            current = self.groups.get(&parent).and_then(|g| g.parent.clone());
            chain.push(parent);
        }
        chain
    }

    /// All codes in the subtree rooted at `code`, including `code` itself.
    ///
    /// Returned in code order; empty if the group does not exist.
    pub fn subtree(&self, code: &GroupCode) -> Vec<GroupCode> {
        if !self.groups.contains_key(code) {
            return Vec::new();
        }
        let mut member = vec![code.clone()];
        // Codes are inserted parents-first, so one pass in insertion-agnostic
        // sorted order is not enough; iterate until the frontier stops growing.
        let mut changed = true;
        while changed {
            changed = false;
            for group in self.groups.values() {
                if member.contains(&group.code) {
                    continue;
                }
                if let Some(parent) = &group.parent {
                    if member.contains(parent) {
                        member.push(group.code.clone());
                        changed = true;
                    }
                }
            }
        }
        member.sort();
        member
    }

    /// Whether `code` sits under `ancestor` in the tree (or is `ancestor`).
    ///
    /// Used to classify accounts, e.g. cash-book vs bank-book membership.
    pub fn is_under(&self, code: &GroupCode, ancestor: &GroupCode) -> bool {
        code == ancestor || self.ancestors(code).contains(ancestor)
    }
}
