//! The ordered owner set.
//!
//! An insertion-ordered list of unique identities. All owner-list reads and
//! mutations in both engines go through this abstraction instead of inline
//! vector scans.

use covault_types::Address;
use serde::{Deserialize, Serialize};

use crate::error::QuorumError;

/// The wallet's owner set: ordered, unique, never empty after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSet {
    owners: Vec<Address>,
}

impl OwnerSet {
    /// Build the initial owner set, rejecting empty lists, null identities
    /// and duplicates.
    pub fn new(owners: Vec<Address>) -> Result<Self, QuorumError> {
        if owners.is_empty() {
            return Err(QuorumError::NoOwners);
        }
        let mut seen: Vec<&Address> = Vec::with_capacity(owners.len());
        for owner in &owners {
            if owner.is_empty() {
                return Err(QuorumError::EmptyAddress);
            }
            if seen.contains(&owner) {
                return Err(QuorumError::DuplicateOwner(owner.clone()));
            }
            seen.push(owner);
        }
        Ok(Self { owners })
    }

    /// Set-membership test (linear scan; owner sets are small).
    pub fn contains(&self, address: &Address) -> bool {
        self.owners.contains(address)
    }

    /// Append a new identity. The caller has already checked uniqueness.
    pub fn append(&mut self, address: Address) {
        debug_assert!(!self.contains(&address));
        self.owners.push(address);
    }

    /// Remove an identity by value via swap-remove. Returns whether it was
    /// present. There is at most one occurrence by construction.
    pub fn swap_remove(&mut self, address: &Address) -> bool {
        match self.owners.iter().position(|o| o == address) {
            Some(idx) => {
                self.owners.swap_remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> u64 {
        self.owners.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.owners.iter()
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.owners
    }
}
