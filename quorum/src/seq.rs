//! The global sequence-id allocator.
//!
//! Proposals and spend requests draw ids from one shared counter, so an id
//! names exactly one entity ever, of either kind. Ids are never reused, not
//! even after a revocation vacates one.

use serde::{Deserialize, Serialize};

use crate::error::QuorumError;

/// Identifier of a proposal or spend request.
pub type SeqId = u64;

/// Allocates monotonically increasing [`SeqId`]s.
///
/// Owned by the coordinating wallet and lent to both engines by reference,
/// so the two entity kinds cannot collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeqAllocator {
    next: SeqId,
}

impl SeqAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Hand out the next id.
    pub fn next_id(&mut self) -> Result<SeqId, QuorumError> {
        let id = self.next;
        self.next = self.next.checked_add(1).ok_or(QuorumError::SeqIdOverflow)?;
        Ok(id)
    }

    /// The most recently allocated id, if any.
    pub fn last_allocated(&self) -> Option<SeqId> {
        if self.next > 1 {
            Some(self.next - 1)
        } else {
            None
        }
    }
}

impl Default for SeqAllocator {
    fn default() -> Self {
        Self::new()
    }
}
