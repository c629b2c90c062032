//! Observable wallet events.
//!
//! Every state transition emits an event carrying enough data for an
//! external observer to reconstruct the full history. Events accumulate in
//! an [`EventLog`] owned by the wallet; collaborators drain it after each
//! call. Each emission is also mirrored to `tracing`.

use covault_types::{Address, Amount, Tick, TokenId};
use serde::{Deserialize, Serialize};

use crate::membership::{ProposalAction, ProposalStatus};
use crate::seq::SeqId;

/// A notification emitted by one of the quorum engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletEvent {
    ProposalCreated {
        id: SeqId,
        sponsor: Address,
        action: ProposalAction,
        value: u64,
        expiry: Tick,
        payload: Vec<u8>,
    },
    Voted {
        id: SeqId,
        voter: Address,
        affirm: bool,
        payload: Vec<u8>,
    },
    ProposalResolved {
        id: SeqId,
        status: ProposalStatus,
    },
    SpendInitiated {
        id: SeqId,
        sponsor: Address,
        token: TokenId,
        recipient: Address,
        amount: Amount,
        expiry: Tick,
        payload: Vec<u8>,
    },
    SpendApproved {
        id: SeqId,
        approver: Address,
        payload: Vec<u8>,
    },
    SpendRevoked {
        id: SeqId,
        sponsor: Address,
        token: TokenId,
        recipient: Address,
        amount: Amount,
    },
    TransferExecuted {
        id: SeqId,
        recipient: Address,
        amount: Amount,
    },
}

/// Append-only event buffer, drained by the embedding application.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<WalletEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: WalletEvent) {
        tracing::debug!(?event, "wallet event");
        self.events.push(event);
    }

    /// All events emitted since the last drain.
    pub fn as_slice(&self) -> &[WalletEvent] {
        &self.events
    }

    /// Take the buffered events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<WalletEvent> {
        std::mem::take(&mut self.events)
    }
}
