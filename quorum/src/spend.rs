//! Spend engine — the transfer-approval quorum.
//!
//! Owns the spend-request lifecycle. Each request guards a single token
//! transfer out of the vault and executes it the instant its assent count
//! reaches the membership quorum's current threshold.

use std::collections::HashMap;

use covault_types::{Address, Amount, Tick, TokenId};
use serde::{Deserialize, Serialize};

use crate::error::QuorumError;
use crate::events::{EventLog, WalletEvent};
use crate::ledger::TokenLedger;
use crate::membership::MembershipQuorum;
use crate::seq::{SeqAllocator, SeqId};

/// Lifecycle status of a spend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpendStatus {
    Init,
    Passed,
}

/// A pending (or executed) token transfer out of the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendRequest {
    pub sponsor: Address,
    pub token: TokenId,
    pub recipient: Address,
    pub amount: Amount,
    /// Frozen at initiation from the window in force at that moment; later
    /// window changes do not touch in-flight requests.
    pub expires_at: Tick,
    /// Assenting owners, unique, in assent order. The sponsor is always
    /// first.
    pub assents: Vec<Address>,
    pub payload: Vec<u8>,
    pub status: SpendStatus,
}

/// The spend quorum engine.
///
/// Authorization and the live threshold/window are read from the
/// [`MembershipQuorum`] on every call; the threshold is *not* frozen at
/// initiation, so a governance change mid-flight moves the bar for every
/// open request.
#[derive(Debug, Default)]
pub struct SpendQuorum {
    requests: HashMap<SeqId, SpendRequest>,
}

impl SpendQuorum {
    pub fn new() -> Self {
        Self {
            requests: HashMap::new(),
        }
    }

    /// Look up a spend request. Revoked ids report non-existence forever.
    pub fn get_spend(&self, id: SeqId) -> Result<&SpendRequest, QuorumError> {
        self.requests.get(&id).ok_or(QuorumError::SpendNotFound(id))
    }

    /// The recorded assents for a request, in assent order.
    pub fn spend_assents(&self, id: SeqId) -> Result<&[Address], QuorumError> {
        self.get_spend(id).map(|r| r.assents.as_slice())
    }

    /// Open a spend request with the sponsor as its first assent, then
    /// evaluate quorum immediately (a threshold of 1 executes the transfer
    /// before this returns).
    ///
    /// If that immediate execution reaches the external transfer and the
    /// transfer fails, the call returns `AbnormalTransfer` but the request
    /// is already committed and stays open; its id is carried by the
    /// `SpendInitiated` event.
    #[allow(clippy::too_many_arguments)]
    pub fn initiate_transfer(
        &mut self,
        membership: &MembershipQuorum,
        seq: &mut SeqAllocator,
        events: &mut EventLog,
        ledger: &mut dyn TokenLedger,
        caller: &Address,
        token: TokenId,
        recipient: Address,
        amount: Amount,
        payload: Vec<u8>,
        now: Tick,
    ) -> Result<SeqId, QuorumError> {
        membership.require_owner(caller)?;
        if token.is_empty() {
            return Err(QuorumError::EmptyToken);
        }
        if recipient.is_empty() {
            return Err(QuorumError::EmptyAddress);
        }
        if amount.is_zero() {
            return Err(QuorumError::ZeroAmount);
        }
        let available = ledger.balance_of(&token, membership.wallet_address());
        if available < amount {
            return Err(QuorumError::InsufficientBalance {
                needed: amount,
                available,
            });
        }

        let id = seq.next_id()?;
        let expires_at = now.offset(membership.window());
        let request = SpendRequest {
            sponsor: caller.clone(),
            token: token.clone(),
            recipient: recipient.clone(),
            amount,
            expires_at,
            assents: vec![caller.clone()],
            payload: payload.clone(),
            status: SpendStatus::Init,
        };
        self.requests.insert(id, request);

        tracing::info!(
            id,
            sponsor = %caller,
            %token,
            %recipient,
            %amount,
            %expires_at,
            "spend request initiated"
        );
        events.emit(WalletEvent::SpendInitiated {
            id,
            sponsor: caller.clone(),
            token,
            recipient,
            amount,
            expiry: expires_at,
            payload: payload.clone(),
        });
        events.emit(WalletEvent::SpendApproved {
            id,
            approver: caller.clone(),
            payload,
        });

        self.try_execute(membership, events, ledger, id)?;
        Ok(id)
    }

    /// Record an assent on an open request.
    ///
    /// The approver restates token, recipient and amount; a mismatch with
    /// the stored request rejects the approval (tamper evidence). Reaching
    /// quorum invokes the external transfer: on failure the call errors but
    /// the assent just recorded is retained for a retry; on success the
    /// request passes, terminally.
    #[allow(clippy::too_many_arguments)]
    pub fn approve(
        &mut self,
        membership: &MembershipQuorum,
        events: &mut EventLog,
        ledger: &mut dyn TokenLedger,
        caller: &Address,
        id: SeqId,
        recipient: &Address,
        token: &TokenId,
        amount: Amount,
        payload: Vec<u8>,
        now: Tick,
    ) -> Result<(), QuorumError> {
        membership.require_owner(caller)?;

        let request = self.requests.get_mut(&id).ok_or(QuorumError::SpendNotFound(id))?;
        if request.status == SpendStatus::Passed {
            return Err(QuorumError::SpendAlreadyPassed(id));
        }
        if now > request.expires_at {
            return Err(QuorumError::SpendExpired(id));
        }
        if request.token != *token || request.recipient != *recipient || request.amount != amount {
            return Err(QuorumError::FieldMismatch {
                id,
                token: token.clone(),
                recipient: recipient.clone(),
                amount,
            });
        }
        if request.assents.contains(caller) {
            return Err(QuorumError::AlreadyApproved {
                id,
                approver: caller.clone(),
            });
        }

        request.assents.push(caller.clone());
        tracing::debug!(id, approver = %caller, assents = request.assents.len(), "spend approved");
        events.emit(WalletEvent::SpendApproved {
            id,
            approver: caller.clone(),
            payload,
        });

        self.try_execute(membership, events, ledger, id)
    }

    /// Delete an open request. Sponsor-only; the id becomes permanently
    /// vacant rather than transitioning to a terminal status.
    pub fn revoke(
        &mut self,
        membership: &MembershipQuorum,
        events: &mut EventLog,
        caller: &Address,
        id: SeqId,
        now: Tick,
    ) -> Result<(), QuorumError> {
        membership.require_owner(caller)?;

        let request = self.requests.get(&id).ok_or(QuorumError::SpendNotFound(id))?;
        if request.sponsor != *caller {
            return Err(QuorumError::NotSponsor(id));
        }
        if request.status == SpendStatus::Passed {
            return Err(QuorumError::SpendAlreadyPassed(id));
        }
        if now > request.expires_at {
            return Err(QuorumError::SpendExpired(id));
        }

        let request = self.requests.remove(&id).expect("checked above");
        tracing::info!(id, sponsor = %caller, "spend request revoked");
        events.emit(WalletEvent::SpendRevoked {
            id,
            sponsor: request.sponsor,
            token: request.token,
            recipient: request.recipient,
            amount: request.amount,
        });
        Ok(())
    }

    /// Invoke the external transfer if the assent count has reached the
    /// membership quorum's threshold, read live at this instant.
    ///
    /// A `false` from the ledger aborts the triggering call with
    /// `AbnormalTransfer`; everything recorded before the invocation stays.
    fn try_execute(
        &mut self,
        membership: &MembershipQuorum,
        events: &mut EventLog,
        ledger: &mut dyn TokenLedger,
        id: SeqId,
    ) -> Result<(), QuorumError> {
        let request = self.requests.get_mut(&id).expect("request exists");
        if request.status == SpendStatus::Passed {
            return Ok(());
        }
        if (request.assents.len() as u64) < membership.threshold() {
            return Ok(());
        }

        if !ledger.transfer(&request.token, &request.recipient, request.amount) {
            tracing::warn!(id, token = %request.token, "external transfer failed");
            return Err(QuorumError::AbnormalTransfer);
        }

        request.status = SpendStatus::Passed;
        tracing::info!(
            id,
            recipient = %request.recipient,
            amount = %request.amount,
            "transfer executed"
        );
        events.emit(WalletEvent::TransferExecuted {
            id,
            recipient: request.recipient.clone(),
            amount: request.amount,
        });
        Ok(())
    }
}

