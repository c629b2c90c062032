//! The custody wallet — coordinating parent of the two quorum engines.
//!
//! Owns the [`MembershipQuorum`], the [`SpendQuorum`], the shared sequence
//! allocator and the event log, and exposes the public operation surface.
//! Time and the token ledger are collaborators passed into each call.

use covault_types::{Address, Amount, Tick, TokenId};

use crate::error::QuorumError;
use crate::events::{EventLog, WalletEvent};
use crate::ledger::TokenLedger;
use crate::membership::{MembershipQuorum, Proposal, ProposalAction};
use crate::owners::OwnerSet;
use crate::seq::{SeqAllocator, SeqId};
use crate::spend::{SpendQuorum, SpendRequest};

/// Construction-time configuration.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// The wallet's own identity (never admissible as an owner).
    pub wallet_address: Address,
    /// Initial owners: non-empty, unique, no null identities.
    pub owners: Vec<Address>,
    /// Initial approval threshold, `1..=|owners|`.
    pub threshold: u64,
    /// Initial validity window in ticks, positive.
    pub window: u64,
}

/// A multi-signature custody wallet core.
#[derive(Debug)]
pub struct CustodyWallet {
    membership: MembershipQuorum,
    spend: SpendQuorum,
    seq: SeqAllocator,
    events: EventLog,
}

impl CustodyWallet {
    pub fn new(config: WalletConfig) -> Result<Self, QuorumError> {
        let owners = OwnerSet::new(config.owners)?;
        let membership = MembershipQuorum::new(
            config.wallet_address,
            owners,
            config.threshold,
            config.window,
        )?;
        Ok(Self {
            membership,
            spend: SpendQuorum::new(),
            seq: SeqAllocator::new(),
            events: EventLog::new(),
        })
    }

    // ---- reads ----

    pub fn is_owner(&self, address: &Address) -> bool {
        self.membership.is_owner(address)
    }

    pub fn owners(&self) -> &OwnerSet {
        self.membership.owners()
    }

    pub fn threshold(&self) -> u64 {
        self.membership.threshold()
    }

    pub fn window(&self) -> u64 {
        self.membership.window()
    }

    pub fn wallet_address(&self) -> &Address {
        self.membership.wallet_address()
    }

    pub fn get_proposal(&self, id: SeqId) -> Result<&Proposal, QuorumError> {
        self.membership.get_proposal(id)
    }

    pub fn proposal_votes(&self, id: SeqId) -> Result<&[Address], QuorumError> {
        self.membership.proposal_votes(id)
    }

    pub fn get_spend(&self, id: SeqId) -> Result<&SpendRequest, QuorumError> {
        self.spend.get_spend(id)
    }

    pub fn spend_assents(&self, id: SeqId) -> Result<&[Address], QuorumError> {
        self.spend.spend_assents(id)
    }

    /// Events emitted since the last drain.
    pub fn events(&self) -> &[WalletEvent] {
        self.events.as_slice()
    }

    pub fn drain_events(&mut self) -> Vec<WalletEvent> {
        self.events.drain()
    }

    // ---- governance ----

    pub fn create_proposal(
        &mut self,
        caller: &Address,
        action: ProposalAction,
        value: u64,
        payload: Vec<u8>,
        now: Tick,
    ) -> Result<SeqId, QuorumError> {
        self.membership
            .create_proposal(&mut self.seq, &mut self.events, caller, action, value, payload, now)
    }

    pub fn vote(
        &mut self,
        caller: &Address,
        id: SeqId,
        affirm: bool,
        payload: Vec<u8>,
        now: Tick,
    ) -> Result<(), QuorumError> {
        self.membership
            .vote(&mut self.events, caller, id, affirm, payload, now)
    }

    // ---- spend ----

    #[allow(clippy::too_many_arguments)]
    pub fn initiate_transfer(
        &mut self,
        caller: &Address,
        token: TokenId,
        recipient: Address,
        amount: Amount,
        payload: Vec<u8>,
        ledger: &mut dyn TokenLedger,
        now: Tick,
    ) -> Result<SeqId, QuorumError> {
        self.spend.initiate_transfer(
            &self.membership,
            &mut self.seq,
            &mut self.events,
            ledger,
            caller,
            token,
            recipient,
            amount,
            payload,
            now,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn approve(
        &mut self,
        caller: &Address,
        id: SeqId,
        recipient: &Address,
        token: &TokenId,
        amount: Amount,
        payload: Vec<u8>,
        ledger: &mut dyn TokenLedger,
        now: Tick,
    ) -> Result<(), QuorumError> {
        self.spend.approve(
            &self.membership,
            &mut self.events,
            ledger,
            caller,
            id,
            recipient,
            token,
            amount,
            payload,
            now,
        )
    }

    pub fn revoke(&mut self, caller: &Address, id: SeqId, now: Tick) -> Result<(), QuorumError> {
        self.spend
            .revoke(&self.membership, &mut self.events, caller, id, now)
    }
}

