//! Governance engine — the membership quorum.
//!
//! Owns the owner set, the approval threshold and the validity window, and
//! the governance-proposal lifecycle that is the only way to mutate them.
//! A proposal passes the instant its affirmative vote count reaches the
//! threshold, applying its effect synchronously in the same call.

use std::collections::HashMap;

use covault_types::{Address, Tick};
use serde::{Deserialize, Serialize};

use crate::error::QuorumError;
use crate::events::{EventLog, WalletEvent};
use crate::owners::OwnerSet;
use crate::seq::{SeqAllocator, SeqId};

/// What a governance proposal changes.
///
/// Add/Delete carry the affected identity; all four carry a target value
/// (the new threshold for Add/Delete/ChangeThreshold, the new window for
/// ChangeWindow) on the [`Proposal`] itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalAction {
    AddOwner { owner: Address },
    DeleteOwner { owner: Address },
    ChangeWindow,
    ChangeThreshold,
}

/// Lifecycle status of a proposal. `Init` proposals stop being votable once
/// their expiry tick passes; no transition marks that, it is recomputed on
/// every access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    Init,
    Passed,
}

/// A governance proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub sponsor: Address,
    pub action: ProposalAction,
    /// New threshold or new window, depending on the action.
    pub value: u64,
    pub payload: Vec<u8>,
    pub created_at: Tick,
    pub expires_at: Tick,
    pub status: ProposalStatus,
}

impl Proposal {
    /// Still collecting votes: not passed and not past its expiry tick.
    pub fn in_progress(&self, now: Tick) -> bool {
        self.status == ProposalStatus::Init && self.expires_at >= now
    }
}

/// The governance quorum engine.
///
/// The vote ledger is a single insertion-ordered affirmative list per
/// proposal: a negative vote removes the voter from it, so "never voted"
/// and "voted no" are indistinguishable.
#[derive(Debug)]
pub struct MembershipQuorum {
    /// The wallet's own identity; never admissible as an owner.
    wallet_address: Address,
    owners: OwnerSet,
    threshold: u64,
    /// Validity window in ticks for new proposals and spend requests.
    window: u64,
    proposals: HashMap<SeqId, Proposal>,
    votes: HashMap<SeqId, Vec<Address>>,
    /// Most recently created proposal id. The "one proposal in progress"
    /// rule inspects only this id, never the full history.
    latest: Option<SeqId>,
}

impl MembershipQuorum {
    pub fn new(
        wallet_address: Address,
        owners: OwnerSet,
        threshold: u64,
        window: u64,
    ) -> Result<Self, QuorumError> {
        if threshold == 0 || threshold > owners.len() {
            return Err(QuorumError::ThresholdOutOfRange {
                threshold,
                owners: owners.len(),
            });
        }
        if window == 0 {
            return Err(QuorumError::ZeroWindow);
        }
        Ok(Self {
            wallet_address,
            owners,
            threshold,
            window,
            proposals: HashMap::new(),
            votes: HashMap::new(),
            latest: None,
        })
    }

    /// The authorization gate used by every public operation in both
    /// engines.
    pub fn is_owner(&self, address: &Address) -> bool {
        self.owners.contains(address)
    }

    /// Fail with an authorization error unless `caller` is a current owner.
    pub fn require_owner(&self, caller: &Address) -> Result<(), QuorumError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(QuorumError::NotOwner(caller.clone()))
        }
    }

    pub fn owners(&self) -> &OwnerSet {
        &self.owners
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn window(&self) -> u64 {
        self.window
    }

    pub fn wallet_address(&self) -> &Address {
        &self.wallet_address
    }

    pub fn get_proposal(&self, id: SeqId) -> Result<&Proposal, QuorumError> {
        self.proposals.get(&id).ok_or(QuorumError::ProposalNotFound(id))
    }

    /// The recorded affirmative votes for a proposal, in voting order.
    pub fn proposal_votes(&self, id: SeqId) -> Result<&[Address], QuorumError> {
        self.votes
            .get(&id)
            .map(Vec::as_slice)
            .ok_or(QuorumError::ProposalNotFound(id))
    }

    /// Create a governance proposal.
    ///
    /// The sponsor's own affirmative vote is recorded immediately and quorum
    /// is evaluated in the same call, so with threshold 1 the proposal
    /// executes before this returns.
    pub fn create_proposal(
        &mut self,
        seq: &mut SeqAllocator,
        events: &mut EventLog,
        caller: &Address,
        action: ProposalAction,
        value: u64,
        payload: Vec<u8>,
        now: Tick,
    ) -> Result<SeqId, QuorumError> {
        self.require_owner(caller)?;

        // Only the most recent proposal is inspected; older Init proposals
        // are necessarily expired by construction of this very check.
        if let Some(latest) = self.latest {
            if self.proposals[&latest].in_progress(now) {
                return Err(QuorumError::ProposalInProgress);
            }
        }

        match &action {
            ProposalAction::AddOwner { owner } => {
                if owner.is_empty() {
                    return Err(QuorumError::EmptyAddress);
                }
                if self.owners.contains(owner) {
                    return Err(QuorumError::AlreadyOwner(owner.clone()));
                }
                if *owner == self.wallet_address {
                    return Err(QuorumError::OwnWalletAddress);
                }
                let after = self.owners.len() + 1;
                if value == 0 || value > after {
                    return Err(QuorumError::ThresholdOutOfRange {
                        threshold: value,
                        owners: after,
                    });
                }
            }
            ProposalAction::DeleteOwner { owner } => {
                if !self.owners.contains(owner) {
                    return Err(QuorumError::TargetNotOwner(owner.clone()));
                }
                let after = self.owners.len() - 1;
                if value == 0 || value > after {
                    return Err(QuorumError::ThresholdOutOfRange {
                        threshold: value,
                        owners: after,
                    });
                }
            }
            ProposalAction::ChangeWindow => {
                if value == 0 {
                    return Err(QuorumError::ZeroWindow);
                }
            }
            ProposalAction::ChangeThreshold => {
                if value == 0 || value > self.owners.len() {
                    return Err(QuorumError::ThresholdOutOfRange {
                        threshold: value,
                        owners: self.owners.len(),
                    });
                }
            }
        }

        let id = seq.next_id()?;
        let expires_at = now.offset(self.window);
        let proposal = Proposal {
            sponsor: caller.clone(),
            action: action.clone(),
            value,
            payload: payload.clone(),
            created_at: now,
            expires_at,
            status: ProposalStatus::Init,
        };
        self.proposals.insert(id, proposal);
        self.votes.insert(id, vec![caller.clone()]);
        self.latest = Some(id);

        tracing::info!(id, sponsor = %caller, ?action, value, %expires_at, "proposal created");
        events.emit(WalletEvent::ProposalCreated {
            id,
            sponsor: caller.clone(),
            action,
            value,
            expiry: expires_at,
            payload: payload.clone(),
        });
        events.emit(WalletEvent::Voted {
            id,
            voter: caller.clone(),
            affirm: true,
            payload,
        });

        self.evaluate_quorum(events, id);
        Ok(id)
    }

    /// Cast or withdraw a vote on an in-progress proposal.
    ///
    /// An affirmative vote appends the caller to the proposal's vote list;
    /// a negative vote removes a previously recorded affirmative. A no-op
    /// in either direction is rejected, not silently ignored.
    pub fn vote(
        &mut self,
        events: &mut EventLog,
        caller: &Address,
        id: SeqId,
        affirm: bool,
        payload: Vec<u8>,
        now: Tick,
    ) -> Result<(), QuorumError> {
        self.require_owner(caller)?;

        let proposal = self
            .proposals
            .get(&id)
            .ok_or(QuorumError::ProposalNotFound(id))?;
        if proposal.status == ProposalStatus::Passed {
            return Err(QuorumError::ProposalAlreadyPassed(id));
        }
        if now > proposal.expires_at {
            return Err(QuorumError::ProposalExpired(id));
        }

        let votes = self.votes.get_mut(&id).expect("vote ledger exists for every proposal");
        if affirm {
            if votes.contains(caller) {
                return Err(QuorumError::AlreadyVoted {
                    id,
                    voter: caller.clone(),
                });
            }
            votes.push(caller.clone());
        } else {
            if !votes.contains(caller) {
                return Err(QuorumError::NoAffirmativeVote {
                    id,
                    voter: caller.clone(),
                });
            }
            votes.retain(|v| v != caller);
        }

        tracing::debug!(id, voter = %caller, affirm, "vote recorded");
        events.emit(WalletEvent::Voted {
            id,
            voter: caller.clone(),
            affirm,
            payload,
        });

        self.evaluate_quorum(events, id);
        Ok(())
    }

    /// Pass the proposal and apply its effect if the vote count has reached
    /// the threshold. Terminal: a passed proposal is never revisited.
    fn evaluate_quorum(&mut self, events: &mut EventLog, id: SeqId) {
        let count = self.votes[&id].len() as u64;
        if count < self.threshold {
            return;
        }
        let proposal = self.proposals.get_mut(&id).expect("proposal exists");
        if proposal.status == ProposalStatus::Passed {
            return;
        }
        proposal.status = ProposalStatus::Passed;
        let action = proposal.action.clone();
        let value = proposal.value;

        tracing::info!(id, ?action, value, votes = count, "proposal passed");
        events.emit(WalletEvent::ProposalResolved {
            id,
            status: ProposalStatus::Passed,
        });

        // The creation-time range checks keep `1 <= threshold <= |owners|`
        // without re-validation here: membership cannot change between
        // creation and quorum because no second proposal can be in flight.
        match action {
            ProposalAction::AddOwner { owner } => {
                self.owners.append(owner);
                self.threshold = value;
            }
            ProposalAction::DeleteOwner { owner } => {
                self.owners.swap_remove(&owner);
                self.threshold = value;
            }
            ProposalAction::ChangeWindow => {
                self.window = value;
            }
            ProposalAction::ChangeThreshold => {
                self.threshold = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    fn quorum(names: &[&str], threshold: u64, window: u64) -> MembershipQuorum {
        let owners = OwnerSet::new(names.iter().map(|n| addr(n)).collect()).unwrap();
        MembershipQuorum::new(addr("wallet"), owners, threshold, window).unwrap()
    }

    struct Ctx {
        seq: SeqAllocator,
        events: EventLog,
    }

    impl Ctx {
        fn new() -> Self {
            Self {
                seq: SeqAllocator::new(),
                events: EventLog::new(),
            }
        }
    }

    #[test]
    fn construction_validates_threshold_and_window() {
        let owners = OwnerSet::new(vec![addr("a"), addr("b")]).unwrap();
        assert!(matches!(
            MembershipQuorum::new(addr("w"), owners.clone(), 3, 10).unwrap_err(),
            QuorumError::ThresholdOutOfRange { threshold: 3, owners: 2 }
        ));
        assert_eq!(
            MembershipQuorum::new(addr("w"), owners.clone(), 0, 10).unwrap_err(),
            QuorumError::ThresholdOutOfRange { threshold: 0, owners: 2 }
        );
        assert_eq!(
            MembershipQuorum::new(addr("w"), owners, 2, 0).unwrap_err(),
            QuorumError::ZeroWindow
        );
    }

    #[test]
    fn non_owner_cannot_create() {
        let mut q = quorum(&["a", "b"], 2, 10);
        let mut ctx = Ctx::new();
        let err = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("x"),
                ProposalAction::ChangeThreshold,
                1,
                vec![],
                Tick::new(0),
            )
            .unwrap_err();
        assert_eq!(err, QuorumError::NotOwner(addr("x")));
    }

    #[test]
    fn add_owner_validation() {
        let mut q = quorum(&["a", "b"], 2, 10);
        let mut ctx = Ctx::new();
        let now = Tick::new(0);

        let err = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::AddOwner { owner: addr("b") },
                2,
                vec![],
                now,
            )
            .unwrap_err();
        assert_eq!(err, QuorumError::AlreadyOwner(addr("b")));

        let err = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::AddOwner {
                    owner: Address::empty(),
                },
                2,
                vec![],
                now,
            )
            .unwrap_err();
        assert_eq!(err, QuorumError::EmptyAddress);

        let err = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::AddOwner {
                    owner: addr("wallet"),
                },
                2,
                vec![],
                now,
            )
            .unwrap_err();
        assert_eq!(err, QuorumError::OwnWalletAddress);

        // New threshold may be at most |owners|+1.
        let err = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::AddOwner { owner: addr("c") },
                4,
                vec![],
                now,
            )
            .unwrap_err();
        assert!(matches!(err, QuorumError::ThresholdOutOfRange { .. }));
    }

    #[test]
    fn add_owner_passes_and_mutates() {
        let mut q = quorum(&["a", "b"], 2, 10);
        let mut ctx = Ctx::new();
        let now = Tick::new(5);

        let id = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::AddOwner { owner: addr("c") },
                3,
                b"welcome c".to_vec(),
                now,
            )
            .unwrap();
        assert_eq!(q.get_proposal(id).unwrap().status, ProposalStatus::Init);
        assert_eq!(q.proposal_votes(id).unwrap(), &[addr("a")]);

        q.vote(&mut ctx.events, &addr("b"), id, true, vec![], now)
            .unwrap();
        assert_eq!(q.get_proposal(id).unwrap().status, ProposalStatus::Passed);
        assert!(q.is_owner(&addr("c")));
        assert_eq!(q.threshold(), 3);
    }

    #[test]
    fn delete_owner_passes_and_mutates() {
        let mut q = quorum(&["a", "b", "c"], 2, 10);
        let mut ctx = Ctx::new();
        let now = Tick::new(0);

        let id = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("c"),
                ProposalAction::DeleteOwner { owner: addr("b") },
                1,
                vec![],
                now,
            )
            .unwrap();
        q.vote(&mut ctx.events, &addr("a"), id, true, vec![], now)
            .unwrap();
        assert!(!q.is_owner(&addr("b")));
        assert_eq!(q.threshold(), 1);
        assert_eq!(q.owners().len(), 2);
    }

    #[test]
    fn threshold_one_executes_on_creation() {
        let mut q = quorum(&["a", "b"], 1, 10);
        let mut ctx = Ctx::new();

        let id = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::ChangeWindow,
                50,
                vec![],
                Tick::new(0),
            )
            .unwrap();
        assert_eq!(q.get_proposal(id).unwrap().status, ProposalStatus::Passed);
        assert_eq!(q.window(), 50);
    }

    #[test]
    fn second_proposal_while_in_progress_fails() {
        let mut q = quorum(&["a", "b", "c"], 2, 10);
        let mut ctx = Ctx::new();
        let now = Tick::new(0);

        q.create_proposal(
            &mut ctx.seq,
            &mut ctx.events,
            &addr("a"),
            ProposalAction::ChangeWindow,
            20,
            vec![],
            now,
        )
        .unwrap();
        let err = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("b"),
                ProposalAction::ChangeThreshold,
                3,
                vec![],
                now,
            )
            .unwrap_err();
        assert_eq!(err, QuorumError::ProposalInProgress);
    }

    #[test]
    fn expired_proposal_unblocks_creation_and_rejects_votes() {
        let mut q = quorum(&["a", "b", "c"], 2, 10);
        let mut ctx = Ctx::new();

        let id = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::ChangeWindow,
                20,
                vec![],
                Tick::new(0),
            )
            .unwrap();

        // Still votable at the expiry tick itself.
        assert!(q.get_proposal(id).unwrap().in_progress(Tick::new(10)));

        // One past expiry: no longer votable, and no longer blocking.
        let err = q
            .vote(&mut ctx.events, &addr("b"), id, true, vec![], Tick::new(11))
            .unwrap_err();
        assert_eq!(err, QuorumError::ProposalExpired(id));

        let id2 = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("b"),
                ProposalAction::ChangeThreshold,
                3,
                vec![],
                Tick::new(11),
            )
            .unwrap();
        assert_ne!(id, id2);
    }

    #[test]
    fn double_affirmative_vote_fails() {
        let mut q = quorum(&["a", "b", "c"], 3, 10);
        let mut ctx = Ctx::new();
        let now = Tick::new(0);

        let id = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::ChangeWindow,
                20,
                vec![],
                now,
            )
            .unwrap();
        let err = q
            .vote(&mut ctx.events, &addr("a"), id, true, vec![], now)
            .unwrap_err();
        assert_eq!(
            err,
            QuorumError::AlreadyVoted {
                id,
                voter: addr("a")
            }
        );
    }

    #[test]
    fn negative_vote_requires_prior_affirmative() {
        let mut q = quorum(&["a", "b", "c"], 3, 10);
        let mut ctx = Ctx::new();
        let now = Tick::new(0);

        let id = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::ChangeWindow,
                20,
                vec![],
                now,
            )
            .unwrap();

        let err = q
            .vote(&mut ctx.events, &addr("b"), id, false, vec![], now)
            .unwrap_err();
        assert_eq!(
            err,
            QuorumError::NoAffirmativeVote {
                id,
                voter: addr("b")
            }
        );

        // Withdrawal removes the sponsor's own vote; a second withdrawal
        // then fails because absence == never voted.
        q.vote(&mut ctx.events, &addr("a"), id, false, vec![], now)
            .unwrap();
        assert!(q.proposal_votes(id).unwrap().is_empty());
        let err = q
            .vote(&mut ctx.events, &addr("a"), id, false, vec![], now)
            .unwrap_err();
        assert_eq!(
            err,
            QuorumError::NoAffirmativeVote {
                id,
                voter: addr("a")
            }
        );
    }

    #[test]
    fn passed_proposal_rejects_further_votes() {
        let mut q = quorum(&["a", "b", "c"], 2, 10);
        let mut ctx = Ctx::new();
        let now = Tick::new(0);

        let id = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::ChangeThreshold,
                3,
                vec![],
                now,
            )
            .unwrap();
        q.vote(&mut ctx.events, &addr("b"), id, true, vec![], now)
            .unwrap();
        assert_eq!(q.threshold(), 3);

        let err = q
            .vote(&mut ctx.events, &addr("c"), id, true, vec![], now)
            .unwrap_err();
        assert_eq!(err, QuorumError::ProposalAlreadyPassed(id));
    }

    #[test]
    fn vote_on_unknown_id_fails() {
        let mut q = quorum(&["a", "b"], 2, 10);
        let mut ctx = Ctx::new();
        let err = q
            .vote(&mut ctx.events, &addr("a"), 42, true, vec![], Tick::new(0))
            .unwrap_err();
        assert_eq!(err, QuorumError::ProposalNotFound(42));
    }

    #[test]
    fn events_record_full_history() {
        let mut q = quorum(&["a", "b"], 2, 10);
        let mut ctx = Ctx::new();
        let now = Tick::new(0);

        let id = q
            .create_proposal(
                &mut ctx.seq,
                &mut ctx.events,
                &addr("a"),
                ProposalAction::ChangeWindow,
                99,
                b"p".to_vec(),
                now,
            )
            .unwrap();
        q.vote(&mut ctx.events, &addr("b"), id, true, vec![], now)
            .unwrap();

        let events = ctx.events.drain();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], WalletEvent::ProposalCreated { .. }));
        assert!(matches!(
            events[1],
            WalletEvent::Voted { affirm: true, .. }
        ));
        assert!(matches!(events[2], WalletEvent::Voted { .. }));
        assert!(matches!(
            events[3],
            WalletEvent::ProposalResolved {
                status: ProposalStatus::Passed,
                ..
            }
        ));
    }
}
