use covault_types::{Address, Amount, TokenId};
use thiserror::Error;

use crate::seq::SeqId;

/// Everything that can go wrong inside the quorum engines.
///
/// Variants are flat; [`QuorumError::kind`] maps each onto one of the three
/// failure classes callers care about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuorumError {
    // Authorization
    #[error("caller {0} is not an owner")]
    NotOwner(Address),

    // Validation — construction
    #[error("owner list must not be empty")]
    NoOwners,
    #[error("owner list contains duplicate {0}")]
    DuplicateOwner(Address),
    #[error("null identity")]
    EmptyAddress,
    #[error("threshold {threshold} out of range 1..={owners}")]
    ThresholdOutOfRange { threshold: u64, owners: u64 },
    #[error("validity window must be positive")]
    ZeroWindow,

    // Validation — governance
    #[error("In progress")]
    ProposalInProgress,
    #[error("{0} is already an owner")]
    AlreadyOwner(Address),
    #[error("delete target {0} is not an owner")]
    TargetNotOwner(Address),
    #[error("cannot add the wallet's own address as an owner")]
    OwnWalletAddress,
    #[error("proposal {0} not found")]
    ProposalNotFound(SeqId),
    #[error("proposal {0} has expired")]
    ProposalExpired(SeqId),
    #[error("proposal {0} already passed")]
    ProposalAlreadyPassed(SeqId),
    #[error("{voter} has already voted on proposal {id}")]
    AlreadyVoted { id: SeqId, voter: Address },
    #[error("{voter} has no affirmative vote on proposal {id} to withdraw")]
    NoAffirmativeVote { id: SeqId, voter: Address },

    // Validation — spend
    #[error("empty token identifier")]
    EmptyToken,
    #[error("amount must be positive")]
    ZeroAmount,
    #[error("insufficient wallet balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Amount, available: Amount },
    #[error("spend request {0} not found")]
    SpendNotFound(SeqId),
    #[error("spend request {0} has expired")]
    SpendExpired(SeqId),
    #[error("spend request {0} already passed")]
    SpendAlreadyPassed(SeqId),
    #[error("{approver} has already approved spend request {id}")]
    AlreadyApproved { id: SeqId, approver: Address },
    #[error("restated fields do not match spend request {id}: token {token}, recipient {recipient}, amount {amount}")]
    FieldMismatch {
        id: SeqId,
        token: TokenId,
        recipient: Address,
        amount: Amount,
    },
    #[error("only the sponsor may revoke spend request {0}")]
    NotSponsor(SeqId),

    #[error("sequence id counter overflow")]
    SeqIdOverflow,

    // External effect
    #[error("Abnormal transfer")]
    AbnormalTransfer,
}

/// The three failure classes callers distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller failed the owner gate. No state was touched.
    Authorization,
    /// Malformed input or an entity in the wrong state. No state was touched.
    Validation,
    /// The external transfer primitive reported failure. The triggering
    /// assent was already durably recorded and is retained.
    ExternalEffect,
}

impl QuorumError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner(_) => ErrorKind::Authorization,
            Self::AbnormalTransfer => ErrorKind::ExternalEffect,
            _ => ErrorKind::Validation,
        }
    }
}
