//! Dual voting/quorum engine for a multi-signature custody wallet.
//!
//! Two structurally similar, independently-stateful approval machines:
//! [`MembershipQuorum`] governs the owner set, the approval threshold and
//! the validity window; [`SpendQuorum`] governs token transfers out of the
//! vault, gated and parameterized by the membership engine. Both execute
//! exactly once on quorum, in the call that reaches it.
//!
//! Execution model: strictly sequential. Every operation receives the
//! current tick and any external collaborators as arguments, validates
//! fully before mutating, and leaves all invariants satisfied on return.
//! The single deliberate exception is a failing external transfer, which
//! surfaces after the triggering assent was recorded (see [`error`]).

pub mod error;
pub mod events;
pub mod ledger;
pub mod membership;
pub mod owners;
pub mod seq;
pub mod spend;
pub mod wallet;

pub use error::{ErrorKind, QuorumError};
pub use events::{EventLog, WalletEvent};
pub use ledger::TokenLedger;
pub use membership::{MembershipQuorum, Proposal, ProposalAction, ProposalStatus};
pub use owners::OwnerSet;
pub use seq::{SeqAllocator, SeqId};
pub use spend::{SpendQuorum, SpendRequest, SpendStatus};
pub use wallet::{CustodyWallet, WalletConfig};
