//! Nullable infrastructure for deterministic testing.
//!
//! The custody core's external collaborators (the tick source and the token
//! ledger) are abstracted behind arguments and traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod ledger;

pub use clock::NullClock;
pub use ledger::{NullLedger, TransferRecord};
