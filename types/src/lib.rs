//! Fundamental types for the covault custody core.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: identities, token identifiers, amounts, and the block-counter
//! tick used for expiry.

pub mod address;
pub mod amount;
pub mod tick;
pub mod token;

pub use address::Address;
pub use amount::Amount;
pub use tick::Tick;
pub use token::TokenId;
