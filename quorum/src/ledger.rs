//! The external value-transfer interface.

use covault_types::{Address, Amount, TokenId};

/// The token side of the world, as the custody core sees it.
///
/// Implementations live outside this crate (the host chain in production,
/// `covault_nullables::NullLedger` in tests). Both calls are treated as
/// atomic: a transfer either fully succeeds or fully fails, and `false`
/// means the tokens did not move.
pub trait TokenLedger {
    /// Balance of `holder` in `token`, read once per spend initiation.
    fn balance_of(&self, token: &TokenId, holder: &Address) -> Amount;

    /// Move `amount` of `token` from the wallet to `recipient`.
    /// All-or-nothing; returns whether the transfer took effect.
    fn transfer(&mut self, token: &TokenId, recipient: &Address, amount: Amount) -> bool;
}
