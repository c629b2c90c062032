//! Nullable token ledger — in-memory balances with programmable failure.

use covault_quorum::TokenLedger;
use covault_types::{Address, Amount, TokenId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// A transfer the ledger carried out, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub token: TokenId,
    pub recipient: Address,
    pub amount: Amount,
}

/// An in-memory [`TokenLedger`] for testing.
///
/// Balances are seeded per (token, holder); transfers debit the wallet and
/// credit the recipient, and are journaled for inspection. Flip
/// [`NullLedger::fail_transfers`] to make every transfer report failure
/// without moving anything, the way a misbehaving token contract would.
pub struct NullLedger {
    balances: RefCell<HashMap<(TokenId, Address), Amount>>,
    transfers: RefCell<Vec<TransferRecord>>,
    fail: Cell<bool>,
    /// The holder to debit on transfer — the wallet under test.
    wallet: RefCell<Option<Address>>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self {
            balances: RefCell::new(HashMap::new()),
            transfers: RefCell::new(Vec::new()),
            fail: Cell::new(false),
            wallet: RefCell::new(None),
        }
    }

    /// Seed (or overwrite) a balance. The first holder seeded is assumed to
    /// be the wallet and is the account debited by transfers.
    pub fn set_balance(&self, token: &TokenId, holder: &Address, amount: Amount) {
        if self.wallet.borrow().is_none() {
            *self.wallet.borrow_mut() = Some(holder.clone());
        }
        self.balances
            .borrow_mut()
            .insert((token.clone(), holder.clone()), amount);
    }

    /// Make every subsequent transfer report failure (or stop doing so).
    pub fn fail_transfers(&self, fail: bool) {
        self.fail.set(fail);
    }

    /// Transfers carried out so far.
    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.transfers.borrow().clone()
    }
}

impl Default for NullLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenLedger for NullLedger {
    fn balance_of(&self, token: &TokenId, holder: &Address) -> Amount {
        self.balances
            .borrow()
            .get(&(token.clone(), holder.clone()))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn transfer(&mut self, token: &TokenId, recipient: &Address, amount: Amount) -> bool {
        if self.fail.get() {
            return false;
        }
        let wallet = match self.wallet.borrow().clone() {
            Some(w) => w,
            None => return false,
        };
        let mut balances = self.balances.borrow_mut();
        let from_key = (token.clone(), wallet);
        let held = balances.get(&from_key).copied().unwrap_or(Amount::ZERO);
        let held = match held.checked_sub(amount) {
            Some(rest) => rest,
            None => return false,
        };
        balances.insert(from_key, held);
        let to_key = (token.clone(), recipient.clone());
        let credited = balances
            .get(&to_key)
            .copied()
            .unwrap_or(Amount::ZERO)
            .checked_add(amount)
            .expect("test balances fit in u128");
        balances.insert(to_key, credited);
        drop(balances);

        self.transfers.borrow_mut().push(TransferRecord {
            token: token.clone(),
            recipient: recipient.clone(),
            amount,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    #[test]
    fn transfer_moves_balance_and_journals() {
        let mut ledger = NullLedger::new();
        let token = TokenId::new("t");
        ledger.set_balance(&token, &addr("wallet"), Amount::new(100));

        assert!(ledger.transfer(&token, &addr("r"), Amount::new(40)));
        assert_eq!(ledger.balance_of(&token, &addr("wallet")), Amount::new(60));
        assert_eq!(ledger.balance_of(&token, &addr("r")), Amount::new(40));
        assert_eq!(ledger.transfers().len(), 1);
    }

    #[test]
    fn forced_failure_moves_nothing() {
        let mut ledger = NullLedger::new();
        let token = TokenId::new("t");
        ledger.set_balance(&token, &addr("wallet"), Amount::new(100));
        ledger.fail_transfers(true);

        assert!(!ledger.transfer(&token, &addr("r"), Amount::new(40)));
        assert_eq!(ledger.balance_of(&token, &addr("wallet")), Amount::new(100));
        assert!(ledger.transfers().is_empty());
    }

    #[test]
    fn overdraw_reports_failure() {
        let mut ledger = NullLedger::new();
        let token = TokenId::new("t");
        ledger.set_balance(&token, &addr("wallet"), Amount::new(10));
        assert!(!ledger.transfer(&token, &addr("r"), Amount::new(40)));
    }
}
