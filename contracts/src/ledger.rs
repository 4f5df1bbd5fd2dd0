//! Balance and allowance bookkeeping shared by the mock tokens.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::mock_errors::MockError;

#[odra::module]
pub struct Ledger {
    total_supply: Var<U256>,
    balances: Mapping<Address, U256>,
    /// (owner, spender) -> amount
    allowances: Mapping<(Address, Address), U256>,
}

#[odra::module]
impl Ledger {
    pub fn total_supply(&self) -> U256 {
        self.total_supply.get().unwrap_or_default()
    }

    pub fn balance_of(&self, address: Address) -> U256 {
        self.balances.get(&address).unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances.get(&(owner, spender)).unwrap_or_default()
    }

    pub fn mint(&mut self, to: Address, amount: U256) {
        let balance = self.balance_of(to);
        self.balances.set(&to, balance + amount);
        self.total_supply.set(self.total_supply() + amount);
    }

    pub fn set_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.set(&(owner, spender), amount);
    }

    pub fn move_balance(&mut self, from: Address, to: Address, amount: U256) {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            self.env().revert(MockError::InsufficientBalance);
        }
        self.balances.set(&from, from_balance - amount);
        let to_balance = self.balance_of(to);
        self.balances.set(&to, to_balance + amount);
    }

    /// Reduce `spender`'s allowance over `owner` by `amount`.
    pub fn spend_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        let current = self.allowance(owner, spender);
        if current < amount {
            self.env().revert(MockError::InsufficientAllowance);
        }
        self.set_allowance(owner, spender, current - amount);
    }
}
