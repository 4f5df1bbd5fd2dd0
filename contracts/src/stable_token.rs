//! Stablecoin lent out by the mock pool.
//!
//! The whole supply is minted to the deployer, who seeds the pool with it.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::ledger::Ledger;

const DECIMALS: u8 = 18;

#[odra::module]
pub struct StableToken {
    ledger: SubModule<Ledger>,
}

#[odra::module]
impl StableToken {
    pub fn init(&mut self, initial_supply: U256) {
        let caller = self.env().caller();
        self.ledger.mint(caller, initial_supply);
    }

    pub fn name(&self) -> String {
        String::from("Mock USD")
    }

    pub fn symbol(&self) -> String {
        String::from("mUSD")
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    pub fn total_supply(&self) -> U256 {
        self.ledger.total_supply()
    }

    pub fn balance_of(&self, address: Address) -> U256 {
        self.ledger.balance_of(address)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.ledger.allowance(owner, spender)
    }

    pub fn approve(&mut self, spender: Address, amount: U256) {
        let owner = self.env().caller();
        self.ledger.set_allowance(owner, spender, amount);
    }

    pub fn transfer(&mut self, recipient: Address, amount: U256) {
        let sender = self.env().caller();
        self.ledger.move_balance(sender, recipient, amount);
    }

    pub fn transfer_from(&mut self, owner: Address, recipient: Address, amount: U256) {
        let spender = self.env().caller();
        self.ledger.spend_allowance(owner, spender, amount);
        self.ledger.move_balance(owner, recipient, amount);
    }
}
