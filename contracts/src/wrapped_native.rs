//! Wrapped CSPR
//!
//! Mints one token per mote attached to `deposit`. Implements the subset of
//! CEP-18 the lending pool needs to pull collateral.

use odra::casper_types::{U256, U512};
use odra::prelude::*;

use crate::ledger::Ledger;
use crate::mock_errors::MockError;

/// Same decimals as native CSPR
const DECIMALS: u8 = 9;

#[odra::module]
pub struct WrappedNative {
    ledger: SubModule<Ledger>,
}

#[odra::module]
impl WrappedNative {
    /// Wrap the attached CSPR
    #[odra(payable)]
    pub fn deposit(&mut self) {
        let caller = self.env().caller();
        let amount = u512_to_u256(self.env().attached_value());
        if amount.is_zero() {
            self.env().revert(MockError::ZeroAmount);
        }
        self.ledger.mint(caller, amount);
    }

    pub fn name(&self) -> String {
        String::from("Wrapped CSPR")
    }

    pub fn symbol(&self) -> String {
        String::from("WCSPR")
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

/// Lower 256 bits of an attached value; mote amounts always fit.
fn u512_to_u256(value: U512) -> U256 {
    let mut bytes = [0u8; 64];
    value.to_little_endian(&mut bytes);
    U256::from_little_endian(&bytes[..32])
}
