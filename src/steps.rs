//! Protocol actions, one function per step.
//!
//! Each state-changing step submits its call, waits for confirmation and
//! logs the outcome before returning. Nothing here retries; errors bubble up.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::amounts::{self, format_units};
use crate::errors::Result;
use crate::gateway::{LendingGateway, Receipt};
use crate::types::{AccountData, InterestRateMode, NATIVE_DECIMALS, STABLE_DECIMALS, VALUE_DECIMALS};

/// Outcome of wrapping native currency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    pub receipt: Receipt,
    /// Caller's wrapped-token balance after the wrap
    pub balance: U256,
}

/// Wrap `amount` of native currency and read back the resulting balance.
pub fn wrap_and_check<G: LendingGateway>(
    gateway: &mut G,
    token: Address,
    amount: U256,
    confirmations: u32,
) -> Result<Wrapped> {
    let pending = gateway.wrap(token, amount)?;
    let receipt = gateway.wait(pending, confirmations)?;

    let caller = gateway.caller();
    let balance = gateway.balance_of(token, caller)?;
    log::info!(
        "Wrapped {} CSPR, balance is now {} wrapped",
        format_units(amount, NATIVE_DECIMALS),
        format_units(balance, NATIVE_DECIMALS)
    );

    Ok(Wrapped { receipt, balance })
}

/// Allow `spender` to pull up to `amount` of the caller's `token`, which
/// has `decimals` decimals.
pub fn approve<G: LendingGateway>(
    gateway: &mut G,
    token: Address,
    spender: Address,
    amount: U256,
    decimals: u8,
    confirmations: u32,
) -> Result<Receipt> {
    let pending = gateway.approve(token, spender, amount)?;
    let receipt = gateway.wait(pending, confirmations)?;
    log::info!("Approved the pool to pull {} tokens", format_units(amount, decimals));
    Ok(receipt)
}

/// Ask the registry for the current router and bind a handle to it.
pub fn resolve_router<G: LendingGateway>(gateway: &G, registry: Address) -> Result<LendingPool> {
    let address = gateway.get_router(registry)?;
    log::info!("Lending pool address {:?}", address);
    Ok(LendingPool {
        address,
        caller: gateway.caller(),
    })
}

/// Latest stablecoin price in value units.
pub fn latest_price<G: LendingGateway>(gateway: &G, feed: Address) -> Result<U256> {
    let price = gateway.latest_price(feed)?;
    log::info!("Stablecoin price is {} CSPR", format_units(price, VALUE_DECIMALS));
    Ok(price)
}

/// Stablecoin amount to request for the reported capacity.
pub fn compute_borrow_amount(capacity: U256, price: U256, safety_margin_bps: u32) -> Result<U256> {
    let amount = amounts::borrow_amount(capacity, price, safety_margin_bps, STABLE_DECIMALS)?;
    log::info!("You can borrow {} stablecoin", format_units(amount, STABLE_DECIMALS));
    Ok(amount)
}

/// Router handle bound to an address and the signer identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LendingPool {
    address: Address,
    caller: Address,
}

impl LendingPool {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Deposit `amount` of `asset` as collateral for the caller.
    ///
    /// The router pulls the tokens, so an approval must already be in place.
    pub fn deposit<G: LendingGateway>(
        &self,
        gateway: &mut G,
        asset: Address,
        amount: U256,
        referral_code: u32,
        confirmations: u32,
    ) -> Result<Receipt> {
        log::info!("Depositing...");
        let pending = gateway.deposit(self.address, asset, amount, self.caller, referral_code)?;
        let receipt = gateway.wait(pending, confirmations)?;
        log::info!("Deposited {}", format_units(amount, NATIVE_DECIMALS));
        Ok(receipt)
    }

    /// Collateral, debt and remaining capacity of the caller.
    pub fn account_snapshot<G: LendingGateway>(&self, gateway: &G) -> Result<AccountData> {
        let data = gateway.get_account_data(self.address, self.caller)?;
        log::info!(
            "You have {} worth of CSPR deposited",
            format_units(data.total_collateral, VALUE_DECIMALS)
        );
        log::info!(
            "You have {} worth of CSPR borrowed",
            format_units(data.total_debt, VALUE_DECIMALS)
        );
        log::info!(
            "You can still borrow {} worth of CSPR",
            format_units(data.available_borrows, VALUE_DECIMALS)
        );
        Ok(data)
    }

    pub fn borrow<G: LendingGateway>(
        &self,
        gateway: &mut G,
        asset: Address,
        amount: U256,
        rate_mode: InterestRateMode,
        referral_code: u32,
        confirmations: u32,
    ) -> Result<Receipt> {
        let pending = gateway.borrow(self.address, asset, amount, rate_mode, referral_code, self.caller)?;
        let receipt = gateway.wait(pending, confirmations)?;
        log::info!("You have borrowed {} stablecoin", format_units(amount, STABLE_DECIMALS));
        Ok(receipt)
    }

    /// Repay `amount` of `asset`; needs an approval for at least `amount`.
    pub fn repay<G: LendingGateway>(
        &self,
        gateway: &mut G,
        asset: Address,
        amount: U256,
        rate_mode: InterestRateMode,
        confirmations: u32,
    ) -> Result<Receipt> {
        let pending = gateway.repay(self.address, asset, amount, rate_mode, self.caller)?;
        let receipt = gateway.wait(pending, confirmations)?;
        log::info!("You have repaid {} stablecoin", format_units(amount, STABLE_DECIMALS));
        Ok(receipt)
    }
}
