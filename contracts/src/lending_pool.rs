//! Single-market lending pool
//!
//! Takes one collateral asset and lends one debt asset against it. Capacity is
//! the collateral value scaled by the LTV, minus the value of the debt at the
//! feed's latest price. All values are expressed in 18-decimal units.
//!
//! Interest never accrues and there are no liquidations; the pool only keeps
//! enough state to answer `get_user_account_data` truthfully.

use odra::casper_types::{runtime_args, RuntimeArgs, U256};
use odra::prelude::*;
use odra::CallDef;

use crate::mock_errors::MockError;
use crate::types::{self, AccountData, InterestRateMode, RoundData, BPS_SCALE, VALUE_DECIMALS};

#[odra::module]
pub struct LendingPool {
    price_feed: Var<Address>,
    collateral_asset: Var<Address>,
    debt_asset: Var<Address>,
    ltv_bps: Var<u32>,
    liquidation_threshold_bps: Var<u32>,
    collateral_decimals: Var<u8>,
    debt_decimals: Var<u8>,
    collateral: Mapping<Address, U256>,
    debt: Mapping<Address, U256>,
    /// referral code -> number of tagged operations
    referrals: Mapping<u32, u64>,
}

#[odra::module]
impl LendingPool {
    #[allow(clippy::too_many_arguments)]
    pub fn init(
        &mut self,
        price_feed: Address,
        collateral_asset: Address,
        debt_asset: Address,
        ltv_bps: u32,
        liquidation_threshold_bps: u32,
        collateral_decimals: u8,
        debt_decimals: u8,
    ) {
        self.price_feed.set(price_feed);
        self.collateral_asset.set(collateral_asset);
        self.debt_asset.set(debt_asset);
        self.ltv_bps.set(ltv_bps);
        self.liquidation_threshold_bps.set(liquidation_threshold_bps);
        self.collateral_decimals.set(collateral_decimals);
        self.debt_decimals.set(debt_decimals);
    }

    /// Pull `amount` of the collateral asset from the caller and credit it to
    /// `on_behalf_of`.
    pub fn deposit(&mut self, asset: Address, amount: U256, on_behalf_of: Address, referral_code: u32) {
        if Some(asset) != self.collateral_asset.get() {
            self.env().revert(MockError::UnsupportedAsset);
        }
        if amount.is_zero() {
            self.env().revert(MockError::ZeroAmount);
        }

        let caller = self.env().caller();
        self.pull(asset, caller, amount);

        let current = self.get_collateral(on_behalf_of);
        self.collateral.set(&on_behalf_of, current + amount);
        self.track_referral(referral_code);
    }

    /// Lend `amount` of the debt asset to the caller.
    pub fn borrow(
        &mut self,
        asset: Address,
        amount: U256,
        interest_rate_mode: u8,
        referral_code: u32,
        on_behalf_of: Address,
    ) {
        if Some(asset) != self.debt_asset.get() {
            self.env().revert(MockError::UnsupportedAsset);
        }
        if InterestRateMode::from_u8(interest_rate_mode).is_none() {
            self.env().revert(MockError::InvalidRateMode);
        }
        if amount.is_zero() {
            self.env().revert(MockError::ZeroAmount);
        }
        let caller = self.env().caller();
        if on_behalf_of != caller {
            self.env().revert(MockError::DelegationNotSupported);
        }

        let collateral = self.get_collateral(caller);
        if collateral.is_zero() {
            self.env().revert(MockError::NoCollateral);
        }

        let price = self.price();
        let new_debt = self.get_debt(caller) + amount;
        let limit = max_debt_value(self.collateral_value(collateral), self.ltv_bps.get().unwrap_or_default());
        if debt_value(new_debt, price, self.debt_decimals()) > limit {
            self.env().revert(MockError::BorrowCapacityExceeded);
        }

        self.debt.set(&caller, new_debt);
        self.track_referral(referral_code);
        self.push(asset, caller, amount);
    }

    /// Pay back up to `amount` of `on_behalf_of`'s debt from the caller's
    /// balance. Anything above the outstanding debt is left with the caller.
    pub fn repay(&mut self, asset: Address, amount: U256, rate_mode: u8, on_behalf_of: Address) {
        if Some(asset) != self.debt_asset.get() {
            self.env().revert(MockError::UnsupportedAsset);
        }
        if InterestRateMode::from_u8(rate_mode).is_none() {
            self.env().revert(MockError::InvalidRateMode);
        }
        let outstanding = self.get_debt(on_behalf_of);
        if outstanding.is_zero() {
            self.env().revert(MockError::NoDebt);
        }

        let paid = amount.min(outstanding);
        let caller = self.env().caller();
        self.pull(asset, caller, paid);
        self.debt.set(&on_behalf_of, outstanding - paid);
    }

    pub fn get_user_account_data(&self, user: Address) -> AccountData {
        let collateral = self.get_collateral(user);
        let debt = self.get_debt(user);
        if collateral.is_zero() && debt.is_zero() {
            return AccountData {
                health_factor: U256::MAX,
                ..Default::default()
            };
        }

        let ltv = self.ltv_bps.get().unwrap_or_default();
        let threshold = self.liquidation_threshold_bps.get().unwrap_or_default();
        let total_collateral = self.collateral_value(collateral);
        let total_debt = if debt.is_zero() {
            U256::zero()
        } else {
            debt_value(debt, self.price(), self.debt_decimals())
        };

        AccountData {
            total_collateral,
            total_debt,
            available_borrows: max_debt_value(total_collateral, ltv).saturating_sub(total_debt),
            current_liquidation_threshold: threshold,
            ltv,
            health_factor: health_factor(total_collateral, total_debt, threshold),
        }
    }

    pub fn get_collateral(&self, user: Address) -> U256 {
        self.collateral.get(&user).unwrap_or_default()
    }

    pub fn get_debt(&self, user: Address) -> U256 {
        self.debt.get(&user).unwrap_or_default()
    }

    pub fn get_referral_count(&self, referral_code: u32) -> u64 {
        self.referrals.get(&referral_code).unwrap_or_default()
    }

    // ========== Internal ==========

    fn price(&self) -> U256 {
        let Some(feed) = self.price_feed.get() else {
            self.env().revert(MockError::NotInitialized);
        };
        let call_def = CallDef::new(types::price_feed::LATEST_ROUND_DATA, false, runtime_args! {});
        let round: RoundData = self.env().call_contract(feed, call_def);
        if round.answer.is_zero() {
            self.env().revert(MockError::PriceUnavailable);
        }
        round.answer
    }

    fn collateral_value(&self, amount: U256) -> U256 {
        to_value_units(amount, self.collateral_decimals.get().unwrap_or(VALUE_DECIMALS))
    }

    fn debt_decimals(&self) -> u8 {
        self.debt_decimals.get().unwrap_or(VALUE_DECIMALS)
    }

    fn pull(&self, token: Address, from: Address, amount: U256) {
        let args = runtime_args! {
            "owner" => from,
            "recipient" => self.env().self_address(),
            "amount" => amount
        };
        let call_def = CallDef::new("transfer_from", true, args);
        self.env().call_contract::<()>(token, call_def);
    }

    fn push(&self, token: Address, to: Address, amount: U256) {
        let args = runtime_args! {
            "recipient" => to,
            "amount" => amount
        };
        let call_def = CallDef::new("transfer", true, args);
        self.env().call_contract::<()>(token, call_def);
    }

    fn track_referral(&mut self, referral_code: u32) {
        if referral_code != 0 {
            let count = self.get_referral_count(referral_code);
            self.referrals.set(&referral_code, count + 1);
        }
    }
}

/// Rescale a token amount to 18-decimal value units.
fn to_value_units(amount: U256, decimals: u8) -> U256 {
    if decimals <= VALUE_DECIMALS {
        amount * U256::from(10u64).pow(U256::from(VALUE_DECIMALS - decimals))
    } else {
        amount / U256::from(10u64).pow(U256::from(decimals - VALUE_DECIMALS))
    }
}

/// Value of `debt` at `price` value units per whole token.
fn debt_value(debt: U256, price: U256, decimals: u8) -> U256 {
    debt * price / U256::from(10u64).pow(U256::from(decimals))
}

fn max_debt_value(collateral_value: U256, ltv_bps: u32) -> U256 {
    collateral_value * U256::from(ltv_bps) / U256::from(BPS_SCALE)
}

/// 1e18 means the position sits exactly at its liquidation threshold.
fn health_factor(collateral_value: U256, debt_value: U256, threshold_bps: u32) -> U256 {
    if debt_value.is_zero() {
        return U256::MAX;
    }
    let one = U256::from(10u64).pow(U256::from(VALUE_DECIMALS));
    collateral_value * U256::from(threshold_bps) / U256::from(BPS_SCALE) * one / debt_value
}
