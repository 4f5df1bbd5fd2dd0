//! In-memory gateway for unit tests.
//!
//! Emulates just enough of the external contracts to exercise the
//! sequencing: allowance checks on pull transfers, a collateral-backed
//! borrow limit and call/confirmation bookkeeping.

use core::cell::RefCell;

use odra::casper_types::account::AccountHash;
use odra::casper_types::U256;
use odra::prelude::*;

use crate::errors::{LendError, Result};
use crate::gateway::{LendingGateway, PendingTx, Receipt, Transport};
use crate::types::{AccountData, InterestRateMode, BPS_SCALE};

/// 0.01 CSPR in motes
pub const DEPOSIT: u64 = 10_000_000;

/// 0.00025 CSPR per stablecoin, 18 decimals
pub const PRICE: u64 = 250_000_000_000_000;

const E18: u128 = 1_000_000_000_000_000_000;
const NATIVE_TO_VALUE: u64 = 1_000_000_000;
const LTV_BPS: u32 = 7500;
const LIQUIDATION_THRESHOLD_BPS: u32 = 8000;

pub fn address(seed: u8) -> Address {
    Address::Account(AccountHash::new([seed; 32]))
}

pub struct MockGateway {
    pub caller: Address,
    pub wrapped_token: Address,
    pub stablecoin: Address,
    pub registry: Address,
    pub price_feed: Address,
    pub router: Option<Address>,
    pub price: U256,
    pub wrapped_balance: U256,
    pub stable_balance: U256,
    pub wrapped_allowance: U256,
    pub stable_allowance: U256,
    pub collateral: U256,
    pub debt: U256,
    /// Entry point that should be rejected when invoked
    pub fail_on: Option<&'static str>,
    /// Every call in the order it was issued, reads included
    calls: RefCell<Vec<&'static str>>,
    submitted: usize,
    confirmed: usize,
    clock: u64,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            caller: address(1),
            wrapped_token: address(10),
            stablecoin: address(11),
            registry: address(12),
            price_feed: address(13),
            router: Some(address(14)),
            price: U256::from(PRICE),
            wrapped_balance: U256::zero(),
            stable_balance: U256::zero(),
            wrapped_allowance: U256::zero(),
            stable_allowance: U256::zero(),
            collateral: U256::zero(),
            debt: U256::zero(),
            fail_on: None,
            calls: RefCell::new(Vec::new()),
            submitted: 0,
            confirmed: 0,
            clock: 0,
        }
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }

    pub fn unconfirmed(&self) -> usize {
        self.submitted - self.confirmed
    }

    /// Calls issued so far, without the confirmation waits.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls
            .borrow()
            .iter()
            .copied()
            .filter(|call| *call != "wait")
            .collect()
    }

    /// True when every submitted call was confirmed before the next call.
    pub fn confirmed_in_lockstep(&self) -> bool {
        let calls = self.calls.borrow();
        let mut open = false;
        for call in calls.iter() {
            match *call {
                "wait" => open = false,
                "wrap" | "approve" | "deposit" | "borrow" | "repay" => {
                    if open {
                        return false;
                    }
                    open = true;
                }
                _ => {
                    if open {
                        return false;
                    }
                }
            }
        }
        !open
    }

    fn collateral_value(&self) -> U256 {
        self.collateral * U256::from(NATIVE_TO_VALUE)
    }

    fn debt_value(&self) -> U256 {
        self.debt * self.price / U256::from(E18)
    }

    fn borrow_limit(&self) -> U256 {
        self.collateral_value() * U256::from(LTV_BPS) / U256::from(BPS_SCALE)
    }

    fn router_address(&self) -> Address {
        self.router.unwrap_or(address(0))
    }

    fn reject(contract: Address, entry_point: &'static str, message: &str) -> LendError {
        LendError::ContractCall {
            contract,
            entry_point,
            reason: OdraError::user(1, message),
        }
    }

    fn record(&self, contract: Address, call: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.fail_on == Some(call) {
            return Err(Self::reject(contract, call, "injected failure"));
        }
        Ok(())
    }

    fn pending(&mut self, contract: Address, entry_point: &'static str) -> PendingTx {
        self.submitted += 1;
        self.clock += 1;
        PendingTx {
            contract,
            entry_point,
            submitted_at: self.clock,
        }
    }
}

impl Transport for MockGateway {
    fn wait(&mut self, pending: PendingTx, confirmations: u32) -> Result<Receipt> {
        self.calls.borrow_mut().push("wait");
        self.confirmed += 1;
        self.clock += 1;
        Ok(Receipt {
            contract: pending.contract,
            entry_point: pending.entry_point,
            submitted_at: pending.submitted_at,
            confirmed_at: self.clock,
            confirmations,
        })
    }
}

impl LendingGateway for MockGateway {
    fn caller(&self) -> Address {
        self.caller
    }

    fn wrap(&mut self, token: Address, amount: U256) -> Result<PendingTx> {
        self.record(token, "wrap")?;
        self.wrapped_balance = self.wrapped_balance + amount;
        Ok(self.pending(token, "deposit"))
    }

    fn balance_of(&self, token: Address, _account: Address) -> Result<U256> {
        self.record(token, "balance_of")?;
        if token == self.wrapped_token {
            Ok(self.wrapped_balance)
        } else {
            Ok(self.stable_balance)
        }
    }

    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<PendingTx> {
        self.record(token, "approve")?;
        if spender == self.router_address() {
            if token == self.wrapped_token {
                self.wrapped_allowance = amount;
            } else if token == self.stablecoin {
                self.stable_allowance = amount;
            }
        }
        Ok(self.pending(token, "approve"))
    }

    fn get_router(&self, registry: Address) -> Result<Address> {
        self.record(registry, "get_router")?;
        self.router.ok_or(LendError::RouterNotSet(registry))
    }

    fn deposit(
        &mut self,
        router: Address,
        asset: Address,
        amount: U256,
        _on_behalf_of: Address,
        _referral_code: u32,
    ) -> Result<PendingTx> {
        self.record(router, "deposit")?;
        if asset != self.wrapped_token {
            return Err(Self::reject(router, "deposit", "unsupported asset"));
        }
        if self.wrapped_allowance < amount || self.wrapped_balance < amount {
            return Err(Self::reject(router, "deposit", "insufficient allowance"));
        }
        self.wrapped_allowance = self.wrapped_allowance - amount;
        self.wrapped_balance = self.wrapped_balance - amount;
        self.collateral = self.collateral + amount;
        Ok(self.pending(router, "deposit"))
    }

    fn borrow(
        &mut self,
        router: Address,
        asset: Address,
        amount: U256,
        _rate_mode: InterestRateMode,
        _referral_code: u32,
        _on_behalf_of: Address,
    ) -> Result<PendingTx> {
        self.record(router, "borrow")?;
        if asset != self.stablecoin || self.collateral.is_zero() {
            return Err(Self::reject(router, "borrow", "no collateral"));
        }
        let new_debt_value = (self.debt + amount) * self.price / U256::from(E18);
        if new_debt_value > self.borrow_limit() {
            return Err(Self::reject(router, "borrow", "borrow capacity exceeded"));
        }
        self.debt = self.debt + amount;
        self.stable_balance = self.stable_balance + amount;
        Ok(self.pending(router, "borrow"))
    }

    fn repay(
        &mut self,
        router: Address,
        _asset: Address,
        amount: U256,
        _rate_mode: InterestRateMode,
        _on_behalf_of: Address,
    ) -> Result<PendingTx> {
        self.record(router, "repay")?;
        let paid = amount.min(self.debt);
        if self.stable_allowance < paid || self.stable_balance < paid {
            return Err(Self::reject(router, "repay", "insufficient allowance"));
        }
        self.stable_allowance = self.stable_allowance - paid;
        self.stable_balance = self.stable_balance - paid;
        self.debt = self.debt - paid;
        Ok(self.pending(router, "repay"))
    }

    fn get_account_data(&self, router: Address, _account: Address) -> Result<AccountData> {
        self.record(router, "get_account_data")?;
        let total_collateral = self.collateral_value();
        let total_debt = self.debt_value();
        let limit = self.borrow_limit();
        let available_borrows = if limit > total_debt { limit - total_debt } else { U256::zero() };
        let health_factor = if total_debt.is_zero() {
            U256::MAX
        } else {
            total_collateral * U256::from(LIQUIDATION_THRESHOLD_BPS) * U256::from(E18)
                / (U256::from(BPS_SCALE) * total_debt)
        };

        Ok(AccountData {
            total_collateral,
            total_debt,
            available_borrows,
            current_liquidation_threshold: LIQUIDATION_THRESHOLD_BPS,
            ltv: LTV_BPS,
            health_factor,
        })
    }

    fn latest_price(&self, feed: Address) -> Result<U256> {
        self.record(feed, "latest_price")?;
        if self.price.is_zero() {
            return Err(LendError::InvalidPrice(feed));
        }
        Ok(self.price)
    }
}
