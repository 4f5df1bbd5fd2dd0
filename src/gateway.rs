//! Seams between the sequencing logic and the chain.
//!
//! `LendingGateway` is the minimal set of contract capabilities the run needs.
//! `Transport` is the confirmation step every state-changing call goes through.
//! The production implementation is [`crate::OdraGateway`]; unit tests use an
//! in-memory gateway.

use odra::casper_types::U256;
use odra::prelude::*;

use crate::errors::Result;
use crate::types::{AccountData, InterestRateMode};

/// A submitted state-changing call awaiting confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTx {
    /// Contract the call was sent to
    pub contract: Address,
    /// Entry point that was invoked
    pub entry_point: &'static str,
    /// Unix time (ms) at submission
    pub submitted_at: u64,
}

/// A confirmed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub contract: Address,
    pub entry_point: &'static str,
    pub submitted_at: u64,
    pub confirmed_at: u64,
    pub confirmations: u32,
}

/// Confirmation step for submitted calls.
pub trait Transport {
    /// Block until `pending` has `confirmations` confirmations.
    fn wait(&mut self, pending: PendingTx, confirmations: u32) -> Result<Receipt>;
}

/// Contract capabilities used by the wrap and borrow-cycle procedures.
///
/// Reads return values directly. State-changing calls return a [`PendingTx`]
/// that must be passed to [`Transport::wait`] before the next call is issued.
pub trait LendingGateway: Transport {
    /// Signer identity all calls are issued from
    fn caller(&self) -> Address;

    /// Wrapped token `deposit` carrying `amount` of native currency.
    fn wrap(&mut self, token: Address, amount: U256) -> Result<PendingTx>;

    fn balance_of(&self, token: Address, account: Address) -> Result<U256>;

    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<PendingTx>;

    /// Current router address held by the registry.
    fn get_router(&self, registry: Address) -> Result<Address>;

    fn deposit(
        &mut self,
        router: Address,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        referral_code: u32,
    ) -> Result<PendingTx>;

    fn borrow(
        &mut self,
        router: Address,
        asset: Address,
        amount: U256,
        rate_mode: InterestRateMode,
        referral_code: u32,
        on_behalf_of: Address,
    ) -> Result<PendingTx>;

    fn repay(
        &mut self,
        router: Address,
        asset: Address,
        amount: U256,
        rate_mode: InterestRateMode,
        on_behalf_of: Address,
    ) -> Result<PendingTx>;

    fn get_account_data(&self, router: Address, account: Address) -> Result<AccountData>;

    /// Latest feed answer; zero answers are rejected.
    fn latest_price(&self, feed: Address) -> Result<U256>;
}
