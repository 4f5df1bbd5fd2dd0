//! `LendingGateway` over an Odra `HostEnv`.
//!
//! Works against any host backend: the Casper livenet environment in the
//! binary and OdraVM in tests. Every call is expressed as a `CallDef` with
//! runtime args, the same way the protocol contracts call each other.
//!
//! The livenet host serves reads from its local contract register instead of
//! the node, so every contract the run reads must be loaded into the host
//! first. [`OdraGateway::livenet`] does that for the configured contracts and
//! for the router once the registry resolves it.

use std::time::{SystemTime, UNIX_EPOCH};

use lend_cycle_contracts::{AddressesProvider, LendingPool, PriceFeed, StableToken, WrappedNative};
use odra::casper_types::bytesrepr::FromBytes;
use odra::casper_types::{runtime_args, CLTyped, RuntimeArgs, U256, U512};
use odra::host::{HostEnv, HostRefLoader};
use odra::prelude::*;
use odra::CallDef;

use crate::amounts::u256_to_u512;
use crate::config::ContractAddresses;
use crate::errors::{LendError, Result};
use crate::gateway::{LendingGateway, PendingTx, Receipt, Transport};
use crate::types::{self, AccountData, InterestRateMode, RoundData};

/// Role of a contract the run talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    WrappedToken,
    Registry,
    Stablecoin,
    PriceFeed,
    Router,
}

impl ContractKind {
    /// Register the module behind `address` with the host.
    fn load(self, env: &HostEnv, address: Address) {
        match self {
            ContractKind::WrappedToken => {
                WrappedNative::load(env, address);
            }
            ContractKind::Registry => {
                AddressesProvider::load(env, address);
            }
            ContractKind::Stablecoin => {
                StableToken::load(env, address);
            }
            ContractKind::PriceFeed => {
                PriceFeed::load(env, address);
            }
            ContractKind::Router => {
                LendingPool::load(env, address);
            }
        }
    }
}

/// Configured contracts to load into a livenet host, in configuration order.
pub fn contracts_to_load(addresses: &ContractAddresses) -> Vec<(ContractKind, Address)> {
    [
        (ContractKind::WrappedToken, addresses.wrapped_token),
        (ContractKind::Registry, addresses.registry),
        (ContractKind::Stablecoin, addresses.stablecoin),
        (ContractKind::PriceFeed, addresses.price_feed),
    ]
    .into_iter()
    .filter_map(|(kind, address)| address.map(|address| (kind, address)))
    .collect()
}

/// Gateway issuing calls through a host environment
pub struct OdraGateway {
    env: HostEnv,
    /// Load contracts into the host as their addresses become known
    load_contracts: bool,
}

impl OdraGateway {
    /// Gateway over a host that already knows every contract it will read,
    /// such as an OdraVM where the contracts were deployed.
    pub fn new(env: HostEnv) -> Self {
        Self {
            env,
            load_contracts: false,
        }
    }

    /// Gateway over a live node. Loads the configured contracts right away
    /// and the router when it is resolved.
    pub fn livenet(env: HostEnv, addresses: &ContractAddresses) -> Self {
        for (kind, address) in contracts_to_load(addresses) {
            log::debug!("Loading {:?} at {:?}", kind, address);
            kind.load(&env, address);
        }
        Self {
            env,
            load_contracts: true,
        }
    }

    pub fn env(&self) -> &HostEnv {
        &self.env
    }

    fn query<T: FromBytes + CLTyped>(
        &self,
        contract: Address,
        entry_point: &'static str,
        args: RuntimeArgs,
    ) -> Result<T> {
        let call_def = CallDef::new(entry_point, false, args);
        self.env
            .call_contract(contract, call_def)
            .map_err(|reason| LendError::ContractCall {
                contract,
                entry_point,
                reason,
            })
    }

    /// Send a state-changing call. On a live node this returns once the
    /// deploy has been processed; a revert surfaces here as an error.
    fn submit(
        &mut self,
        contract: Address,
        entry_point: &'static str,
        args: RuntimeArgs,
        attached_value: Option<U512>,
    ) -> Result<PendingTx> {
        let submitted_at = now_millis();
        let mut call_def = CallDef::new(entry_point, true, args);
        if let Some(amount) = attached_value {
            call_def = call_def.with_amount(amount);
        }

        self.env
            .call_contract::<()>(contract, call_def)
            .map_err(|reason| LendError::ContractCall {
                contract,
                entry_point,
                reason,
            })?;

        log::debug!("submitted {} on {:?}", entry_point, contract);
        Ok(PendingTx {
            contract,
            entry_point,
            submitted_at,
        })
    }
}

/// Local wall-clock time; the host's block time needs an RPC round trip
/// that cannot fail gracefully.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

impl Transport for OdraGateway {
    fn wait(&mut self, pending: PendingTx, confirmations: u32) -> Result<Receipt> {
        // The host only hands control back after execution, so the call is
        // already included when we get here.
        let confirmed_at = now_millis();
        Ok(Receipt {
            contract: pending.contract,
            entry_point: pending.entry_point,
            submitted_at: pending.submitted_at,
            confirmed_at,
            confirmations,
        })
    }
}

impl LendingGateway for OdraGateway {
    fn caller(&self) -> Address {
        self.env.caller()
    }

    fn wrap(&mut self, token: Address, amount: U256) -> Result<PendingTx> {
        self.submit(
            token,
            types::wrapped_token::DEPOSIT,
            runtime_args! {},
            Some(u256_to_u512(amount)),
        )
    }

    fn balance_of(&self, token: Address, account: Address) -> Result<U256> {
        self.query(
            token,
            types::token::BALANCE_OF,
            runtime_args! { "address" => account },
        )
    }

    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<PendingTx> {
        let args = runtime_args! {
            "spender" => spender,
            "amount" => amount,
        };
        self.submit(token, types::token::APPROVE, args, None)
    }

    fn get_router(&self, registry: Address) -> Result<Address> {
        let router: Option<Address> =
            self.query(registry, types::registry::GET_ROUTER, runtime_args! {})?;
        let router = router.ok_or(LendError::RouterNotSet(registry))?;
        if self.load_contracts {
            ContractKind::Router.load(&self.env, router);
        }
        Ok(router)
    }

    fn deposit(
        &mut self,
        router: Address,
        asset: Address,
        amount: U256,
        on_behalf_of: Address,
        referral_code: u32,
    ) -> Result<PendingTx> {
        let args = runtime_args! {
            "asset" => asset,
            "amount" => amount,
            "on_behalf_of" => on_behalf_of,
            "referral_code" => referral_code,
        };
        self.submit(router, types::router::DEPOSIT, args, None)
    }

    fn borrow(
        &mut self,
        router: Address,
        asset: Address,
        amount: U256,
        rate_mode: InterestRateMode,
        referral_code: u32,
        on_behalf_of: Address,
    ) -> Result<PendingTx> {
        let args = runtime_args! {
            "asset" => asset,
            "amount" => amount,
            "interest_rate_mode" => rate_mode.as_u8(),
            "referral_code" => referral_code,
            "on_behalf_of" => on_behalf_of,
        };
        self.submit(router, types::router::BORROW, args, None)
    }

    fn repay(
        &mut self,
        router: Address,
        asset: Address,
        amount: U256,
        rate_mode: InterestRateMode,
        on_behalf_of: Address,
    ) -> Result<PendingTx> {
        let args = runtime_args! {
            "asset" => asset,
            "amount" => amount,
            "rate_mode" => rate_mode.as_u8(),
            "on_behalf_of" => on_behalf_of,
        };
        self.submit(router, types::router::REPAY, args, None)
    }

    fn get_account_data(&self, router: Address, account: Address) -> Result<AccountData> {
        self.query(
            router,
            types::router::GET_USER_ACCOUNT_DATA,
            runtime_args! { "user" => account },
        )
    }

    fn latest_price(&self, feed: Address) -> Result<U256> {
        let round: RoundData =
            self.query(feed, types::price_feed::LATEST_ROUND_DATA, runtime_args! {})?;
        if round.answer.is_zero() {
            return Err(LendError::InvalidPrice(feed));
        }
        Ok(round.answer)
    }
}
