//! Command line and environment configuration.
//!
//! Every flag falls back to an environment variable (a `.env` file is loaded
//! by the binary), then to the default below.

use core::str::FromStr;
use std::env;

use clap::{Parser, Subcommand};
use odra::casper_types::U256;
use odra::prelude::*;

use crate::amounts::{format_units, parse_units};
use crate::errors::{LendError, Result};
use crate::types::{InterestRateMode, BPS_SCALE, NATIVE_DECIMALS};

/// Native currency wrapped and deposited per run
pub const DEFAULT_DEPOSIT_AMOUNT: &str = "0.01";
/// Share of the borrowing capacity actually requested (95%)
pub const DEFAULT_SAFETY_MARGIN_BPS: u32 = 9500;
pub const DEFAULT_REFERRAL_CODE: u32 = 0;
/// Referral codes are 16-bit on the protocol side
pub const MAX_REFERRAL_CODE: u32 = u16::MAX as u32;
pub const DEFAULT_CONFIRMATIONS: u32 = 1;
/// Gas payment per call in motes
pub const DEFAULT_PAYMENT_AMOUNT: u64 = 200_000_000_000;

pub const WRAPPED_TOKEN_ENV: &str = "LEND_WRAPPED_TOKEN";
pub const REGISTRY_ENV: &str = "LEND_REGISTRY";
pub const STABLECOIN_ENV: &str = "LEND_STABLECOIN";
pub const PRICE_FEED_ENV: &str = "LEND_PRICE_FEED";
pub const DEPOSIT_AMOUNT_ENV: &str = "LEND_DEPOSIT_AMOUNT";
pub const SAFETY_MARGIN_ENV: &str = "LEND_SAFETY_MARGIN_BPS";
pub const REFERRAL_CODE_ENV: &str = "LEND_REFERRAL_CODE";
pub const CONFIRMATIONS_ENV: &str = "LEND_CONFIRMATIONS";
pub const PAYMENT_AMOUNT_ENV: &str = "ODRA_CASPER_LIVENET_PAYMENT_AMOUNT";

#[derive(Parser, Debug)]
#[command(version, about = "Wrap CSPR, then deposit, borrow and repay against a lending pool")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub options: Options,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Wrap native CSPR and print the wrapped balance
    Wrap,
    /// Wrap, deposit, borrow and repay in one run
    BorrowCycle,
}

#[derive(clap::Args, Debug, Default)]
pub struct Options {
    /// Wrapped native token contract (falls back to LEND_WRAPPED_TOKEN env)
    #[arg(long, global = true)]
    pub wrapped_token: Option<String>,

    /// Registry holding the router address (falls back to LEND_REGISTRY env)
    #[arg(long, global = true)]
    pub registry: Option<String>,

    /// Stablecoin to borrow (falls back to LEND_STABLECOIN env)
    #[arg(long, global = true)]
    pub stablecoin: Option<String>,

    /// Stablecoin price feed (falls back to LEND_PRICE_FEED env)
    #[arg(long, global = true)]
    pub price_feed: Option<String>,

    /// CSPR to wrap and deposit, e.g. 0.01 (falls back to LEND_DEPOSIT_AMOUNT env)
    #[arg(long, global = true)]
    pub amount: Option<String>,

    /// Share of the capacity to borrow in bps (falls back to LEND_SAFETY_MARGIN_BPS env)
    #[arg(long, global = true)]
    pub safety_margin_bps: Option<u32>,

    /// Referral code passed to deposit and borrow (falls back to LEND_REFERRAL_CODE env)
    #[arg(long, global = true)]
    pub referral_code: Option<u32>,

    /// Confirmations to wait for per call (falls back to LEND_CONFIRMATIONS env)
    #[arg(long, global = true)]
    pub confirmations: Option<u32>,

    /// Print the final report as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

/// Addresses of the external contracts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractAddresses {
    pub wrapped_token: Option<Address>,
    pub registry: Option<Address>,
    pub stablecoin: Option<Address>,
    pub price_feed: Option<Address>,
}

impl ContractAddresses {
    pub fn new(wrapped_token: Address, registry: Address, stablecoin: Address, price_feed: Address) -> Self {
        Self {
            wrapped_token: Some(wrapped_token),
            registry: Some(registry),
            stablecoin: Some(stablecoin),
            price_feed: Some(price_feed),
        }
    }

    pub fn wrapped_token(&self) -> Result<Address> {
        self.wrapped_token.ok_or(LendError::MissingAddress(WRAPPED_TOKEN_ENV))
    }

    pub fn registry(&self) -> Result<Address> {
        self.registry.ok_or(LendError::MissingAddress(REGISTRY_ENV))
    }

    pub fn stablecoin(&self) -> Result<Address> {
        self.stablecoin.ok_or(LendError::MissingAddress(STABLECOIN_ENV))
    }

    pub fn price_feed(&self) -> Result<Address> {
        self.price_feed.ok_or(LendError::MissingAddress(PRICE_FEED_ENV))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addresses: ContractAddresses,
    /// Native currency to wrap, in motes
    pub deposit_amount: U256,
    pub safety_margin_bps: u32,
    pub interest_rate_mode: InterestRateMode,
    pub referral_code: u32,
    pub confirmations: u32,
    /// Gas payment per call, in motes
    pub payment_amount: u64,
    pub json: bool,
}

impl Config {
    /// Defaults for everything except the contract addresses.
    pub fn new(addresses: ContractAddresses) -> Self {
        Self {
            addresses,
            deposit_amount: U256::from(10_000_000u64),
            safety_margin_bps: DEFAULT_SAFETY_MARGIN_BPS,
            interest_rate_mode: InterestRateMode::Stable,
            referral_code: DEFAULT_REFERRAL_CODE,
            confirmations: DEFAULT_CONFIRMATIONS,
            payment_amount: DEFAULT_PAYMENT_AMOUNT,
            json: false,
        }
    }

    pub fn from_options(options: Options) -> Result<Self> {
        Self::from_sources(options, |key| env::var(key).ok())
    }

    /// Build from flags, falling back to `lookup` for unset values.
    pub fn from_sources<F>(options: Options, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let address = |flag: Option<String>, key: &str| -> Result<Option<Address>> {
            flag.or_else(|| lookup(key))
                .map(|value| parse_address(key, &value))
                .transpose()
        };

        let addresses = ContractAddresses {
            wrapped_token: address(options.wrapped_token, WRAPPED_TOKEN_ENV)?,
            registry: address(options.registry, REGISTRY_ENV)?,
            stablecoin: address(options.stablecoin, STABLECOIN_ENV)?,
            price_feed: address(options.price_feed, PRICE_FEED_ENV)?,
        };

        let amount = options
            .amount
            .or_else(|| lookup(DEPOSIT_AMOUNT_ENV))
            .unwrap_or_else(|| DEFAULT_DEPOSIT_AMOUNT.to_string());
        let deposit_amount = parse_units(&amount, NATIVE_DECIMALS)?;

        let safety_margin_bps = match options.safety_margin_bps {
            Some(value) => value,
            None => parse_env(&lookup, SAFETY_MARGIN_ENV)?.unwrap_or(DEFAULT_SAFETY_MARGIN_BPS),
        };
        let referral_code = match options.referral_code {
            Some(value) => value,
            None => parse_env(&lookup, REFERRAL_CODE_ENV)?.unwrap_or(DEFAULT_REFERRAL_CODE),
        };
        let confirmations = match options.confirmations {
            Some(value) => value,
            None => parse_env(&lookup, CONFIRMATIONS_ENV)?.unwrap_or(DEFAULT_CONFIRMATIONS),
        };
        let payment_amount = parse_env(&lookup, PAYMENT_AMOUNT_ENV)?.unwrap_or(DEFAULT_PAYMENT_AMOUNT);

        Ok(Self {
            addresses,
            deposit_amount,
            safety_margin_bps,
            interest_rate_mode: InterestRateMode::Stable,
            referral_code,
            confirmations,
            payment_amount,
            json: options.json,
        })
    }

    /// Check that `command` can run with this configuration.
    pub fn validate(&self, command: Command) -> Result<()> {
        if self.deposit_amount.is_zero() {
            return Err(LendError::Config("deposit amount must be positive".to_string()));
        }
        if self.safety_margin_bps == 0 || self.safety_margin_bps > BPS_SCALE {
            return Err(LendError::InvalidMargin(self.safety_margin_bps));
        }
        if self.referral_code > MAX_REFERRAL_CODE {
            return Err(LendError::Config(format!(
                "referral code {} exceeds {}",
                self.referral_code, MAX_REFERRAL_CODE
            )));
        }
        if self.confirmations == 0 {
            return Err(LendError::Config("confirmations must be at least 1".to_string()));
        }

        self.addresses.wrapped_token()?;
        if command == Command::BorrowCycle {
            self.addresses.registry()?;
            self.addresses.stablecoin()?;
            self.addresses.price_feed()?;
        }
        Ok(())
    }

    pub fn log_configuration(&self) {
        log::info!("Configuration:");
        log::info!("  Wrapped token:  {:?}", self.addresses.wrapped_token);
        log::info!("  Registry:       {:?}", self.addresses.registry);
        log::info!("  Stablecoin:     {:?}", self.addresses.stablecoin);
        log::info!("  Price feed:     {:?}", self.addresses.price_feed);
        log::info!(
            "  Deposit amount: {} CSPR",
            format_units(self.deposit_amount, NATIVE_DECIMALS)
        );
        log::info!("  Safety margin:  {} bps", self.safety_margin_bps);
        log::info!("  Rate mode:      {:?}", self.interest_rate_mode);
        log::info!("  Referral code:  {}", self.referral_code);
        log::info!("  Confirmations:  {}", self.confirmations);
        log::info!("  Payment amount: {} motes", self.payment_amount);
    }
}

fn parse_address(key: &str, value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|err| LendError::Config(format!("{}: invalid address `{}` ({:?})", key, value, err)))
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LendError::Config(format!("{}: cannot parse `{}`", key, raw))),
        None => Ok(None),
    }
}
