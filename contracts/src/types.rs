//! Types exchanged with the external contracts.

use odra::casper_types::U256;

/// Basis point scale (10000 = 100%)
pub const BPS_SCALE: u32 = 10_000;

/// Decimals of native CSPR (motes)
pub const NATIVE_DECIMALS: u8 = 9;

/// Decimals of the borrowed stablecoin
pub const STABLE_DECIMALS: u8 = 18;

/// Decimals of the value units used by account data and the price feed
pub const VALUE_DECIMALS: u8 = 18;

/// Entry points of the wrapped native token.
pub mod wrapped_token {
    pub const DEPOSIT: &str = "deposit";
}

/// Entry points shared by the wrapped token and the stablecoin.
pub mod token {
    pub const APPROVE: &str = "approve";
    pub const BALANCE_OF: &str = "balance_of";
}

/// Entry points of the addresses provider (registry).
pub mod registry {
    pub const GET_ROUTER: &str = "get_router";
}

/// Entry points of the lending pool (router).
pub mod router {
    pub const DEPOSIT: &str = "deposit";
    pub const BORROW: &str = "borrow";
    pub const REPAY: &str = "repay";
    pub const GET_USER_ACCOUNT_DATA: &str = "get_user_account_data";
}

/// Entry points of the price feed.
pub mod price_feed {
    pub const LATEST_ROUND_DATA: &str = "latest_round_data";
}

/// Interest rate mode requested on borrow and repay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterestRateMode {
    /// Stable rate
    Stable = 1,
    /// Variable rate
    Variable = 2,
}

impl InterestRateMode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(InterestRateMode::Stable),
            2 => Some(InterestRateMode::Variable),
            _ => None,
        }
    }
}

/// Account snapshot returned by the router.
///
/// All amounts are in 18-decimal native value units.
#[odra::odra_type]
#[derive(Default)]
pub struct AccountData {
    /// Value of deposited collateral
    pub total_collateral: U256,
    /// Value of outstanding debt
    pub total_debt: U256,
    /// Value that can still be borrowed
    pub available_borrows: U256,
    /// Liquidation threshold in bps
    pub current_liquidation_threshold: u32,
    /// Loan-to-value in bps
    pub ltv: u32,
    /// Health factor scaled by 1e18 (U256::MAX with no debt)
    pub health_factor: U256,
}

/// Latest round of the price feed
#[odra::odra_type]
pub struct RoundData {
    pub round_id: u64,
    /// Value units per one whole stablecoin
    pub answer: U256,
    pub started_at: u64,
    pub updated_at: u64,
    pub answered_in_round: u64,
}
