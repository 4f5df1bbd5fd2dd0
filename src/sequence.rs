//! The wrap and borrow-cycle procedures.
//!
//! A run is a fixed list of stages executed in order. Each stage completes
//! (including confirmation) before the next starts and the first error ends
//! the run.

use odra::casper_types::U256;
use odra::prelude::*;
use serde::Serialize;
use serde_json::{json, Value};

use crate::amounts::format_units;
use crate::config::Config;
use crate::errors::Result;
use crate::gateway::{LendingGateway, Receipt};
use crate::steps;
use crate::types::{AccountData, NATIVE_DECIMALS, STABLE_DECIMALS, VALUE_DECIMALS};

/// Stages of the borrow cycle, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Wrap,
    ApproveCollateral,
    Deposit,
    SnapshotAfterDeposit,
    PriceLookup,
    ComputeBorrow,
    ApproveBorrowRepayment,
    Borrow,
    SnapshotAfterBorrow,
    ApproveRepay,
    Repay,
    SnapshotAfterRepay,
}

impl Stage {
    pub const ALL: [Stage; 12] = [
        Stage::Wrap,
        Stage::ApproveCollateral,
        Stage::Deposit,
        Stage::SnapshotAfterDeposit,
        Stage::PriceLookup,
        Stage::ComputeBorrow,
        Stage::ApproveBorrowRepayment,
        Stage::Borrow,
        Stage::SnapshotAfterBorrow,
        Stage::ApproveRepay,
        Stage::Repay,
        Stage::SnapshotAfterRepay,
    ];

    pub fn position(self) -> usize {
        Stage::ALL.iter().position(|stage| *stage == self).unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Wrap => "wrap native currency",
            Stage::ApproveCollateral => "approve collateral",
            Stage::Deposit => "deposit collateral",
            Stage::SnapshotAfterDeposit => "account snapshot",
            Stage::PriceLookup => "price lookup",
            Stage::ComputeBorrow => "compute borrow amount",
            Stage::ApproveBorrowRepayment => "approve repayment",
            Stage::Borrow => "borrow",
            Stage::SnapshotAfterBorrow => "account snapshot",
            Stage::ApproveRepay => "approve repayment",
            Stage::Repay => "repay",
            Stage::SnapshotAfterRepay => "account snapshot",
        }
    }
}

/// Tracks stage progress and logs the failing stage.
struct Progress {
    completed: Vec<Stage>,
}

impl Progress {
    fn new() -> Self {
        Self { completed: Vec::with_capacity(Stage::ALL.len()) }
    }

    fn run<T>(&mut self, stage: Stage, action: impl FnOnce() -> Result<T>) -> Result<T> {
        debug_assert_eq!(stage.position(), self.completed.len(), "stage out of order");
        log::info!("[{}/{}] {}", stage.position() + 1, Stage::ALL.len(), stage.label());

        match action() {
            Ok(value) => {
                self.completed.push(stage);
                Ok(value)
            }
            Err(err) => {
                log::error!("Stage `{}` failed: {}", stage.label(), err);
                Err(err)
            }
        }
    }
}

/// Result of the wrap procedure
#[derive(Debug, Clone)]
pub struct WrapReport {
    pub amount: U256,
    pub balance: U256,
    pub receipt: Receipt,
}

impl WrapReport {
    pub fn to_json(&self) -> Value {
        json!({
            "amount": format_units(self.amount, NATIVE_DECIMALS),
            "balance": format_units(self.balance, NATIVE_DECIMALS),
            "transaction": receipt_json(&self.receipt),
        })
    }
}

/// Result of a complete borrow cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub router: Address,
    pub deposit_amount: U256,
    pub wrapped_balance: U256,
    pub after_deposit: AccountData,
    pub price: U256,
    pub borrow_amount: U256,
    pub after_borrow: AccountData,
    pub after_repay: AccountData,
    /// Confirmed calls in submission order
    pub receipts: Vec<Receipt>,
    pub stages: Vec<Stage>,
}

impl CycleReport {
    pub fn to_json(&self) -> Value {
        json!({
            "router": format!("{:?}", self.router),
            "deposit_amount": format_units(self.deposit_amount, NATIVE_DECIMALS),
            "wrapped_balance": format_units(self.wrapped_balance, NATIVE_DECIMALS),
            "price": format_units(self.price, VALUE_DECIMALS),
            "borrow_amount": format_units(self.borrow_amount, STABLE_DECIMALS),
            "snapshots": {
                "after_deposit": snapshot_json(&self.after_deposit),
                "after_borrow": snapshot_json(&self.after_borrow),
                "after_repay": snapshot_json(&self.after_repay),
            },
            "stages": self.stages,
            "transactions": self.receipts.iter().map(receipt_json).collect::<Vec<_>>(),
        })
    }
}

fn snapshot_json(data: &AccountData) -> Value {
    json!({
        "total_collateral": format_units(data.total_collateral, VALUE_DECIMALS),
        "total_debt": format_units(data.total_debt, VALUE_DECIMALS),
        "available_borrows": format_units(data.available_borrows, VALUE_DECIMALS),
        "ltv_bps": data.ltv,
        "liquidation_threshold_bps": data.current_liquidation_threshold,
    })
}

fn receipt_json(receipt: &Receipt) -> Value {
    json!({
        "entry_point": receipt.entry_point,
        "contract": format!("{:?}", receipt.contract),
        "submitted_at": receipt.submitted_at,
        "confirmed_at": receipt.confirmed_at,
        "confirmations": receipt.confirmations,
    })
}

/// Wrap the configured amount and read back the balance.
pub fn run_wrap<G: LendingGateway>(gateway: &mut G, config: &Config) -> Result<WrapReport> {
    let token = config.addresses.wrapped_token()?;
    let wrapped = steps::wrap_and_check(gateway, token, config.deposit_amount, config.confirmations)?;
    Ok(WrapReport {
        amount: config.deposit_amount,
        balance: wrapped.balance,
        receipt: wrapped.receipt,
    })
}

/// Wrap, deposit, borrow and repay, snapshotting the account in between.
pub fn run_borrow_cycle<G: LendingGateway>(gateway: &mut G, config: &Config) -> Result<CycleReport> {
    let token = config.addresses.wrapped_token()?;
    let registry = config.addresses.registry()?;
    let stablecoin = config.addresses.stablecoin()?;
    let price_feed = config.addresses.price_feed()?;
    let amount = config.deposit_amount;
    let confirmations = config.confirmations;

    let mut progress = Progress::new();
    let mut receipts = Vec::with_capacity(7);

    let wrapped = progress.run(Stage::Wrap, || {
        steps::wrap_and_check(gateway, token, amount, confirmations)
    })?;
    receipts.push(wrapped.receipt);

    let pool = steps::resolve_router(gateway, registry)?;

    receipts.push(progress.run(Stage::ApproveCollateral, || {
        steps::approve(gateway, token, pool.address(), amount, NATIVE_DECIMALS, confirmations)
    })?);

    receipts.push(progress.run(Stage::Deposit, || {
        pool.deposit(gateway, token, amount, config.referral_code, confirmations)
    })?);

    let after_deposit = progress.run(Stage::SnapshotAfterDeposit, || pool.account_snapshot(gateway))?;

    let price = progress.run(Stage::PriceLookup, || steps::latest_price(gateway, price_feed))?;

    let borrow_amount = progress.run(Stage::ComputeBorrow, || {
        steps::compute_borrow_amount(after_deposit.available_borrows, price, config.safety_margin_bps)
    })?;

    receipts.push(progress.run(Stage::ApproveBorrowRepayment, || {
        steps::approve(gateway, stablecoin, pool.address(), borrow_amount, STABLE_DECIMALS, confirmations)
    })?);

    receipts.push(progress.run(Stage::Borrow, || {
        pool.borrow(
            gateway,
            stablecoin,
            borrow_amount,
            config.interest_rate_mode,
            config.referral_code,
            confirmations,
        )
    })?);

    let after_borrow = progress.run(Stage::SnapshotAfterBorrow, || pool.account_snapshot(gateway))?;

    receipts.push(progress.run(Stage::ApproveRepay, || {
        steps::approve(gateway, stablecoin, pool.address(), borrow_amount, STABLE_DECIMALS, confirmations)
    })?);

    receipts.push(progress.run(Stage::Repay, || {
        pool.repay(gateway, stablecoin, borrow_amount, config.interest_rate_mode, confirmations)
    })?);

    let after_repay = progress.run(Stage::SnapshotAfterRepay, || pool.account_snapshot(gateway))?;

    Ok(CycleReport {
        router: pool.address(),
        deposit_amount: amount,
        wrapped_balance: wrapped.balance,
        after_deposit,
        price,
        borrow_amount,
        after_borrow,
        after_repay,
        receipts,
        stages: progress.completed,
    })
}
