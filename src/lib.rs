//! Lend Cycle
//!
//! Drives an external lending protocol on Casper through a fixed sequence of
//! contract calls: wrap native CSPR, deposit it as collateral, borrow a
//! stablecoin against it and repay the loan.
//!
//! ## Layout
//!
//! - **types**: Wire types and entry points of the external contracts
//! - **gateway**: Capability (`LendingGateway`) and confirmation (`Transport`) seams
//! - **odra_gateway**: `HostEnv` backed gateway (livenet or OdraVM)
//! - **amounts**: Unit parsing/formatting and the borrow-amount conversion
//! - **steps**: One function per protocol action
//! - **sequence**: The `wrap` and `borrow-cycle` procedures
//! - **config**: CLI/env configuration
//!
//! None of the lending, pricing or token logic lives here; every such
//! decision is taken by the external contracts.

pub use odra;
pub use lend_cycle_contracts::types;

pub mod errors;
pub mod amounts;
pub mod gateway;
pub mod odra_gateway;
pub mod steps;
pub mod sequence;
pub mod config;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{LendError, Result};
pub use gateway::{LendingGateway, PendingTx, Receipt, Transport};
pub use odra_gateway::{ContractKind, OdraGateway};
pub use sequence::{run_borrow_cycle, run_wrap, CycleReport, Stage, WrapReport};
