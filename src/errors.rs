//! Error definitions.

use odra::prelude::*;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, LendError>;

/// Everything that can abort a run
#[derive(Debug, Error)]
pub enum LendError {
    /// The remote call was rejected or the transport failed.
    #[error("call `{entry_point}` on {contract:?} failed: {reason:?}")]
    ContractCall {
        contract: Address,
        entry_point: &'static str,
        reason: OdraError,
    },

    #[error("registry {0:?} has no router configured")]
    RouterNotSet(Address),

    #[error("price feed {0:?} returned a zero answer")]
    InvalidPrice(Address),

    #[error("price must be non-zero")]
    ZeroPrice,

    #[error("safety margin of {0} bps is outside 1..=10000")]
    InvalidMargin(u32),

    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),

    #[error("invalid amount `{input}`: {reason}")]
    InvalidAmount { input: String, reason: &'static str },

    #[error("missing address: {0}")]
    MissingAddress(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

impl LendError {
    /// True when the failure came back from a contract or the node.
    pub fn is_remote(&self) -> bool {
        matches!(self, LendError::ContractCall { .. })
    }
}
