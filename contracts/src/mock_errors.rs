//! Revert codes of the mock contracts.

use odra::prelude::*;

#[repr(u16)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MockError {
    // Token errors (1xx)
    InsufficientBalance = 100,
    InsufficientAllowance = 101,
    ZeroAmount = 102,

    // Pool errors (2xx)
    UnsupportedAsset = 200,
    NoCollateral = 201,
    BorrowCapacityExceeded = 202,
    InvalidRateMode = 203,
    NoDebt = 204,
    DelegationNotSupported = 205,

    // Oracle errors (3xx)
    PriceUnavailable = 300,

    // Access control errors (4xx)
    Unauthorized = 400,
    NotInitialized = 401,
}

impl MockError {
    pub const fn message(&self) -> &'static str {
        match self {
            MockError::InsufficientBalance => "Insufficient balance",
            MockError::InsufficientAllowance => "Insufficient allowance",
            MockError::ZeroAmount => "Amount must be positive",
            MockError::UnsupportedAsset => "Asset not supported by the pool",
            MockError::NoCollateral => "No collateral deposited",
            MockError::BorrowCapacityExceeded => "Borrow exceeds available capacity",
            MockError::InvalidRateMode => "Invalid interest rate mode",
            MockError::NoDebt => "No debt to repay",
            MockError::DelegationNotSupported => "Borrowing on behalf of others is not supported",
            MockError::PriceUnavailable => "Price unavailable",
            MockError::Unauthorized => "Unauthorized: caller is not admin",
            MockError::NotInitialized => "Contract not initialized",
        }
    }
}

impl core::fmt::Display for MockError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl From<MockError> for OdraError {
    fn from(error: MockError) -> Self {
        OdraError::user(error as u16, error.message())
    }
}
