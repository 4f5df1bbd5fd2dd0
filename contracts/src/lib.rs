//! Lend-cycle contracts
//!
//! Odra implementations of every contract the lend-cycle procedures talk to,
//! together with the types they exchange. The integration tests deploy them on
//! the OdraVM; the livenet gateway loads them by address so reads can be
//! served locally.
//!
//! ## Contracts
//!
//! - **WrappedNative**: payable `deposit` minting wrapped CSPR 1:1
//! - **StableToken**: fixed-supply 18-decimal stablecoin
//! - **AddressesProvider**: registry resolving the lending pool address
//! - **PriceFeed**: round-based price of the stablecoin in value units
//! - **LendingPool**: single-market deposit/borrow/repay with account data

// Re-export odra for downstream usage
pub use odra;

pub mod types;
pub mod mock_errors;
pub mod ledger;

pub mod wrapped_native;
pub mod stable_token;
pub mod addresses_provider;
pub mod price_feed;
pub mod lending_pool;

pub use addresses_provider::AddressesProvider;
pub use lending_pool::LendingPool;
pub use mock_errors::MockError;
pub use price_feed::PriceFeed;
pub use stable_token::StableToken;
pub use wrapped_native::WrappedNative;
