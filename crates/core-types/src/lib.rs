// In crates/core-types/src/lib.rs

pub mod address;
pub mod chain;
pub mod error;
pub mod types;
pub mod units;

// Re-export the most important types for easy access from other crates.
pub use address::detect_chain;
pub use chain::Chain;
pub use error::{Error, Result};
pub use types::{
    AlgorithmSignal, Asset, AssetAnalysis, Balance, PricePoint, TokenHolding, TradeAction,
    WalletAddressSet,
};
