// In crates/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Market data unavailable: {0}")]
    MarketData(#[from] api_client::Error),

    #[error("Failed to set up upstream client: {0}")]
    ClientSetup(api_client::Error),

    #[error("Invalid signal settings: {0}")]
    Signals(#[from] strategies::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
