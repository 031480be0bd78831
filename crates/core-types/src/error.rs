// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("Invalid amount '{raw}': {reason}")]
    InvalidAmount { raw: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
