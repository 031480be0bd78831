// In crates/api-client/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to build the API client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
    #[error("Rate limited by {endpoint}")]
    RateLimited { endpoint: String },
    #[error("HTTP {status} from {endpoint}")]
    HttpStatus { status: u16, endpoint: String },
    #[error("JSON-RPC error: code {code}, msg: {msg}")]
    RpcError { code: i64, msg: String },
    #[error("No endpoint configured for chain {0}")]
    UnsupportedChain(core_types::Chain),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl Error {
    /// Whether a retry after a backoff may succeed.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
