// In crates/api-client/src/lib.rs

use async_trait::async_trait;
use core_types::{Chain, TokenHolding};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

pub mod blockchair;
pub mod blockscout;
pub mod coingecko;
pub mod error;
pub mod evm_rpc;
pub mod market;
pub mod retry;
pub mod types;

// Re-export public types
pub use blockchair::BlockchairClient;
pub use blockscout::BlockscoutClient;
pub use coingecko::CoinGeckoClient;
pub use error::{Error, Result};
pub use evm_rpc::EvmRpcClient;
pub use market::{CatalogEntry, MarketDataClient, MarketSnapshot, history_from_chart, reconstruct_history};
pub use retry::{Attempt, RetryPolicy};
pub use types::{CoinListItem, MarketChart, MarketCoin, Sparkline};

const USER_AGENT: &str = concat!("crypto-monitor/", env!("CARGO_PKG_VERSION"));

/// The market-data provider: batched quotes, per-id charts and the coin catalog.
#[async_trait]
pub trait MarketDataApi: Send + Sync {
    /// Quotes for every id in one request.
    async fn markets(&self, ids: &[String]) -> Result<Vec<MarketCoin>>;

    /// Explicit `(timestamp, price)` pairs covering the last `days` days.
    async fn market_chart(&self, id: &str, days: u32) -> Result<MarketChart>;

    /// Every listed coin with its per-platform contract addresses.
    async fn coin_list(&self) -> Result<Vec<CoinListItem>>;
}

/// A generic chain explorer that reports native balances.
#[async_trait]
pub trait ExplorerApi: Send + Sync {
    /// The raw integer balance (smallest unit) of `address` on `chain`, as a decimal string.
    async fn address_balance(&self, chain: Chain, address: &str) -> Result<String>;
}

/// EVM JSON-RPC access.
#[async_trait]
pub trait EvmRpcApi: Send + Sync {
    /// `eth_getBalance(address, "latest")`: the hex-encoded wei balance.
    async fn get_balance(&self, chain: Chain, address: &str) -> Result<String>;
}

/// Token holdings of an address on the token-discovery chain.
#[async_trait]
pub trait TokenHoldingsApi: Send + Sync {
    async fn token_holdings(&self, address: &str) -> Result<Vec<TokenHolding>>;
}

/// Builds the HTTP client shared by one upstream client.
pub fn http_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| Error::ClientBuildError(e.to_string()))
}

/// Maps 429 to `RateLimited` and any other non-success status to `HttpStatus`.
pub(crate) fn check_status(response: Response, endpoint: &str) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::RateLimited { endpoint: endpoint.to_string() });
    }
    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
        });
    }
    Ok(response)
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
