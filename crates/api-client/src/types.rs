// In crates/api-client/src/types.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One entry of the `/coins/markets` response.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MarketCoin {
    /// The provider's market id (e.g. "bitcoin").
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    /// Present when `price_change_percentage=24h` is requested.
    pub price_change_percentage_24h_in_currency: Option<f64>,
    pub sparkline_in_7d: Option<Sparkline>,
}

impl MarketCoin {
    pub fn change_24h_pct(&self) -> Option<f64> {
        self.price_change_percentage_24h_in_currency
            .or(self.price_change_percentage_24h)
    }
}

/// The fixed-density 7-day price series, without timestamps.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<f64>,
}

/// The `/coins/{id}/market_chart` response: `[unix_ms, price]` pairs.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<(f64, f64)>,
}

/// One entry of `/coins/list?include_platform=true`.
#[derive(Debug, Deserialize, Clone)]
pub struct CoinListItem {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    /// Platform key (e.g. "base") to contract address. Values may be null or blank.
    #[serde(default)]
    pub platforms: Option<HashMap<String, Option<String>>>,
}

impl CoinListItem {
    /// The trimmed, non-blank contract address on `platform`.
    pub fn contract_on(&self, platform: &str) -> Option<&str> {
        self.platforms
            .as_ref()?
            .get(platform)?
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// The explorer's address dashboard: `data` is keyed by the queried address.
#[derive(Debug, Deserialize)]
pub(crate) struct DashboardResponse {
    #[serde(default)]
    pub data: HashMap<String, DashboardEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardEntry {
    pub address: DashboardAddress,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardAddress {
    /// Raw integer balance in the chain's smallest unit.
    pub balance: Option<Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: [&'a str; 2],
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    pub result: Option<String>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// One entry of the token-balances endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenBalanceEntry {
    pub token: Option<TokenInfo>,
    /// Raw decimal-string amount.
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenInfo {
    pub address_hash: Option<String>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    /// Usually a string ("18"), sometimes a number or null.
    pub decimals: Option<Value>,
}
