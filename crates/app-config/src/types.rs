// In crates/app-config/src/types.rs

use serde::Deserialize;
use std::path::PathBuf;
use strategies::SignalSettings;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the market-data provider.
    pub market: MarketSettings,
    /// Settings for the generic chain-explorer balance endpoint.
    pub explorer: ExplorerSettings,
    /// JSON-RPC endpoints for the EVM chains.
    pub evm: EvmSettings,
    /// Settings for the token-holdings endpoint.
    pub holdings: HoldingsSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    // Indicator parameters. Omitting the table keeps the standard setup.
    #[serde(default)]
    pub signals: SignalSettings,
    #[serde(default)]
    pub wallets: WalletSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
    /// How often `watch` mode refreshes, in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

/// Where price histories come from.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HistorySource {
    /// Reconstruct timestamps for the 7-day sparkline of the batched quote call.
    #[default]
    Sparkline,
    /// Fetch explicit (timestamp, price) pairs per asset.
    MarketChart,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MarketSettings {
    /// The REST base URL, e.g. `https://api.coingecko.com/api/v3`.
    pub base_url: String,
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    /// Optional demo-tier API key.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Total attempts for a rate-limited call, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff before retry `n` is `n * backoff_step_ms`.
    #[serde(default = "default_backoff_step")]
    pub backoff_step_ms: u64,
    #[serde(default)]
    pub history_source: HistorySource,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    /// Platform key whose contract addresses feed the token catalog.
    #[serde(default = "default_catalog_platform")]
    pub catalog_platform: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ExplorerSettings {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EvmSettings {
    pub ethereum_rpc_url: String,
    pub base_rpc_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HoldingsSettings {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CacheSettings {
    pub holdings_ttl_secs: u64,
    pub catalog_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            holdings_ttl_secs: 60,
            catalog_ttl_secs: 24 * 60 * 60,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct WalletSettings {
    /// The TOML file holding the saved wallet addresses.
    pub path: PathBuf,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self { path: PathBuf::from("config/wallets.toml") }
    }
}

/// Helper functions for serde defaults
fn default_refresh_interval() -> u64 { 300 }
fn default_vs_currency() -> String { "usd".to_string() }
fn default_timeout() -> u64 { 20 }
fn default_max_attempts() -> u32 { 3 }
fn default_backoff_step() -> u64 { 1500 }
fn default_history_days() -> u32 { 7 }
fn default_catalog_platform() -> String { "base".to_string() }
