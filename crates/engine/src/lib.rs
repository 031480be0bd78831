// In crates/engine/src/lib.rs

pub mod alerts;
pub mod balances;
pub mod cache;
pub mod error;
pub mod pipeline;
pub mod refresh;
pub mod resolver;

pub use alerts::{AlertPolicy, Notifier, SignalMonitor};
pub use balances::{
    BalanceRouter, BalanceSource, EvmNativeBalanceSource, ExplorerBalanceSource,
    TokenHoldingsBalanceSource,
};
pub use cache::{ContractCatalogCache, Retention, TokenHoldingsCache, TtlCache};
pub use error::{Error, Result};
pub use pipeline::AnalysisPipeline;
pub use refresh::{RefreshController, RefreshState};
pub use resolver::AssetResolver;

use api_client::{
    BlockchairClient, BlockscoutClient, CoinGeckoClient, EvmRpcApi, EvmRpcClient, ExplorerApi,
    MarketDataApi, MarketDataClient, TokenHoldingsApi,
};
use app_config::Settings;
use std::sync::Arc;
use std::time::Duration;
use strategies::SignalEngine;

/// The upstream collaborators a pipeline is assembled from.
#[derive(Clone)]
pub struct Upstreams {
    pub market: Arc<dyn MarketDataApi>,
    pub explorer: Arc<dyn ExplorerApi>,
    pub evm: Arc<dyn EvmRpcApi>,
    pub holdings: Arc<dyn TokenHoldingsApi>,
}

impl Upstreams {
    /// The HTTP clients configured in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            market: Arc::new(CoinGeckoClient::new(&settings.market).map_err(Error::ClientSetup)?),
            explorer: Arc::new(BlockchairClient::new(&settings.explorer).map_err(Error::ClientSetup)?),
            evm: Arc::new(EvmRpcClient::new(&settings.evm).map_err(Error::ClientSetup)?),
            holdings: Arc::new(BlockscoutClient::new(&settings.holdings).map_err(Error::ClientSetup)?),
        })
    }
}

/// Wires caches, resolver, balance sources and the signal engine together.
pub fn build_pipeline(settings: &Settings, upstreams: Upstreams) -> Result<AnalysisPipeline> {
    let signals = SignalEngine::new(&settings.signals)?;
    let market = MarketDataClient::from_settings(upstreams.market, &settings.market);

    let holdings = Arc::new(TokenHoldingsCache::new(
        upstreams.holdings,
        Duration::from_secs(settings.cache.holdings_ttl_secs),
    ));
    let catalog = Arc::new(ContractCatalogCache::new(
        market.clone(),
        Duration::from_secs(settings.cache.catalog_ttl_secs),
    ));

    let balances = BalanceRouter::new(
        Box::new(ExplorerBalanceSource::new(upstreams.explorer)),
        Box::new(EvmNativeBalanceSource::new(upstreams.evm)),
        Box::new(TokenHoldingsBalanceSource::new(holdings.clone())),
    );
    let resolver = AssetResolver::new(holdings, catalog);

    Ok(AnalysisPipeline::new(resolver, market, balances, signals)
        .with_history_source(settings.market.history_source, settings.market.history_days))
}
