// Fakes for the upstream traits, shared by the integration tests.
#![allow(dead_code)]

use api_client::{
    CoinListItem, Error, EvmRpcApi, ExplorerApi, MarketChart, MarketCoin, MarketDataApi,
    MarketDataClient, Result, RetryPolicy, Sparkline, TokenHoldingsApi,
};
use async_trait::async_trait;
use core_types::{Chain, TokenHolding};
use engine::{
    AnalysisPipeline, AssetResolver, BalanceRouter, ContractCatalogCache, EvmNativeBalanceSource,
    ExplorerBalanceSource, TokenHoldingsBalanceSource, TokenHoldingsCache,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strategies::{SignalEngine, SignalSettings};

pub const USDC: &str = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913";
pub const DEGEN: &str = "0x4ed4e862860bed51a9570b96d89af5e1b0efefed";
pub const EVM_ADDRESS: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

/// A rising series long enough for the full indicator set.
pub fn sparkline(points: usize) -> Vec<f64> {
    (0..points).map(|i| 100.0 + i as f64).collect()
}

pub fn coin(id: &str, price: f64, sparkline_points: usize) -> MarketCoin {
    MarketCoin {
        id: id.to_string(),
        current_price: Some(price),
        price_change_percentage_24h: Some(1.0),
        sparkline_in_7d: Some(Sparkline { price: sparkline(sparkline_points) }),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct FakeMarket {
    pub coins: Vec<MarketCoin>,
    pub catalog: Vec<(String, String, String, String)>,
    pub fail_markets: AtomicBool,
    /// Delay applied to the first `markets` call only.
    pub first_call_delay: Option<Duration>,
    pub market_calls: AtomicUsize,
    pub catalog_calls: AtomicUsize,
    pub requested_ids: Mutex<Vec<Vec<String>>>,
}

impl FakeMarket {
    pub fn with_catalog(mut self, entries: &[(&str, &str, &str, &str)]) -> Self {
        self.catalog = entries
            .iter()
            .map(|(contract, id, symbol, name)| {
                (contract.to_string(), id.to_string(), symbol.to_string(), name.to_string())
            })
            .collect();
        self
    }
}

#[async_trait]
impl MarketDataApi for FakeMarket {
    async fn markets(&self, ids: &[String]) -> Result<Vec<MarketCoin>> {
        let call = self.market_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_ids.lock().unwrap().push(ids.to_vec());
        if call == 0 {
            if let Some(delay) = self.first_call_delay {
                tokio::time::sleep(delay).await;
            }
        }
        if self.fail_markets.load(Ordering::SeqCst) {
            return Err(Error::HttpStatus { status: 500, endpoint: "coins/markets".into() });
        }
        Ok(self
            .coins
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }

    async fn market_chart(&self, id: &str, _days: u32) -> Result<MarketChart> {
        let base = if id == "bitcoin" { 50_000.0 } else { 10.0 };
        Ok(MarketChart {
            prices: (0..48)
                .rev()
                .map(|i| (1_700_000_000_000.0 + i as f64 * 3_600_000.0, base + i as f64))
                .collect(),
        })
    }

    async fn coin_list(&self) -> Result<Vec<CoinListItem>> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .catalog
            .iter()
            .map(|(contract, id, symbol, name)| CoinListItem {
                id: id.clone(),
                symbol: symbol.clone(),
                name: name.clone(),
                platforms: Some(HashMap::from([("base".to_string(), Some(contract.clone()))])),
            })
            .collect())
    }
}

/// Answers with fixed raw balances per address and records every call as `chain:address`.
#[derive(Default)]
pub struct FakeExplorer {
    pub balances: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeExplorer {
    pub fn with(entries: &[(&str, &str)]) -> Self {
        Self {
            balances: entries.iter().map(|(a, b)| (a.to_string(), b.to_string())).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ExplorerApi for FakeExplorer {
    async fn address_balance(&self, chain: Chain, address: &str) -> Result<String> {
        self.calls.lock().unwrap().push(format!("{}:{}", chain, address));
        self.balances
            .get(address)
            .cloned()
            .ok_or_else(|| Error::MalformedResponse("no such address".into()))
    }
}

#[derive(Default)]
pub struct FakeEvm {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl EvmRpcApi for FakeEvm {
    async fn get_balance(&self, chain: Chain, _address: &str) -> Result<String> {
        self.calls.lock().unwrap().push(chain.to_string());
        match chain {
            // 1.5 ETH
            Chain::Ethereum => Ok("0x14d1120d7b160000".to_string()),
            // 0.5 ETH
            Chain::Base => Ok("0x6f05b59d3b20000".to_string()),
            other => Err(Error::UnsupportedChain(other)),
        }
    }
}

#[derive(Default)]
pub struct FakeHoldings {
    pub holdings: Vec<TokenHolding>,
    pub calls: AtomicUsize,
}

pub fn holding(contract: &str, symbol: &str, decimals: u32, amount: f64) -> TokenHolding {
    TokenHolding {
        contract: contract.to_string(),
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        decimals,
        amount,
    }
}

#[async_trait]
impl TokenHoldingsApi for FakeHoldings {
    async fn token_holdings(&self, _address: &str) -> Result<Vec<TokenHolding>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.holdings.clone())
    }
}

pub struct Harness {
    pub market: Arc<FakeMarket>,
    pub explorer: Arc<FakeExplorer>,
    pub evm: Arc<FakeEvm>,
    pub holdings: Arc<FakeHoldings>,
}

impl Harness {
    pub fn new(market: FakeMarket, explorer: FakeExplorer, holdings: FakeHoldings) -> Self {
        Self {
            market: Arc::new(market),
            explorer: Arc::new(explorer),
            evm: Arc::new(FakeEvm::default()),
            holdings: Arc::new(holdings),
        }
    }

    pub fn pipeline(&self) -> AnalysisPipeline {
        let market = MarketDataClient::new(self.market.clone(), RetryPolicy::default(), "base");
        let holdings = Arc::new(TokenHoldingsCache::new(self.holdings.clone(), Duration::from_secs(60)));
        let catalog = Arc::new(ContractCatalogCache::new(market.clone(), Duration::from_secs(86_400)));

        let balances = BalanceRouter::new(
            Box::new(ExplorerBalanceSource::new(self.explorer.clone())),
            Box::new(EvmNativeBalanceSource::new(self.evm.clone())),
            Box::new(TokenHoldingsBalanceSource::new(holdings.clone())),
        );
        let signals = SignalEngine::new(&SignalSettings::default()).unwrap();

        AnalysisPipeline::new(AssetResolver::new(holdings, catalog), market, balances, signals)
    }
}
