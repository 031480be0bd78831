// In crates/api-client/src/market.rs

use crate::retry::RetryPolicy;
use crate::{MarketDataApi, Result};
use app_config::types::MarketSettings;
use chrono::{DateTime, Duration, Utc};
use core_types::PricePoint;
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Sparklines are assumed to span exactly this long.
const SPARKLINE_SPAN_SECS: f64 = 7.0 * 24.0 * 3600.0;

/// Quote data for one market id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketSnapshot {
    pub current_price_usd: f64,
    pub change_24h_pct: Option<f64>,
    /// Ascending by timestamp. Empty when the provider sent fewer than two usable prices.
    pub history: Vec<PricePoint>,
}

/// A catalog entry for a token contract.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub market_id: String,
    pub symbol: String,
    pub name: String,
}

/// Rate-limit aware access to the market-data provider.
#[derive(Clone)]
pub struct MarketDataClient {
    api: Arc<dyn MarketDataApi>,
    retry: RetryPolicy,
    catalog_platform: String,
}

impl MarketDataClient {
    pub fn new(api: Arc<dyn MarketDataApi>, retry: RetryPolicy, catalog_platform: impl Into<String>) -> Self {
        Self {
            api,
            retry,
            catalog_platform: catalog_platform.into(),
        }
    }

    pub fn from_settings(api: Arc<dyn MarketDataApi>, settings: &MarketSettings) -> Self {
        Self::new(api, RetryPolicy::from_settings(settings), settings.catalog_platform.clone())
    }

    /// Fetches quotes for all `market_ids` in a single batched request.
    ///
    /// Rate-limit responses are retried per the policy; anything else fails immediately.
    /// Ids the provider does not know are simply absent from the result.
    pub async fn fetch_markets(&self, market_ids: &[String]) -> Result<HashMap<String, MarketSnapshot>> {
        let ids = distinct(market_ids);
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let coins = self
            .retry
            .run("coins/markets", || self.api.markets(&ids))
            .await?;

        let now = Utc::now();
        let snapshots: HashMap<_, _> = coins
            .into_iter()
            .map(|coin| {
                let prices = coin
                    .sparkline_in_7d
                    .as_ref()
                    .map(|s| s.price.as_slice())
                    .unwrap_or_default();
                let snapshot = MarketSnapshot {
                    current_price_usd: coin.current_price.unwrap_or(0.0),
                    change_24h_pct: coin.change_24h_pct(),
                    history: reconstruct_history(prices, now),
                };
                (coin.id, snapshot)
            })
            .collect();

        tracing::debug!(requested = ids.len(), received = snapshots.len(), "Fetched market quotes.");
        Ok(snapshots)
    }

    /// Explicitly timestamped history for one market id.
    pub async fn fetch_history(&self, market_id: &str, days: u32) -> Result<Vec<PricePoint>> {
        let chart = self
            .retry
            .run("coins/market_chart", || self.api.market_chart(market_id, days))
            .await?;
        Ok(history_from_chart(&chart.prices))
    }

    /// Histories for several market ids. The first failure fails the whole batch.
    pub async fn fetch_histories(
        &self,
        market_ids: &[String],
        days: u32,
    ) -> Result<HashMap<String, Vec<PricePoint>>> {
        let ids = distinct(market_ids);
        let histories = try_join_all(ids.iter().map(|id| self.fetch_history(id, days))).await?;
        Ok(ids.into_iter().zip(histories).collect())
    }

    /// Contract address (lower-cased) to catalog entry for the configured platform.
    ///
    /// Best effort: any failure yields an empty map.
    pub async fn fetch_contract_catalog(&self) -> HashMap<String, CatalogEntry> {
        let coins = match self.api.coin_list().await {
            Ok(coins) => coins,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch the coin catalog.");
                return HashMap::new();
            }
        };

        let catalog: HashMap<_, _> = coins
            .iter()
            .filter_map(|coin| {
                let contract = coin.contract_on(&self.catalog_platform)?;
                Some((
                    contract.to_lowercase(),
                    CatalogEntry {
                        market_id: coin.id.clone(),
                        symbol: coin.symbol.clone(),
                        name: coin.name.clone(),
                    },
                ))
            })
            .collect();

        tracing::info!(platform = %self.catalog_platform, contracts = catalog.len(), "Fetched contract catalog.");
        catalog
    }
}

fn distinct(ids: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter().filter(|id| seen.insert(id.as_str())).cloned().collect()
}

/// Assigns timestamps to an untimed 7-day price series.
///
/// Non-positive prices are dropped first. The last point is stamped `now` and the
/// rest recede at a uniform spacing of `round(7d / (n - 1))` seconds, at least 1s.
pub fn reconstruct_history(prices: &[f64], now: DateTime<Utc>) -> Vec<PricePoint> {
    let prices: Vec<f64> = prices.iter().copied().filter(|p| *p > 0.0).collect();
    if prices.len() < 2 {
        return Vec::new();
    }

    let last = prices.len() - 1;
    let spacing = ((SPARKLINE_SPAN_SECS / last as f64).round() as i64).max(1);

    prices
        .into_iter()
        .enumerate()
        .map(|(index, price_usd)| PricePoint {
            timestamp: now - Duration::seconds(spacing * (last - index) as i64),
            price_usd,
        })
        .collect()
}

/// Converts `[unix_ms, price]` pairs, keeping positive prices, sorted ascending.
pub fn history_from_chart(pairs: &[(f64, f64)]) -> Vec<PricePoint> {
    let mut history: Vec<PricePoint> = pairs
        .iter()
        .filter(|(_, price)| *price > 0.0)
        .filter_map(|(ms, price)| {
            DateTime::from_timestamp_millis(*ms as i64).map(|timestamp| PricePoint {
                timestamp,
                price_usd: *price,
            })
        })
        .collect();
    history.sort_by_key(|point| point.timestamp);
    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoinListItem, MarketChart, MarketCoin, Sparkline};
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeMarket {
        coins: Vec<MarketCoin>,
        requested: Mutex<Vec<Vec<String>>>,
        catalog_calls: AtomicUsize,
        catalog_fails: bool,
    }

    #[async_trait]
    impl MarketDataApi for FakeMarket {
        async fn markets(&self, ids: &[String]) -> Result<Vec<MarketCoin>> {
            self.requested.lock().unwrap().push(ids.to_vec());
            Ok(self.coins.clone())
        }

        async fn market_chart(&self, _id: &str, _days: u32) -> Result<MarketChart> {
            Ok(MarketChart {
                prices: vec![(2_000.0, 5.0), (1_000.0, 4.0), (3_000.0, 0.0)],
            })
        }

        async fn coin_list(&self) -> Result<Vec<CoinListItem>> {
            self.catalog_calls.fetch_add(1, Ordering::SeqCst);
            if self.catalog_fails {
                return Err(Error::HttpStatus { status: 503, endpoint: "coins/list".into() });
            }
            Ok(serde_json::from_str(
                r#"[{"id": "degen-base", "symbol": "degen", "name": "Degen",
                     "platforms": {"base": "0x4ED4E862860beD51a9570b96d89aF5E1B0Efefed"}},
                    {"id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "platforms": {"": ""}}]"#,
            )
            .unwrap())
        }
    }

    fn client(fake: Arc<FakeMarket>) -> MarketDataClient {
        MarketDataClient::new(fake, RetryPolicy::default(), "base")
    }

    #[test]
    fn reconstructs_uniformly_spaced_history_ending_now() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let history = reconstruct_history(&[10.0, 0.0, 11.0, -1.0, 12.0], now);

        // Three usable prices span 7 days: 302400s apart.
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].timestamp, now);
        assert_eq!(history[1].timestamp, now - Duration::seconds(302_400));
        assert_eq!(history[0].timestamp, now - Duration::seconds(604_800));
        assert_eq!(history[0].price_usd, 10.0);
    }

    #[test]
    fn short_series_have_no_history() {
        let now = Utc::now();
        assert!(reconstruct_history(&[], now).is_empty());
        assert!(reconstruct_history(&[5.0, 0.0], now).is_empty());
    }

    #[test]
    fn spacing_never_drops_below_one_second() {
        let now = Utc::now();
        let prices = vec![1.0; 1_000_000];
        let history = reconstruct_history(&prices, now);
        assert_eq!(history[history.len() - 2].timestamp, now - Duration::seconds(1));
    }

    #[test]
    fn chart_pairs_are_used_verbatim_and_sorted() {
        let history = history_from_chart(&[(2_000.0, 5.0), (1_000.0, 4.0), (3_000.0, 0.0)]);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].timestamp.timestamp_millis(), 1_000);
        assert_eq!(history[1].price_usd, 5.0);
    }

    #[tokio::test]
    async fn batches_distinct_ids_into_one_request() {
        let fake = Arc::new(FakeMarket {
            coins: vec![MarketCoin {
                id: "ethereum".into(),
                current_price: Some(3000.0),
                price_change_percentage_24h: Some(2.5),
                sparkline_in_7d: Some(Sparkline { price: vec![2900.0, 3000.0] }),
                ..Default::default()
            }],
            ..Default::default()
        });

        let ids = vec!["ethereum".to_string(), "bitcoin".to_string(), "ethereum".to_string()];
        let markets = client(fake.clone()).fetch_markets(&ids).await.unwrap();

        assert_eq!(*fake.requested.lock().unwrap(), vec![vec!["ethereum".to_string(), "bitcoin".to_string()]]);
        let eth = &markets["ethereum"];
        assert_eq!(eth.current_price_usd, 3000.0);
        assert_eq!(eth.change_24h_pct, Some(2.5));
        assert_eq!(eth.history.len(), 2);
        assert!(!markets.contains_key("bitcoin"));
    }

    #[tokio::test]
    async fn empty_id_set_skips_the_request() {
        let fake = Arc::new(FakeMarket::default());
        assert!(client(fake.clone()).fetch_markets(&[]).await.unwrap().is_empty());
        assert!(fake.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalog_keys_are_lowercased_contracts() {
        let fake = Arc::new(FakeMarket::default());
        let catalog = client(fake).fetch_contract_catalog().await;

        assert_eq!(catalog.len(), 1);
        let entry = &catalog["0x4ed4e862860bed51a9570b96d89af5e1b0efefed"];
        assert_eq!(entry.market_id, "degen-base");
        assert_eq!(entry.symbol, "degen");
    }

    #[tokio::test]
    async fn catalog_failure_is_an_empty_map() {
        let fake = Arc::new(FakeMarket { catalog_fails: true, ..Default::default() });
        assert!(client(fake.clone()).fetch_contract_catalog().await.is_empty());
        assert_eq!(fake.catalog_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn histories_are_keyed_by_distinct_id() {
        let fake = Arc::new(FakeMarket::default());
        let ids = vec!["bitcoin".to_string(), "bitcoin".to_string(), "solana".to_string()];
        let histories = client(fake).fetch_histories(&ids, 7).await.unwrap();

        assert_eq!(histories.len(), 2);
        assert_eq!(histories["solana"].len(), 2);
    }
}
