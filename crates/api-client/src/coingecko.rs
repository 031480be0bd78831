// In crates/api-client/src/coingecko.rs

use crate::types::{CoinListItem, MarketChart, MarketCoin};
use crate::{Error, MarketDataApi, Result, check_status, http_client, join_url};
use app_config::types::MarketSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko-backed market data.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http_client: Client,
    base_url: String,
    vs_currency: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(settings: &MarketSettings) -> Result<Self> {
        Ok(Self {
            http_client: http_client(settings.request_timeout_secs)?,
            base_url: settings.base_url.clone(),
            vs_currency: settings.vs_currency.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = join_url(&self.base_url, path);
        let mut request = self.http_client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await.map_err(Error::RequestFailed)?;
        let response = check_status(response, endpoint)?;
        let text = response.text().await.map_err(Error::RequestFailed)?;
        serde_json::from_str(&text).map_err(Error::DeserializationFailed)
    }
}

#[async_trait]
impl MarketDataApi for CoinGeckoClient {
    async fn markets(&self, ids: &[String]) -> Result<Vec<MarketCoin>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!(ids = ids.len(), "Requesting market quotes.");
        self.get_json(
            "coins/markets",
            "coins/markets",
            &[
                ("vs_currency", self.vs_currency.clone()),
                ("ids", ids.join(",")),
                ("price_change_percentage", "24h".to_string()),
                ("sparkline", "true".to_string()),
            ],
        )
        .await
    }

    async fn market_chart(&self, id: &str, days: u32) -> Result<MarketChart> {
        // 2 to 90 days come back hourly without an explicit interval.
        let query = [
            ("vs_currency", self.vs_currency.clone()),
            ("days", days.to_string()),
        ];
        self.get_json("coins/market_chart", &format!("coins/{}/market_chart", id), &query)
            .await
    }

    async fn coin_list(&self) -> Result<Vec<CoinListItem>> {
        self.get_json(
            "coins/list",
            "coins/list",
            &[("include_platform", "true".to_string())],
        )
        .await
    }
}
