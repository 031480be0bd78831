// In crates/api-client/src/blockchair.rs

use crate::types::DashboardResponse;
use crate::{Error, ExplorerApi, Result, check_status, http_client, join_url};
use app_config::types::ExplorerSettings;
use async_trait::async_trait;
use core_types::Chain;
use reqwest::Client;
use serde_json::Value;

/// Native balances from the Blockchair address dashboards.
#[derive(Debug, Clone)]
pub struct BlockchairClient {
    http_client: Client,
    base_url: String,
}

impl BlockchairClient {
    pub fn new(settings: &ExplorerSettings) -> Result<Self> {
        Ok(Self {
            http_client: http_client(settings.request_timeout_secs)?,
            base_url: settings.base_url.clone(),
        })
    }
}

#[async_trait]
impl ExplorerApi for BlockchairClient {
    async fn address_balance(&self, chain: Chain, address: &str) -> Result<String> {
        let url = join_url(
            &self.base_url,
            &format!("{}/dashboards/address/{}", chain.as_str(), address),
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::RequestFailed)?;
        let response = check_status(response, "dashboards/address")?;
        let text = response.text().await.map_err(Error::RequestFailed)?;

        raw_balance(&text)
    }
}

/// Extracts `data.<address>.address.balance` as an unsigned integer string.
fn raw_balance(body: &str) -> Result<String> {
    let dashboard: DashboardResponse =
        serde_json::from_str(body).map_err(Error::DeserializationFailed)?;

    let balance = dashboard
        .data
        .into_values()
        .next()
        .and_then(|entry| entry.address.balance)
        .ok_or_else(|| Error::MalformedResponse("dashboard has no address balance".to_string()))?;

    match balance {
        Value::Number(n) => n
            .as_u64()
            .map(|v| v.to_string())
            .ok_or_else(|| Error::MalformedResponse(format!("balance is not an unsigned integer: {}", n))),
        Value::String(s) => Ok(s),
        other => Err(Error::MalformedResponse(format!("unexpected balance value: {}", other))),
    }
}
