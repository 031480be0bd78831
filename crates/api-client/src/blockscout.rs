// In crates/api-client/src/blockscout.rs

use crate::types::TokenBalanceEntry;
use crate::{Error, Result, TokenHoldingsApi, check_status, http_client, join_url};
use app_config::types::HoldingsSettings;
use async_trait::async_trait;
use core_types::TokenHolding;
use core_types::units::scale_decimal_string;
use reqwest::Client;
use serde_json::Value;

const DEFAULT_TOKEN_DECIMALS: u32 = 18;

/// Token balances from a Blockscout v2 instance.
#[derive(Debug, Clone)]
pub struct BlockscoutClient {
    http_client: Client,
    base_url: String,
}

impl BlockscoutClient {
    pub fn new(settings: &HoldingsSettings) -> Result<Self> {
        Ok(Self {
            http_client: http_client(settings.request_timeout_secs)?,
            base_url: settings.base_url.clone(),
        })
    }
}

#[async_trait]
impl TokenHoldingsApi for BlockscoutClient {
    async fn token_holdings(&self, address: &str) -> Result<Vec<TokenHolding>> {
        let url = join_url(
            &self.base_url,
            &format!("api/v2/addresses/{}/token-balances", address),
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::RequestFailed)?;
        let response = check_status(response, "token-balances")?;
        let text = response.text().await.map_err(Error::RequestFailed)?;

        let entries: Vec<TokenBalanceEntry> =
            serde_json::from_str(&text).map_err(Error::DeserializationFailed)?;
        Ok(entries.into_iter().filter_map(into_holding).collect())
    }
}

/// Entries without a contract or a parsable value are skipped.
fn into_holding(entry: TokenBalanceEntry) -> Option<TokenHolding> {
    let token = entry.token?;
    let contract = token.address_hash?.trim().to_lowercase();
    if contract.is_empty() {
        return None;
    }
    let decimals = token
        .decimals
        .as_ref()
        .and_then(parse_decimals)
        .unwrap_or(DEFAULT_TOKEN_DECIMALS);

    let raw = entry.value?;
    let amount = match scale_decimal_string(&raw, decimals) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::debug!(contract = %contract, error = %e, "Skipping token with unreadable balance.");
            return None;
        }
    };

    Some(TokenHolding {
        contract,
        symbol: token.symbol.unwrap_or_default(),
        name: token.name.unwrap_or_default(),
        decimals,
        amount,
    })
}

fn parse_decimals(value: &Value) -> Option<u32> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        _ => None,
    }
}
