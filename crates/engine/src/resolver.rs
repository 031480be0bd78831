// In crates/engine/src/resolver.rs

use crate::cache::{ContractCatalogCache, TokenHoldingsCache};
use core_types::{Asset, Chain, WalletAddressSet};
use std::collections::HashSet;
use std::sync::Arc;

/// Turns the saved wallet addresses into the list of assets to track.
pub struct AssetResolver {
    holdings: Arc<TokenHoldingsCache>,
    catalog: Arc<ContractCatalogCache>,
}

impl AssetResolver {
    pub fn new(holdings: Arc<TokenHoldingsCache>, catalog: Arc<ContractCatalogCache>) -> Self {
        Self { holdings, catalog }
    }

    /// Default assets for every chain with an address, then any discovered tokens.
    /// Ids are unique; the first occurrence wins.
    pub async fn resolve(&self, wallets: &WalletAddressSet) -> Vec<Asset> {
        let mut assets: Vec<Asset> = Chain::ALL
            .iter()
            .filter(|chain| wallets.for_chain(**chain).is_some())
            .map(|chain| Asset::default_for(*chain))
            .collect();

        for chain in Chain::ALL.iter().filter(|c| c.supports_token_discovery()) {
            if let Some(address) = wallets.for_chain(*chain) {
                assets.extend(self.discover_tokens(*chain, address).await);
            }
        }

        let mut seen = HashSet::new();
        assets.retain(|asset| seen.insert(asset.id.clone()));
        tracing::debug!(count = assets.len(), "Resolved tracked assets.");
        assets
    }

    async fn discover_tokens(&self, chain: Chain, address: &str) -> Vec<Asset> {
        let holdings: Vec<_> = self
            .holdings
            .get(address)
            .await
            .into_iter()
            .filter(|h| h.amount > 0.0)
            .collect();
        if holdings.is_empty() {
            return Vec::new();
        }

        let catalog = self.catalog.get().await;
        holdings
            .iter()
            .filter_map(|holding| {
                let Some(entry) = catalog.get(&holding.contract.to_lowercase()) else {
                    tracing::debug!(contract = %holding.contract, "Token not in catalog, skipping.");
                    return None;
                };
                Some(Asset::token(
                    chain,
                    &holding.contract,
                    &entry.market_id,
                    &entry.symbol,
                    &entry.name,
                    holding.decimals,
                ))
            })
            .collect()
    }
}
