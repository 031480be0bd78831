// In crates/engine/src/pipeline.rs

use crate::Result;
use crate::balances::BalanceRouter;
use crate::resolver::AssetResolver;
use api_client::{MarketDataClient, MarketSnapshot};
use app_config::HistorySource;
use core_types::{Asset, AssetAnalysis, WalletAddressSet};
use futures::future::join_all;
use std::collections::HashMap;
use strategies::SignalEngine;

/// One refresh cycle: resolve assets, fetch prices and balances, run the signal engine.
pub struct AnalysisPipeline {
    resolver: AssetResolver,
    market: MarketDataClient,
    balances: BalanceRouter,
    signals: SignalEngine,
    history_source: HistorySource,
    history_days: u32,
}

impl AnalysisPipeline {
    pub fn new(
        resolver: AssetResolver,
        market: MarketDataClient,
        balances: BalanceRouter,
        signals: SignalEngine,
    ) -> Self {
        Self {
            resolver,
            market,
            balances,
            signals,
            history_source: HistorySource::Sparkline,
            history_days: 7,
        }
    }

    /// Takes histories from the per-id chart endpoint instead of the sparkline.
    pub fn with_history_source(mut self, source: HistorySource, days: u32) -> Self {
        self.history_source = source;
        self.history_days = days;
        self
    }

    /// Resolves the tracked assets for `wallets` and analyzes them.
    pub async fn run(&self, wallets: &WalletAddressSet) -> Result<Vec<AssetAnalysis>> {
        let assets = self.resolver.resolve(wallets).await;
        self.analyze(&assets, wallets).await
    }

    /// One analysis per asset, in input order.
    ///
    /// Only a market-data failure fails the call; balance failures become `Unknown`.
    pub async fn analyze(&self, assets: &[Asset], wallets: &WalletAddressSet) -> Result<Vec<AssetAnalysis>> {
        if assets.is_empty() {
            return Ok(Vec::new());
        }

        let market_ids: Vec<String> = assets.iter().map(|a| a.market_id.clone()).collect();
        let (markets, balances) = tokio::join!(
            self.fetch_market_data(&market_ids),
            join_all(assets.iter().map(|asset| self.balances.balance(asset, wallets))),
        );
        let markets = markets?;

        let analyses: Vec<AssetAnalysis> = assets
            .iter()
            .zip(balances)
            .map(|(asset, balance)| {
                let snapshot = markets.get(&asset.market_id).cloned().unwrap_or_default();
                let report = self.signals.analyze(&snapshot.history);
                AssetAnalysis {
                    asset: asset.clone(),
                    current_price_usd: snapshot.current_price_usd,
                    price_change_24h_pct: snapshot.change_24h_pct,
                    balance,
                    history: snapshot.history,
                    algorithm_signals: report.signals,
                    final_action: report.final_action,
                }
            })
            .collect();

        tracing::info!(assets = analyses.len(), "Analysis cycle complete.");
        Ok(analyses)
    }

    async fn fetch_market_data(&self, market_ids: &[String]) -> Result<HashMap<String, MarketSnapshot>> {
        let mut markets = self.market.fetch_markets(market_ids).await?;
        if self.history_source == HistorySource::MarketChart {
            let known: Vec<String> = market_ids
                .iter()
                .filter(|id| markets.contains_key(*id))
                .cloned()
                .collect();
            let histories = self.market.fetch_histories(&known, self.history_days).await?;
            for (id, history) in histories {
                if let Some(snapshot) = markets.get_mut(&id) {
                    snapshot.history = history;
                }
            }
        }
        Ok(markets)
    }
}
