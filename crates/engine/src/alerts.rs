// In crates/engine/src/alerts.rs

use async_trait::async_trait;
use core_types::{AssetAnalysis, TradeAction};
use std::collections::HashMap;

/// Delivers a user-facing alert. Returns whether it was actually shown.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, id: &str, title: &str, message: &str) -> bool;
}

/// When to alert on a final action, and when to remember it.
pub struct AlertPolicy;

impl AlertPolicy {
    /// Alert on a BUY or SELL that differs from the last remembered action.
    /// Nothing remembered counts as HOLD.
    pub fn should_attempt_notification(action: TradeAction, previous: Option<TradeAction>) -> bool {
        action != TradeAction::Hold && previous.unwrap_or(TradeAction::Hold) != action
    }

    /// Remember HOLDs always, and other actions only once their alert got through,
    /// so an undelivered alert is retried on the next cycle.
    pub fn should_cache_action(action: TradeAction, delivered: bool) -> bool {
        action == TradeAction::Hold || delivered
    }
}

/// Tracks the last action per asset and raises alerts on changes.
#[derive(Debug, Default)]
pub struct SignalMonitor {
    last_actions: HashMap<String, TradeAction>,
}

impl SignalMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_action(&self, asset_id: &str) -> Option<TradeAction> {
        self.last_actions.get(asset_id).copied()
    }

    /// Runs one cycle's analyses through the policy. Returns how many alerts were delivered.
    pub async fn process(&mut self, analyses: &[AssetAnalysis], notifier: &dyn Notifier) -> usize {
        let mut delivered_count = 0;
        for analysis in analyses {
            let asset = &analysis.asset;
            let action = analysis.final_action;

            let delivered = if AlertPolicy::should_attempt_notification(action, self.last_action(&asset.id)) {
                let title = format!("{}: {} signal", asset.symbol, action);
                let message = format!("{} flagged {} by multi-algorithm vote.", asset.display_name, action);
                let delivered = notifier.deliver(&asset.id, &title, &message).await;
                if !delivered {
                    tracing::warn!(asset = %asset.id, %action, "Alert was not delivered.");
                }
                delivered
            } else {
                false
            };

            if delivered {
                delivered_count += 1;
            }
            if AlertPolicy::should_cache_action(action, delivered) {
                self.last_actions.insert(asset.id.clone(), action);
            }
        }
        delivered_count
    }
}
