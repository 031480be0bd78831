// In crates/strategies/src/engine.rs

use crate::factory::create_indicators;
use crate::types::SignalSettings;
use crate::{Error, Indicator, Result};
use core_types::{AlgorithmSignal, PricePoint, TradeAction};

/// The outcome of analysing one price history.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalReport {
    pub signals: Vec<AlgorithmSignal>,
    pub final_action: TradeAction,
}

/// Turns a price history into per-indicator votes and a final recommendation.
pub struct SignalEngine {
    indicators: Vec<Box<dyn Indicator + Send + Sync>>,
    min_history: usize,
    vote_margin: usize,
}

impl SignalEngine {
    /// Creates an engine from its settings.
    ///
    /// Fails if any indicator is misconfigured, or if `min_history` is shorter
    /// than what the indicators need to look back over.
    pub fn new(settings: &SignalSettings) -> Result<Self> {
        let indicators = create_indicators(settings)?;

        let required = indicators.iter().map(|i| i.lookback()).max().unwrap_or(0);
        if settings.min_history < required {
            return Err(Error::InvalidParameters(format!(
                "min_history ({}) must be at least {} for the configured indicators",
                settings.min_history, required
            )));
        }
        if settings.vote_margin == 0 {
            return Err(Error::InvalidParameters("vote_margin must be greater than 0".to_string()));
        }

        Ok(Self {
            indicators,
            min_history: settings.min_history,
            vote_margin: settings.vote_margin,
        })
    }

    /// Analyses a chronologically ascending price history.
    ///
    /// Short histories yield a single HOLD "Data Check" signal; otherwise every
    /// indicator votes once and the final action follows the vote rule.
    pub fn analyze(&self, history: &[PricePoint]) -> SignalReport {
        if history.len() < self.min_history {
            let signal = AlgorithmSignal::new(
                "Data Check",
                TradeAction::Hold,
                format!(
                    "insufficient data ({} of {} price points)",
                    history.len(),
                    self.min_history
                ),
            );
            return SignalReport {
                signals: vec![signal],
                final_action: TradeAction::Hold,
            };
        }

        let closes: Vec<f64> = history.iter().map(|point| point.price_usd).collect();
        let signals: Vec<AlgorithmSignal> =
            self.indicators.iter().map(|indicator| indicator.assess(&closes)).collect();
        let final_action = decide_final_action(&signals, self.vote_margin);

        tracing::debug!(points = closes.len(), %final_action, "Signal analysis complete.");
        SignalReport { signals, final_action }
    }

    pub fn min_history(&self) -> usize {
        self.min_history
    }
}

/// The vote rule: act only when one side leads the other by at least `margin`.
///
/// Ties and near-ties resolve to HOLD, so this is deliberately stricter than a
/// plain majority.
pub fn decide_final_action(signals: &[AlgorithmSignal], margin: usize) -> TradeAction {
    let count = |action: TradeAction| signals.iter().filter(|s| s.action == action).count();
    let (buys, sells) = (count(TradeAction::Buy), count(TradeAction::Sell));

    if buys >= sells + margin {
        TradeAction::Buy
    } else if sells >= buys + margin {
        TradeAction::Sell
    } else {
        TradeAction::Hold
    }
}
