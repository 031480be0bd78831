// In crates/strategies/src/rate_of_change.rs

use crate::types::RateOfChangeSettings;
use crate::{Error, Indicator, Result};
use core_types::{AlgorithmSignal, TradeAction};

/// Momentum vote from the percent change over a fixed lookback.
#[derive(Debug, Clone)]
pub struct RateOfChange {
    settings: RateOfChangeSettings,
}

impl RateOfChange {
    pub fn new(settings: RateOfChangeSettings) -> Result<Self> {
        if settings.period == 0 {
            return Err(Error::InvalidParameters(
                "Rate of change period must be greater than 0".to_string(),
            ));
        }
        Ok(Self { settings })
    }
}

impl Indicator for RateOfChange {
    fn name(&self) -> &'static str {
        "Rate of Change"
    }

    fn lookback(&self) -> usize {
        self.settings.period + 1
    }

    fn assess(&self, closes: &[f64]) -> AlgorithmSignal {
        let n = closes.len();
        if n <= self.settings.period {
            return AlgorithmSignal::new(self.name(), TradeAction::Hold, "Insufficient reference");
        }
        let current = closes[n - 1];
        let prior = closes[n - 1 - self.settings.period];
        if prior == 0.0 {
            return AlgorithmSignal::new(self.name(), TradeAction::Hold, "Insufficient reference");
        }

        let roc = (current - prior) / prior * 100.0;
        let threshold = self.settings.threshold_pct;
        let (action, verdict) = if roc > threshold {
            (TradeAction::Buy, "strong")
        } else if roc < -threshold {
            (TradeAction::Sell, "weak")
        } else {
            (TradeAction::Hold, "mild")
        };

        AlgorithmSignal::new(self.name(), action, format!("Momentum {} ({:.2}%)", verdict, roc))
    }
}
