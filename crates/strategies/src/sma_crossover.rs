// In crates/strategies/src/sma_crossover.rs

use crate::math::{last_n, mean};
use crate::types::SmaCrossoverSettings;
use crate::{Error, Indicator, Result};
use core_types::{AlgorithmSignal, TradeAction};

/// Compares a short and a long simple moving average of the most recent closes.
#[derive(Debug, Clone)]
pub struct SmaCrossover {
    settings: SmaCrossoverSettings,
}

impl SmaCrossover {
    pub fn new(settings: SmaCrossoverSettings) -> Result<Self> {
        if settings.short_period == 0 || settings.long_period == 0 {
            return Err(Error::InvalidParameters(
                "SMA crossover periods must be greater than 0".to_string(),
            ));
        }
        Ok(Self { settings })
    }
}

impl Indicator for SmaCrossover {
    fn name(&self) -> &'static str {
        "SMA Crossover"
    }

    fn lookback(&self) -> usize {
        self.settings.short_period.max(self.settings.long_period)
    }

    fn assess(&self, closes: &[f64]) -> AlgorithmSignal {
        let short = mean(last_n(closes, self.settings.short_period));
        let long = mean(last_n(closes, self.settings.long_period));

        let (action, reason) = if short > long {
            (TradeAction::Buy, "Short SMA above long SMA")
        } else if short < long {
            (TradeAction::Sell, "Short SMA below long SMA")
        } else {
            (TradeAction::Hold, "SMAs converged")
        };

        AlgorithmSignal::new(
            self.name(),
            action,
            format!("{} ({:.4} vs {:.4})", reason, short, long),
        )
    }
}
