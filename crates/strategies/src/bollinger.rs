// In crates/strategies/src/bollinger.rs

use crate::math::last_n;
use crate::types::BollingerSettings;
use crate::{Error, Indicator, Result};
use core_types::{AlgorithmSignal, TradeAction};
use ta::Next;
use ta::indicators::{BollingerBands as Bb, BollingerBandsOutput};

/// Mean-reversion vote: a close outside the bands is expected to revert.
#[derive(Debug, Clone)]
pub struct Bollinger {
    settings: BollingerSettings,
    bands: Bb,
}

impl Bollinger {
    pub fn new(settings: BollingerSettings) -> Result<Self> {
        let bands = Bb::new(settings.period, settings.multiplier).map_err(|e| {
            Error::InvalidParameters(format!(
                "Bollinger({}, {}): {:?}",
                settings.period, settings.multiplier, e
            ))
        })?;
        Ok(Self { settings, bands })
    }

    /// Bands over the most recent `period` closes, using the population
    /// standard deviation of that window.
    pub fn bands(&self, closes: &[f64]) -> BollingerBandsOutput {
        let mut bands = self.bands.clone();
        let window = last_n(closes, self.settings.period);
        let mut output = BollingerBandsOutput { average: 0.0, upper: 0.0, lower: 0.0 };
        for close in window {
            output = bands.next(*close);
        }
        output
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &'static str {
        "Bollinger Bands"
    }

    fn lookback(&self) -> usize {
        self.settings.period
    }

    fn assess(&self, closes: &[f64]) -> AlgorithmSignal {
        let Some(current) = closes.last().copied() else {
            return AlgorithmSignal::new(self.name(), TradeAction::Hold, "No prices");
        };
        let bands = self.bands(closes);

        if current < bands.lower {
            AlgorithmSignal::new(
                self.name(),
                TradeAction::Buy,
                format!("Price below lower band ({:.4})", bands.lower),
            )
        } else if current > bands.upper {
            AlgorithmSignal::new(
                self.name(),
                TradeAction::Sell,
                format!("Price above upper band ({:.4})", bands.upper),
            )
        } else {
            AlgorithmSignal::new(self.name(), TradeAction::Hold, "Price inside bands")
        }
    }
}
