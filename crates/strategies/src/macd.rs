// In crates/strategies/src/macd.rs

use crate::math::{ema_with, new_ema};
use crate::types::MacdSettings;
use crate::{Error, Indicator, Result};
use core_types::{AlgorithmSignal, TradeAction};
use ta::indicators::ExponentialMovingAverage as Ema;

/// MACD line vs. its signal line, looking only for a crossing on the latest step.
#[derive(Debug, Clone)]
pub struct Macd {
    settings: MacdSettings,
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    pub fn new(settings: MacdSettings) -> Result<Self> {
        if settings.fast_period >= settings.slow_period {
            return Err(Error::InvalidParameters(format!(
                "MACD fast period ({}) must be shorter than slow period ({})",
                settings.fast_period, settings.slow_period
            )));
        }
        Ok(Self {
            fast: new_ema(settings.fast_period)?,
            slow: new_ema(settings.slow_period)?,
            signal: new_ema(settings.signal_period)?,
            settings,
        })
    }

    /// The MACD line and its signal line over the whole series.
    pub fn lines(&self, closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let fast = ema_with(&self.fast, closes);
        let slow = ema_with(&self.slow, closes);
        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_with(&self.signal, &macd);
        (macd, signal)
    }
}

impl Indicator for Macd {
    fn name(&self) -> &'static str {
        "MACD"
    }

    fn lookback(&self) -> usize {
        // The EMAs are defined from the first close; a crossing needs two points.
        2
    }

    fn assess(&self, closes: &[f64]) -> AlgorithmSignal {
        let (macd, signal) = self.lines(closes);
        let n = macd.len();
        if n < 2 {
            return AlgorithmSignal::new(self.name(), TradeAction::Hold, "Not enough points for a crossover");
        }

        let (macd_prev, macd_now) = (macd[n - 2], macd[n - 1]);
        let (sig_prev, sig_now) = (signal[n - 2], signal[n - 1]);

        if macd_prev <= sig_prev && macd_now > sig_now {
            AlgorithmSignal::new(self.name(), TradeAction::Buy, "MACD crossed above signal line")
        } else if macd_prev >= sig_prev && macd_now < sig_now {
            AlgorithmSignal::new(self.name(), TradeAction::Sell, "MACD crossed below signal line")
        } else {
            AlgorithmSignal::new(self.name(), TradeAction::Hold, "No recent MACD crossover")
        }
    }
}
