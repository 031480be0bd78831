// In crates/strategies/src/rsi.rs

use crate::types::RsiSettings;
use crate::{Error, Indicator, Result};
use core_types::{AlgorithmSignal, TradeAction};

/// Relative Strength Index over a plain (unsmoothed) window of price deltas.
#[derive(Debug, Clone)]
pub struct Rsi {
    settings: RsiSettings,
}

impl Rsi {
    pub fn new(settings: RsiSettings) -> Result<Self> {
        if settings.period == 0 {
            return Err(Error::InvalidParameters("RSI period must be greater than 0".to_string()));
        }
        if settings.oversold >= settings.overbought {
            return Err(Error::InvalidParameters(format!(
                "RSI oversold ({}) must be below overbought ({})",
                settings.oversold, settings.overbought
            )));
        }
        Ok(Self { settings })
    }
}

/// RSI of the last `period` deltas of `closes`.
///
/// Zero deltas count as (empty) gains. With no losses in the window the RSI is
/// pinned at 100.
pub fn relative_strength_index(closes: &[f64], period: usize) -> f64 {
    let start = closes.len().saturating_sub(period + 1);
    let (gain, loss) = closes[start..]
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .fold((0.0, 0.0), |(gain, loss), delta| {
            if delta >= 0.0 { (gain + delta, loss) } else { (gain, loss - delta) }
        });

    if loss == 0.0 {
        return 100.0;
    }
    let period = period as f64;
    let rs = (gain / period) / (loss / period);
    100.0 - 100.0 / (1.0 + rs)
}

impl Indicator for Rsi {
    fn name(&self) -> &'static str {
        "RSI"
    }

    fn lookback(&self) -> usize {
        self.settings.period + 1
    }

    fn assess(&self, closes: &[f64]) -> AlgorithmSignal {
        let rsi = relative_strength_index(closes, self.settings.period);

        let (action, verdict) = if rsi < self.settings.oversold {
            (TradeAction::Buy, "indicates oversold")
        } else if rsi > self.settings.overbought {
            (TradeAction::Sell, "indicates overbought")
        } else {
            (TradeAction::Hold, "is neutral")
        };

        AlgorithmSignal::new(self.name(), action, format!("RSI={:.2} {}", rsi, verdict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicator() -> Rsi {
        Rsi::new(RsiSettings::default()).unwrap()
    }

    #[test]
    fn non_negative_deltas_pin_rsi_at_100() {
        let mut closes: Vec<f64> = (0..20).map(|i| 50.0 + i as f64).collect();
        // A flat step is still a non-negative delta.
        closes.push(*closes.last().unwrap());
        assert_eq!(relative_strength_index(&closes, 14), 100.0);
        assert_eq!(indicator().assess(&closes).action, TradeAction::Sell);
    }

    #[test]
    fn only_the_last_period_deltas_count() {
        // An early crash outside the window must not register as a loss.
        let mut closes = vec![100.0, 10.0];
        closes.extend((0..14).map(|i| 10.0 + i as f64));
        closes.push(24.0);
        assert_eq!(relative_strength_index(&closes, 14), 100.0);
    }

    #[test]
    fn steady_decline_votes_buy() {
        let closes: Vec<f64> = (0..30).map(|i| 200.0 - i as f64).collect();
        let signal = indicator().assess(&closes);
        assert_eq!(signal.action, TradeAction::Buy);
        assert!(signal.reason.starts_with("RSI=0.00"));
    }

    #[test]
    fn balanced_moves_are_neutral() {
        // Alternating +1/-1 deltas: RS = 1, RSI = 50.
        let closes: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 100.0 } else { 101.0 }).collect();
        let rsi = relative_strength_index(&closes, 14);
        assert!((rsi - 50.0).abs() < 1e-9);
        assert_eq!(indicator().assess(&closes).action, TradeAction::Hold);
    }
}
