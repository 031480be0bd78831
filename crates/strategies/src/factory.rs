// In crates/strategies/src/factory.rs

use crate::bollinger::Bollinger;
use crate::macd::Macd;
use crate::rate_of_change::RateOfChange;
use crate::rsi::Rsi;
use crate::sma_crossover::SmaCrossover;
use crate::types::SignalSettings;
use crate::{Indicator, Result};

/// Builds the five voting indicators, in reporting order.
pub fn create_indicators(settings: &SignalSettings) -> Result<Vec<Box<dyn Indicator + Send + Sync>>> {
    let indicators: Vec<Box<dyn Indicator + Send + Sync>> = vec![
        Box::new(SmaCrossover::new(settings.sma_crossover.clone())?),
        Box::new(Rsi::new(settings.rsi.clone())?),
        Box::new(Macd::new(settings.macd.clone())?),
        Box::new(Bollinger::new(settings.bollinger.clone())?),
        Box::new(RateOfChange::new(settings.rate_of_change.clone())?),
    ];
    Ok(indicators)
}
