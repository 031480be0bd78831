// In crates/strategies/src/types.rs

use serde::{Deserialize, Serialize};

/// Settings for the whole signal engine. Every field has a default, so an empty
/// `[signals]` table (or none at all) yields the standard five-indicator setup.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SignalSettings {
    /// Histories shorter than this produce a single HOLD "Data Check" signal.
    pub min_history: usize,
    /// How far BUY votes must lead SELL votes (or vice versa) to act.
    pub vote_margin: usize,
    pub sma_crossover: SmaCrossoverSettings,
    pub rsi: RsiSettings,
    pub macd: MacdSettings,
    pub bollinger: BollingerSettings,
    pub rate_of_change: RateOfChangeSettings,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            min_history: 30,
            vote_margin: 2,
            sma_crossover: SmaCrossoverSettings::default(),
            rsi: RsiSettings::default(),
            macd: MacdSettings::default(),
            bollinger: BollingerSettings::default(),
            rate_of_change: RateOfChangeSettings::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SmaCrossoverSettings {
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for SmaCrossoverSettings {
    fn default() -> Self {
        Self { short_period: 7, long_period: 25 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RsiSettings {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiSettings {
    fn default() -> Self {
        Self { period: 14, oversold: 30.0, overbought: 70.0 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MacdSettings {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdSettings {
    fn default() -> Self {
        Self { fast_period: 12, slow_period: 26, signal_period: 9 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BollingerSettings {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for BollingerSettings {
    fn default() -> Self {
        Self { period: 20, multiplier: 2.0 }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RateOfChangeSettings {
    pub period: usize,
    /// Percent move in either direction that triggers a vote.
    pub threshold_pct: f64,
}

impl Default for RateOfChangeSettings {
    fn default() -> Self {
        Self { period: 10, threshold_pct: 5.0 }
    }
}
