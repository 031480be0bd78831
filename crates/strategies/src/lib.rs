// In crates/strategies/src/lib.rs

use core_types::AlgorithmSignal;

pub mod bollinger;
pub mod engine;
pub mod error;
pub mod factory;
pub mod macd;
pub mod math;
pub mod rate_of_change;
pub mod rsi;
pub mod sma_crossover;
pub mod types;

pub use engine::{SignalEngine, SignalReport, decide_final_action};
pub use error::{Error, Result};
pub use types::SignalSettings;

/// The universal interface for a technical indicator.
///
/// An indicator looks at a series of closing prices, oldest first, and casts a
/// single BUY/SELL/HOLD vote with a human-readable reason. Indicators are
/// stateless between calls; each assessment recomputes from the full series.
pub trait Indicator {
    /// The display name of the indicator, e.g. "RSI".
    fn name(&self) -> &'static str;

    /// The minimum number of closes `assess` needs.
    fn lookback(&self) -> usize;

    /// Votes on the given closes. Callers guarantee `closes.len() >= self.lookback()`.
    fn assess(&self, closes: &[f64]) -> AlgorithmSignal;
}
