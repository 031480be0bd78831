// In crates/strategies/src/math.rs

use crate::{Error, Result};
use ta::Next;
use ta::indicators::ExponentialMovingAverage as Ema;

/// Builds an EMA prototype, mapping `ta`'s parameter error into ours.
pub(crate) fn new_ema(period: usize) -> Result<Ema> {
    Ema::new(period).map_err(|e| Error::InvalidParameters(format!("EMA({}): {:?}", period, e)))
}

/// Runs a fresh copy of `prototype` over `values` and returns every output.
///
/// The first output is the first input verbatim (no period-average seed);
/// each later output is `alpha * input + (1 - alpha) * previous` with
/// `alpha = 2 / (period + 1)`.
pub(crate) fn ema_with(prototype: &Ema, values: &[f64]) -> Vec<f64> {
    let mut ema = prototype.clone();
    values.iter().map(|value| ema.next(*value)).collect()
}

/// The full EMA series of `values` for `period`.
pub fn ema_series(values: &[f64], period: usize) -> Result<Vec<f64>> {
    Ok(ema_with(&new_ema(period)?, values))
}

/// Arithmetic mean. Empty input yields `0.0`.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// The last `n` elements of `values` (all of them if there are fewer).
pub fn last_n(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_starts_at_first_value_for_any_period() {
        let values = [42.0, 10.0, 11.0, 12.0];
        for period in [1, 2, 9, 12, 26, 100] {
            let series = ema_series(&values, period).unwrap();
            assert_eq!(series[0], 42.0);
            assert_eq!(series.len(), values.len());
        }
    }

    #[test]
    fn ema_follows_recursive_weighting() {
        let series = ema_series(&[10.0, 20.0, 20.0], 3).unwrap();
        // alpha = 0.5
        assert_eq!(series, vec![10.0, 15.0, 17.5]);
    }

    #[test]
    fn ema_rejects_zero_period() {
        assert!(ema_series(&[1.0], 0).is_err());
    }

    #[test]
    fn mean_and_last_n() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(last_n(&[1.0, 2.0, 3.0], 2), &[2.0, 3.0]);
        assert_eq!(last_n(&[1.0], 5), &[1.0]);
    }
}
