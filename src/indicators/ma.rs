// =============================================================================
// Simple Moving Average & Rolling Standard Deviation
// =============================================================================
//
//   SMA_t = mean(x_{t-n+1} .. x_t)
//   STD_t = sqrt( Σ (x_i - SMA_t)^2 / (n - 1) )      (sample deviation)
//
// Both are undefined for the first `n - 1` bars.
// =============================================================================

use super::{defined, mean, rolling};

/// Simple moving average of `values` over `window` bars.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(&defined(values), window, mean)
}

/// Moving average over an already-optional column (e.g. DM or DX values).
pub fn moving_average_opt(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, mean)
}

/// Rolling sample standard deviation (n − 1 denominator).
///
/// A window of one bar has no sample deviation and stays undefined.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling(&defined(values), window, |w| {
        let m = mean(w);
        let ss: f64 = w.iter().map(|x| (x - m).powi(2)).sum();
        (ss / (w.len() - 1) as f64).sqrt()
    })
}

/// Rolling minimum over `window` bars.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(&defined(values), window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Rolling maximum over `window` bars.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(&defined(values), window, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}
