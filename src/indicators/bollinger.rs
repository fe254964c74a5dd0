// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ).  σ is the rolling *sample* deviation.  The
// Band Width is the normalised distance: BBW = (upper - lower) / middle * 100.
//
// BBW is what the composite scorer reads as "volatility expansion".

use super::ma::{moving_average, rolling_std};
use super::zip_with;

/// Aligned Bollinger columns for a close series.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: Vec<Option<f64>>,
    pub std_dev: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
    pub width: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands for every bar of `closes`.
///
/// - `upper`  = SMA + `num_std` * σ
/// - `middle` = SMA
/// - `lower`  = SMA - `num_std` * σ
/// - `width`  = (upper - lower) / middle * 100, undefined when middle is zero
///
/// `num_std` must be non-negative for upper >= middle >= lower to hold.
pub fn bollinger_bands(closes: &[f64], period: usize, num_std: f64) -> BollingerBands {
    let middle = moving_average(closes, period);
    let std_dev = rolling_std(closes, period);

    let upper = zip_with(&middle, &std_dev, |m, s| Some(m + num_std * s));
    let lower = zip_with(&middle, &std_dev, |m, s| Some(m - num_std * s));
    let spread = zip_with(&upper, &lower, |u, l| Some(u - l));
    let width = zip_with(&spread, &middle, |w, m| {
        if m == 0.0 {
            None
        } else {
            Some(w / m * 100.0)
        }
    });

    BollingerBands {
        middle,
        std_dev,
        upper,
        lower,
        width,
    }
}
