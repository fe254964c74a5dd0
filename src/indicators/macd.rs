// =============================================================================
// MACD — Moving Average Convergence / Divergence
// =============================================================================
//
//   line      = EMA(close, fast) - EMA(close, slow)
//   signal    = EMA(line, signal_span)
//   histogram = line - signal
//
// All EMAs are seeded by their first input, so every column is defined from
// the first bar onwards.
// =============================================================================

use super::ema::{alpha_from_span, ema_span, ewm};
use super::zip_with;

/// Aligned MACD columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> Macd {
    let fast_ema = ema_span(closes, fast);
    let slow_ema = ema_span(closes, slow);

    let line = zip_with(&fast_ema, &slow_ema, |f, s| Some(f - s));
    let signal = ewm(&line, alpha_from_span(signal_span));
    let histogram = zip_with(&line, &signal, |m, s| Some(m - s));

    Macd {
        line,
        signal,
        histogram,
    }
}
