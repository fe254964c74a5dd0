// =============================================================================
// Average True Range (ATR) — simple rolling mean
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR_0 = H - L                               (no previous close)
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR is the simple mean of TR over the last `period` bars.
//
// Default period: 14
// =============================================================================

use super::ma::moving_average;

/// True range per bar.  The first bar has no previous close and uses H − L.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    (0..n)
        .map(|i| {
            let hl = highs[i] - lows[i];
            if i == 0 {
                return hl;
            }
            let prev_close = closes[i - 1];
            let hc = (highs[i] - prev_close).abs();
            let lc = (lows[i] - prev_close).abs();
            hl.max(hc).max(lc)
        })
        .collect()
}

/// ATR column: rolling mean of the true range over `period` bars.
pub fn calculate_atr(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Vec<Option<f64>> {
    moving_average(&true_range(highs, lows, closes), period)
}
