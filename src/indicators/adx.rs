// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.  Each is
//      zero unless it is positive and larger than the opposite move; the
//      first bar has no predecessor and carries zero movement.
//   2. Average +DM and -DM over `period` bars (same window as ATR).
//   3. +DI = 100 * avg(+DM) / ATR,  -DI = 100 * avg(-DM) / ATR
//      (undefined when ATR is zero).
//   4. DX  = 100 * |+DI - -DI| / (+DI + -DI)   (undefined when both DI are 0)
//   5. ADX = simple mean of DX over `period` bars.
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use super::atr::calculate_atr;
use super::ma::{moving_average, moving_average_opt};
use super::zip_with;

/// Aligned directional-movement columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Adx {
    pub plus_di: Vec<Option<f64>>,
    pub minus_di: Vec<Option<f64>>,
    pub dx: Vec<Option<f64>>,
    pub adx: Vec<Option<f64>>,
}

/// Raw +DM / −DM per bar.
pub fn directional_movement(highs: &[f64], lows: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = highs.len().min(lows.len());
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        let up_move = highs[i] - highs[i - 1];
        let down_move = lows[i - 1] - lows[i];

        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }
    }
    (plus_dm, minus_dm)
}

pub fn calculate_adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Adx {
    let atr = calculate_atr(highs, lows, closes, period);
    let (plus_dm, minus_dm) = directional_movement(highs, lows);

    let di = |dm: &[f64]| {
        zip_with(&moving_average(dm, period), &atr, |avg_dm, atr| {
            if atr == 0.0 {
                None
            } else {
                Some(100.0 * avg_dm / atr)
            }
        })
    };
    let plus_di = di(&plus_dm);
    let minus_di = di(&minus_dm);

    let dx = zip_with(&plus_di, &minus_di, compute_dx);
    let adx = moving_average_opt(&dx, period);

    Adx {
        plus_di,
        minus_di,
        dx,
        adx,
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// DX from the two directional indices; `None` when both are zero or either
/// is negative (only possible on malformed bars).
fn compute_dx(plus_di: f64, minus_di: f64) -> Option<f64> {
    let di_sum = plus_di + minus_di;
    if plus_di < 0.0 || minus_di < 0.0 || di_sum == 0.0 {
        return None;
    }
    Some(((plus_di - minus_di).abs() / di_sum * 100.0).min(100.0))
}
