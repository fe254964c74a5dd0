// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Recursive (non-adjusted) form:
//   EMA_0 = x_0                      (first defined value seeds the average)
//   EMA_t = (1 - α) * EMA_{t-1} + α * x_t
//
// Smoothing constant:
//   span   s  =>  α = 2 / (s + 1)
//   centre c  =>  α = 1 / (c + 1)
//
// Undefined inputs produce undefined outputs on the same date.  The previous
// average's weight keeps decaying by (1 - α) per skipped bar, so the first
// value after a gap of k bars is
//   EMA = ((1-α)^(k+1) * EMA_prev + α * x) / ((1-α)^(k+1) + α)
// =============================================================================

use super::defined;

/// Smoothing constant for a span of `span` bars.
pub fn alpha_from_span(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Smoothing constant for a centre of mass `com`.
pub fn alpha_from_com(com: f64) -> f64 {
    1.0 / (1.0 + com)
}

/// Exponentially weighted mean of an optional column with constant `alpha`.
///
/// Returns one value per input.  `alpha` outside (0, 1] yields an all-`None`
/// column.
pub fn ewm(values: &[Option<f64>], alpha: f64) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if !(alpha > 0.0 && alpha <= 1.0) {
        return out;
    }

    let decay = 1.0 - alpha;
    let mut state: Option<f64> = None;
    let mut old_weight = 1.0_f64;

    for (i, value) in values.iter().enumerate() {
        match (state, *value) {
            (None, Some(x)) if x.is_finite() => {
                state = Some(x);
                old_weight = 1.0;
                out[i] = state;
            }
            (None, _) => {}
            (Some(prev), Some(x)) if x.is_finite() => {
                old_weight *= decay;
                // Skip the arithmetic on constant input to keep flat series exact.
                let next = if prev == x {
                    prev
                } else {
                    (old_weight * prev + alpha * x) / (old_weight + alpha)
                };
                state = Some(next);
                old_weight = 1.0;
                out[i] = state;
            }
            (Some(_), _) => {
                old_weight *= decay;
            }
        }
    }
    out
}

/// EMA of a fully-defined column with the given span (e.g. 12, 26).
pub fn ema_span(values: &[f64], span: usize) -> Vec<Option<f64>> {
    ewm(&defined(values), alpha_from_span(span))
}
