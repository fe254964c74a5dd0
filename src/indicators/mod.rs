// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the daily
// metrics snapshot.  Every function returns one value per input bar
// (`Vec<Option<f64>>`), with `None` wherever the look-back window has not
// filled yet or the value is numerically undefined on that date.  An
// undefined value never aborts neighbouring dates.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod set;
pub mod stochastic;

use serde::Serialize;

pub use set::IndicatorSet;

/// A named, date-aligned indicator column.
///
/// Always the same length as the `Series` it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    name: String,
    values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value on bar `index`; `None` when undefined or out of range.
    pub fn at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Value on the latest bar.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Index of the first defined value.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Lift a fully-defined input column into the optional domain.
pub(crate) fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|&v| Some(v)).collect()
}

/// Apply `f` to every full trailing window of `window` values.
///
/// The output at index `i` is `None` when `i + 1 < window`, when any value in
/// the window is undefined, or when `f` yields a non-finite number.
pub(crate) fn rolling<F>(values: &[Option<f64>], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut buf: Vec<f64> = Vec::with_capacity(window);
    for end in window..=values.len() {
        buf.clear();
        buf.extend(values[end - window..end].iter().map_while(|v| *v));
        if buf.len() < window {
            continue;
        }
        let v = f(&buf);
        if v.is_finite() {
            out[end - 1] = Some(v);
        }
    }
    out
}

pub(crate) fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Element-wise combination of two aligned columns; `None` if either side is.
pub(crate) fn zip_with<F>(a: &[Option<f64>], b: &[Option<f64>], f: F) -> Vec<Option<f64>>
where
    F: Fn(f64, f64) -> Option<f64>,
{
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => f(*x, *y).filter(|v| v.is_finite()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_needs_full_window() {
        let out = rolling(&defined(&[1.0, 2.0, 3.0, 4.0]), 3, mean);
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn rolling_skips_windows_with_gaps() {
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let out = rolling(&values, 2, mean);
        assert_eq!(out, vec![None, None, None, Some(3.5), Some(4.5)]);
    }

    #[test]
    fn rolling_zero_window_is_all_undefined() {
        assert_eq!(rolling(&defined(&[1.0, 2.0]), 0, mean), vec![None, None]);
    }

    #[test]
    fn series_accessors() {
        let s = IndicatorSeries::new("MA3", vec![None, Some(1.0), Some(2.0)]);
        assert_eq!(s.name(), "MA3");
        assert_eq!(s.len(), 3);
        assert_eq!(s.at(0), None);
        assert_eq!(s.at(9), None);
        assert_eq!(s.latest(), Some(2.0));
        assert_eq!(s.first_defined(), Some(1));
    }

    #[test]
    fn zip_with_propagates_undefined() {
        let a = vec![Some(1.0), None, Some(4.0)];
        let b = vec![Some(2.0), Some(3.0), Some(0.0)];
        let out = zip_with(&a, &b, |x, y| Some(x / y));
        assert_eq!(out, vec![Some(0.5), None, None]);
    }
}
