// =============================================================================
// Price / Indicator Divergence
// =============================================================================
//
// Compares the latest bar against the first bar of the trailing window
// (index `len - window`) for both price and an indicator:
//
//   price up   AND indicator down  => bearish / top divergence
//   price down AND indicator up    => bullish / bottom divergence
//
// Fewer than `window` bars, or an undefined indicator at either end, reports
// no divergence rather than failing.
// =============================================================================

use serde::Serialize;

/// A single divergence signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Divergence {
    Bearish,
    Bullish,
}

impl std::fmt::Display for Divergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearish => write!(f, "bearish/top divergence"),
            Self::Bullish => write!(f, "bullish/bottom divergence"),
        }
    }
}

/// Every divergence found for one indicator, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct DivergenceReport {
    signals: Vec<Divergence>,
}

impl DivergenceReport {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> &[Divergence] {
        &self.signals
    }

    pub fn is_none(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn contains(&self, divergence: Divergence) -> bool {
        self.signals.contains(&divergence)
    }
}

impl std::fmt::Display for DivergenceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.signals.is_empty() {
            return write!(f, "none");
        }
        for (i, signal) in self.signals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{signal}")?;
        }
        Ok(())
    }
}

/// Start and end of the comparison window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowEnds {
    pub price_then: f64,
    pub price_now: f64,
    pub indicator_then: f64,
    pub indicator_now: f64,
}

/// One entry of the ordered decision table.
pub struct DivergenceRule {
    pub matches: fn(&WindowEnds) -> bool,
    pub signal: Divergence,
}

pub const DIVERGENCE_RULES: [DivergenceRule; 2] = [
    DivergenceRule {
        matches: |w| w.price_now > w.price_then && w.indicator_now < w.indicator_then,
        signal: Divergence::Bearish,
    },
    DivergenceRule {
        matches: |w| w.price_now < w.price_then && w.indicator_now > w.indicator_then,
        signal: Divergence::Bullish,
    },
];

/// Evaluate the rule table against one pair of window ends.
pub fn evaluate(ends: &WindowEnds) -> DivergenceReport {
    DivergenceReport {
        signals: DIVERGENCE_RULES
            .iter()
            .filter(|rule| (rule.matches)(ends))
            .map(|rule| rule.signal)
            .collect(),
    }
}

/// Scan `prices` against an aligned `indicator` column over `window` bars.
pub fn detect_divergence(
    prices: &[f64],
    indicator: &[Option<f64>],
    window: usize,
) -> DivergenceReport {
    let n = prices.len();
    if window == 0 || n < window || indicator.len() != n {
        return DivergenceReport::none();
    }
    let start = n - window;

    match (indicator[start], indicator[n - 1]) {
        (Some(indicator_then), Some(indicator_now)) => evaluate(&WindowEnds {
            price_then: prices[start],
            price_now: prices[n - 1],
            indicator_then,
            indicator_now,
        }),
        _ => DivergenceReport::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_price_falling_indicator_is_bearish() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let indicator: Vec<Option<f64>> = (0..20).map(|i| Some(80.0 - i as f64)).collect();
        let report = detect_divergence(&prices, &indicator, 10);
        assert_eq!(report.signals(), &[Divergence::Bearish]);
        assert_eq!(report.to_string(), "bearish/top divergence");
    }

    #[test]
    fn falling_price_rising_indicator_is_bullish() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let indicator: Vec<Option<f64>> = (0..20).map(|i| Some(-5.0 + i as f64 * 0.5)).collect();
        let report = detect_divergence(&prices, &indicator, 10);
        assert!(report.contains(Divergence::Bullish));
        assert!(!report.contains(Divergence::Bearish));
    }

    #[test]
    fn agreement_is_none() {
        let prices: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let indicator: Vec<Option<f64>> = (0..20).map(|i| Some(i as f64)).collect();
        let report = detect_divergence(&prices, &indicator, 10);
        assert!(report.is_none());
        assert_eq!(report.to_string(), "none");
    }

    #[test]
    fn compares_against_first_bar_of_window() {
        // Only bars 10 and 19 matter for a 10-bar window over 20 bars.
        let mut prices = vec![50.0; 20];
        let mut indicator = vec![Some(50.0); 20];
        prices[10] = 40.0;
        indicator[10] = Some(60.0);
        let report = detect_divergence(&prices, &indicator, 10);
        assert_eq!(report.signals(), &[Divergence::Bearish]);
    }

    #[test]
    fn short_history_is_none() {
        let report = detect_divergence(&[1.0, 2.0, 3.0], &[Some(3.0), Some(2.0), Some(1.0)], 10);
        assert!(report.is_none());
    }

    #[test]
    fn undefined_indicator_is_none() {
        let prices: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let mut indicator: Vec<Option<f64>> = (0..10).map(|i| Some(-(i as f64))).collect();
        indicator[0] = None;
        assert!(detect_divergence(&prices, &indicator, 10).is_none());
    }

    #[test]
    fn report_serialises_as_list() {
        let report = evaluate(&WindowEnds {
            price_then: 1.0,
            price_now: 2.0,
            indicator_then: 2.0,
            indicator_now: 1.0,
        });
        assert_eq!(serde_json::to_string(&report).unwrap(), r#"["Bearish"]"#);
    }
}
