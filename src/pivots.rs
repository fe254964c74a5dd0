// =============================================================================
// Pivot Levels — Classic & CDP, valid for the next session only
// =============================================================================
//
// Classic:
//   P  = (H + L + C) / 3
//   R1 = 2P - L          S1 = 2P - H
//   R2 = P + (H - L)     S2 = P - (H - L)
//
// CDP (contrarian operating levels):
//   CDP = (H + L + 2C) / 4,  range = H - L
//   AH  = CDP + range    (extreme high, pressure)
//   NH  = 2 CDP - L      (normal high, sell)
//   NL  = 2 CDP - H      (normal low, buy)
//   AL  = CDP - range    (extreme low, support)
//
// Built from one completed bar and recomputed every call.
// =============================================================================

use serde::Serialize;

use crate::types::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PivotSet {
    pub pivot: f64,
    pub r1: f64,
    pub s1: f64,
    pub r2: f64,
    pub s2: f64,
    pub cdp: f64,
    pub ah: f64,
    pub nh: f64,
    pub nl: f64,
    pub al: f64,
}

impl PivotSet {
    pub fn calculate(high: f64, low: f64, close: f64) -> Self {
        let range = high - low;

        let pivot = (high + low + close) / 3.0;
        let cdp = (high + low + 2.0 * close) / 4.0;

        Self {
            pivot,
            r1: 2.0 * pivot - low,
            s1: 2.0 * pivot - high,
            r2: pivot + range,
            s2: pivot - range,
            cdp,
            ah: cdp + range,
            nh: 2.0 * cdp - low,
            nl: 2.0 * cdp - high,
            al: cdp - range,
        }
    }

    /// Levels for the session after `bar`.
    pub fn from_bar(bar: &Bar) -> Self {
        Self::calculate(bar.high, bar.low, bar.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_to(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn known_levels() {
        let p = PivotSet::calculate(110.0, 90.0, 105.0);
        assert!(close_to(p.pivot, 305.0 / 3.0));
        assert!(close_to(p.r1, 2.0 * 305.0 / 3.0 - 90.0));
        assert!(close_to(p.s1, 2.0 * 305.0 / 3.0 - 110.0));
        assert!(close_to(p.r2, 305.0 / 3.0 + 20.0));
        assert!(close_to(p.s2, 305.0 / 3.0 - 20.0));
        assert!(close_to(p.cdp, 102.5));
        assert!(close_to(p.ah, 122.5));
        assert!(close_to(p.nh, 115.0));
        assert!(close_to(p.nl, 95.0));
        assert!(close_to(p.al, 82.5));
    }

    #[test]
    fn cdp_levels_are_ordered() {
        for &(h, l, c) in &[
            (110.0, 90.0, 105.0),
            (50.0, 49.0, 49.0),
            (50.0, 49.0, 50.0),
            (12.3, 11.1, 11.7),
        ] {
            let p = PivotSet::calculate(h, l, c);
            assert!(p.ah >= p.nh, "AH < NH for {h}/{l}/{c}");
            assert!(p.nh >= p.cdp, "NH < CDP for {h}/{l}/{c}");
            assert!(p.cdp >= p.nl, "CDP < NL for {h}/{l}/{c}");
            assert!(p.nl >= p.al, "NL < AL for {h}/{l}/{c}");
        }
    }

    #[test]
    fn zero_range_collapses_to_close() {
        let p = PivotSet::calculate(100.0, 100.0, 100.0);
        for level in [p.pivot, p.r1, p.s1, p.r2, p.s2, p.cdp, p.ah, p.nh, p.nl, p.al] {
            assert_eq!(level, 100.0);
        }
    }
}
