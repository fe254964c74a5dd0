// =============================================================================
// Stochastic Oscillator (KD)
// =============================================================================
//
//   RSV_t = 100 * (C_t - LL_n) / (HH_n - LL_n)
//   K     = EWM(RSV, centre of mass c)        α = 1 / (1 + c)
//   D     = EWM(K,   centre of mass c)
//
// LL_n / HH_n are the lowest low / highest high of the last `n` bars.  A
// window with HH == LL has no defined RSV, and K / D are undefined on that
// date as well (the smoother resumes on the next defined value).
// =============================================================================

use super::ema::{alpha_from_com, ewm};
use super::ma::{rolling_max, rolling_min};

/// Aligned RSV, K and D columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Stochastic {
    pub rsv: Vec<Option<f64>>,
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

/// Compute the KD pair over `window` bars with smoothing centre of mass `com`.
pub fn stochastic_kd(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    window: usize,
    com: f64,
) -> Stochastic {
    let lowest = rolling_min(lows, window);
    let highest = rolling_max(highs, window);

    let rsv: Vec<Option<f64>> = closes
        .iter()
        .zip(lowest.iter().zip(&highest))
        .map(|(&close, (ll, hh))| match (ll, hh) {
            (Some(ll), Some(hh)) if hh > ll => {
                let v = 100.0 * (close - ll) / (hh - ll);
                // A close outside its own bar's range (malformed input) would
                // otherwise leave the 0..100 band.
                v.is_finite().then(|| v.clamp(0.0, 100.0))
            }
            _ => None,
        })
        .collect();

    let alpha = alpha_from_com(com);
    let k = ewm(&rsv, alpha);
    let d = ewm(&k, alpha);

    Stochastic { rsv, k, d }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_after_full_window() {
        let highs: Vec<f64> = (0..12).map(|i| 11.0 + i as f64).collect();
        let lows: Vec<f64> = (0..12).map(|i| 9.0 + i as f64).collect();
        let closes: Vec<f64> = (0..12).map(|i| 10.0 + i as f64).collect();
        let kd = stochastic_kd(&highs, &lows, &closes, 9, 2.0);
        assert!(kd.rsv[7].is_none());
        assert!(kd.rsv[8].is_some());
        // K and D are seeded by the first RSV.
        assert_eq!(kd.k[8], kd.rsv[8]);
        assert_eq!(kd.d[8], kd.rsv[8]);
    }

    #[test]
    fn known_smoothing_step() {
        // window 1: RSV = position of close inside its own bar.
        let highs = [10.0, 10.0];
        let lows = [0.0, 0.0];
        let closes = [10.0, 4.0];
        let kd = stochastic_kd(&highs, &lows, &closes, 1, 2.0);
        assert_eq!(kd.rsv, vec![Some(100.0), Some(40.0)]);
        // K = 2/3 * 100 + 1/3 * 40 = 80
        assert!((kd.k[1].unwrap() - 80.0).abs() < 1e-10);
        // D = 2/3 * 100 + 1/3 * 80
        assert!((kd.d[1].unwrap() - (200.0 + 80.0) / 3.0).abs() < 1e-10);
    }

    #[test]
    fn zero_range_is_undefined() {
        let flat = [100.0; 20];
        let kd = stochastic_kd(&flat, &flat, &flat, 9, 2.0);
        assert!(kd.rsv.iter().all(Option::is_none));
        assert!(kd.k.iter().all(Option::is_none));
        assert!(kd.d.iter().all(Option::is_none));
    }

    #[test]
    fn values_stay_in_band() {
        let n = 120;
        let closes: Vec<f64> = (0..n).map(|i| 50.0 + (i as f64 * 0.4).sin() * 5.0).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
        let kd = stochastic_kd(&highs, &lows, &closes, 9, 2.0);
        for v in kd.k.iter().chain(&kd.d).flatten() {
            assert!((0.0..=100.0).contains(v), "KD {v} out of range");
        }
    }
}
