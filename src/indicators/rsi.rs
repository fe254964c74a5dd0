// =============================================================================
// Relative Strength Index (RSI) — simple-average form
// =============================================================================
//
// Gains and losses are split out of the close-to-close moves and each is
// averaged over the same trailing `period` moves:
//
//   RS  = mean(gains) / mean(losses)
//   RSI = 100 - 100 / (1 + RS)
//
// Bar 0 has no previous close; its move counts as zero, so the first RSI
// lands on bar `period - 1`.  A window with no movement at all has no
// defined RSI.
// =============================================================================

use super::{mean, rolling, zip_with};

/// RSI column aligned with `closes`.
///
/// A window with gains but no losses reads 100; a window with no movement at
/// all is `None`.  Everything before bar `period - 1` is `None`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let moves: Vec<Option<f64>> = std::iter::once(Some(0.0))
        .chain(closes.windows(2).map(|w| Some(w[1] - w[0])))
        .take(closes.len())
        .collect();
    let gains: Vec<Option<f64>> = moves.iter().map(|m| m.map(|d| d.max(0.0))).collect();
    let losses: Vec<Option<f64>> = moves.iter().map(|m| m.map(|d| (-d).max(0.0))).collect();

    let avg_gain = rolling(&gains, period, mean);
    let avg_loss = rolling(&losses, period, mean);
    zip_with(&avg_gain, &avg_loss, rsi_level)
}

fn rsi_level(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let level = match (avg_gain > 0.0, avg_loss > 0.0) {
        (false, false) => return None,
        (true, false) => 100.0,
        _ => 100.0 - 100.0 / (1.0 + avg_gain / avg_loss),
    };
    level.is_finite().then(|| level.clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tail(rsi: &[Option<f64>]) -> Vec<f64> {
        rsi.iter().flatten().copied().collect()
    }

    #[test]
    fn empty_and_zero_period() {
        assert!(calculate_rsi(&[], 14).is_empty());
        assert_eq!(calculate_rsi(&[3.0, 4.0, 5.0], 0), vec![None, None, None]);
    }

    #[test]
    fn too_few_closes_is_undefined() {
        let closes: Vec<f64> = (0..13).map(|i| 50.0 + i as f64).collect();
        assert!(calculate_rsi(&closes, 14).iter().all(Option::is_none));
    }

    #[test]
    fn first_reading_lands_on_bar_period_minus_one() {
        let closes: Vec<f64> = (0..25).map(|i| 20.0 + (i % 3) as f64).collect();
        let rsi = calculate_rsi(&closes, 14);
        assert_eq!(rsi.len(), 25);
        assert!(rsi[..13].iter().all(Option::is_none));
        assert!(rsi[13..].iter().all(Option::is_some));
    }

    #[test]
    fn zero_loss_policy() {
        let up: Vec<f64> = (0..20).map(|i| 10.0 + 0.5 * i as f64).collect();
        assert!(tail(&calculate_rsi(&up, 5)).iter().all(|&v| v == 100.0));

        assert!(calculate_rsi(&[42.0; 20], 5).iter().all(Option::is_none));

        let down: Vec<f64> = up.iter().rev().copied().collect();
        assert!(tail(&calculate_rsi(&down, 5)).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn mixed_window_value() {
        // moves 0, +2, -1; last window +2, -1 => RS = 2 => RSI = 66.67
        let rsi = calculate_rsi(&[10.0, 12.0, 11.0], 2);
        assert_eq!(rsi[0], None);
        assert_eq!(rsi[1], Some(100.0));
        assert!((rsi[2].unwrap() - 200.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn flat_stretch_inside_moving_series_is_undefined() {
        let mut closes: Vec<f64> = (0..10).map(|i| 30.0 + i as f64).collect();
        closes.extend([39.0; 8]);
        let rsi = calculate_rsi(&closes, 5);
        assert_eq!(rsi[9], Some(100.0));
        assert_eq!(rsi[13], Some(100.0));
        assert!(rsi[14..].iter().all(Option::is_none));
    }

    #[test]
    fn stays_within_band_on_choppy_prices() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.9).sin() * 4.0 + (i as f64 * 0.17).cos())
            .collect();
        let values = tail(&calculate_rsi(&closes, 14));
        assert_eq!(values.len(), 47);
        assert!(values.iter().all(|v| (0.0..=100.0).contains(v)));
    }
}
