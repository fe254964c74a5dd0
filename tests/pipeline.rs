use chrono::{Duration, NaiveDate};
use tracing_subscriber::EnvFilter;

use eod_metrics::{
    analyze, AnalysisConfig, AnalysisError, CandlePattern, Divergence, PivotSet, RawBar,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
}

/// Bars from a close path; every bar spans ±`spread` around its close.
fn bars_from_closes(closes: &[f64], spread: f64) -> Vec<RawBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let open = if i == 0 { c } else { closes[i - 1] };
            RawBar {
                date: start() + Duration::days(i as i64),
                open,
                high: c.max(open) + spread,
                low: c.min(open) - spread,
                close: c,
                volume: 1_000.0 + ((i * 37) % 11) as f64 * 250.0,
            }
        })
        .collect()
}

/// Deterministic pseudo-random walk (64-bit LCG).
fn random_walk(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut price = 100.0_f64;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let u = (state >> 11) as f64 / (1u64 << 53) as f64;
            price = (price * (1.0 + (u - 0.5) * 0.06)).max(1.0);
            price
        })
        .collect()
}

#[test]
fn oscillators_stay_in_band() {
    init_tracing();
    for seed in [1, 7, 42, 2024, 99_991] {
        let bars = bars_from_closes(&random_walk(250, seed), 0.8);
        let analysis = analyze(bars, &AnalysisConfig::default()).expect("random walk analysis");
        let ind = &analysis.annotated.indicators;
        for column in [&ind.rsi, &ind.k, &ind.d, &ind.adx] {
            for v in column.values().iter().flatten() {
                assert!(
                    (0.0..=100.0).contains(v),
                    "{} = {v} out of range (seed {seed})",
                    column.name()
                );
            }
        }
    }
}

#[test]
fn macd_histogram_is_exact_difference() {
    let bars = bars_from_closes(&random_walk(200, 5), 0.5);
    let analysis = analyze(bars, &AnalysisConfig::default()).unwrap();
    let ind = &analysis.annotated.indicators;
    for i in 0..200 {
        let (m, s, h) = (ind.macd.at(i), ind.macd_signal.at(i), ind.macd_hist.at(i));
        if let (Some(m), Some(s), Some(h)) = (m, s, h) {
            assert!((h - (m - s)).abs() < 1e-12, "histogram mismatch at {i}");
        }
    }
}

#[test]
fn bollinger_bands_never_cross() {
    let bars = bars_from_closes(&random_walk(200, 11), 0.5);
    let analysis = analyze(bars, &AnalysisConfig::default()).unwrap();
    let ind = &analysis.annotated.indicators;
    for i in 0..200 {
        let (u, m, l) = (ind.bb_up.at(i), ind.bb_mid.at(i), ind.bb_low.at(i));
        if let (Some(u), Some(m), Some(l)) = (u, m, l) {
            assert!(u >= m && m >= l, "bands crossed at {i}");
        }
    }
}

#[test]
fn snapshot_pivots_are_ordered_and_score_bounded() {
    for seed in [3, 8, 13, 21] {
        let bars = bars_from_closes(&random_walk(150, seed), 1.0);
        let s = analyze(bars, &AnalysisConfig::default()).unwrap().snapshot;
        let p = s.pivots;
        assert!(p.ah >= p.nh && p.nh >= p.cdp && p.cdp >= p.nl && p.nl >= p.al);
        assert!((0.0..=10.0).contains(&s.score));
    }
}

#[test]
fn identical_input_gives_identical_snapshot() {
    let bars = bars_from_closes(&random_walk(180, 77), 0.6);
    let config = AnalysisConfig::default();
    let first = analyze(bars.clone(), &config).unwrap();
    let second = analyze(bars, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.snapshot).unwrap(),
        serde_json::to_string(&second.snapshot).unwrap()
    );
}

#[test]
fn flat_sixty_days() {
    init_tracing();
    let bars: Vec<RawBar> = (0..60)
        .map(|i| RawBar {
            date: start() + Duration::days(i),
            open: 100.0,
            high: 100.0,
            low: 100.0,
            close: 100.0,
            volume: 1_000.0,
        })
        .collect();
    let s = analyze(bars, &AnalysisConfig::default()).unwrap().snapshot;

    assert_eq!((s.ma_short, s.ma_mid, s.ma_long), (100.0, 100.0, 100.0));
    assert_eq!((s.bb_up, s.bb_low), (100.0, 100.0));
    assert_eq!(s.rsi, None);
    assert_eq!(s.score, 0.0);
    assert!(s.score_breakdown.contributions.is_empty());
    assert_eq!(s.pattern, CandlePattern::NoRange);
    assert_eq!(s.pattern.to_string(), "Doji/no-range");
    assert_eq!(s.pivots, PivotSet::calculate(100.0, 100.0, 100.0));
    assert_eq!(s.pivots.cdp, 100.0);
}

#[test]
fn single_day_pivots() {
    let p = PivotSet::calculate(110.0, 90.0, 105.0);
    assert!((p.pivot - 101.666_666_666_7).abs() < 1e-9);
    assert!((p.cdp - 102.5).abs() < 1e-12);
    assert!((p.ah - 122.5).abs() < 1e-12);
    assert!((p.al - 82.5).abs() < 1e-12);
}

#[test]
fn ten_bars_is_insufficient() {
    let bars = bars_from_closes(&random_walk(10, 1), 0.5);
    let err = analyze(bars, &AnalysisConfig::default()).unwrap_err();
    assert_eq!(
        err,
        AnalysisError::InsufficientHistory {
            required: 60,
            available: 10
        }
    );
}

#[test]
fn rising_price_with_fading_rsi_is_bearish_divergence() {
    // 50 clean up-days, then a choppy grind higher: price keeps rising across
    // the 10-bar window while RSI drops off its 100 reading.
    let mut closes: Vec<f64> = (0..50).map(|i| 100.0 + i as f64).collect();
    for i in 0..10 {
        let last = closes[closes.len() - 1];
        closes.push(if i % 2 == 0 { last + 0.6 } else { last - 0.4 });
    }
    let s = analyze(bars_from_closes(&closes, 0.2), &AnalysisConfig::default())
        .unwrap()
        .snapshot;

    assert!(s.rsi.unwrap() < 100.0);
    assert!(s.div_rsi.contains(Divergence::Bearish));
    assert!(!s.div_rsi.contains(Divergence::Bullish));
}

#[test]
fn snapshot_serialises_for_reporting() {
    let s = analyze(bars_from_closes(&random_walk(100, 4), 0.5), &AnalysisConfig::default())
        .unwrap()
        .snapshot;
    let json: serde_json::Value = serde_json::to_value(&s).unwrap();
    let keys = [
        "date", "close", "ma_long", "rsi", "macd_hist", "pivots", "score", "pattern", "div_rsi",
    ];
    for key in keys {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["date"], serde_json::json!(s.date.to_string()));
}
