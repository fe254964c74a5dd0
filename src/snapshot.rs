// =============================================================================
// Snapshot Assembler
// =============================================================================
//
// Pipeline for one symbol:
//
//   raw bars -> normalize -> IndicatorSet -> { candle, divergence, pivots }
//            -> CompositeScorer -> MetricsSnapshot
//
// Assembly is all-or-nothing: either every required latest-bar value is
// defined and a complete snapshot is returned, or the call fails with a
// typed error.  Oscillators that can be legitimately undefined on the latest
// bar (K, D, RSI, ADX) are carried as `Option<f64>`.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::indicators::{IndicatorSeries, IndicatorSet};
use crate::market_data::{normalize, RawBar, Series};
use crate::patterns::{classify_bar, detect_divergence, CandlePattern, DivergenceReport};
use crate::pivots::PivotSet;
use crate::signals::{CompositeScorer, ScoreBreakdown, ScoreInputs};
use crate::types::Trend;

/// End-of-day metrics for the latest bar.  Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub date: NaiveDate,

    // --- Price ---------------------------------------------------------------
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub prev_close: f64,

    // --- Volume --------------------------------------------------------------
    pub volume: u64,
    /// Short average volume (MV5 by default).
    pub mv_short: f64,
    /// Long average volume (MV20 by default).
    pub mv_long: f64,
    /// Percent change of volume against the previous bar; 0 when the
    /// previous bar traded nothing.
    pub vol_change: f64,

    // --- Trend ---------------------------------------------------------------
    /// MA5 by default.
    pub ma_short: f64,
    /// MA20 by default.
    pub ma_mid: f64,
    /// MA60 by default.
    pub ma_long: f64,
    /// Percent deviation of close from the mid average.
    pub bias_ma_mid: f64,
    /// Percent deviation of close from the long average.
    pub bias_ma_long: f64,
    pub trend: Trend,

    // --- Oscillators ---------------------------------------------------------
    pub k: Option<f64>,
    pub d: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub macd_hist_prev: f64,

    // --- Risk ----------------------------------------------------------------
    pub bb_up: f64,
    pub bb_mid: f64,
    pub bb_low: f64,
    /// (up - low) / mid * 100.
    pub bb_width: f64,
    pub atr: f64,
    pub adx: Option<f64>,
    /// Close minus the configured ATR multiple.
    pub stop_loss: f64,

    // --- Structure -----------------------------------------------------------
    pub pattern: CandlePattern,
    pub div_rsi: DivergenceReport,
    pub div_macd: DivergenceReport,
    pub pivots: PivotSet,

    // --- Score ---------------------------------------------------------------
    pub score: f64,
    pub score_breakdown: ScoreBreakdown,
}

/// The input series plus every computed column, for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedSeries {
    pub series: Series,
    pub indicators: IndicatorSet,
}

impl AnnotatedSeries {
    pub fn columns(&self) -> Vec<&IndicatorSeries> {
        self.indicators.columns()
    }

    pub fn column(&self, name: &str) -> Option<&IndicatorSeries> {
        self.indicators.column(name)
    }
}

/// Result of one successful analysis call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub annotated: AnnotatedSeries,
    pub snapshot: MetricsSnapshot,
}

/// Normalize `raw` bars and analyze them.
pub fn analyze(raw: Vec<RawBar>, config: &AnalysisConfig) -> Result<Analysis> {
    let series = normalize(raw).inspect_err(|e| warn!(error = %e, "normalization failed"))?;
    analyze_series(series, config)
}

/// Analyze an already-normalized series.
pub fn analyze_series(series: Series, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;

    let required = config.min_history();
    if series.len() < required {
        warn!(required, available = series.len(), "insufficient history");
        return Err(AnalysisError::InsufficientHistory {
            required,
            available: series.len(),
        });
    }

    let latest = series.latest().clone();
    if latest.high < latest.low {
        warn!(
            date = %latest.date,
            high = latest.high,
            low = latest.low,
            "latest bar has high < low"
        );
        return Err(AnalysisError::DataAnomaly {
            date: latest.date,
            reason: format!("high {} below low {}", latest.high, latest.low),
        });
    }

    let indicators = IndicatorSet::compute(&series, config);
    let snapshot = assemble(&series, &indicators, config)?;

    info!(
        date = %snapshot.date,
        close = snapshot.close,
        trend = %snapshot.trend,
        score = snapshot.score,
        "metrics snapshot assembled"
    );

    Ok(Analysis {
        annotated: AnnotatedSeries { series, indicators },
        snapshot,
    })
}

fn assemble(
    series: &Series,
    ind: &IndicatorSet,
    config: &AnalysisConfig,
) -> Result<MetricsSnapshot> {
    let bar = series.latest();
    let prev = series.previous().ok_or(AnalysisError::InsufficientHistory {
        required: 2,
        available: series.len(),
    })?;
    let last = series.len() - 1;

    let need = |column: &IndicatorSeries, index: usize| -> Result<f64> {
        column.at(index).ok_or_else(|| {
            warn!(column = column.name(), index, "required indicator undefined on latest bar");
            let needed = column.first_defined().map_or(series.len() + 1, |i| i + 1);
            AnalysisError::InsufficientHistory {
                required: config.min_history().max(needed),
                available: series.len(),
            }
        })
    };

    let ma_short = need(&ind.ma_short, last)?;
    let ma_mid = need(&ind.ma_mid, last)?;
    let ma_long = need(&ind.ma_long, last)?;
    let bb_up = need(&ind.bb_up, last)?;
    let bb_mid = need(&ind.bb_mid, last)?;
    let bb_low = need(&ind.bb_low, last)?;
    let bb_width = need(&ind.bb_width, last)?;
    let macd = need(&ind.macd, last)?;
    let macd_signal = need(&ind.macd_signal, last)?;
    let macd_hist = need(&ind.macd_hist, last)?;
    let macd_hist_prev = need(&ind.macd_hist, last - 1)?;
    let atr = need(&ind.atr, last)?;
    let mv_short = need(&ind.mv_short, last)?;
    let mv_long = need(&ind.mv_long, last)?;
    debug!(date = %bar.date, "required indicators defined");

    let closes = series.closes();
    let pattern = classify_bar(bar);
    let div_rsi = detect_divergence(&closes, ind.rsi.values(), config.divergence_window);
    let div_macd = detect_divergence(&closes, ind.macd_hist.values(), config.divergence_window);
    let pivots = PivotSet::from_bar(bar);
    debug!(%pattern, %div_rsi, %div_macd, cdp = pivots.cdp, "patterns and pivots");

    let rsi = ind.rsi.latest();
    let volume = bar.volume as f64;

    let score_breakdown = CompositeScorer::new(config.score_rules.clone()).score(&ScoreInputs {
        close: bar.close,
        ma_mid,
        ma_long,
        rsi,
        macd_hist,
        macd_hist_prev,
        volume,
        mv_short,
        bb_width,
        candle_color: pattern.body_color(),
    });

    Ok(MetricsSnapshot {
        date: bar.date,
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
        prev_close: prev.close,
        volume: bar.volume,
        mv_short,
        mv_long,
        vol_change: percent_change(volume, prev.volume as f64),
        ma_short,
        ma_mid,
        ma_long,
        bias_ma_mid: percent_change(bar.close, ma_mid),
        bias_ma_long: percent_change(bar.close, ma_long),
        trend: Trend::from_averages(ma_mid, ma_long),
        k: ind.k.latest(),
        d: ind.d.latest(),
        rsi,
        macd,
        macd_signal,
        macd_hist,
        macd_hist_prev,
        bb_up,
        bb_mid,
        bb_low,
        bb_width,
        atr,
        adx: ind.adx.latest(),
        stop_loss: bar.close - config.stop_loss_atr_multiplier * atr,
        pattern,
        div_rsi,
        div_macd,
        pivots,
        score: score_breakdown.score,
        score_breakdown,
    })
}

/// (value - base) / base * 100, or 0 when the base is zero.
fn percent_change(value: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        (value - base) / base * 100.0
    }
}
