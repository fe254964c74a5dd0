// =============================================================================
// Composite Scorer — additive rule table, clamped to 0..10
// =============================================================================
//
// Trend (max 4):
//   +2   MA mid > MA long
//   +1   Close > MA mid
//   +1   Close > MA long
// Momentum (max 3):
//   +1.5 RSI in [50, 70]   | +0.5 RSI in [40, 50)   | -0.5 RSI > 80
//   +1.5 MACD hist > 0 and rising vs previous bar   | +1.0 hist > 0 otherwise
// Structure / volume (max 3):
//   +1   Volume > short average volume
//   +1   Bollinger width > 10 %
//   +1   bullish body      | -1 bearish body
//
// Weights live in `ScoreRules`; the defaults above are the contract.

use serde::Serialize;
use tracing::debug;

use crate::config::ScoreRules;
use crate::types::CandleColor;

/// The slice of the latest-bar metrics the scorer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreInputs {
    pub close: f64,
    pub ma_mid: f64,
    pub ma_long: f64,
    /// Undefined RSI contributes nothing.
    pub rsi: Option<f64>,
    pub macd_hist: f64,
    pub macd_hist_prev: f64,
    pub volume: f64,
    pub mv_short: f64,
    pub bb_width: f64,
    /// Body colour of the candle label, if the label carries one.
    pub candle_color: Option<CandleColor>,
}

/// Which group a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreGroup {
    Trend,
    Momentum,
    Structure,
}

/// The contribution of a single rule that fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreContribution {
    pub group: ScoreGroup,
    pub rule: &'static str,
    pub points: f64,
}

/// Result of the scoring pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub trend: f64,
    pub momentum: f64,
    pub structure: f64,
    /// Sum before clamping.
    pub raw_total: f64,
    /// Final clamped score.
    pub score: f64,
    pub contributions: Vec<ScoreContribution>,
}

/// The main composite scoring engine.
#[derive(Debug, Clone, Default)]
pub struct CompositeScorer {
    rules: ScoreRules,
}

impl CompositeScorer {
    pub fn new(rules: ScoreRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    pub fn score(&self, inputs: &ScoreInputs) -> ScoreBreakdown {
        let r = &self.rules;
        let mut contributions = Vec::new();
        let mut add = |group, rule, points: f64| {
            contributions.push(ScoreContribution { group, rule, points });
        };

        // --- Trend -----------------------------------------------------------
        if inputs.ma_mid > inputs.ma_long {
            add(ScoreGroup::Trend, "ma_mid_above_ma_long", r.trend_alignment_points);
        }
        if inputs.close > inputs.ma_mid {
            add(ScoreGroup::Trend, "close_above_ma_mid", r.close_above_mid_points);
        }
        if inputs.close > inputs.ma_long {
            add(ScoreGroup::Trend, "close_above_ma_long", r.close_above_long_points);
        }

        // --- Momentum --------------------------------------------------------
        if let Some(rsi) = inputs.rsi {
            let (healthy_lo, healthy_hi) = r.rsi_healthy_range;
            if (healthy_lo..=healthy_hi).contains(&rsi) {
                add(ScoreGroup::Momentum, "rsi_healthy", r.rsi_healthy_points);
            } else if rsi >= r.rsi_weak_floor && rsi < healthy_lo {
                add(ScoreGroup::Momentum, "rsi_weak", r.rsi_weak_points);
            } else if rsi > r.rsi_overheated_above {
                add(ScoreGroup::Momentum, "rsi_overheated", r.rsi_overheated_points);
            }
        }
        if inputs.macd_hist > 0.0 && inputs.macd_hist > inputs.macd_hist_prev {
            add(ScoreGroup::Momentum, "macd_hist_accelerating", r.macd_accelerating_points);
        } else if inputs.macd_hist > 0.0 {
            add(ScoreGroup::Momentum, "macd_hist_positive", r.macd_positive_points);
        }

        // --- Structure & volume ----------------------------------------------
        if inputs.volume > inputs.mv_short {
            add(ScoreGroup::Structure, "volume_support", r.volume_support_points);
        }
        if inputs.bb_width > r.band_width_threshold {
            add(ScoreGroup::Structure, "band_expansion", r.band_width_points);
        }
        match inputs.candle_color {
            Some(CandleColor::Bullish) => {
                add(ScoreGroup::Structure, "bullish_candle", r.bullish_candle_points)
            }
            Some(CandleColor::Bearish) => {
                add(ScoreGroup::Structure, "bearish_candle", r.bearish_candle_points)
            }
            Some(CandleColor::Flat) | None => {}
        }

        let group_total = |group: ScoreGroup| -> f64 {
            contributions
                .iter()
                .filter(|c| c.group == group)
                .map(|c| c.points)
                .sum()
        };
        let trend = group_total(ScoreGroup::Trend);
        let momentum = group_total(ScoreGroup::Momentum);
        let structure = group_total(ScoreGroup::Structure);
        let raw_total = trend + momentum + structure;

        let (lo, hi) = r.score_bounds;
        let score = raw_total.clamp(lo, hi);

        debug!(trend, momentum, structure, raw_total, score, "composite score");

        ScoreBreakdown {
            trend,
            momentum,
            structure,
            raw_total,
            score,
            contributions,
        }
    }
}
