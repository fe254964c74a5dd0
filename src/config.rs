// =============================================================================
// Analysis Configuration — window sizes, multipliers and scoring rules
// =============================================================================
//
// Every tunable of the metrics pipeline lives here.  The defaults are the
// standard daily-chart settings; the scoring rules default to the frozen
// weight table and are only meant to be overridden for experiments.
//
// All fields carry `#[serde(default)]` so that a partial JSON file loads with
// the remaining values at their defaults.  Persistence uses an atomic
// tmp + rename pattern.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AnalysisError;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_ma_short() -> usize {
    5
}

fn default_ma_mid() -> usize {
    20
}

fn default_ma_long() -> usize {
    60
}

fn default_bollinger() -> usize {
    20
}

fn default_rsi() -> usize {
    14
}

fn default_kd() -> usize {
    9
}

fn default_kd_smoothing_com() -> f64 {
    2.0
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_atr() -> usize {
    14
}

fn default_adx() -> usize {
    14
}

fn default_volume_short() -> usize {
    5
}

fn default_volume_long() -> usize {
    20
}

fn default_bollinger_std_multiplier() -> f64 {
    2.0
}

fn default_stop_loss_atr_multiplier() -> f64 {
    2.0
}

fn default_divergence_window() -> usize {
    10
}

// =============================================================================
// IndicatorWindows
// =============================================================================

/// Look-back windows (trading days) for every indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorWindows {
    #[serde(default = "default_ma_short")]
    pub ma_short: usize,

    #[serde(default = "default_ma_mid")]
    pub ma_mid: usize,

    /// Also the minimum history for a snapshot with default settings.
    #[serde(default = "default_ma_long")]
    pub ma_long: usize,

    #[serde(default = "default_bollinger")]
    pub bollinger: usize,

    #[serde(default = "default_rsi")]
    pub rsi: usize,

    #[serde(default = "default_kd")]
    pub kd: usize,

    /// Centre of mass of the K and D smoothing (2.0 => α = 1/3).
    #[serde(default = "default_kd_smoothing_com")]
    pub kd_smoothing_com: f64,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_atr")]
    pub atr: usize,

    #[serde(default = "default_adx")]
    pub adx: usize,

    #[serde(default = "default_volume_short")]
    pub volume_short: usize,

    #[serde(default = "default_volume_long")]
    pub volume_long: usize,
}

impl Default for IndicatorWindows {
    fn default() -> Self {
        Self {
            ma_short: default_ma_short(),
            ma_mid: default_ma_mid(),
            ma_long: default_ma_long(),
            bollinger: default_bollinger(),
            rsi: default_rsi(),
            kd: default_kd(),
            kd_smoothing_com: default_kd_smoothing_com(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            atr: default_atr(),
            adx: default_adx(),
            volume_short: default_volume_short(),
            volume_long: default_volume_long(),
        }
    }
}

// =============================================================================
// ScoreRules
// =============================================================================

fn default_trend_alignment_points() -> f64 {
    2.0
}

fn default_close_above_mid_points() -> f64 {
    1.0
}

fn default_close_above_long_points() -> f64 {
    1.0
}

fn default_rsi_healthy_range() -> (f64, f64) {
    (50.0, 70.0)
}

fn default_rsi_healthy_points() -> f64 {
    1.5
}

fn default_rsi_weak_floor() -> f64 {
    40.0
}

fn default_rsi_weak_points() -> f64 {
    0.5
}

fn default_rsi_overheated_above() -> f64 {
    80.0
}

fn default_rsi_overheated_points() -> f64 {
    -0.5
}

fn default_macd_accelerating_points() -> f64 {
    1.5
}

fn default_macd_positive_points() -> f64 {
    1.0
}

fn default_volume_support_points() -> f64 {
    1.0
}

fn default_band_width_threshold() -> f64 {
    10.0
}

fn default_band_width_points() -> f64 {
    1.0
}

fn default_bullish_candle_points() -> f64 {
    1.0
}

fn default_bearish_candle_points() -> f64 {
    -1.0
}

fn default_score_bounds() -> (f64, f64) {
    (0.0, 10.0)
}

/// Weights and thresholds of the composite score.
///
/// The defaults are a fixed contract: snapshots are only comparable across
/// runs when these values are left alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRules {
    /// MA mid above MA long.
    #[serde(default = "default_trend_alignment_points")]
    pub trend_alignment_points: f64,

    #[serde(default = "default_close_above_mid_points")]
    pub close_above_mid_points: f64,

    #[serde(default = "default_close_above_long_points")]
    pub close_above_long_points: f64,

    /// Inclusive RSI band counted as a healthy uptrend.
    #[serde(default = "default_rsi_healthy_range")]
    pub rsi_healthy_range: (f64, f64),

    #[serde(default = "default_rsi_healthy_points")]
    pub rsi_healthy_points: f64,

    /// RSI in [floor, healthy low) counts as weak momentum.
    #[serde(default = "default_rsi_weak_floor")]
    pub rsi_weak_floor: f64,

    #[serde(default = "default_rsi_weak_points")]
    pub rsi_weak_points: f64,

    #[serde(default = "default_rsi_overheated_above")]
    pub rsi_overheated_above: f64,

    #[serde(default = "default_rsi_overheated_points")]
    pub rsi_overheated_points: f64,

    /// Positive histogram that grew since the previous bar.
    #[serde(default = "default_macd_accelerating_points")]
    pub macd_accelerating_points: f64,

    #[serde(default = "default_macd_positive_points")]
    pub macd_positive_points: f64,

    #[serde(default = "default_volume_support_points")]
    pub volume_support_points: f64,

    /// Bollinger width (percent of the middle band).
    #[serde(default = "default_band_width_threshold")]
    pub band_width_threshold: f64,

    #[serde(default = "default_band_width_points")]
    pub band_width_points: f64,

    #[serde(default = "default_bullish_candle_points")]
    pub bullish_candle_points: f64,

    #[serde(default = "default_bearish_candle_points")]
    pub bearish_candle_points: f64,

    /// Final score clamp.
    #[serde(default = "default_score_bounds")]
    pub score_bounds: (f64, f64),
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            trend_alignment_points: default_trend_alignment_points(),
            close_above_mid_points: default_close_above_mid_points(),
            close_above_long_points: default_close_above_long_points(),
            rsi_healthy_range: default_rsi_healthy_range(),
            rsi_healthy_points: default_rsi_healthy_points(),
            rsi_weak_floor: default_rsi_weak_floor(),
            rsi_weak_points: default_rsi_weak_points(),
            rsi_overheated_above: default_rsi_overheated_above(),
            rsi_overheated_points: default_rsi_overheated_points(),
            macd_accelerating_points: default_macd_accelerating_points(),
            macd_positive_points: default_macd_positive_points(),
            volume_support_points: default_volume_support_points(),
            band_width_threshold: default_band_width_threshold(),
            band_width_points: default_band_width_points(),
            bullish_candle_points: default_bullish_candle_points(),
            bearish_candle_points: default_bearish_candle_points(),
            score_bounds: default_score_bounds(),
        }
    }
}

// =============================================================================
// AnalysisConfig
// =============================================================================

/// Top-level configuration of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub windows: IndicatorWindows,

    /// Bollinger band half-width in standard deviations.
    #[serde(default = "default_bollinger_std_multiplier")]
    pub bollinger_std_multiplier: f64,

    /// Stop-loss distance below the close, in ATRs.
    #[serde(default = "default_stop_loss_atr_multiplier")]
    pub stop_loss_atr_multiplier: f64,

    /// Trailing window (bars) for price/indicator divergence.
    #[serde(default = "default_divergence_window")]
    pub divergence_window: usize,

    #[serde(default)]
    pub score_rules: ScoreRules,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            windows: IndicatorWindows::default(),
            bollinger_std_multiplier: default_bollinger_std_multiplier(),
            stop_loss_atr_multiplier: default_stop_loss_atr_multiplier(),
            divergence_window: default_divergence_window(),
            score_rules: ScoreRules::default(),
        }
    }
}

impl AnalysisConfig {
    /// Fewest bars for which every indicator the snapshot requires can be
    /// defined on the latest bar.
    ///
    /// Oscillators that may legitimately stay undefined (RSI, KD, ADX) are not
    /// part of this bound.
    pub fn min_history(&self) -> usize {
        let w = &self.windows;
        [
            w.ma_short,
            w.ma_mid,
            w.ma_long,
            w.bollinger,
            w.atr,
            w.volume_short,
            w.volume_long,
            2,
        ]
        .into_iter()
        .max()
        .unwrap_or(2)
    }

    /// Reject settings under which the indicators are meaningless.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let w = &self.windows;
        let windows = [
            ("ma_short", w.ma_short),
            ("ma_mid", w.ma_mid),
            ("ma_long", w.ma_long),
            ("rsi", w.rsi),
            ("kd", w.kd),
            ("macd_fast", w.macd_fast),
            ("macd_slow", w.macd_slow),
            ("macd_signal", w.macd_signal),
            ("atr", w.atr),
            ("adx", w.adx),
            ("volume_short", w.volume_short),
            ("volume_long", w.volume_long),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, v)| *v == 0) {
            return Err(AnalysisError::InvalidConfig(format!("window '{name}' must be positive")));
        }
        if w.bollinger < 2 {
            return Err(AnalysisError::InvalidConfig(
                "bollinger window needs at least 2 bars for a standard deviation".into(),
            ));
        }
        if w.macd_fast >= w.macd_slow {
            return Err(AnalysisError::InvalidConfig(format!(
                "macd_fast ({}) must be shorter than macd_slow ({})",
                w.macd_fast, w.macd_slow
            )));
        }
        if !(w.kd_smoothing_com.is_finite() && w.kd_smoothing_com >= 0.0) {
            return Err(AnalysisError::InvalidConfig(
                "kd_smoothing_com must be a non-negative number".into(),
            ));
        }
        for (name, value) in [
            ("bollinger_std_multiplier", self.bollinger_std_multiplier),
            ("stop_loss_atr_multiplier", self.stop_loss_atr_multiplier),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{name} must be a non-negative number"
                )));
            }
        }
        if self.divergence_window < 2 {
            return Err(AnalysisError::InvalidConfig(
                "divergence_window must span at least 2 bars".into(),
            ));
        }
        let (lo, hi) = self.score_rules.score_bounds;
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(AnalysisError::InvalidConfig(format!(
                "score bounds ({lo}, {hi}) are not an interval"
            )));
        }
        Ok(())
    }

    /// Load configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analysis config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("rejected analysis config from {}", path.display()))?;

        info!(
            path = %path.display(),
            min_history = config.min_history(),
            divergence_window = config.divergence_window,
            "analysis config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise analysis config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "analysis config saved (atomic)");
        Ok(())
    }
}
