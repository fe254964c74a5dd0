// =============================================================================
// Indicator Set — every column of the annotated series
// =============================================================================
//
// Each indicator function returns its own fresh columns; this module only
// names them and collects them into one read-only, date-aligned structure.
// Nothing here mutates the input series.

use serde::Serialize;
use tracing::debug;

use super::adx::calculate_adx;
use super::atr::calculate_atr;
use super::bollinger::bollinger_bands;
use super::ma::moving_average;
use super::macd::calculate_macd;
use super::rsi::calculate_rsi;
use super::stochastic::stochastic_kd;
use super::IndicatorSeries;
use crate::config::AnalysisConfig;
use crate::market_data::Series;

/// All indicator columns computed for one series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub ma_short: IndicatorSeries,
    pub ma_mid: IndicatorSeries,
    pub ma_long: IndicatorSeries,

    pub bb_mid: IndicatorSeries,
    pub bb_std: IndicatorSeries,
    pub bb_up: IndicatorSeries,
    pub bb_low: IndicatorSeries,
    pub bb_width: IndicatorSeries,

    pub k: IndicatorSeries,
    pub d: IndicatorSeries,
    pub rsi: IndicatorSeries,

    pub macd: IndicatorSeries,
    pub macd_signal: IndicatorSeries,
    pub macd_hist: IndicatorSeries,

    pub atr: IndicatorSeries,
    pub plus_di: IndicatorSeries,
    pub minus_di: IndicatorSeries,
    pub adx: IndicatorSeries,

    pub mv_short: IndicatorSeries,
    pub mv_long: IndicatorSeries,
}

impl IndicatorSet {
    /// Compute every indicator over `series` with the windows in `config`.
    pub fn compute(series: &Series, config: &AnalysisConfig) -> Self {
        let w = &config.windows;
        let highs = series.highs();
        let lows = series.lows();
        let closes = series.closes();
        let volumes = series.volumes();

        let bb = bollinger_bands(&closes, w.bollinger, config.bollinger_std_multiplier);
        let kd = stochastic_kd(&highs, &lows, &closes, w.kd, w.kd_smoothing_com);
        let macd = calculate_macd(&closes, w.macd_fast, w.macd_slow, w.macd_signal);
        let adx = calculate_adx(&highs, &lows, &closes, w.adx);

        let set = Self {
            ma_short: IndicatorSeries::new(
                format!("MA{}", w.ma_short),
                moving_average(&closes, w.ma_short),
            ),
            ma_mid: IndicatorSeries::new(
                format!("MA{}", w.ma_mid),
                moving_average(&closes, w.ma_mid),
            ),
            ma_long: IndicatorSeries::new(
                format!("MA{}", w.ma_long),
                moving_average(&closes, w.ma_long),
            ),

            bb_mid: IndicatorSeries::new("BB_Mid", bb.middle),
            bb_std: IndicatorSeries::new("BB_Std", bb.std_dev),
            bb_up: IndicatorSeries::new("BB_Up", bb.upper),
            bb_low: IndicatorSeries::new("BB_Low", bb.lower),
            bb_width: IndicatorSeries::new("BB_Width", bb.width),

            k: IndicatorSeries::new("K", kd.k),
            d: IndicatorSeries::new("D", kd.d),
            rsi: IndicatorSeries::new("RSI", calculate_rsi(&closes, w.rsi)),

            macd: IndicatorSeries::new("MACD", macd.line),
            macd_signal: IndicatorSeries::new("Signal", macd.signal),
            macd_hist: IndicatorSeries::new("Hist", macd.histogram),

            atr: IndicatorSeries::new("ATR", calculate_atr(&highs, &lows, &closes, w.atr)),
            plus_di: IndicatorSeries::new("+DI", adx.plus_di),
            minus_di: IndicatorSeries::new("-DI", adx.minus_di),
            adx: IndicatorSeries::new("ADX", adx.adx),

            mv_short: IndicatorSeries::new(
                format!("MV{}", w.volume_short),
                moving_average(&volumes, w.volume_short),
            ),
            mv_long: IndicatorSeries::new(
                format!("MV{}", w.volume_long),
                moving_average(&volumes, w.volume_long),
            ),
        };

        debug!(bars = series.len(), columns = set.columns().len(), "indicator set computed");
        set
    }

    /// Every column in a stable chart-friendly order.
    pub fn columns(&self) -> Vec<&IndicatorSeries> {
        vec![
            &self.ma_short,
            &self.ma_mid,
            &self.ma_long,
            &self.bb_mid,
            &self.bb_std,
            &self.bb_up,
            &self.bb_low,
            &self.bb_width,
            &self.k,
            &self.d,
            &self.rsi,
            &self.macd,
            &self.macd_signal,
            &self.macd_hist,
            &self.atr,
            &self.plus_di,
            &self.minus_di,
            &self.adx,
            &self.mv_short,
            &self.mv_long,
        ]
    }

    /// Look a column up by its display name (e.g. "MA20", "RSI").
    pub fn column(&self, name: &str) -> Option<&IndicatorSeries> {
        self.columns().into_iter().find(|c| c.name() == name)
    }
}
