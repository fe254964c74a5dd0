// =============================================================================
// eod-metrics — end-of-day technical metrics for one price series
// =============================================================================
//
// Takes a daily OHLCV series, computes the standard indicator set (moving
// averages, Bollinger Bands, RSI, KD, MACD, ATR, ADX), classifies the latest
// candle, scans for divergence, derives next-session pivot levels and rolls
// everything into a 0..10 composite score.
//
// Every call is pure: the same bars and configuration always produce the
// same snapshot.  Fetching bars and rendering reports are left to callers.
// =============================================================================

pub mod batch;
pub mod config;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod names;
pub mod patterns;
pub mod pivots;
pub mod signals;
pub mod snapshot;
pub mod types;

pub use batch::{analyze_many, SymbolAnalysis, SymbolBars};
pub use config::{AnalysisConfig, IndicatorWindows, ScoreRules};
pub use error::{AnalysisError, Result};
pub use indicators::{IndicatorSeries, IndicatorSet};
pub use market_data::{normalize, normalize_frame, RawBar, RawColumn, RawFrame, Series};
pub use names::{DisplayName, SymbolDirectory};
pub use patterns::{CandlePattern, Divergence, DivergenceReport};
pub use pivots::PivotSet;
pub use signals::{CompositeScorer, ScoreBreakdown};
pub use snapshot::{analyze, analyze_series, Analysis, AnnotatedSeries, MetricsSnapshot};
pub use types::{Bar, CandleColor, Trend};
