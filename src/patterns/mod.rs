// =============================================================================
// Patterns Module
// =============================================================================
//
// Rule-table detectors read against the annotated series:
// - Candlestick shape of the latest bar
// - Price / indicator divergence over a trailing window

pub mod candle;
pub mod divergence;

pub use candle::{classify_bar, CandleGeometry, CandlePattern};
pub use divergence::{detect_divergence, Divergence, DivergenceReport};
