// =============================================================================
// Shared types used across the metrics pipeline
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading session.  Immutable once ingested by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// |Close − Open|.
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// High − max(Close, Open).
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.close.max(self.open)
    }

    /// min(Close, Open) − Low.
    pub fn lower_shadow(&self) -> f64 {
        self.close.min(self.open) - self.low
    }

    /// High − Low.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    pub fn color(&self) -> CandleColor {
        if self.close > self.open {
            CandleColor::Bullish
        } else if self.close < self.open {
            CandleColor::Bearish
        } else {
            CandleColor::Flat
        }
    }
}

/// Moving-average alignment of the mid and long averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
}

impl Trend {
    /// Bullish only when the mid average is strictly above the long one.
    pub fn from_averages(ma_mid: f64, ma_long: f64) -> Self {
        if ma_mid > ma_long {
            Self::Bullish
        } else {
            Self::Bearish
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
        }
    }
}

/// Direction of a candle body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandleColor {
    Bullish,
    Bearish,
    Flat,
}

impl std::fmt::Display for CandleColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "Bullish"),
            Self::Bearish => write!(f, "Bearish"),
            Self::Flat => write!(f, "Flat"),
        }
    }
}
