use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::types::Bar;

// ---------------------------------------------------------------------------
// Series -- ordered, validated bars for one symbol
// ---------------------------------------------------------------------------

/// An ordered sequence of bars with strictly increasing dates.
///
/// Only the normalizer builds a `Series`, so every consumer can rely on the
/// ordering and on the bar-level checks it performs.  Downstream stages read
/// it; none of them rewrite it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Wrap already-ordered bars.  Fails with `EmptySeries` on empty input and
    /// with `DataAnomaly` when dates are not strictly increasing.
    pub(crate) fn from_ordered(bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(AnalysisError::EmptySeries);
        }
        if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(AnalysisError::DataAnomaly {
                date: w[1].date,
                reason: format!("date not after previous bar ({})", w[0].date),
            });
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The most recent completed session.
    pub fn latest(&self) -> &Bar {
        // `from_ordered` rejects empty input.
        &self.bars[self.bars.len() - 1]
    }

    /// The session before the latest one, if any.
    pub fn previous(&self) -> Option<&Bar> {
        self.bars.len().checked_sub(2).map(|i| &self.bars[i])
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn opens(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }
}
