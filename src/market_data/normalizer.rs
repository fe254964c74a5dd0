// =============================================================================
// Series Normalizer
// =============================================================================
//
// Turns whatever the market-data collaborator hands over into a `Series`:
//
//   RawFrame (multi-level columns) --flatten--> Vec<RawBar>
//   Vec<RawBar> (any order, maybe duplicated dates) --normalize--> Series
//
// No indicator math happens here.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};
use crate::market_data::series::Series;
use crate::types::Bar;

/// A bar as delivered by a provider, before validation.
///
/// Volume arrives as a float from most providers and is converted to an
/// integer share count during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// One column of a provider frame.  `key` holds every column level, outermost
/// first (e.g. `["Close", "2330.TW"]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawColumn {
    pub key: Vec<String>,
    pub values: Vec<f64>,
}

/// Column-oriented provider output, possibly with multi-level column keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFrame {
    pub index: Vec<NaiveDate>,
    pub columns: Vec<RawColumn>,
}

impl RawFrame {
    /// Collapse the column levels to the outermost one and read the five
    /// OHLCV fields into row form.
    ///
    /// Matching is case-insensitive and the first matching column wins, so a
    /// frame carrying several tickers yields the first ticker's bars.  Columns
    /// other than Open/High/Low/Close/Volume are ignored.
    pub fn flatten(&self) -> Result<Vec<RawBar>> {
        let open = self.field("open")?;
        let high = self.field("high")?;
        let low = self.field("low")?;
        let close = self.field("close")?;
        let volume = self.field("volume")?;

        Ok(self
            .index
            .iter()
            .enumerate()
            .map(|(i, &date)| RawBar {
                date,
                open: open[i],
                high: high[i],
                low: low[i],
                close: close[i],
                volume: volume[i],
            })
            .collect())
    }

    fn field(&self, name: &str) -> Result<&[f64]> {
        let column = self
            .columns
            .iter()
            .find(|c| {
                c.key
                    .first()
                    .is_some_and(|level| level.trim().eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| AnalysisError::MalformedFrame(format!("missing column '{name}'")))?;

        if column.values.len() != self.index.len() {
            return Err(AnalysisError::MalformedFrame(format!(
                "column '{name}' has {} values for {} index entries",
                column.values.len(),
                self.index.len()
            )));
        }
        Ok(&column.values)
    }
}

/// Validate and order raw bars into a `Series`.
///
/// - Empty input fails with `EmptySeries`.
/// - Bars are sorted by date; for a duplicated date the last occurrence in
///   the input wins (providers append revisions).
/// - Non-finite or non-positive prices and negative or non-finite volume fail
///   with `DataAnomaly`.  High < Low is left to the assembler, which only
///   rejects it on the latest bar.
pub fn normalize(raw: Vec<RawBar>) -> Result<Series> {
    if raw.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    let received = raw.len();

    let mut indexed: Vec<(usize, RawBar)> = raw.into_iter().enumerate().collect();
    // Stable on date, then input position, so the last duplicate sorts last.
    indexed.sort_by(|(ia, a), (ib, b)| a.date.cmp(&b.date).then(ia.cmp(ib)));

    let mut bars: Vec<Bar> = Vec::with_capacity(indexed.len());
    for (_, raw_bar) in indexed {
        let bar = validate(raw_bar)?;
        match bars.last_mut() {
            Some(last) if last.date == bar.date => {
                warn!(date = %bar.date, "duplicate bar date, keeping latest revision");
                *last = bar;
            }
            _ => bars.push(bar),
        }
    }

    debug!(
        received,
        kept = bars.len(),
        first = %bars[0].date,
        last = %bars[bars.len() - 1].date,
        "series normalized"
    );

    Series::from_ordered(bars)
}

/// Convenience: flatten a provider frame and normalize it in one step.
pub fn normalize_frame(frame: &RawFrame) -> Result<Series> {
    normalize(frame.flatten()?)
}

fn validate(raw: RawBar) -> Result<Bar> {
    let anomaly = |reason: String| AnalysisError::DataAnomaly {
        date: raw.date,
        reason,
    };

    for (name, value) in [
        ("open", raw.open),
        ("high", raw.high),
        ("low", raw.low),
        ("close", raw.close),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(anomaly(format!("{name} price {value} is not a positive number")));
        }
    }
    if !raw.volume.is_finite() || raw.volume < 0.0 {
        return Err(anomaly(format!("volume {} is negative or not finite", raw.volume)));
    }

    Ok(Bar {
        date: raw.date,
        open: raw.open,
        high: raw.high,
        low: raw.low,
        close: raw.close,
        volume: raw.volume.round() as u64,
    })
}
