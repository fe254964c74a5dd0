// =============================================================================
// Analysis errors
// =============================================================================
//
// Terminal failures that abort a whole analysis call.  A single indicator
// that cannot be computed for one date is *not* an error: it is the `None` of
// the per-date `Option<f64>` inside an `IndicatorSeries`.

use chrono::NaiveDate;
use thiserror::Error;

/// Typed failure of one analysis call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// No bars were supplied (or the upstream collaborator returned no data).
    #[error("empty series: no bars supplied")]
    EmptySeries,

    /// Fewer bars than the largest required window, or a required indicator
    /// is still undefined on the latest bar.
    #[error("insufficient history: need {required} bars, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// A structurally invalid bar (High < Low, negative volume, ...).
    #[error("data anomaly on {date}: {reason}")]
    DataAnomaly { date: NaiveDate, reason: String },

    /// A provider frame that cannot be flattened into bars.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Window sizes or multipliers that make the indicators meaningless.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = AnalysisError::InsufficientHistory {
            required: 60,
            available: 10,
        };
        assert_eq!(err.to_string(), "insufficient history: need 60 bars, have 10");

        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let err = AnalysisError::DataAnomaly {
            date,
            reason: "high < low".into(),
        };
        assert_eq!(err.to_string(), "data anomaly on 2024-03-01: high < low");
    }
}
