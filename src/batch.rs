// =============================================================================
// Multi-symbol batch
// =============================================================================
//
// Each symbol is an independent, side-effect-free analysis, so a batch is a
// plain parallel map.  Results come back in input order, one per symbol.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::market_data::RawBar;
use crate::snapshot::{analyze, Analysis};

/// Bars for one symbol as delivered by the data collaborator.  An empty `bars`
/// vector stands for "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolBars {
    pub symbol: String,
    pub bars: Vec<RawBar>,
}

/// Outcome for one symbol of a batch.
#[derive(Debug)]
pub struct SymbolAnalysis {
    pub symbol: String,
    pub result: Result<Analysis>,
}

/// Analyze every symbol in parallel with the same configuration.
pub fn analyze_many(inputs: Vec<SymbolBars>, config: &AnalysisConfig) -> Vec<SymbolAnalysis> {
    let total = inputs.len();

    let results: Vec<SymbolAnalysis> = inputs
        .into_par_iter()
        .map(|SymbolBars { symbol, bars }| {
            let result = analyze(bars, config);
            if let Err(e) = &result {
                warn!(symbol = %symbol, error = %e, "analysis failed");
            }
            SymbolAnalysis { symbol, result }
        })
        .collect();

    let ok = results.iter().filter(|r| r.result.is_ok()).count();
    info!(total, ok, failed = total - ok, "batch analysis complete");
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use chrono::{Duration, NaiveDate};

    fn bars(n: usize, drift: f64) -> Vec<RawBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let c = 80.0 + i as f64 * drift + (i as f64 * 0.5).cos();
                RawBar {
                    date: start + Duration::days(i as i64),
                    open: c,
                    high: c + 1.0,
                    low: c - 1.0,
                    close: c + 0.2,
                    volume: 5_000.0,
                }
            })
            .collect()
    }

    #[test]
    fn results_follow_input_order() {
        let inputs = vec![
            SymbolBars { symbol: "AAA".into(), bars: bars(90, 0.3) },
            SymbolBars { symbol: "BBB".into(), bars: vec![] },
            SymbolBars { symbol: "CCC".into(), bars: bars(20, 0.1) },
            SymbolBars { symbol: "DDD".into(), bars: bars(90, -0.2) },
        ];
        let out = analyze_many(inputs, &AnalysisConfig::default());

        let symbols: Vec<&str> = out.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAA", "BBB", "CCC", "DDD"]);
        assert!(out[0].result.is_ok());
        assert_eq!(out[1].result.as_ref().unwrap_err(), &AnalysisError::EmptySeries);
        assert!(matches!(out[2].result, Err(AnalysisError::InsufficientHistory { .. })));
        assert!(out[3].result.is_ok());
    }

    #[test]
    fn parallel_matches_sequential() {
        let config = AnalysisConfig::default();
        let single = analyze(bars(120, 0.25), &config).unwrap();
        let batch = analyze_many(
            vec![SymbolBars { symbol: "X".into(), bars: bars(120, 0.25) }],
            &config,
        );
        assert_eq!(batch[0].result.as_ref().unwrap(), &single);
    }
}
