// =============================================================================
// Signals Module
// =============================================================================
//
// Aggregation of the per-indicator readings into one bounded bull/bear score.

pub mod composite_score;

pub use composite_score::{
    CompositeScorer, ScoreBreakdown, ScoreContribution, ScoreGroup, ScoreInputs,
};
