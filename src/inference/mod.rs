//! Dyad inference: evidence resolution, the min-threshold rule engine, and
//! the non-destructive threshold sweep.

mod engine;
mod resolver;
mod sweep;

pub use engine::{CancelToken, DyadRuleEngine, InferenceSummary, InferredDyad};
pub use resolver::{resolve_evidence, EvidenceMap, ResolvedEvidence};
pub use sweep::{export_csv, SituationBreakdown, SweepPoint, ThresholdSweepAnalyzer};
