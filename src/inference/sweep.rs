//! Threshold sensitivity analysis.
//!
//! Runs the dyad rule non-destructively across a list of thresholds:
//! evidence is resolved once per situation and cached, the graph is never
//! mutated. For thresholds T1 <= T2 the per-situation inferred set at T1 is
//! a superset of the set at T2.

use std::collections::BTreeMap;
use std::io::Write;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::emotion::Emotion;
use crate::error::{DyadResult, ValidationError};
use crate::graph::GraphStore;
use crate::inference::engine::DyadRuleEngine;
use crate::inference::resolver::{resolve_evidence, EvidenceMap};
use crate::score::Score;
use crate::term::Iri;
use crate::vocab;

/// Aggregated sweep results for one threshold value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepPoint {
    /// The threshold applied.
    pub threshold: Score,
    /// Situations with at least one inferred dyad.
    pub situations_with_dyad: usize,
    /// Total situations examined.
    pub total_situations: usize,
    /// Total dyads inferred across situations.
    pub total_dyads: usize,
    /// Every individual inferred dyad score.
    pub scores: Vec<Score>,
}

impl SweepPoint {
    /// Coverage: percentage of situations with at least one dyad.
    #[must_use]
    pub fn pct_with_dyad(&self) -> Decimal {
        if self.total_situations == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.situations_with_dyad) * Decimal::ONE_HUNDRED
            / Decimal::from(self.total_situations)
    }

    /// Mean number of dyads per situation.
    #[must_use]
    pub fn mean_dyads_per_situation(&self) -> Decimal {
        if self.total_situations == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.total_dyads) / Decimal::from(self.total_situations)
    }

    /// Mean dyad score, or `None` when nothing was inferred.
    #[must_use]
    pub fn mean_dyad_score(&self) -> Option<Decimal> {
        if self.scores.is_empty() {
            return None;
        }
        let sum: Decimal = self.scores.iter().map(|s| s.value()).sum();
        Some(sum / Decimal::from(self.scores.len()))
    }
}

/// Per-situation sweep detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SituationBreakdown {
    /// The situation.
    pub situation: Iri,
    /// Resolved basic evidence scores, by label.
    pub evidence: BTreeMap<Emotion, Score>,
    /// Dyads inferred at each threshold, in sweep order.
    pub per_threshold: Vec<(Score, Vec<(Emotion, Score)>)>,
}

/// Runs the dyad rule across many thresholds without mutating the graph.
#[derive(Debug, Clone)]
pub struct ThresholdSweepAnalyzer {
    engine: DyadRuleEngine,
}

impl ThresholdSweepAnalyzer {
    /// Creates an analyzer around a rule engine.
    #[must_use]
    pub fn new(engine: DyadRuleEngine) -> Self {
        Self { engine }
    }

    /// Runs the sweep. Thresholds are evaluated in the given order.
    pub fn sweep(&self, graph: &GraphStore, thresholds: &[Score]) -> DyadResult<Vec<SweepPoint>> {
        if thresholds.is_empty() {
            return Err(ValidationError::EmptyThresholdList.into());
        }

        let cache = self.resolve_all(graph)?;
        tracing::info!(
            situations = cache.len(),
            thresholds = thresholds.len(),
            "running threshold sweep"
        );

        let mut points = Vec::with_capacity(thresholds.len());
        for &threshold in thresholds {
            let mut point = SweepPoint {
                threshold,
                situations_with_dyad: 0,
                total_situations: cache.len(),
                total_dyads: 0,
                scores: Vec::new(),
            };

            for evidence in cache.values() {
                let inferred = self.engine.infer(evidence, threshold);
                if inferred.is_empty() {
                    continue;
                }
                point.situations_with_dyad += 1;
                point.total_dyads += inferred.len();
                point.scores.extend(inferred.iter().map(|d| d.score));
            }

            points.push(point);
        }

        Ok(points)
    }

    /// Produces the per-situation breakdown across the thresholds.
    pub fn breakdown(
        &self,
        graph: &GraphStore,
        thresholds: &[Score],
    ) -> DyadResult<Vec<SituationBreakdown>> {
        let cache = self.resolve_all(graph)?;

        let mut rows = Vec::with_capacity(cache.len());
        for (situation, evidence) in cache {
            let per_threshold = thresholds
                .iter()
                .map(|&threshold| {
                    let dyads = self
                        .engine
                        .infer(&evidence, threshold)
                        .into_iter()
                        .map(|d| (d.dyad, d.score))
                        .collect();
                    (threshold, dyads)
                })
                .collect();
            rows.push(SituationBreakdown {
                situation,
                evidence: evidence
                    .iter()
                    .map(|(e, r)| (*e, r.score))
                    .collect(),
                per_threshold,
            });
        }

        Ok(rows)
    }

    /// Resolves every situation's evidence exactly once.
    fn resolve_all(&self, graph: &GraphStore) -> DyadResult<BTreeMap<Iri, EvidenceMap>> {
        let mut cache = BTreeMap::new();
        for situation in graph.subjects_of_type(&vocab::frame_occurrence()) {
            cache.insert(situation.clone(), resolve_evidence(graph, situation)?);
        }
        Ok(cache)
    }
}

/// Writes sweep points as CSV.
pub fn export_csv<W: Write>(points: &[SweepPoint], mut out: W) -> std::io::Result<()> {
    writeln!(
        out,
        "threshold,situations_with_dyad,total_situations,pct_with_dyad,mean_dyads_per_sit,mean_dyad_score"
    )?;
    for p in points {
        let mean_score = p
            .mean_dyad_score()
            .map(|d| d.round_dp(4).to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{},{},{},{},{},{}",
            p.threshold,
            p.situations_with_dyad,
            p.total_situations,
            p.pct_with_dyad().round_dp(2),
            p.mean_dyads_per_situation().round_dp(3),
            mean_score
        )?;
    }
    Ok(())
}
