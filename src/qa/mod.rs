//! Consistency checking over a materialized graph.
//!
//! A read-only pass verifying provenance completeness and score soundness,
//! driving an external shape validator behind a narrow trait, and running
//! the competency query battery. Produces a structured, serializable
//! [`QaReport`].

mod queries;

pub use queries::{
    default_battery, run_battery, CompetencyQuery, Expectation, QueryBatteryReport, QueryOutcome,
};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::error::DyadResult;
use crate::graph::GraphStore;
use crate::term::{Iri, Term};
use crate::vocab;

/// Result of an external shape validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShapeReport {
    /// True when the data conforms to the shape document.
    pub conforms: bool,
    /// Number of violation-severity results.
    pub violations: usize,
    /// Number of warning-severity results.
    pub warnings: usize,
}

/// External shape validation engine.
///
/// The validation semantics are a black box; the checker only supplies a
/// graph plus a shape document and interprets the summary counts.
pub trait ShapeValidator {
    /// Validates `data` against `shapes`.
    fn validate(&self, data: &GraphStore, shapes: &str) -> DyadResult<ShapeReport>;
}

/// Shape conformance KPIs derived from a validator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeSummary {
    /// Whether the graph conforms.
    pub conforms: bool,
    /// Violation count.
    pub n_violations: usize,
    /// Warning count.
    pub n_warnings: usize,
    /// Size of the validated graph.
    pub total_triples: usize,
    /// Violations per 1000 triples, rounded to 3 decimal places.
    pub violations_per_1k_triples: Decimal,
}

/// Provenance completeness over all dyad evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessReport {
    /// Total dyad evidence nodes.
    pub n_dyad_evidence: usize,
    /// Nodes with exactly two `derivedFrom` links.
    pub n_complete: usize,
    /// `n_complete / n_dyad_evidence`, rounded to 4 decimal places.
    pub completeness_rate: Decimal,
}

/// One soundness violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreMismatch {
    /// The offending dyad evidence node.
    pub subject: Iri,
    /// The score it claims.
    pub dyad_score: Decimal,
    /// The component scores found through `derivedFrom`.
    pub component_scores: Vec<Decimal>,
    /// The recomputed minimum the score should not exceed.
    pub expected_min: Decimal,
}

/// Score soundness over all complete dyad evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoundnessReport {
    /// Dyad evidence nodes with two scored components.
    pub n_checked: usize,
    /// Nodes whose score is within tolerance of the recomputed minimum.
    pub n_sound: usize,
    /// `n_sound / n_checked`, rounded to 4 decimal places.
    pub soundness_rate: Decimal,
    /// Total mismatches found.
    pub n_mismatches: usize,
    /// Bounded sample of mismatches.
    pub mismatches_sample: Vec<ScoreMismatch>,
}

/// The full consistency report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaReport {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Size of the checked graph.
    pub total_triples: usize,
    /// Shape conformance KPIs; `None` when the validator was unavailable
    /// or errored.
    pub shape: Option<ShapeSummary>,
    /// Competency query battery results.
    pub competency_queries: QueryBatteryReport,
    /// Provenance completeness.
    pub completeness: CompletenessReport,
    /// Score soundness.
    pub soundness: SoundnessReport,
}

impl QaReport {
    /// True when every check that could run passed.
    #[must_use]
    pub fn all_pass(&self) -> bool {
        self.shape.as_ref().is_none_or(|s| s.conforms)
            && self.competency_queries.all_pass
            && self.completeness.n_complete == self.completeness.n_dyad_evidence
            && self.soundness.n_mismatches == 0
    }
}

/// Read-only consistency checker.
#[derive(Debug, Clone)]
pub struct ConsistencyChecker {
    /// Tolerance for representation rounding in the soundness check.
    epsilon: Decimal,
    /// Upper bound on the mismatch sample carried in the report.
    sample_limit: usize,
}

impl Default for ConsistencyChecker {
    fn default() -> Self {
        Self {
            epsilon: dec!(0.000000001),
            sample_limit: 5,
        }
    }
}

impl ConsistencyChecker {
    /// Creates a checker with the default tolerance and sample bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the full consistency pass.
    ///
    /// The shape KPI degrades gracefully: with no validator, or a failing
    /// one, it is reported as unavailable while every other check still
    /// runs.
    pub fn check(
        &self,
        graph: &GraphStore,
        validator: Option<&dyn ShapeValidator>,
        shapes: Option<&str>,
    ) -> DyadResult<QaReport> {
        tracing::info!(triples = graph.len(), "running consistency checks");

        let shape = self.shape_summary(graph, validator, shapes);
        let competency_queries = run_battery(graph, &default_battery());
        let completeness = self.completeness(graph);
        let soundness = self.soundness(graph)?;

        Ok(QaReport {
            generated_at: Utc::now(),
            total_triples: graph.len(),
            shape,
            competency_queries,
            completeness,
            soundness,
        })
    }

    /// Completeness: every dyad evidence must have exactly two
    /// `derivedFrom` links.
    #[must_use]
    pub fn completeness(&self, graph: &GraphStore) -> CompletenessReport {
        let dyads: Vec<&Iri> = graph
            .subjects_of_type(&vocab::dyad_evidence_class())
            .collect();
        let n_total = dyads.len();
        let n_complete = dyads
            .into_iter()
            .filter(|ev| graph.objects(ev, &vocab::derived_from()).count() == 2)
            .count();

        CompletenessReport {
            n_dyad_evidence: n_total,
            n_complete,
            completeness_rate: rate(n_complete, n_total),
        }
    }

    /// Soundness: a dyad score must not exceed the recomputed minimum of
    /// its component scores beyond the rounding tolerance.
    ///
    /// Only complete dyad evidence whose two components expose scores is
    /// checked, mirroring the completeness check's scope.
    pub fn soundness(&self, graph: &GraphStore) -> DyadResult<SoundnessReport> {
        let mut n_checked = 0;
        let mut n_sound = 0;
        let mut mismatches = Vec::new();

        for evidence in graph.subjects_of_type(&vocab::dyad_evidence_class()) {
            let Some(dyad_score) = queries::decimal_score(graph, evidence)? else {
                continue;
            };
            let sources: Vec<&Iri> = graph
                .objects(evidence, &vocab::derived_from())
                .filter_map(Term::as_iri)
                .collect();
            if sources.len() != 2 {
                continue;
            }

            let mut component_scores = Vec::with_capacity(2);
            for source in sources {
                if let Some(s) = queries::decimal_score(graph, source)? {
                    component_scores.push(s);
                }
            }
            if component_scores.len() != 2 {
                continue;
            }

            n_checked += 1;
            let expected_min = component_scores[0].min(component_scores[1]);
            if dyad_score <= expected_min + self.epsilon {
                n_sound += 1;
            } else {
                mismatches.push(ScoreMismatch {
                    subject: evidence.clone(),
                    dyad_score,
                    component_scores,
                    expected_min,
                });
            }
        }

        let n_mismatches = mismatches.len();
        mismatches.truncate(self.sample_limit);
        Ok(SoundnessReport {
            n_checked,
            n_sound,
            soundness_rate: rate(n_sound, n_checked),
            n_mismatches,
            mismatches_sample: mismatches,
        })
    }

    fn shape_summary(
        &self,
        graph: &GraphStore,
        validator: Option<&dyn ShapeValidator>,
        shapes: Option<&str>,
    ) -> Option<ShapeSummary> {
        let (Some(validator), Some(shapes)) = (validator, shapes) else {
            tracing::warn!("shape validator unavailable; skipping conformance KPI");
            return None;
        };

        match validator.validate(graph, shapes) {
            Ok(report) => {
                let total = graph.len();
                let per_1k = if total == 0 {
                    Decimal::ZERO
                } else {
                    (Decimal::from(report.violations) * Decimal::ONE_THOUSAND
                        / Decimal::from(total))
                    .round_dp(3)
                };
                Some(ShapeSummary {
                    conforms: report.conforms,
                    n_violations: report.violations,
                    n_warnings: report.warnings,
                    total_triples: total,
                    violations_per_1k_triples: per_1k,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "shape validation failed; reporting KPI unavailable");
                None
            }
        }
    }
}

fn rate(numerator: usize, denominator: usize) -> Decimal {
    if denominator == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(numerator) / Decimal::from(denominator)).round_dp(4)
}

#[cfg(test)]
mod tests {
    use crate::emotion::Emotion;
    use crate::inference::DyadRuleEngine;
    use crate::score::Score;
    use crate::term::{Literal, Triple};

    use super::*;

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    fn score(s: &str) -> Score {
        Score::parse(s).unwrap()
    }

    fn inferred_graph() -> GraphStore {
        let mut g = GraphStore::new();
        g.add(Triple::new(
            iri("ex:s1"),
            vocab::rdf_type(),
            Term::Iri(vocab::frame_occurrence()),
        ));
        for (e, s) in [(Emotion::Joy, "0.6"), (Emotion::Trust, "0.5")] {
            let ev = Iri::new(format!("ex:s1_ev_{}", e.as_str().to_ascii_lowercase())).unwrap();
            g.add(Triple::new(ev.clone(), vocab::emotion(), Term::Iri(e.iri())));
            g.add(Triple::new(
                ev.clone(),
                vocab::score(),
                Literal::decimal(score(s)),
            ));
            g.add(Triple::new(iri("ex:s1"), vocab::has_evidence(), Term::Iri(ev)));
        }
        DyadRuleEngine::standard().run(&mut g, score("0.4")).unwrap();
        g
    }

    struct FixedValidator(ShapeReport);

    impl ShapeValidator for FixedValidator {
        fn validate(&self, _: &GraphStore, _: &str) -> DyadResult<ShapeReport> {
            Ok(self.0)
        }
    }

    struct BrokenValidator;

    impl ShapeValidator for BrokenValidator {
        fn validate(&self, _: &GraphStore, _: &str) -> DyadResult<ShapeReport> {
            Err(crate::error::DyadError::internal("validator crashed"))
        }
    }

    #[test]
    fn clean_graph_is_complete_and_sound() {
        let g = inferred_graph();
        let checker = ConsistencyChecker::new();

        let completeness = checker.completeness(&g);
        assert_eq!(completeness.n_dyad_evidence, 1);
        assert_eq!(completeness.n_complete, 1);
        assert_eq!(completeness.completeness_rate, Decimal::ONE);

        let soundness = checker.soundness(&g).unwrap();
        assert_eq!(soundness.n_checked, 1);
        assert_eq!(soundness.n_sound, 1);
        assert_eq!(soundness.n_mismatches, 0);
    }

    #[test]
    fn unsound_score_lands_in_sample() {
        let mut g = inferred_graph();
        let forged = iri("ex:forged");
        g.add(Triple::new(
            forged.clone(),
            vocab::rdf_type(),
            Term::Iri(vocab::dyad_evidence_class()),
        ));
        g.add(Triple::new(
            forged.clone(),
            vocab::derived_from(),
            Term::Iri(iri("ex:s1_ev_joy")),
        ));
        g.add(Triple::new(
            forged.clone(),
            vocab::derived_from(),
            Term::Iri(iri("ex:s1_ev_trust")),
        ));
        g.add(Triple::new(
            forged.clone(),
            vocab::score(),
            Literal::decimal(score("0.9")),
        ));

        let soundness = ConsistencyChecker::new().soundness(&g).unwrap();
        assert_eq!(soundness.n_checked, 2);
        assert_eq!(soundness.n_mismatches, 1);
        let mismatch = &soundness.mismatches_sample[0];
        assert_eq!(mismatch.subject, forged);
        assert_eq!(mismatch.expected_min, Decimal::new(5, 1));
    }

    #[test]
    fn incomplete_evidence_is_skipped_by_soundness() {
        let mut g = inferred_graph();
        let partial = iri("ex:partial");
        g.add(Triple::new(
            partial.clone(),
            vocab::rdf_type(),
            Term::Iri(vocab::dyad_evidence_class()),
        ));
        g.add(Triple::new(
            partial.clone(),
            vocab::score(),
            Literal::decimal(score("0.4")),
        ));

        let checker = ConsistencyChecker::new();
        assert_eq!(checker.completeness(&g).n_complete, 1);
        assert_eq!(checker.completeness(&g).n_dyad_evidence, 2);
        assert_eq!(checker.soundness(&g).unwrap().n_checked, 1);
    }

    #[test]
    fn report_with_conforming_validator() {
        let g = inferred_graph();
        let validator = FixedValidator(ShapeReport {
            conforms: true,
            violations: 0,
            warnings: 1,
        });
        let report = ConsistencyChecker::new()
            .check(&g, Some(&validator), Some("shapes"))
            .unwrap();

        let shape = report.shape.as_ref().unwrap();
        assert!(shape.conforms);
        assert_eq!(shape.n_warnings, 1);
        assert_eq!(shape.violations_per_1k_triples, Decimal::ZERO);
        assert!(report.all_pass());
    }

    #[test]
    fn broken_validator_degrades_gracefully() {
        let g = inferred_graph();
        let report = ConsistencyChecker::new()
            .check(&g, Some(&BrokenValidator), Some("shapes"))
            .unwrap();

        assert!(report.shape.is_none());
        // Everything else still ran.
        assert_eq!(report.competency_queries.n_total, 7);
        assert_eq!(report.completeness.n_dyad_evidence, 1);
        assert!(report.all_pass());
    }

    #[test]
    fn violations_per_1k_is_scaled() {
        let g = inferred_graph();
        let validator = FixedValidator(ShapeReport {
            conforms: false,
            violations: 3,
            warnings: 0,
        });
        let report = ConsistencyChecker::new()
            .check(&g, Some(&validator), Some("shapes"))
            .unwrap();

        let shape = report.shape.as_ref().unwrap();
        let expected = (Decimal::from(3u32) * Decimal::ONE_THOUSAND
            / Decimal::from(g.len()))
        .round_dp(3);
        assert_eq!(shape.violations_per_1k_triples, expected);
        assert!(!report.all_pass());
    }

    #[test]
    fn report_serializes_to_json() {
        let report = ConsistencyChecker::new()
            .check(&inferred_graph(), None, None)
            .unwrap();
        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("completeness_rate"));
        assert!(json.contains("\"shape\": null"));
    }
}
