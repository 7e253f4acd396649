//! Competency query battery.
//!
//! A fixed list of named queries, each with a declared expectation on its
//! result-row count. A query that fails to execute counts as failing but
//! never aborts the rest of the battery.

use rust_decimal_macros::dec;
use serde::Serialize;

use crate::dyad::DyadTable;
use crate::error::DyadResult;
use crate::graph::GraphStore;
use crate::score::Score;
use crate::term::Term;
use crate::vocab;

/// Declared expectation on a query's result cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Passes when the query returns at least this many rows.
    MinRows(usize),
    /// Passes when the query returns at most this many rows.
    MaxRows(usize),
}

impl Expectation {
    /// Evaluates the expectation against a row count.
    #[must_use]
    pub const fn check(self, rows: usize) -> bool {
        match self {
            Self::MinRows(min) => rows >= min,
            Self::MaxRows(max) => rows <= max,
        }
    }
}

/// A named structured query with a pass/fail expectation.
pub struct CompetencyQuery {
    name: &'static str,
    description: &'static str,
    expectation: Expectation,
    run: fn(&GraphStore) -> DyadResult<usize>,
}

impl CompetencyQuery {
    /// Creates a query from its parts. Exposed so callers can extend the
    /// battery with their own checks.
    #[must_use]
    pub const fn new(
        name: &'static str,
        description: &'static str,
        expectation: Expectation,
        run: fn(&GraphStore) -> DyadResult<usize>,
    ) -> Self {
        Self {
            name,
            description,
            expectation,
            run,
        }
    }

    /// The query name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Executes the query, capturing any failure in the outcome.
    #[must_use]
    pub fn execute(&self, graph: &GraphStore) -> QueryOutcome {
        match (self.run)(graph) {
            Ok(rows) => QueryOutcome {
                name: self.name.to_string(),
                description: self.description.to_string(),
                executed: true,
                rows,
                passed: self.expectation.check(rows),
                error: None,
            },
            Err(e) => {
                tracing::warn!(query = self.name, error = %e, "competency query failed");
                QueryOutcome {
                    name: self.name.to_string(),
                    description: self.description.to_string(),
                    executed: false,
                    rows: 0,
                    passed: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

impl std::fmt::Debug for CompetencyQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompetencyQuery")
            .field("name", &self.name)
            .field("expectation", &self.expectation)
            .finish_non_exhaustive()
    }
}

/// Result of executing one competency query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryOutcome {
    /// Query name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// False when the query itself failed to execute.
    pub executed: bool,
    /// Result-row count (zero when not executed).
    pub rows: usize,
    /// Whether the expectation held.
    pub passed: bool,
    /// Execution error message, if any.
    pub error: Option<String>,
}

/// Aggregated battery results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryBatteryReport {
    /// Per-query outcomes, in battery order.
    pub queries: Vec<QueryOutcome>,
    /// Number of passing queries.
    pub n_pass: usize,
    /// Total queries executed or attempted.
    pub n_total: usize,
    /// True when every query passed.
    pub all_pass: bool,
}

/// Runs every query, catching per-query failures (partial-failure
/// semantics, not all-or-nothing).
#[must_use]
pub fn run_battery(graph: &GraphStore, queries: &[CompetencyQuery]) -> QueryBatteryReport {
    let outcomes: Vec<QueryOutcome> = queries.iter().map(|q| q.execute(graph)).collect();
    let n_pass = outcomes.iter().filter(|o| o.passed).count();
    let n_total = outcomes.len();
    QueryBatteryReport {
        queries: outcomes,
        n_pass,
        n_total,
        all_pass: n_pass == n_total,
    }
}

/// The standard seven-query battery.
#[must_use]
pub fn default_battery() -> Vec<CompetencyQuery> {
    vec![
        CompetencyQuery::new(
            "cq1_list_dyads",
            "List inferred dyads",
            Expectation::MinRows(1),
            list_dyads,
        ),
        CompetencyQuery::new(
            "cq2_components",
            "Retrieve dyad components",
            Expectation::MinRows(1),
            components,
        ),
        CompetencyQuery::new(
            "cq3_explain",
            "Explain dyad via provenance",
            Expectation::MinRows(1),
            explain,
        ),
        CompetencyQuery::new(
            "cq4_threshold_check",
            "Sub-threshold situations",
            Expectation::MinRows(0),
            sub_threshold_situations,
        ),
        CompetencyQuery::new(
            "cq5_topk",
            "Top-K dyads by score",
            Expectation::MinRows(1),
            top_k_dyads,
        ),
        CompetencyQuery::new(
            "cq_missing_provenance",
            "Missing derivedFrom",
            Expectation::MaxRows(0),
            missing_provenance,
        ),
        CompetencyQuery::new(
            "cq_score_reconstruction",
            "Min-score mismatches",
            Expectation::MaxRows(0),
            score_mismatches,
        ),
    ]
}

fn dyad_evidence_nodes(graph: &GraphStore) -> Vec<&crate::term::Iri> {
    graph
        .subjects_of_type(&vocab::dyad_evidence_class())
        .collect()
}

/// CQ1: every `satisfies` edge is one row.
fn list_dyads(graph: &GraphStore) -> DyadResult<usize> {
    Ok(graph.count_predicate(&vocab::satisfies()))
}

/// CQ2: satisfied dyads joined to their component definitions.
fn components(graph: &GraphStore) -> DyadResult<usize> {
    let table = DyadTable::standard();
    let mut rows = 0;
    for triple in graph.iter().filter(|t| t.predicate == vocab::satisfies()) {
        let Some(dyad_iri) = triple.object.as_iri() else {
            continue;
        };
        if dyad_iri
            .local()
            .parse()
            .ok()
            .and_then(|e| table.get(e))
            .is_some()
        {
            // One row per component of the matched definition.
            rows += 2;
        }
    }
    Ok(rows)
}

/// CQ3: dyad evidence joined through `derivedFrom` to source scores.
fn explain(graph: &GraphStore) -> DyadResult<usize> {
    let mut rows = 0;
    for evidence in dyad_evidence_nodes(graph) {
        for source in graph.objects(evidence, &vocab::derived_from()) {
            let Some(source) = source.as_iri() else {
                continue;
            };
            if graph.object(source, &vocab::score()).is_some() {
                rows += 1;
            }
        }
    }
    Ok(rows)
}

/// CQ4: situations carrying evidence but no satisfied dyad.
fn sub_threshold_situations(graph: &GraphStore) -> DyadResult<usize> {
    let mut rows = 0;
    for situation in graph.subjects_of_type(&vocab::frame_occurrence()) {
        let has_evidence = graph.object(situation, &vocab::has_evidence()).is_some();
        let satisfied = graph.object(situation, &vocab::satisfies()).is_some();
        if has_evidence && !satisfied {
            rows += 1;
        }
    }
    Ok(rows)
}

/// CQ5: the top five dyad evidence nodes by score.
fn top_k_dyads(graph: &GraphStore) -> DyadResult<usize> {
    let mut scores: Vec<Score> = Vec::new();
    for evidence in dyad_evidence_nodes(graph) {
        if let Some(score) = graph
            .object(evidence, &vocab::score())
            .and_then(Term::as_literal)
            .and_then(|lit| lit.as_score())
        {
            scores.push(score?);
        }
    }
    scores.sort_unstable_by(|a, b| b.cmp(a));
    Ok(scores.len().min(5))
}

/// CQ6: dyad evidence whose `derivedFrom` count is not exactly two.
fn missing_provenance(graph: &GraphStore) -> DyadResult<usize> {
    let rows = dyad_evidence_nodes(graph)
        .into_iter()
        .filter(|ev| graph.objects(ev, &vocab::derived_from()).count() != 2)
        .count();
    Ok(rows)
}

/// CQ7: dyad evidence whose score exceeds the recomputed component
/// minimum (beyond the shared rounding tolerance).
fn score_mismatches(graph: &GraphStore) -> DyadResult<usize> {
    let epsilon = dec!(0.000000001);
    let mut rows = 0;

    for evidence in dyad_evidence_nodes(graph) {
        let Some(dyad_score) = decimal_score(graph, evidence)? else {
            continue;
        };
        let sources: Vec<_> = graph
            .objects(evidence, &vocab::derived_from())
            .filter_map(Term::as_iri)
            .collect();
        if sources.len() != 2 {
            continue;
        }

        let mut component_scores = Vec::with_capacity(2);
        for source in sources {
            if let Some(s) = decimal_score(graph, source)? {
                component_scores.push(s);
            }
        }
        if component_scores.len() != 2 {
            continue;
        }

        let expected = component_scores[0].min(component_scores[1]);
        if dyad_score > expected + epsilon {
            rows += 1;
        }
    }

    Ok(rows)
}

/// Reads a node's decimal score, if it carries one.
///
/// QA reads raw decimals rather than range-checked [`Score`]s: the point
/// is to report on what the graph actually contains.
pub(crate) fn decimal_score(
    graph: &GraphStore,
    node: &crate::term::Iri,
) -> DyadResult<Option<rust_decimal::Decimal>> {
    use crate::error::DyadError;
    use crate::term::Datatype;

    let Some(lit) = graph
        .object(node, &vocab::score())
        .and_then(Term::as_literal)
    else {
        return Ok(None);
    };
    if lit.datatype != Datatype::Decimal {
        return Ok(None);
    }
    let value = lit.lexical.parse::<rust_decimal::Decimal>().map_err(|_| {
        DyadError::internal(format!(
            "stored decimal literal '{}' on {node} does not parse",
            lit.lexical
        ))
    })?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use crate::dyad::DyadTable;
    use crate::emotion::Emotion;
    use crate::inference::DyadRuleEngine;
    use crate::term::{Iri, Literal, Triple};

    use super::*;

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    fn score(s: &str) -> Score {
        Score::parse(s).unwrap()
    }

    fn inferred_graph() -> GraphStore {
        let mut g = GraphStore::new();
        for (sit, entries) in [
            ("ex:s1", vec![(Emotion::Joy, "0.6"), (Emotion::Trust, "0.5")]),
            ("ex:s2", vec![(Emotion::Fear, "0.3")]),
        ] {
            g.add(Triple::new(
                iri(sit),
                vocab::rdf_type(),
                Term::Iri(vocab::frame_occurrence()),
            ));
            for (e, s) in entries {
                let ev = Iri::new(format!(
                    "{}_ev_{}",
                    sit,
                    e.as_str().to_ascii_lowercase()
                ))
                .unwrap();
                g.add(Triple::new(ev.clone(), vocab::emotion(), Term::Iri(e.iri())));
                g.add(Triple::new(
                    ev.clone(),
                    vocab::score(),
                    Literal::decimal(score(s)),
                ));
                g.add(Triple::new(iri(sit), vocab::has_evidence(), Term::Iri(ev)));
            }
        }
        DyadRuleEngine::new(DyadTable::standard())
            .run(&mut g, score("0.4"))
            .unwrap();
        g
    }

    #[test]
    fn battery_passes_on_sound_graph() {
        let g = inferred_graph();
        let report = run_battery(&g, &default_battery());
        assert_eq!(report.n_total, 7);
        assert!(report.all_pass, "{:#?}", report.queries);
        // CQ4 counts s2 (evidence, no dyad) and still passes (min 0).
        let cq4 = report
            .queries
            .iter()
            .find(|q| q.name == "cq4_threshold_check")
            .unwrap();
        assert_eq!(cq4.rows, 1);
    }

    #[test]
    fn expectations_gate_pass_fail() {
        assert!(Expectation::MinRows(1).check(3));
        assert!(!Expectation::MinRows(1).check(0));
        assert!(Expectation::MaxRows(0).check(0));
        assert!(!Expectation::MaxRows(0).check(2));
    }

    #[test]
    fn failing_query_does_not_abort_battery() {
        fn boom(_: &GraphStore) -> DyadResult<usize> {
            Err(crate::error::DyadError::internal("engine exploded"))
        }

        let battery = vec![
            CompetencyQuery::new("cq_boom", "Always fails", Expectation::MinRows(0), boom),
            CompetencyQuery::new(
                "cq1_list_dyads",
                "List inferred dyads",
                Expectation::MinRows(1),
                |g| Ok(g.count_predicate(&vocab::satisfies())),
            ),
        ];

        let report = run_battery(&inferred_graph(), &battery);
        assert_eq!(report.n_total, 2);
        assert_eq!(report.n_pass, 1);
        assert!(!report.all_pass);

        let failed = &report.queries[0];
        assert!(!failed.executed);
        assert!(!failed.passed);
        assert!(failed.error.as_deref().unwrap().contains("engine exploded"));
    }

    #[test]
    fn missing_provenance_detects_broken_evidence() {
        let mut g = inferred_graph();
        // A dyad evidence node with only one derivedFrom link.
        let broken = iri("ex:broken_dyad_ev");
        g.add(Triple::new(
            broken.clone(),
            vocab::rdf_type(),
            Term::Iri(vocab::dyad_evidence_class()),
        ));
        g.add(Triple::new(
            broken.clone(),
            vocab::derived_from(),
            Term::Iri(iri("ex:s1_ev_joy")),
        ));

        assert_eq!(missing_provenance(&g).unwrap(), 1);
    }

    #[test]
    fn score_mismatch_detected() {
        let mut g = inferred_graph();
        let forged = iri("ex:forged_dyad_ev");
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
        // Claims 0.9 but min(0.6, 0.5) = 0.5.
        g.add(Triple::new(
            forged.clone(),
            vocab::score(),
            Literal::decimal(score("0.9")),
        ));

        assert_eq!(score_mismatches(&g).unwrap(), 1);
    }
}
