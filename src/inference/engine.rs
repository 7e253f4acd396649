//! The min-threshold dyad rule engine.
//!
//! A dyad is inferred for a situation when both of its basic components
//! have resolved evidence at or above the threshold; the dyad score is the
//! exact minimum of the two component scores. Inference is a pure function
//! of (evidence map, threshold, dyad table); materialization is the single
//! side effect, and it is the sole writer of dyad evidence and `satisfies`
//! edges.
//!
//! Derived evidence identity is content-addressed: a blake3 hash of
//! (situation, dyad, normalized threshold) names the dyad evidence node, so
//! re-materializing at the same threshold over the same base evidence is a
//! no-op under the store's set semantics instead of duplicating facts.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::dyad::DyadTable;
use crate::emotion::Emotion;
use crate::error::{DyadResult, ExecutionError};
use crate::graph::GraphStore;
use crate::inference::resolver::{resolve_evidence, EvidenceMap};
use crate::score::Score;
use crate::term::{Iri, Literal, Term, Triple};
use crate::vocab;

/// Cooperative cancellation flag, checked at per-situation loop boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One inferred dyad for a situation, before materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredDyad {
    /// The compound emotion.
    pub dyad: Emotion,
    /// Exact minimum of the two component scores.
    pub score: Score,
    /// The two winning component evidence nodes, in component order.
    pub sources: [Iri; 2],
}

/// Outcome of a materializing inference pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceSummary {
    /// Dyads inferred per situation (empty sets included).
    pub by_situation: BTreeMap<Iri, BTreeSet<Emotion>>,
    /// Number of triples newly added to the graph.
    pub new_triples: usize,
}

impl InferenceSummary {
    /// Number of situations visited.
    #[must_use]
    pub fn situations(&self) -> usize {
        self.by_situation.len()
    }

    /// Total number of inferred dyads across situations.
    #[must_use]
    pub fn total_dyads(&self) -> usize {
        self.by_situation.values().map(BTreeSet::len).sum()
    }
}

/// Applies the fixed dyad rule table to resolved evidence.
#[derive(Debug, Clone)]
pub struct DyadRuleEngine {
    table: DyadTable,
}

impl DyadRuleEngine {
    /// Creates an engine over the given dyad table.
    #[must_use]
    pub fn new(table: DyadTable) -> Self {
        Self { table }
    }

    /// Creates an engine over the standard Plutchik dyads.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(DyadTable::standard())
    }

    /// The dyad table driving this engine.
    #[must_use]
    pub fn table(&self) -> &DyadTable {
        &self.table
    }

    /// Applies the min-threshold rule. Pure: no graph access.
    ///
    /// A missing component means the dyad is skipped, which is distinct
    /// from a component that is present but below threshold; neither is an
    /// error. Rejection is strict (`score < threshold` fails), so raising
    /// the threshold can only shrink the result.
    #[must_use]
    pub fn infer(&self, evidence: &EvidenceMap, threshold: Score) -> Vec<InferredDyad> {
        let mut inferred = Vec::new();

        for def in self.table.iter() {
            let (Some(first), Some(second)) = (
                evidence.get(&def.components[0]),
                evidence.get(&def.components[1]),
            ) else {
                continue;
            };

            if first.score < threshold || second.score < threshold {
                continue;
            }

            inferred.push(InferredDyad {
                dyad: def.name,
                score: first.score.min(second.score),
                sources: [first.id.clone(), second.id.clone()],
            });
        }

        inferred
    }

    /// Materializes inferred dyads for one situation into the graph.
    ///
    /// Returns the number of newly added triples.
    pub fn materialize(
        &self,
        graph: &mut GraphStore,
        situation: &Iri,
        inferred: &[InferredDyad],
        threshold: Score,
    ) -> usize {
        let mut added = 0;
        for dyad in inferred {
            added += graph.extend(dyad_triples(situation, dyad, threshold));
        }
        added
    }

    /// Runs a materializing pass over every situation in the graph.
    pub fn run(&self, graph: &mut GraphStore, threshold: Score) -> DyadResult<InferenceSummary> {
        self.run_inner(graph, threshold, None)
    }

    /// Like [`run`](Self::run), but checks `cancel` between situations.
    pub fn run_with_cancel(
        &self,
        graph: &mut GraphStore,
        threshold: Score,
        cancel: &CancelToken,
    ) -> DyadResult<InferenceSummary> {
        self.run_inner(graph, threshold, Some(cancel))
    }

    fn run_inner(
        &self,
        graph: &mut GraphStore,
        threshold: Score,
        cancel: Option<&CancelToken>,
    ) -> DyadResult<InferenceSummary> {
        let situations: Vec<Iri> = graph
            .subjects_of_type(&vocab::frame_occurrence())
            .cloned()
            .collect();
        tracing::info!(
            situations = situations.len(),
            threshold = %threshold,
            "starting inference pass"
        );

        let mut summary = InferenceSummary::default();
        for situation in situations {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return Err(ExecutionError::Cancelled.into());
            }

            let evidence = resolve_evidence(graph, &situation)?;
            let inferred = self.infer(&evidence, threshold);
            summary.new_triples += self.materialize(graph, &situation, &inferred, threshold);
            tracing::debug!(
                situation = %situation,
                dyads = inferred.len(),
                "situation evaluated"
            );
            summary
                .by_situation
                .insert(situation, inferred.into_iter().map(|d| d.dyad).collect());
        }

        tracing::info!(
            dyads = summary.total_dyads(),
            new_triples = summary.new_triples,
            "inference pass complete"
        );
        Ok(summary)
    }

    /// Parallel materializing pass.
    ///
    /// Situations are data-independent, so resolution and rule evaluation
    /// fan out across `workers` threads; each situation's new triples land
    /// in a private buffer, and all buffers merge into the graph in a single
    /// append phase after the workers join. The graph is never mutated
    /// concurrently.
    pub fn run_parallel(
        &self,
        graph: &mut GraphStore,
        threshold: Score,
        workers: usize,
        cancel: Option<&CancelToken>,
    ) -> DyadResult<InferenceSummary> {
        let situations: Vec<Iri> = graph
            .subjects_of_type(&vocab::frame_occurrence())
            .cloned()
            .collect();
        if situations.is_empty() {
            return Ok(InferenceSummary::default());
        }

        let workers = workers.max(1).min(situations.len());
        let chunk_size = situations.len().div_ceil(workers);
        tracing::info!(
            situations = situations.len(),
            workers,
            threshold = %threshold,
            "starting parallel inference pass"
        );

        type WorkerItem = DyadResult<(Iri, BTreeSet<Emotion>, Vec<Triple>)>;
        let (tx, rx) = crossbeam_channel::unbounded::<WorkerItem>();

        let shared: &GraphStore = graph;
        std::thread::scope(|scope| {
            for chunk in situations.chunks(chunk_size) {
                let tx = tx.clone();
                scope.spawn(move || {
                    for situation in chunk {
                        if cancel.is_some_and(CancelToken::is_cancelled) {
                            let _ = tx.send(Err(ExecutionError::Cancelled.into()));
                            return;
                        }
                        let item = resolve_evidence(shared, situation).map(|evidence| {
                            let inferred = self.infer(&evidence, threshold);
                            let dyads = inferred.iter().map(|d| d.dyad).collect();
                            let triples = inferred
                                .iter()
                                .flat_map(|d| dyad_triples(situation, d, threshold))
                                .collect();
                            (situation.clone(), dyads, triples)
                        });
                        if tx.send(item).is_err() {
                            return;
                        }
                    }
                });
            }
        });
        drop(tx);

        // Single synchronized append phase.
        let mut summary = InferenceSummary::default();
        let mut buffered = Vec::new();
        let mut expected = situations.len();
        while expected > 0 {
            let (situation, dyads, triples) = match rx.recv() {
                Ok(Ok(item)) => item,
                Ok(Err(e)) => return Err(e),
                Err(_) => return Err(ExecutionError::WorkerLost.into()),
            };
            expected -= 1;
            summary.by_situation.insert(situation, dyads);
            buffered.extend(triples);
        }
        summary.new_triples = graph.extend(buffered);

        tracing::info!(
            dyads = summary.total_dyads(),
            new_triples = summary.new_triples,
            "parallel inference pass complete"
        );
        Ok(summary)
    }
}

/// Deterministic, content-addressed identifier for a dyad evidence node.
///
/// Keyed by (situation, dyad name, normalized threshold): re-running at the
/// same threshold yields the same identifier, while a different threshold
/// yields a distinct one. The threshold is normalized so `0.4` and `0.40`
/// address the same fact.
#[must_use]
pub(crate) fn dyad_evidence_iri(situation: &Iri, dyad: Emotion, threshold: Score) -> Iri {
    let key = format!(
        "{}\n{}\n{}",
        situation.as_str(),
        dyad.as_str(),
        threshold.value().normalize()
    );
    let digest = blake3::hash(key.as_bytes()).to_hex();
    let local = format!(
        "{}_dyad_{}_{}",
        situation.local(),
        dyad.as_str().to_ascii_lowercase(),
        &digest.as_str()[..12]
    );
    Iri::from_static_parts(vocab::EX, &local)
}

/// The full triple set materializing one inferred dyad.
fn dyad_triples(situation: &Iri, dyad: &InferredDyad, threshold: Score) -> Vec<Triple> {
    let evidence = dyad_evidence_iri(situation, dyad.dyad, threshold);
    vec![
        Triple::new(
            situation.clone(),
            vocab::satisfies(),
            Term::Iri(dyad.dyad.iri()),
        ),
        Triple::new(
            evidence.clone(),
            vocab::rdf_type(),
            Term::Iri(vocab::dyad_evidence_class()),
        ),
        Triple::new(evidence.clone(), vocab::emotion(), Term::Iri(dyad.dyad.iri())),
        Triple::new(evidence.clone(), vocab::score(), Literal::decimal(dyad.score)),
        Triple::new(
            evidence.clone(),
            vocab::derived_from(),
            Term::Iri(dyad.sources[0].clone()),
        ),
        Triple::new(
            evidence.clone(),
            vocab::derived_from(),
            Term::Iri(dyad.sources[1].clone()),
        ),
        Triple::new(
            evidence.clone(),
            vocab::method(),
            Literal::string(vocab::MIN_THRESHOLD_METHOD),
        ),
        Triple::new(situation.clone(), vocab::has_evidence(), Term::Iri(evidence)),
    ]
}
