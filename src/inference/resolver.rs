//! Evidence resolution.
//!
//! Reduces possibly-redundant basic-emotion evidence on a situation to one
//! winning (evidence, score) pair per emotion label. Evidence typed
//! `pl:DyadEvidence` is excluded from resolution; that exclusion is what
//! keeps inference non-transitive across passes.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::emotion::Emotion;
use crate::error::{DyadResult, ExecutionError};
use crate::graph::GraphStore;
use crate::score::Score;
use crate::term::{Iri, Term};
use crate::vocab;

/// The winning evidence for one emotion label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEvidence {
    /// The evidence node.
    pub id: Iri,
    /// Its score.
    pub score: Score,
}

/// Resolved map: one winning evidence per emotion label.
pub type EvidenceMap = BTreeMap<Emotion, ResolvedEvidence>;

/// Resolves the basic-emotion evidence attached to `situation`.
///
/// For each emotion label, keeps the entry with the strictly greater score;
/// on an exact tie the first-encountered evidence wins. Evidence nodes
/// missing an emotion or score triple are skipped (join semantics), but a
/// score term that is not a decimal literal is an error.
pub fn resolve_evidence(graph: &GraphStore, situation: &Iri) -> DyadResult<EvidenceMap> {
    let mut resolved = EvidenceMap::new();
    let dyad_class = vocab::dyad_evidence_class();

    for term in graph.objects(situation, &vocab::has_evidence()) {
        let Some(evidence) = term.as_iri() else {
            continue;
        };
        // Dyad evidence from prior passes never feeds resolution.
        if graph.is_a(evidence, &dyad_class) {
            continue;
        }

        let Some(emotion_iri) = graph.object(evidence, &vocab::emotion()).and_then(Term::as_iri)
        else {
            continue;
        };
        let Some(score_term) = graph.object(evidence, &vocab::score()) else {
            continue;
        };

        let emotion: Emotion = emotion_iri.local().parse()?;
        let score = score_term
            .as_literal()
            .and_then(|lit| lit.as_score())
            .ok_or_else(|| ExecutionError::ScoreNotDecimal {
                evidence: evidence.clone(),
            })??;

        match resolved.entry(emotion) {
            Entry::Vacant(slot) => {
                slot.insert(ResolvedEvidence {
                    id: evidence.clone(),
                    score,
                });
            }
            Entry::Occupied(mut slot) => {
                // Strictly greater replaces; ties keep the first seen.
                if score > slot.get().score {
                    slot.insert(ResolvedEvidence {
                        id: evidence.clone(),
                        score,
                    });
                }
            }
        }
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use crate::term::{Literal, Triple};

    use super::*;

    fn iri(s: &str) -> Iri {
        Iri::new(s).unwrap()
    }

    fn score(s: &str) -> Score {
        Score::parse(s).unwrap()
    }

    fn add_evidence(g: &mut GraphStore, sit: &str, ev: &str, emotion: Emotion, s: &str) {
        let ev = iri(ev);
        g.add(Triple::new(
            ev.clone(),
            vocab::rdf_type(),
            Term::Iri(vocab::evidence_class()),
        ));
        g.add(Triple::new(
            ev.clone(),
            vocab::emotion(),
            Term::Iri(emotion.iri()),
        ));
        g.add(Triple::new(
            ev.clone(),
            vocab::score(),
            Literal::decimal(score(s)),
        ));
        g.add(Triple::new(iri(sit), vocab::has_evidence(), Term::Iri(ev)));
    }

    #[test]
    fn resolves_single_evidence_per_emotion() {
        let mut g = GraphStore::new();
        add_evidence(&mut g, "ex:s1", "ex:s1_ev_joy", Emotion::Joy, "0.6");
        add_evidence(&mut g, "ex:s1", "ex:s1_ev_trust", Emotion::Trust, "0.5");

        let map = resolve_evidence(&g, &iri("ex:s1")).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&Emotion::Joy].score, score("0.6"));
        assert_eq!(map[&Emotion::Trust].id, iri("ex:s1_ev_trust"));
    }

    #[test]
    fn duplicate_labels_keep_max_score() {
        let mut g = GraphStore::new();
        add_evidence(&mut g, "ex:s1", "ex:s1_ev_joy_a", Emotion::Joy, "0.3");
        add_evidence(&mut g, "ex:s1", "ex:s1_ev_joy_b", Emotion::Joy, "0.5");

        let map = resolve_evidence(&g, &iri("ex:s1")).unwrap();
        assert_eq!(map[&Emotion::Joy].score, score("0.5"));
        assert_eq!(map[&Emotion::Joy].id, iri("ex:s1_ev_joy_b"));
    }

    #[test]
    fn exact_ties_keep_first_encountered() {
        let mut g = GraphStore::new();
        // Objects iterate in sorted order, so _a comes first.
        add_evidence(&mut g, "ex:s1", "ex:s1_ev_joy_a", Emotion::Joy, "0.5");
        add_evidence(&mut g, "ex:s1", "ex:s1_ev_joy_b", Emotion::Joy, "0.50");

        let map = resolve_evidence(&g, &iri("ex:s1")).unwrap();
        assert_eq!(map[&Emotion::Joy].id, iri("ex:s1_ev_joy_a"));
    }

    #[test]
    fn dyad_evidence_is_excluded() {
        let mut g = GraphStore::new();
        add_evidence(&mut g, "ex:s1", "ex:s1_ev_joy", Emotion::Joy, "0.6");
        // A dyad evidence node attached by a previous inference pass.
        let dev = iri("ex:s1_dyad_love");
        g.add(Triple::new(
            dev.clone(),
            vocab::rdf_type(),
            Term::Iri(vocab::dyad_evidence_class()),
        ));
        g.add(Triple::new(
            dev.clone(),
            vocab::emotion(),
            Term::Iri(Emotion::Love.iri()),
        ));
        g.add(Triple::new(
            dev.clone(),
            vocab::score(),
            Literal::decimal(score("0.5")),
        ));
        g.add(Triple::new(iri("ex:s1"), vocab::has_evidence(), Term::Iri(dev)));

        let map = resolve_evidence(&g, &iri("ex:s1")).unwrap();
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&Emotion::Love));
    }

    #[test]
    fn evidence_missing_score_is_skipped() {
        let mut g = GraphStore::new();
        let ev = iri("ex:s1_ev_joy");
        g.add(Triple::new(
            ev.clone(),
            vocab::emotion(),
            Term::Iri(Emotion::Joy.iri()),
        ));
        g.add(Triple::new(iri("ex:s1"), vocab::has_evidence(), Term::Iri(ev)));

        let map = resolve_evidence(&g, &iri("ex:s1")).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn string_typed_score_is_an_error() {
        let mut g = GraphStore::new();
        let ev = iri("ex:s1_ev_joy");
        g.add(Triple::new(
            ev.clone(),
            vocab::emotion(),
            Term::Iri(Emotion::Joy.iri()),
        ));
        g.add(Triple::new(ev.clone(), vocab::score(), Literal::string("0.6")));
        g.add(Triple::new(iri("ex:s1"), vocab::has_evidence(), Term::Iri(ev)));

        let err = resolve_evidence(&g, &iri("ex:s1")).unwrap_err();
        assert!(err.is_execution());
    }

    #[test]
    fn unknown_emotion_label_is_an_error() {
        let mut g = GraphStore::new();
        let ev = iri("ex:s1_ev_x");
        g.add(Triple::new(
            ev.clone(),
            vocab::emotion(),
            Term::Iri(iri("pl:Boredom")),
        ));
        g.add(Triple::new(
            ev.clone(),
            vocab::score(),
            Literal::decimal(score("0.6")),
        ));
        g.add(Triple::new(iri("ex:s1"), vocab::has_evidence(), Term::Iri(ev)));

        let err = resolve_evidence(&g, &iri("ex:s1")).unwrap_err();
        assert!(err.is_validation());
    }
}
