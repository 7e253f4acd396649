use std::collections::BTreeSet;
use std::path::PathBuf;

use dyadgraph::{DyadRuleEngine, Emotion, GraphStore, Score, Triple, Term};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/sample.ttl")
}

fn score(s: &str) -> Score {
    Score::parse(s).unwrap()
}

fn iri(s: &str) -> dyadgraph::Iri {
    dyadgraph::Iri::new(s).unwrap()
}

fn expected_dyads() -> Vec<(&'static str, Vec<Emotion>)> {
    vec![
        ("ex:s1", vec![Emotion::Love]),
        ("ex:s2", vec![Emotion::Contempt]),
        ("ex:s3", vec![Emotion::Aggressiveness]),
        ("ex:s4", vec![Emotion::Disapproval]),
        ("ex:s5", vec![Emotion::Hope]),
        ("ex:s6", vec![]),
    ]
}

#[test]
fn fixture_inference_at_default_threshold() {
    let mut graph = GraphStore::load(fixture_path()).unwrap();
    let summary = DyadRuleEngine::standard()
        .run(&mut graph, score("0.4"))
        .unwrap();

    assert_eq!(summary.situations(), 6);
    assert_eq!(summary.total_dyads(), 5);

    for (sit, dyads) in expected_dyads() {
        let expected: BTreeSet<Emotion> = dyads.into_iter().collect();
        assert_eq!(
            summary.by_situation[&iri(sit)], expected,
            "dyads for {sit}"
        );
    }
}

#[test]
fn fear_alone_never_fires_awe() {
    let mut graph = GraphStore::load(fixture_path()).unwrap();
    DyadRuleEngine::standard()
        .run(&mut graph, Score::zero())
        .unwrap();

    // s6 has Fear evidence only; Awe needs Surprise too.
    assert!(!graph.contains(&Triple::new(
        iri("ex:s6"),
        dyadgraph::vocab::satisfies(),
        Term::Iri(Emotion::Awe.iri()),
    )));
}

#[test]
fn rerun_adds_nothing() {
    let mut graph = GraphStore::load(fixture_path()).unwrap();
    let engine = DyadRuleEngine::standard();

    let first = engine.run(&mut graph, score("0.4")).unwrap();
    assert!(first.new_triples > 0);

    let snapshot = graph.clone();
    let second = engine.run(&mut graph, score("0.4")).unwrap();
    assert_eq!(second.new_triples, 0);
    assert_eq!(second.by_situation, first.by_situation);
    assert_eq!(graph, snapshot);
}

#[test]
fn enriched_graph_survives_serialization() {
    let mut graph = GraphStore::load(fixture_path()).unwrap();
    DyadRuleEngine::standard()
        .run(&mut graph, score("0.4"))
        .unwrap();

    let text = graph.to_turtle();
    let reparsed = GraphStore::from_turtle(&text).unwrap();
    assert_eq!(reparsed, graph);
}

#[test]
fn enriched_graph_survives_file_round_trip() {
    let mut graph = GraphStore::load(fixture_path()).unwrap();
    DyadRuleEngine::standard()
        .run(&mut graph, score("0.4"))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inferred.ttl");
    graph.write(&path).unwrap();

    let reloaded = GraphStore::load(&path).unwrap();
    assert_eq!(reloaded, graph);
}

#[test]
fn parallel_run_matches_sequential_on_fixture() {
    let engine = DyadRuleEngine::standard();

    let mut sequential = GraphStore::load(fixture_path()).unwrap();
    let seq = engine.run(&mut sequential, score("0.4")).unwrap();

    let mut parallel = GraphStore::load(fixture_path()).unwrap();
    let par = engine
        .run_parallel(&mut parallel, score("0.4"), 4, None)
        .unwrap();

    assert_eq!(seq, par);
    assert_eq!(sequential, parallel);
}

#[test]
fn tighter_threshold_prunes_low_scores() {
    let mut graph = GraphStore::load(fixture_path()).unwrap();
    let summary = DyadRuleEngine::standard()
        .run(&mut graph, score("0.5"))
        .unwrap();

    // Only s1 (min 0.5) and s3 (min 0.55) survive at 0.5.
    assert_eq!(summary.total_dyads(), 2);
    assert_eq!(
        summary.by_situation[&iri("ex:s1")],
        BTreeSet::from([Emotion::Love])
    );
    assert_eq!(
        summary.by_situation[&iri("ex:s3")],
        BTreeSet::from([Emotion::Aggressiveness])
    );
    assert!(summary.by_situation[&iri("ex:s2")].is_empty());
}
