//! # DyadGraph - Emotion-Evidence Knowledge Graph Inference
//!
//! DyadGraph maintains an in-memory triple store of situations annotated
//! with basic-emotion evidence and derives Plutchik dyad emotions from
//! co-present component pairs under a min-threshold rule, with full
//! provenance for every inferred node.
//!
//! ## Core Concepts
//!
//! - **Situation**: A frame occurrence carrying emotion evidence
//! - **Evidence**: An atomic (emotion, score) observation attached to a situation
//! - **Dyad**: A compound emotion defined as an unordered pair of basic emotions
//! - **Score**: An exact decimal confidence in `[0, 1]`
//! - **QaReport**: Structured consistency results over a materialized graph
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dyadgraph::{DyadRuleEngine, GraphStore, Score};
//!
//! // Load a graph, infer dyads at threshold 0.4, write it back.
//! let mut graph = GraphStore::load("data/sample.ttl")?;
//! let engine = DyadRuleEngine::standard();
//! let summary = engine.run(&mut graph, Score::parse("0.4")?)?;
//! println!("{} new triples", summary.new_triples);
//! graph.write("data/inferred.ttl")?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod dyad;
pub mod emotion;
pub mod error;
pub mod score;
pub mod term;
pub mod vocab;

// Storage and inference
pub mod graph;
pub mod inference;
pub mod qa;

// Re-export primary types at crate root for convenience
pub use dyad::{DyadDefinition, DyadTable};
pub use emotion::{Emotion, EmotionKind, BASIC_EMOTIONS};
pub use error::{DyadError, DyadResult, ExecutionError, ParseError, ValidationError};
pub use graph::GraphStore;
pub use inference::{
    CancelToken, DyadRuleEngine, InferenceSummary, InferredDyad, ThresholdSweepAnalyzer,
};
pub use qa::{ConsistencyChecker, QaReport, ShapeReport, ShapeValidator};
pub use score::Score;
pub use term::{Iri, Literal, Term, Triple};
