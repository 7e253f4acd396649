//! In-memory triple store.
//!
//! [`GraphStore`] is a directed labeled multigraph of (subject, predicate,
//! object) statements with set semantics: adding a duplicate triple is a
//! no-op. Lookups go through indexes on (subject, predicate) and
//! (predicate, object); these cover the pattern shapes the resolver, rule
//! engine, and QA layer actually use (type lookup and short predicate
//! chains), not a general query language.

mod turtle;

pub use turtle::{parse, serialize};

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::{DyadResult, ParseError};
use crate::term::{Iri, Term, Triple};
use crate::vocab;

/// In-memory labeled multigraph with set semantics.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GraphStore {
    triples: BTreeSet<Triple>,
    by_sp: HashMap<(Iri, Iri), BTreeSet<Term>>,
    by_po: HashMap<(Iri, Term), BTreeSet<Iri>>,
}

impl GraphStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple. Returns false if it was already present.
    pub fn add(&mut self, triple: Triple) -> bool {
        if !self.triples.insert(triple.clone()) {
            return false;
        }
        self.by_sp
            .entry((triple.subject.clone(), triple.predicate.clone()))
            .or_default()
            .insert(triple.object.clone());
        self.by_po
            .entry((triple.predicate, triple.object))
            .or_default()
            .insert(triple.subject);
        true
    }

    /// Adds every triple from `iter`, returning how many were new.
    pub fn extend<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = Triple>,
    {
        iter.into_iter().filter(|t| self.add(t.clone())).count()
    }

    /// Returns true if the exact triple is present.
    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Number of distinct triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the store holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates all triples in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// All objects of `(subject, predicate, ?o)`.
    pub fn objects<'a>(
        &'a self,
        subject: &Iri,
        predicate: &Iri,
    ) -> impl Iterator<Item = &'a Term> {
        self.by_sp
            .get(&(subject.clone(), predicate.clone()))
            .into_iter()
            .flatten()
    }

    /// The first object of `(subject, predicate, ?o)`, if any.
    #[must_use]
    pub fn object(&self, subject: &Iri, predicate: &Iri) -> Option<&Term> {
        self.objects(subject, predicate).next()
    }

    /// All subjects of `(?s, predicate, object)`.
    pub fn subjects<'a>(
        &'a self,
        predicate: &Iri,
        object: &Term,
    ) -> impl Iterator<Item = &'a Iri> {
        self.by_po
            .get(&(predicate.clone(), object.clone()))
            .into_iter()
            .flatten()
    }

    /// All subjects typed `rdf:type class`.
    pub fn subjects_of_type<'a>(&'a self, class: &Iri) -> impl Iterator<Item = &'a Iri> {
        self.subjects(&vocab::rdf_type(), &Term::Iri(class.clone()))
    }

    /// Returns true if `node` is typed `rdf:type class`.
    #[must_use]
    pub fn is_a(&self, node: &Iri, class: &Iri) -> bool {
        self.contains(&Triple::new(
            node.clone(),
            vocab::rdf_type(),
            Term::Iri(class.clone()),
        ))
    }

    /// Counts triples carrying `predicate`.
    #[must_use]
    pub fn count_predicate(&self, predicate: &Iri) -> usize {
        self.triples
            .iter()
            .filter(|t| &t.predicate == predicate)
            .count()
    }

    /// Serializes the store to the prefixed triple text format.
    #[must_use]
    pub fn to_turtle(&self) -> String {
        serialize(self)
    }

    /// Parses a store from the prefixed triple text format.
    pub fn from_turtle(text: &str) -> Result<Self, ParseError> {
        parse(text)
    }

    /// Loads a store from a file.
    ///
    /// A missing or unreadable file is fatal; a malformed score literal
    /// inside the file is a parse error, not a silent default.
    pub fn load(path: impl AsRef<Path>) -> DyadResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let graph = Self::from_turtle(&text)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            triples = graph.len(),
            "loaded graph"
        );
        Ok(graph)
    }

    /// Writes the store to a file.
    pub fn write(&self, path: impl AsRef<Path>) -> DyadResult<()> {
        std::fs::write(path.as_ref(), self.to_turtle())?;
        tracing::debug!(
            path = %path.as_ref().display(),
            triples = self.len(),
            "wrote graph"
        );
        Ok(())
    }
}
