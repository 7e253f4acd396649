//! Graph terms: prefixed IRIs, typed literals, and triples.
//!
//! All identifiers are namespace-prefixed (`ex:s1`, `pl:hasEvidence`).
//! Literals carry an explicit datatype tag so that serialization stays
//! bit-compatible with downstream consumers.

use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;
use crate::score::Score;

/// A namespace-prefixed identifier, e.g. `ex:s1`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    /// Creates an IRI from its prefixed form.
    ///
    /// The value must be `prefix:local` with a non-empty prefix and local
    /// part and no whitespace. Whether the prefix is bound to a namespace is
    /// checked at parse/serialize time, not here.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let invalid = |reason: &str| ValidationError::InvalidIri {
            value: value.clone(),
            reason: reason.to_string(),
        };

        if value.chars().any(char::is_whitespace) {
            return Err(invalid("contains whitespace"));
        }
        match value.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {}
            Some(_) => return Err(invalid("empty prefix or local part")),
            None => return Err(invalid("missing ':' separator")),
        }

        Ok(Self(value))
    }

    /// Builds an IRI from a known prefix and local name without validation.
    ///
    /// Callers must pass a prefix from [`crate::vocab`] and a local name
    /// free of whitespace.
    #[must_use]
    pub(crate) fn from_static_parts(prefix: &str, local: &str) -> Self {
        Self(format!("{prefix}:{local}"))
    }

    /// The namespace prefix, e.g. `ex`.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.0.split_once(':').map_or("", |(p, _)| p)
    }

    /// The local name, e.g. `s1`.
    #[must_use]
    pub fn local(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, l)| l)
    }

    /// The full prefixed form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Literal datatypes supported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Datatype {
    /// `xsd:decimal`
    Decimal,
    /// `xsd:string`
    String,
}

impl Datatype {
    /// The prefixed datatype IRI used on the wire.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Decimal => "xsd:decimal",
            Self::String => "xsd:string",
        }
    }
}

/// A typed literal value.
///
/// The lexical form is stored verbatim: `0.50` round-trips as `0.50`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Literal {
    /// Lexical form without quoting or escaping.
    pub lexical: String,
    /// Explicit datatype tag.
    pub datatype: Datatype,
}

impl Literal {
    /// A decimal literal carrying a score.
    #[must_use]
    pub fn decimal(score: Score) -> Self {
        Self {
            lexical: score.lexical(),
            datatype: Datatype::Decimal,
        }
    }

    /// A string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            lexical: value.into(),
            datatype: Datatype::String,
        }
    }

    /// Interprets this literal as a score, if it is a decimal.
    ///
    /// Returns `None` for string literals; a decimal literal whose lexical
    /// form does not parse is an error.
    pub fn as_score(&self) -> Option<Result<Score, ValidationError>> {
        match self.datatype {
            Datatype::Decimal => Some(Score::parse(&self.lexical)),
            Datatype::String => None,
        }
    }
}

/// Either an IRI or a literal; the object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Term {
    /// A prefixed identifier.
    Iri(Iri),
    /// A typed literal.
    Literal(Literal),
}

impl Term {
    /// Returns the IRI if this term is one.
    #[must_use]
    pub const fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Literal(_) => None,
        }
    }

    /// Returns the literal if this term is one.
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            Self::Iri(_) => None,
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

/// A (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Triple {
    /// Statement subject.
    pub subject: Iri,
    /// Statement predicate.
    pub predicate: Iri,
    /// Statement object.
    pub object: Term,
}

impl Triple {
    /// Creates a triple.
    #[must_use]
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}
