//! The fixed namespace and predicate vocabulary.
//!
//! Prefix bindings and well-known IRIs are a closed, immutable table. The
//! serializer always emits the full binding set; the parser rejects prefixed
//! names that fall outside it.

use crate::term::Iri;

/// Prefix of the Plutchik module namespace.
pub const PL: &str = "pl";
/// Prefix of the instance-data namespace.
pub const EX: &str = "ex";
/// Prefix of the frame-schema namespace.
pub const FSCHEMA: &str = "fschema";
/// Prefix of the RDF namespace.
pub const RDF: &str = "rdf";
/// Prefix of the RDFS namespace.
pub const RDFS: &str = "rdfs";
/// Prefix of the XSD namespace.
pub const XSD: &str = "xsd";

/// All prefix bindings, in serialization order.
pub const PREFIXES: [(&str, &str); 6] = [
    (PL, "http://example.org/efo/plutchik#"),
    (EX, "http://example.org/data#"),
    (FSCHEMA, "https://w3id.org/framester/schema/"),
    (RDF, "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    (RDFS, "http://www.w3.org/2000/01/rdf-schema#"),
    (XSD, "http://www.w3.org/2001/XMLSchema#"),
];

/// Returns the namespace bound to `prefix`, if any.
#[must_use]
pub fn namespace(prefix: &str) -> Option<&'static str> {
    PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, ns)| *ns)
}

/// Returns true if `prefix` is part of the fixed binding table.
#[must_use]
pub fn is_known_prefix(prefix: &str) -> bool {
    namespace(prefix).is_some()
}

/// `rdf:type`
#[must_use]
pub fn rdf_type() -> Iri {
    Iri::from_static_parts(RDF, "type")
}

/// `rdfs:label`
#[must_use]
pub fn rdfs_label() -> Iri {
    Iri::from_static_parts(RDFS, "label")
}

/// `fschema:FrameOccurrence` — the situation class.
#[must_use]
pub fn frame_occurrence() -> Iri {
    Iri::from_static_parts(FSCHEMA, "FrameOccurrence")
}

/// `pl:Evidence` — basic evidence class.
#[must_use]
pub fn evidence_class() -> Iri {
    Iri::from_static_parts(PL, "Evidence")
}

/// `pl:DyadEvidence` — derived evidence class.
#[must_use]
pub fn dyad_evidence_class() -> Iri {
    Iri::from_static_parts(PL, "DyadEvidence")
}

/// `pl:hasEvidence` — situation to evidence edge.
#[must_use]
pub fn has_evidence() -> Iri {
    Iri::from_static_parts(PL, "hasEvidence")
}

/// `pl:satisfies` — situation to dyad-definition edge.
#[must_use]
pub fn satisfies() -> Iri {
    Iri::from_static_parts(PL, "satisfies")
}

/// `pl:emotion` — evidence to emotion label.
#[must_use]
pub fn emotion() -> Iri {
    Iri::from_static_parts(PL, "emotion")
}

/// `pl:score` — evidence to decimal score.
#[must_use]
pub fn score() -> Iri {
    Iri::from_static_parts(PL, "score")
}

/// `pl:derivedFrom` — provenance link from derived to basic evidence.
#[must_use]
pub fn derived_from() -> Iri {
    Iri::from_static_parts(PL, "derivedFrom")
}

/// `pl:method` — the inference method tag on derived evidence.
#[must_use]
pub fn method() -> Iri {
    Iri::from_static_parts(PL, "method")
}

/// Fixed value of the `pl:method` tag on dyad evidence.
pub const MIN_THRESHOLD_METHOD: &str = "min-threshold";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_prefixes_resolve() {
        assert!(is_known_prefix("pl"));
        assert!(is_known_prefix("xsd"));
        assert!(!is_known_prefix("owl"));
        assert_eq!(namespace("ex"), Some("http://example.org/data#"));
    }

    #[test]
    fn well_known_iris() {
        assert_eq!(rdf_type().to_string(), "rdf:type");
        assert_eq!(has_evidence().to_string(), "pl:hasEvidence");
        assert_eq!(dyad_evidence_class().to_string(), "pl:DyadEvidence");
    }
}
