//! Lossless serialize/parse for the prefixed triple text format.
//!
//! The format is line-oriented: a fixed block of `@prefix` bindings, then
//! one `subject predicate object .` statement per line. Literal objects are
//! quoted and carry an explicit datatype tag (`"0.5"^^xsd:decimal`).
//! Datatype and lexical value survive a round-trip exactly.

use std::fmt::Write as _;

use crate::error::ParseError;
use crate::graph::GraphStore;
use crate::term::{Datatype, Iri, Literal, Term, Triple};
use crate::vocab;

/// Serializes a graph to the triple text format.
///
/// Output is deterministic: prefixes in table order, triples sorted.
#[must_use]
pub fn serialize(graph: &GraphStore) -> String {
    let mut out = String::new();
    for (prefix, ns) in vocab::PREFIXES {
        // Infallible for String targets.
        let _ = writeln!(out, "@prefix {prefix}: <{ns}> .");
    }
    out.push('\n');

    for triple in graph.iter() {
        let _ = writeln!(
            out,
            "{} {} {} .",
            triple.subject,
            triple.predicate,
            format_object(&triple.object)
        );
    }
    out
}

fn format_object(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri.to_string(),
        Term::Literal(lit) => format!("\"{}\"^^{}", escape(&lit.lexical), lit.datatype.tag()),
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Parses a graph from the triple text format.
///
/// Unknown prefixes, unsupported datatypes, and malformed decimal literals
/// are fatal. Blank lines and `#` comments are skipped.
pub fn parse(text: &str) -> Result<GraphStore, ParseError> {
    let mut graph = GraphStore::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with("@prefix") {
            parse_prefix_line(line, line_no)?;
            continue;
        }
        graph.add(parse_triple_line(line, line_no)?);
    }

    Ok(graph)
}

fn parse_prefix_line(line: &str, line_no: usize) -> Result<(), ParseError> {
    // @prefix pl: <http://...> .
    let rest = line.trim_start_matches("@prefix").trim();
    let Some((name, tail)) = rest.split_once(':') else {
        return Err(ParseError::MalformedTriple {
            line: line_no,
            reason: "prefix binding missing ':'".to_string(),
        });
    };
    let name = name.trim();
    if !vocab::is_known_prefix(name) {
        return Err(ParseError::UnknownPrefix {
            line: line_no,
            prefix: name.to_string(),
        });
    }
    let tail = tail.trim();
    if !(tail.starts_with('<') && tail.ends_with('.')) {
        return Err(ParseError::MalformedTriple {
            line: line_no,
            reason: "prefix binding must be '@prefix name: <iri> .'".to_string(),
        });
    }
    Ok(())
}

fn parse_triple_line(line: &str, line_no: usize) -> Result<Triple, ParseError> {
    let malformed = |reason: &str| ParseError::MalformedTriple {
        line: line_no,
        reason: reason.to_string(),
    };

    let Some(body) = line.strip_suffix('.') else {
        return Err(malformed("statement must end with '.'"));
    };
    let body = body.trim_end();

    let (subject, rest) = split_token(body).ok_or_else(|| malformed("missing predicate"))?;
    let (predicate, object) = split_token(rest).ok_or_else(|| malformed("missing object"))?;
    if object.is_empty() {
        return Err(malformed("missing object"));
    }

    Ok(Triple::new(
        parse_iri(subject, line_no)?,
        parse_iri(predicate, line_no)?,
        parse_object(object, line_no)?,
    ))
}

/// Splits the leading whitespace-delimited token off `s`.
fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], s[i..].trim_start())),
        None => Some((s, "")),
    }
}

fn parse_iri(token: &str, line_no: usize) -> Result<Iri, ParseError> {
    let iri = Iri::new(token).map_err(|e| ParseError::MalformedTriple {
        line: line_no,
        reason: e.to_string(),
    })?;
    if !vocab::is_known_prefix(iri.prefix()) {
        return Err(ParseError::UnknownPrefix {
            line: line_no,
            prefix: iri.prefix().to_string(),
        });
    }
    Ok(iri)
}

fn parse_object(token: &str, line_no: usize) -> Result<Term, ParseError> {
    if !token.starts_with('"') {
        return Ok(Term::Iri(parse_iri(token, line_no)?));
    }

    let (lexical, rest) = scan_quoted(token, line_no)?;
    let datatype = match rest {
        "" => Datatype::String,
        tagged => match tagged.strip_prefix("^^") {
            Some("xsd:decimal") => Datatype::Decimal,
            Some("xsd:string") => Datatype::String,
            Some(other) => {
                return Err(ParseError::UnsupportedDatatype {
                    line: line_no,
                    datatype: other.to_string(),
                })
            }
            None => {
                return Err(ParseError::MalformedTriple {
                    line: line_no,
                    reason: format!("unexpected trailing content '{tagged}'"),
                })
            }
        },
    };

    if datatype == Datatype::Decimal && lexical.parse::<rust_decimal::Decimal>().is_err() {
        return Err(ParseError::MalformedDecimal {
            line: line_no,
            lexical,
        });
    }

    Ok(Term::Literal(Literal { lexical, datatype }))
}

/// Scans a quoted literal, handling backslash escapes.
///
/// Returns the unescaped lexical form and whatever follows the closing
/// quote.
fn scan_quoted(token: &str, line_no: usize) -> Result<(String, &str), ParseError> {
    let mut lexical = String::new();
    let mut chars = token.char_indices().skip(1);

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((lexical, token[i + 1..].trim())),
            '\\' => match chars.next() {
                Some((_, 'n')) => lexical.push('\n'),
                Some((_, 'r')) => lexical.push('\r'),
                Some((_, 't')) => lexical.push('\t'),
                Some((_, '"')) => lexical.push('"'),
                Some((_, '\\')) => lexical.push('\\'),
                Some((_, other)) => {
                    return Err(ParseError::MalformedTriple {
                        line: line_no,
                        reason: format!("invalid escape '\\{other}'"),
                    })
                }
                None => return Err(ParseError::UnterminatedString { line: line_no }),
            },
            other => lexical.push(other),
        }
    }

    Err(ParseError::UnterminatedString { line: line_no })
}
