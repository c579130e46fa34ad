//! Ontology graph data model: triples, per-source graphs, and their indices.
//!
//! - **Loader** ([`loader`]): turns files into [`SourceGraph`]s via `oxigraph`'s parsers
//! - **Index** ([`index`]): per-source [`index::EntityRecord`]s and the merged
//!   [`index::CombinedIndex`] every detection pass reads
//!
//! Everything here is immutable once built. Passes only ever borrow it.

pub mod index;
pub mod loader;

use serde::{Deserialize, Serialize};

/// Object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    /// A named node.
    Iri(String),
    /// A blank node, by its local identifier (without `_:`).
    Blank(String),
    /// A literal's lexical form. Datatype and language tag are not kept.
    Literal(String),
}

impl Term {
    /// The IRI, if this term is a named node.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Plain string form used for attribute values (labels, ranges, ...).
    pub fn value(&self) -> String {
        match self {
            Term::Iri(iri) => iri.clone(),
            Term::Blank(id) => format!("_:{id}"),
            Term::Literal(lexical) => lexical.clone(),
        }
    }
}

/// A triple (subject, predicate, object) as produced by the loader.
///
/// Blank-node subjects are kept as `_:id` strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// The subject URI.
    pub subject: String,
    /// The predicate URI.
    pub predicate: String,
    /// The object: URI, blank node or literal.
    pub object: Term,
}

impl Triple {
    /// Triple with an IRI object.
    pub fn iri(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: Term::Iri(object.into()),
        }
    }

    /// Triple with a literal object.
    pub fn literal(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: Term::Literal(value.into()),
        }
    }
}

/// All triples loaded from one input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceGraph {
    /// Identifier shown in findings: the file name of the originating path.
    pub id: String,
    /// Triples in parse order.
    pub triples: Vec<Triple>,
}

impl SourceGraph {
    /// Create a source graph from already-parsed triples.
    pub fn new(id: impl Into<String>, triples: Vec<Triple>) -> Self {
        Self {
            id: id.into(),
            triples,
        }
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the source contributed no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}
