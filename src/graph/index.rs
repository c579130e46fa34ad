//! Multi-graph index: per-source entity records and the merged corpus view.
//!
//! [`CombinedIndex::build`] walks every [`SourceGraph`] once and produces:
//!
//! - one [`EntityRecord`] per `(URI, source)` pair where the source declares the
//!   URI as a class or property. These are deliberately *not* merged: collision
//!   detection compares them against each other.
//! - one [`MergedEntity`] per declared URI, with attributes unioned across the
//!   whole corpus (including sources that only annotate the URI without
//!   declaring it).
//! - a normalized-label → class URIs lookup.
//!
//! All maps are ordered so that every consumer iterates deterministically.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::vocab;

use super::{SourceGraph, Term};

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// Declared role of a URI in the ontology's type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Class,
    ObjectProperty,
    DatatypeProperty,
    FunctionalProperty,
}

impl EntityKind {
    /// Kinds in declaration-check order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Class,
        EntityKind::ObjectProperty,
        EntityKind::DatatypeProperty,
        EntityKind::FunctionalProperty,
    ];

    /// Map an `rdf:type` object to a kind.
    pub fn from_type_iri(iri: &str) -> Option<Self> {
        match iri {
            vocab::OWL_CLASS => Some(EntityKind::Class),
            vocab::OWL_OBJECT_PROPERTY => Some(EntityKind::ObjectProperty),
            vocab::OWL_DATATYPE_PROPERTY => Some(EntityKind::DatatypeProperty),
            vocab::OWL_FUNCTIONAL_PROPERTY => Some(EntityKind::FunctionalProperty),
            _ => None,
        }
    }

    /// Short OWL name, e.g. `ObjectProperty`.
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Class => "Class",
            EntityKind::ObjectProperty => "ObjectProperty",
            EntityKind::DatatypeProperty => "DatatypeProperty",
            EntityKind::FunctionalProperty => "FunctionalProperty",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Attribute gathering
// ---------------------------------------------------------------------------

/// Everything one graph says about one subject. Values keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub kinds: BTreeSet<EntityKind>,
    pub labels: Vec<String>,
    pub comments: Vec<String>,
    pub domains: Vec<String>,
    pub ranges: Vec<String>,
    pub equivalent_classes: Vec<String>,
}

impl Attributes {
    fn absorb(&mut self, predicate: &str, object: &Term) {
        let slot = match predicate {
            vocab::RDF_TYPE => {
                if let Some(kind) = object.as_iri().and_then(EntityKind::from_type_iri) {
                    self.kinds.insert(kind);
                }
                return;
            }
            vocab::RDFS_LABEL => &mut self.labels,
            vocab::RDFS_COMMENT => &mut self.comments,
            vocab::RDFS_DOMAIN => &mut self.domains,
            vocab::RDFS_RANGE => &mut self.ranges,
            vocab::OWL_EQUIVALENT_CLASS => &mut self.equivalent_classes,
            _ => return,
        };
        push_unique(slot, object.value());
    }

    fn merge(&mut self, other: &Attributes) {
        self.kinds.extend(other.kinds.iter().copied());
        for (into, from) in [
            (&mut self.labels, &other.labels),
            (&mut self.comments, &other.comments),
            (&mut self.domains, &other.domains),
            (&mut self.ranges, &other.ranges),
            (&mut self.equivalent_classes, &other.equivalent_classes),
        ] {
            for value in from {
                push_unique(into, value.clone());
            }
        }
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn gather(source: &SourceGraph) -> BTreeMap<&str, Attributes> {
    let mut table: BTreeMap<&str, Attributes> = BTreeMap::new();
    for triple in &source.triples {
        table
            .entry(triple.subject.as_str())
            .or_default()
            .absorb(&triple.predicate, &triple.object);
    }
    table
}

// ---------------------------------------------------------------------------
// Records and merged entities
// ---------------------------------------------------------------------------

/// One source's definition of one URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub uri: String,
    /// Identifier of the defining source.
    pub source: String,
    /// What this source says about the URI. `kinds` is never empty.
    pub attributes: Attributes,
}

/// Corpus-wide view of a declared URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedEntity {
    pub uri: String,
    /// Union of attributes from every source that mentions the URI.
    pub attributes: Attributes,
    /// For each declared kind, the sources declaring it (in load order).
    declared_by: BTreeMap<EntityKind, Vec<String>>,
    /// Sources declaring the URI with any kind, in load order.
    sources: Vec<String>,
}

impl MergedEntity {
    fn new(
        uri: &str,
        attributes: Attributes,
        declared_by: BTreeMap<EntityKind, Vec<String>>,
        sources: Vec<String>,
    ) -> Self {
        assert!(
            !sources.is_empty() && declared_by.values().all(|s| !s.is_empty()),
            "entity {uri} materialized without a contributing source"
        );
        Self {
            uri: uri.to_string(),
            attributes,
            declared_by,
            sources,
        }
    }

    /// Whether any source declares the URI with this kind.
    pub fn has_kind(&self, kind: EntityKind) -> bool {
        self.declared_by.contains_key(&kind)
    }

    /// Declared kinds.
    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.declared_by.keys().copied()
    }

    /// Sources declaring the URI with `kind`; empty if none.
    pub fn sources_for(&self, kind: EntityKind) -> &[String] {
        self.declared_by.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sources declaring the URI with any kind, in load order.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn local_name(&self) -> &str {
        vocab::local_name(&self.uri)
    }

    /// First label if any, otherwise the local name.
    pub fn display_name(&self) -> &str {
        self.attributes
            .labels
            .first()
            .map(String::as_str)
            .unwrap_or_else(|| self.local_name())
    }
}

// ---------------------------------------------------------------------------
// Combined index
// ---------------------------------------------------------------------------

/// Read-only index over all loaded sources.
#[derive(Debug, Clone, Default)]
pub struct CombinedIndex {
    source_ids: Vec<String>,
    triple_count: usize,
    records: BTreeMap<String, Vec<EntityRecord>>,
    entities: BTreeMap<String, MergedEntity>,
    classes_by_label: BTreeMap<String, BTreeSet<String>>,
}

impl CombinedIndex {
    /// Build the index. Sources are taken in the given order.
    pub fn build(sources: &[SourceGraph]) -> Self {
        let mut records: BTreeMap<String, Vec<EntityRecord>> = BTreeMap::new();
        let mut combined: BTreeMap<String, Attributes> = BTreeMap::new();
        let mut declared_by: BTreeMap<String, (BTreeMap<EntityKind, Vec<String>>, Vec<String>)> =
            BTreeMap::new();

        for source in sources {
            for (subject, attributes) in gather(source) {
                combined.entry(subject.to_string()).or_default().merge(&attributes);
                if attributes.kinds.is_empty() {
                    continue;
                }
                let (by_kind, all) = declared_by.entry(subject.to_string()).or_default();
                for kind in &attributes.kinds {
                    push_unique(by_kind.entry(*kind).or_default(), source.id.clone());
                }
                push_unique(all, source.id.clone());
                records.entry(subject.to_string()).or_default().push(EntityRecord {
                    uri: subject.to_string(),
                    source: source.id.clone(),
                    attributes,
                });
            }
        }

        let mut entities = BTreeMap::new();
        let mut classes_by_label: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (uri, (by_kind, all)) in declared_by {
            let attributes = combined.remove(&uri).unwrap_or_default();
            let entity = MergedEntity::new(&uri, attributes, by_kind, all);
            if entity.has_kind(EntityKind::Class) {
                for label in &entity.attributes.labels {
                    let normalized = vocab::normalize_label(label);
                    if !normalized.is_empty() {
                        classes_by_label
                            .entry(normalized)
                            .or_default()
                            .insert(uri.clone());
                    }
                }
            }
            entities.insert(uri, entity);
        }

        let index = Self {
            source_ids: sources.iter().map(|s| s.id.clone()).collect(),
            triple_count: sources.iter().map(SourceGraph::len).sum(),
            records,
            entities,
            classes_by_label,
        };
        tracing::debug!(
            sources = index.source_ids.len(),
            triples = index.triple_count,
            entities = index.entities.len(),
            labels = index.classes_by_label.len(),
            "built combined index"
        );
        index
    }

    /// Identifiers of the indexed sources, in load order.
    pub fn source_ids(&self) -> &[String] {
        &self.source_ids
    }

    /// Total triples across all sources.
    pub fn triple_count(&self) -> usize {
        self.triple_count
    }

    /// Per-source records grouped by URI.
    pub fn records(&self) -> &BTreeMap<String, Vec<EntityRecord>> {
        &self.records
    }

    /// Per-source records for one URI; empty if undeclared.
    pub fn records_for(&self, uri: &str) -> &[EntityRecord] {
        self.records.get(uri).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Merged view of every declared URI, ordered by URI.
    pub fn entities(&self) -> impl Iterator<Item = &MergedEntity> {
        self.entities.values()
    }

    pub fn entity(&self, uri: &str) -> Option<&MergedEntity> {
        self.entities.get(uri)
    }

    /// Merged entities declared with `kind` somewhere in the corpus.
    pub fn entities_of(&self, kind: EntityKind) -> impl Iterator<Item = &MergedEntity> {
        self.entities.values().filter(move |e| e.has_kind(kind))
    }

    /// Normalized class label → class URIs carrying it.
    pub fn classes_by_label(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.classes_by_label
    }
}
