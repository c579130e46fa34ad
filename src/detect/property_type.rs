//! Property type conflicts: a URI typed both `owl:ObjectProperty` and
//! `owl:DatatypeProperty` anywhere in the corpus.
//!
//! A property cannot range over both individuals and literals, so this pairing is
//! always fatal. Every hit here is also a type conflict in the collision pass,
//! whether the declarations come from one source or several.
//! `owl:FunctionalProperty` next to either kind is fine.

use crate::graph::index::{CombinedIndex, EntityKind};

use super::{Category, Evidence, Finding};

const PROPERTY_KINDS: [EntityKind; 3] = [
    EntityKind::ObjectProperty,
    EntityKind::DatatypeProperty,
    EntityKind::FunctionalProperty,
];

pub fn detect(index: &CombinedIndex) -> Vec<Finding> {
    index
        .entities()
        .filter(|e| {
            e.has_kind(EntityKind::ObjectProperty) && e.has_kind(EntityKind::DatatypeProperty)
        })
        .map(|entity| {
            let declarations: Vec<(EntityKind, String)> = PROPERTY_KINDS
                .iter()
                .flat_map(|&kind| {
                    entity
                        .sources_for(kind)
                        .iter()
                        .map(move |source| (kind, source.clone()))
                })
                .collect();
            Finding::new(
                Category::PropertyTypeConflict,
                vec![entity.uri.clone()],
                format!(
                    "{} is declared both ObjectProperty and DatatypeProperty",
                    entity.uri
                ),
                entity.sources().to_vec(),
                Evidence::TypeClash { declarations },
            )
        })
        .collect()
}
