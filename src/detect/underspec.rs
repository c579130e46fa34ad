//! Advisory checks: classes nobody labeled and properties nobody constrained.

use crate::graph::index::{CombinedIndex, EntityKind};

use super::{Category, Evidence, Finding};

const CONSTRAINED_KINDS: [EntityKind; 2] =
    [EntityKind::ObjectProperty, EntityKind::DatatypeProperty];

/// Classes without an `rdfs:label` in any source.
pub fn unlabeled_classes(index: &CombinedIndex) -> Vec<Finding> {
    index
        .entities_of(EntityKind::Class)
        .filter(|e| e.attributes.labels.is_empty())
        .map(|entity| {
            Finding::new(
                Category::UnlabeledClass,
                vec![entity.uri.clone()],
                format!("class {} has no label", entity.uri),
                entity.sources_for(EntityKind::Class).to_vec(),
                Evidence::Unlabeled,
            )
        })
        .collect()
}

/// Object and datatype properties with neither `rdfs:domain` nor `rdfs:range`.
pub fn underspecified_properties(index: &CombinedIndex) -> Vec<Finding> {
    index
        .entities()
        .filter(|e| CONSTRAINED_KINDS.iter().any(|&k| e.has_kind(k)))
        .filter(|e| e.attributes.domains.is_empty() && e.attributes.ranges.is_empty())
        .map(|entity| {
            let kinds: Vec<EntityKind> = CONSTRAINED_KINDS
                .into_iter()
                .filter(|&k| entity.has_kind(k))
                .collect();
            let sources: Vec<String> = index
                .source_ids()
                .iter()
                .filter(|id| kinds.iter().any(|&k| entity.sources_for(k).contains(*id)))
                .cloned()
                .collect();
            Finding::new(
                Category::UnderspecifiedProperty,
                vec![entity.uri.clone()],
                format!("property {} has neither domain nor range", entity.uri),
                sources,
                Evidence::Underspecified { kinds },
            )
        })
        .collect()
}
