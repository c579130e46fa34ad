//! URI collision detection: the same URI defined differently by two or more sources.
//!
//! Four dimensions are compared per URI:
//!
//! - **type**: the union of declared kinds over every record, including a URI
//!   declared by a single source. `{FunctionalProperty, ObjectProperty}`
//!   and `{FunctionalProperty, DatatypeProperty}` are valid OWL combinations and
//!   never conflict; any other union with more than one kind does.
//! - **range**: more than one distinct `rdfs:range` value.
//! - **domain**: more than one distinct `rdfs:domain` value (optional).
//! - **label**: more than one distinct label after case and whitespace normalization.
//!
//! Range, domain and label only compare URIs with more than one per-source record.
//! One finding is emitted per URI, listing every dimension that conflicted.

use std::collections::BTreeSet;

use crate::graph::index::{CombinedIndex, EntityKind, EntityRecord};
use crate::vocab;

use super::{Category, Dimension, DimensionConflict, Evidence, Finding, SourceValues};

/// Whether a union of declared kinds is a conflict.
pub fn is_type_conflict(kinds: &BTreeSet<EntityKind>) -> bool {
    use EntityKind::*;
    if kinds.len() < 2 {
        return false;
    }
    let valid_combos = [
        BTreeSet::from([FunctionalProperty, ObjectProperty]),
        BTreeSet::from([FunctionalProperty, DatatypeProperty]),
    ];
    !valid_combos.contains(kinds)
}

/// Detect collisions across all indexed URIs.
pub fn detect(index: &CombinedIndex, check_domains: bool) -> Vec<Finding> {
    index
        .records()
        .iter()
        .filter_map(|(uri, records)| check_uri(uri, records, check_domains))
        .collect()
}

fn check_uri(uri: &str, records: &[EntityRecord], check_domains: bool) -> Option<Finding> {
    let mut conflicts = Vec::new();

    let kinds: BTreeSet<EntityKind> = records
        .iter()
        .flat_map(|r| r.attributes.kinds.iter().copied())
        .collect();
    if is_type_conflict(&kinds) {
        conflicts.push(DimensionConflict {
            dimension: Dimension::Type,
            values: kinds.iter().map(|k| k.to_string()).collect(),
            per_source: per_source(records, |r| {
                r.attributes.kinds.iter().map(|k| k.to_string()).collect()
            }),
        });
    }

    if records.len() > 1 {
        conflicts.extend(cross_source_conflicts(records, check_domains));
    }

    if conflicts.is_empty() {
        return None;
    }

    let dimensions: Vec<String> = conflicts.iter().map(|c| c.dimension.to_string()).collect();
    let mut sources: Vec<String> = Vec::new();
    for record in records {
        if !sources.contains(&record.source) {
            sources.push(record.source.clone());
        }
    }
    Some(Finding::new(
        Category::UriCollision,
        vec![uri.to_string()],
        match sources.as_slice() {
            [only] => format!(
                "{uri} is declared inconsistently in {only} ({})",
                dimensions.join(", ")
            ),
            _ => format!(
                "{uri} is defined differently across {} sources ({})",
                sources.len(),
                dimensions.join(", ")
            ),
        },
        sources,
        Evidence::Collision { conflicts },
    ))
}

fn cross_source_conflicts(records: &[EntityRecord], check_domains: bool) -> Vec<DimensionConflict> {
    let mut conflicts = Vec::new();
    if let Some(conflict) = value_conflict(Dimension::Range, records, |r| &r.attributes.ranges) {
        conflicts.push(conflict);
    }
    if check_domains {
        if let Some(conflict) = value_conflict(Dimension::Domain, records, |r| &r.attributes.domains)
        {
            conflicts.push(conflict);
        }
    }

    let normalized: BTreeSet<String> = records
        .iter()
        .flat_map(|r| r.attributes.labels.iter())
        .map(|l| vocab::normalize_label(l))
        .filter(|l| !l.is_empty())
        .collect();
    if normalized.len() > 1 {
        conflicts.push(DimensionConflict {
            dimension: Dimension::Label,
            values: distinct(records, |r| &r.attributes.labels),
            per_source: per_source(records, |r| r.attributes.labels.clone()),
        });
    }
    conflicts
}

fn value_conflict(
    dimension: Dimension,
    records: &[EntityRecord],
    values: impl Fn(&EntityRecord) -> &Vec<String>,
) -> Option<DimensionConflict> {
    let all = distinct(records, &values);
    (all.len() > 1).then(|| DimensionConflict {
        dimension,
        values: all,
        per_source: per_source(records, |r| values(r).clone()),
    })
}

fn distinct(records: &[EntityRecord], values: impl Fn(&EntityRecord) -> &Vec<String>) -> Vec<String> {
    let set: BTreeSet<&String> = records.iter().flat_map(|r| values(r).iter()).collect();
    set.into_iter().cloned().collect()
}

fn per_source(
    records: &[EntityRecord],
    values: impl Fn(&EntityRecord) -> Vec<String>,
) -> Vec<SourceValues> {
    records
        .iter()
        .map(|r| SourceValues {
            source: r.source.clone(),
            values: values(r),
        })
        .filter(|sv| !sv.values.is_empty())
        .collect()
}
