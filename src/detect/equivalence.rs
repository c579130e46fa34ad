//! Equivalent class candidates and namespace-agnostic local-name groups.
//!
//! [`detect`] keys every class by its first label, falling back to the URI's local
//! name, and reports keys shared by more than one URI. Unlike the duplicate pass
//! this also catches unlabeled classes.
//!
//! [`detect_namespace_groups`] ignores labels altogether: entities of any kind are
//! grouped by local name and a group is reported when its members live in at
//! least two namespaces.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::index::{CombinedIndex, EntityKind, MergedEntity};
use crate::vocab;

use super::{Category, Evidence, Finding, Member, member_sources};

/// Grouping key: normalized first label, or lowercased local name.
///
/// Labels are trimmed as well as lowercased, the same normalization the collision
/// and duplicate passes apply, so `" Wagon"` and `"wagon"` share a key here too.
pub fn class_key(entity: &MergedEntity) -> String {
    match entity.attributes.labels.first() {
        Some(label) => vocab::normalize_label(label),
        None => entity.local_name().to_lowercase(),
    }
}

pub fn detect(index: &CombinedIndex) -> Vec<Finding> {
    let mut groups: BTreeMap<String, Vec<&MergedEntity>> = BTreeMap::new();
    for entity in index.entities_of(EntityKind::Class) {
        groups.entry(class_key(entity)).or_default().push(entity);
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(key, entities)| {
            let members: Vec<Member> = entities
                .iter()
                .map(|e| Member::of_kind(e, EntityKind::Class))
                .collect();
            Finding::new(
                Category::EquivalentClass,
                entities.iter().map(|e| e.uri.clone()).collect(),
                format!("{} classes look alike under '{key}'", entities.len()),
                member_sources(index, &members),
                Evidence::SimilarName { key, members },
            )
        })
        .collect()
}

pub fn detect_namespace_groups(index: &CombinedIndex) -> Vec<Finding> {
    let mut groups: BTreeMap<String, Vec<&MergedEntity>> = BTreeMap::new();
    for entity in index.entities() {
        let local = entity.local_name();
        if !local.is_empty() {
            groups.entry(local.to_lowercase()).or_default().push(entity);
        }
    }

    groups
        .into_iter()
        .filter_map(|(local_name, entities)| {
            let namespaces: BTreeSet<&str> =
                entities.iter().map(|e| vocab::namespace(&e.uri)).collect();
            if namespaces.len() < 2 {
                return None;
            }
            let members: Vec<Member> = entities.iter().map(|e| Member::of(e)).collect();
            Some(Finding::new(
                Category::NamespaceAgnosticGroup,
                entities.iter().map(|e| e.uri.clone()).collect(),
                format!(
                    "local name '{local_name}' is defined in {} namespaces",
                    namespaces.len()
                ),
                member_sources(index, &members),
                Evidence::LocalNameGroup {
                    namespaces: namespaces.into_iter().map(str::to_string).collect(),
                    local_name,
                    members,
                },
            ))
        })
        .collect()
}
