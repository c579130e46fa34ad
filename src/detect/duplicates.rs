//! Semantic duplicates: distinct class URIs sharing a normalized label.

use crate::graph::index::{CombinedIndex, EntityKind};

use super::{Category, Evidence, Finding, Member, member_sources};

pub fn detect(index: &CombinedIndex) -> Vec<Finding> {
    index
        .classes_by_label()
        .iter()
        .filter(|(_, uris)| uris.len() > 1)
        .map(|(label, uris)| {
            let members: Vec<Member> = uris
                .iter()
                .filter_map(|uri| index.entity(uri))
                .map(|entity| Member::of_kind(entity, EntityKind::Class))
                .collect();
            Finding::new(
                Category::SemanticDuplicate,
                uris.iter().cloned().collect(),
                format!("{} classes share the label '{label}'", uris.len()),
                member_sources(index, &members),
                Evidence::SharedLabel {
                    label: label.clone(),
                    members,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::testing::*;

    #[test]
    fn groups_distinct_uris_by_normalized_label() {
        let a = source("a.ttl", vec![class("Car"), label("Car", "Car")]);
        let b = source(
            "b.ttl",
            vec![class("Automobile"), label("Automobile", " car"), class("Bike"), label("Bike", "Bike")],
        );
        let index = CombinedIndex::build(&[a, b]);
        let findings = detect(&index);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].uris, vec![uri("Automobile"), uri("Car")]);
        assert_eq!(findings[0].sources, vec!["a.ttl", "b.ttl"]);
        let Evidence::SharedLabel { label, members } = &findings[0].evidence else {
            panic!("expected shared label evidence");
        };
        assert_eq!(label, "car");
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn same_uri_in_two_sources_is_not_a_duplicate() {
        let a = source("a.ttl", vec![class("Vehicle"), label("Vehicle", "Vehicle")]);
        let b = source("b.ttl", vec![class("Vehicle"), label("Vehicle", "vehicle ")]);
        let index = CombinedIndex::build(&[a, b]);
        assert!(detect(&index).is_empty());
    }

    #[test]
    fn non_class_labels_are_ignored() {
        let a = source(
            "a.ttl",
            vec![class("Car"), label("Car", "car"), object_property("car"), label("car", "car")],
        );
        let index = CombinedIndex::build(&[a]);
        assert!(detect(&index).is_empty());
    }
}
