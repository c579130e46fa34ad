//! Inverse property candidates.
//!
//! A fixed table of word pairs that conventionally name opposite directions of a
//! relation (`hasParent`/`hasChild`, `source`/`target`, ...) is checked against
//! every unordered pair of object properties by two independent rules:
//!
//! - [`InversePatterns::match_local_names`]: one word is a case-insensitive
//!   substring of one local name and the other word of the other local name.
//! - [`InversePatterns::match_labels`]: an explicit label of each property equals
//!   one of the words exactly, after normalization.
//!
//! The local-name rule is tried first. Each pair is reported once.

use std::collections::BTreeMap;

use crate::graph::index::{CombinedIndex, EntityKind, MergedEntity};
use crate::vocab;

use super::{Category, Evidence, Finding, InverseRule, Member, member_sources};

/// Built-in inverse word pairs.
pub const INVERSE_PATTERNS: [(&str, &str); 14] = [
    ("hasParent", "hasChild"),
    ("parentOf", "childOf"),
    ("contains", "containedIn"),
    ("includes", "includedIn"),
    ("owns", "ownedBy"),
    ("manages", "managedBy"),
    ("controls", "controlledBy"),
    ("above", "below"),
    ("before", "after"),
    ("precedes", "follows"),
    ("greater", "less"),
    ("input", "output"),
    ("source", "target"),
    ("from", "to"),
];

/// One word pair, kept as written and lowercased for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Pattern {
    words: (String, String),
    lower: (String, String),
}

impl Pattern {
    fn new(a: &str, b: &str) -> Self {
        Self {
            words: (a.to_string(), b.to_string()),
            lower: (a.to_lowercase(), b.to_lowercase()),
        }
    }
}

/// A label-rule hit: the table pattern and the label of each side that matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMatch<'p, 'l> {
    pub pattern: (&'p str, &'p str),
    pub labels: (&'l str, &'l str),
}

/// The word-pair table both matchers consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InversePatterns {
    patterns: Vec<Pattern>,
}

impl Default for InversePatterns {
    fn default() -> Self {
        Self::standard()
    }
}

impl InversePatterns {
    /// The built-in table.
    pub fn standard() -> Self {
        Self {
            patterns: INVERSE_PATTERNS
                .iter()
                .map(|(a, b)| Pattern::new(a, b))
                .collect(),
        }
    }

    /// The built-in table followed by `extra`. Pairs with an empty word are skipped
    /// since an empty substring would match every name.
    pub fn with_extra(extra: &[[String; 2]]) -> Self {
        let mut table = Self::standard();
        for [a, b] in extra {
            let (a, b) = (a.trim(), b.trim());
            if a.is_empty() || b.is_empty() {
                tracing::warn!(first = a, second = b, "ignoring inverse pattern with an empty word");
                continue;
            }
            let pattern = Pattern::new(a, b);
            if !table.patterns.iter().any(|p| p.lower == pattern.lower) {
                table.patterns.push(pattern);
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Word pairs in table order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.patterns
            .iter()
            .map(|p| (p.words.0.as_str(), p.words.1.as_str()))
    }

    /// First pattern whose words occur in the two local names, in either
    /// assignment.
    pub fn match_local_names(&self, first: &str, second: &str) -> Option<(&str, &str)> {
        let first = first.to_lowercase();
        let second = second.to_lowercase();
        self.patterns
            .iter()
            .find(|p| {
                let (a, b) = (&p.lower.0, &p.lower.1);
                (first.contains(a.as_str()) && second.contains(b.as_str()))
                    || (first.contains(b.as_str()) && second.contains(a.as_str()))
            })
            .map(|p| (p.words.0.as_str(), p.words.1.as_str()))
    }

    /// First pattern matched exactly by some label of each side, with the two
    /// labels that matched as written.
    pub fn match_labels<'l>(
        &self,
        first: &'l [String],
        second: &'l [String],
    ) -> Option<LabelMatch<'_, 'l>> {
        for l1 in first {
            let n1 = vocab::normalize_label(l1);
            for l2 in second {
                let n2 = vocab::normalize_label(l2);
                let hit = self.patterns.iter().find(|p| {
                    (n1 == p.lower.0 && n2 == p.lower.1) || (n1 == p.lower.1 && n2 == p.lower.0)
                });
                if let Some(p) = hit {
                    return Some(LabelMatch {
                        pattern: (p.words.0.as_str(), p.words.1.as_str()),
                        labels: (l1.as_str(), l2.as_str()),
                    });
                }
            }
        }
        None
    }

    /// Rule, pattern and the names to show for each side.
    fn classify<'e>(
        &self,
        a: &'e MergedEntity,
        b: &'e MergedEntity,
    ) -> Option<(InverseRule, (&str, &str), (&'e str, &'e str))> {
        if let Some(pattern) = self.match_local_names(a.local_name(), b.local_name()) {
            return Some((
                InverseRule::LocalName,
                pattern,
                (a.display_name(), b.display_name()),
            ));
        }
        self.match_labels(&a.attributes.labels, &b.attributes.labels)
            .map(|hit| (InverseRule::Label, hit.pattern, hit.labels))
    }
}

pub fn detect(index: &CombinedIndex, patterns: &InversePatterns) -> Vec<Finding> {
    let properties: Vec<&MergedEntity> = index.entities_of(EntityKind::ObjectProperty).collect();

    // Entities come sorted by URI, so `i < j` visits each unordered pair once and
    // the key is already the sorted pair.
    let mut pairs: BTreeMap<(&str, &str), Finding> = BTreeMap::new();
    for (i, a) in properties.iter().enumerate() {
        for b in &properties[i + 1..] {
            let Some((rule, (word_a, word_b), (name_a, name_b))) = patterns.classify(a, b) else {
                continue;
            };
            let key = (a.uri.as_str(), b.uri.as_str());
            let first = Member::of_kind(a, EntityKind::ObjectProperty);
            let second = Member::of_kind(b, EntityKind::ObjectProperty);
            let sources = member_sources(index, &[first.clone(), second.clone()]);
            let finding = Finding::new(
                Category::InverseProperty,
                vec![a.uri.clone(), b.uri.clone()],
                format!("{name_a} and {name_b} may be inverses ({word_a}/{word_b})"),
                sources,
                Evidence::InversePair {
                    rule,
                    pattern: (word_a.to_string(), word_b.to_string()),
                    first,
                    first_name: name_a.to_string(),
                    second,
                    second_name: name_b.to_string(),
                },
            );
            pairs.insert(key, finding);
        }
    }
    pairs.into_values().collect()
}
