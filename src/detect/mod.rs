//! Conflict detection passes over a [`CombinedIndex`].
//!
//! Each pass is a pure function from the index to a list of [`Finding`]s:
//!
//! - **CRITICAL**: URI collisions ([`collision`]), property type clashes ([`property_type`])
//! - **SEMANTIC**: shared class labels ([`duplicates`]), inverse property candidates
//!   ([`inverse`]), equivalent class candidates and cross-namespace local names
//!   ([`equivalence`])
//! - **INFORMATIONAL**: unlabeled classes and properties without domain or range
//!   ([`underspec`])
//!
//! Findings are *reported*, never acted on. [`run_all`] executes the passes
//! concurrently on the rayon pool and returns their findings in fixed pass order.

pub mod collision;
pub mod duplicates;
pub mod equivalence;
pub mod inverse;
pub mod property_type;
pub mod underspec;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::DetectorConfig;
use crate::graph::index::{CombinedIndex, EntityKind, MergedEntity};

// ---------------------------------------------------------------------------
// Severity and category
// ---------------------------------------------------------------------------

/// Priority tier of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Breaks a naive merge. Any of these makes the corpus unsafe to merge.
    Critical,
    /// Likely modelling overlap that deserves a human decision.
    Semantic,
    /// Advisory only.
    Informational,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Semantic, Severity::Informational];

    pub fn name(self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::Semantic => "SEMANTIC",
            Severity::Informational => "INFORMATIONAL",
        }
    }

    /// 1-based priority as printed in reports.
    pub fn priority(self) -> u8 {
        self as u8 + 1
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which pass produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    UriCollision,
    PropertyTypeConflict,
    SemanticDuplicate,
    InverseProperty,
    EquivalentClass,
    NamespaceAgnosticGroup,
    UnlabeledClass,
    UnderspecifiedProperty,
}

impl Category {
    /// Pass order. Reports list categories in this order.
    pub const ORDER: [Category; 8] = [
        Category::UriCollision,
        Category::PropertyTypeConflict,
        Category::SemanticDuplicate,
        Category::InverseProperty,
        Category::EquivalentClass,
        Category::NamespaceAgnosticGroup,
        Category::UnlabeledClass,
        Category::UnderspecifiedProperty,
    ];

    pub fn severity(self) -> Severity {
        match self {
            Category::UriCollision | Category::PropertyTypeConflict => Severity::Critical,
            Category::SemanticDuplicate
            | Category::InverseProperty
            | Category::EquivalentClass
            | Category::NamespaceAgnosticGroup => Severity::Semantic,
            Category::UnlabeledClass | Category::UnderspecifiedProperty => {
                Severity::Informational
            }
        }
    }

    /// Human-readable section title.
    pub fn title(self) -> &'static str {
        match self {
            Category::UriCollision => "URI collisions",
            Category::PropertyTypeConflict => "Property type conflicts",
            Category::SemanticDuplicate => "Semantic duplicates",
            Category::InverseProperty => "Inverse property candidates",
            Category::EquivalentClass => "Equivalent class candidates",
            Category::NamespaceAgnosticGroup => "Namespace-agnostic URI groups",
            Category::UnlabeledClass => "Classes without labels",
            Category::UnderspecifiedProperty => "Properties without domain/range",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// A definition dimension compared by the collision pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Type,
    Range,
    Domain,
    Label,
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Dimension::Type => "type",
            Dimension::Range => "range",
            Dimension::Domain => "domain",
            Dimension::Label => "label",
        })
    }
}

/// The values one source gives for a conflicting dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceValues {
    pub source: String,
    pub values: Vec<String>,
}

/// One conflicting dimension of a URI collision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionConflict {
    pub dimension: Dimension,
    /// Distinct values across all sources.
    pub values: Vec<String>,
    /// Per-source breakdown; sources with no value for the dimension are omitted.
    pub per_source: Vec<SourceValues>,
}

/// A URI taking part in a group finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub uri: String,
    pub labels: Vec<String>,
    pub sources: Vec<String>,
}

impl Member {
    /// Member carrying the sources that declare `entity` as `kind`.
    pub fn of_kind(entity: &MergedEntity, kind: EntityKind) -> Self {
        Self {
            uri: entity.uri.clone(),
            labels: entity.attributes.labels.clone(),
            sources: entity.sources_for(kind).to_vec(),
        }
    }

    /// Member carrying every declaring source.
    pub fn of(entity: &MergedEntity) -> Self {
        Self {
            uri: entity.uri.clone(),
            labels: entity.attributes.labels.clone(),
            sources: entity.sources().to_vec(),
        }
    }
}

/// Which inverse-property heuristic matched a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InverseRule {
    /// Pattern words found as substrings of the URI local names.
    LocalName,
    /// Explicit labels equal the pattern words exactly.
    Label,
}

/// Structured payload of a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evidence {
    /// Conflicting per-source definitions of one URI.
    Collision { conflicts: Vec<DimensionConflict> },
    /// `(kind, source)` declarations of a property typed both object and datatype.
    TypeClash { declarations: Vec<(EntityKind, String)> },
    /// Distinct class URIs sharing a normalized label.
    SharedLabel { label: String, members: Vec<Member> },
    /// Distinct class URIs sharing a label-or-local-name key.
    SimilarName { key: String, members: Vec<Member> },
    /// Entities sharing a local name across different namespaces.
    LocalNameGroup {
        local_name: String,
        namespaces: Vec<String>,
        members: Vec<Member>,
    },
    /// Two object properties that look like inverses of each other.
    InversePair {
        rule: InverseRule,
        pattern: (String, String),
        first: Member,
        first_name: String,
        second: Member,
        second_name: String,
    },
    /// Class with no label anywhere in the corpus.
    Unlabeled,
    /// Property with neither domain nor range anywhere in the corpus.
    Underspecified { kinds: Vec<EntityKind> },
}

// ---------------------------------------------------------------------------
// Finding
// ---------------------------------------------------------------------------

/// One reported conflict or observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: Category,
    /// Implicated URIs, sorted.
    pub uris: Vec<String>,
    /// One-line explanation.
    pub message: String,
    /// Contributing sources, in load order.
    pub sources: Vec<String>,
    pub evidence: Evidence,
}

impl Finding {
    pub fn new(
        category: Category,
        uris: Vec<String>,
        message: impl Into<String>,
        sources: Vec<String>,
        evidence: Evidence,
    ) -> Self {
        Self {
            severity: category.severity(),
            category,
            uris,
            message: message.into(),
            sources,
            evidence,
        }
    }
}

/// Union of member sources, in load order.
pub(crate) fn member_sources(index: &CombinedIndex, members: &[Member]) -> Vec<String> {
    index
        .source_ids()
        .iter()
        .filter(|id| members.iter().any(|m| m.sources.contains(*id)))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

type Pass<'a> = Box<dyn Fn() -> Vec<Finding> + Send + Sync + 'a>;

/// Run every enabled pass concurrently; findings come back in [`Category::ORDER`].
pub fn run_all(index: &CombinedIndex, config: &DetectorConfig) -> Vec<Finding> {
    let patterns = inverse::InversePatterns::with_extra(&config.extra_inverse_patterns);

    let mut passes: Vec<(Category, Pass<'_>)> = Vec::with_capacity(Category::ORDER.len());
    passes.push((
        Category::UriCollision,
        Box::new(|| collision::detect(index, config.domain_conflicts)),
    ));
    passes.push((
        Category::PropertyTypeConflict,
        Box::new(|| property_type::detect(index)),
    ));
    passes.push((
        Category::SemanticDuplicate,
        Box::new(|| duplicates::detect(index)),
    ));
    passes.push((
        Category::InverseProperty,
        Box::new(|| inverse::detect(index, &patterns)),
    ));
    passes.push((
        Category::EquivalentClass,
        Box::new(|| equivalence::detect(index)),
    ));
    if config.namespace_agnostic {
        passes.push((
            Category::NamespaceAgnosticGroup,
            Box::new(|| equivalence::detect_namespace_groups(index)),
        ));
    }
    passes.push((
        Category::UnlabeledClass,
        Box::new(|| underspec::unlabeled_classes(index)),
    ));
    passes.push((
        Category::UnderspecifiedProperty,
        Box::new(|| underspec::underspecified_properties(index)),
    ));

    let batches: Vec<(Category, Vec<Finding>)> = passes
        .par_iter()
        .map(|(category, pass)| (*category, pass()))
        .collect();

    let mut findings = Vec::new();
    for (category, batch) in batches {
        tracing::info!(pass = %category, findings = batch.len(), "detection pass");
        findings.extend(batch);
    }
    findings
}

#[cfg(test)]
pub(crate) mod testing {
    //! Small builders shared by the pass tests.

    use crate::graph::{SourceGraph, Triple};
    use crate::vocab::*;

    pub const EX: &str = "http://ex.org/onto#";

    pub fn uri(local: &str) -> String {
        format!("{EX}{local}")
    }

    pub fn class(local: &str) -> Triple {
        Triple::iri(uri(local), RDF_TYPE, OWL_CLASS)
    }

    pub fn object_property(local: &str) -> Triple {
        Triple::iri(uri(local), RDF_TYPE, OWL_OBJECT_PROPERTY)
    }

    pub fn datatype_property(local: &str) -> Triple {
        Triple::iri(uri(local), RDF_TYPE, OWL_DATATYPE_PROPERTY)
    }

    pub fn functional_property(local: &str) -> Triple {
        Triple::iri(uri(local), RDF_TYPE, OWL_FUNCTIONAL_PROPERTY)
    }

    pub fn label(local: &str, value: &str) -> Triple {
        Triple::literal(uri(local), RDFS_LABEL, value)
    }

    pub fn range(local: &str, target: &str) -> Triple {
        Triple::iri(uri(local), RDFS_RANGE, target)
    }

    pub fn domain(local: &str, target: &str) -> Triple {
        Triple::iri(uri(local), RDFS_DOMAIN, target)
    }

    pub fn source(id: &str, triples: Vec<Triple>) -> SourceGraph {
        SourceGraph::new(id, triples)
    }
}
