//! Report aggregation: ordered findings, per-category counts, the merge verdict,
//! and the plain-text and JSON renderings.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::config::DetectorConfig;
use crate::detect::{Category, Evidence, Finding, Member, Severity};
use crate::error::ReportError;

const RULE_WIDTH: usize = 80;
const SECTION_WIDTH: usize = 50;

pub const SAFE_VERDICT: &str = "No critical conflicts found. Safe to proceed with merging.";
pub const AGNOSTIC_BANNER: &str = "RUNNING IN NAMESPACE-AGNOSTIC MODE";

/// Number of findings in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub severity: Severity,
    pub count: usize,
}

/// Tier totals and the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub critical: usize,
    pub semantic: usize,
    pub informational: usize,
    /// True iff there are no CRITICAL findings.
    pub safe_to_merge: bool,
}

impl Summary {
    pub fn total(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Semantic => self.semantic,
            Severity::Informational => self.informational,
        }
    }
}

/// The aggregated outcome of one detection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Source identifiers that took part, in load order.
    pub sources: Vec<String>,
    pub namespace_agnostic: bool,
    /// Items rendered per section; `0` is unlimited. Does not affect counts.
    pub list_limit: usize,
    /// All findings, in pass order.
    pub findings: Vec<Finding>,
    /// One entry per category in pass order, zero counts included.
    pub counts: Vec<CategoryCount>,
    pub summary: Summary,
}

impl Report {
    pub fn new(sources: Vec<String>, mut findings: Vec<Finding>, config: &DetectorConfig) -> Self {
        findings.sort_by_key(|f| category_rank(f.category));

        let counts: Vec<CategoryCount> = Category::ORDER
            .iter()
            .map(|&category| CategoryCount {
                category,
                severity: category.severity(),
                count: findings.iter().filter(|f| f.category == category).count(),
            })
            .collect();

        let tier = |severity: Severity| {
            counts
                .iter()
                .filter(|c| c.severity == severity)
                .map(|c| c.count)
                .sum::<usize>()
        };
        let critical = tier(Severity::Critical);
        let summary = Summary {
            critical,
            semantic: tier(Severity::Semantic),
            informational: tier(Severity::Informational),
            safe_to_merge: critical == 0,
        };

        Self {
            sources,
            namespace_agnostic: config.namespace_agnostic,
            list_limit: config.list_limit,
            findings,
            counts,
            summary,
        }
    }

    /// Findings in one category.
    pub fn count(&self, category: Category) -> usize {
        self.counts
            .iter()
            .find(|c| c.category == category)
            .map_or(0, |c| c.count)
    }

    pub fn findings_in(&self, category: Category) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }

    pub fn safe_to_merge(&self) -> bool {
        self.summary.safe_to_merge
    }

    /// Closing verdict line.
    pub fn verdict(&self) -> String {
        if self.safe_to_merge() {
            SAFE_VERDICT.to_string()
        } else {
            format!(
                "{} CRITICAL conflicts found! These MUST be resolved before merging.",
                self.summary.critical
            )
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::Serialize {
            message: e.to_string(),
        })
    }

    /// Plain-text report, the same text the CLI prints and logs.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        if self.namespace_agnostic {
            writeln!(out, "{AGNOSTIC_BANNER}")?;
            writeln!(
                out,
                "Entities are also grouped by local name regardless of namespace."
            )?;
            writeln!(out)?;
        }
        writeln!(out, "COMPREHENSIVE ONTOLOGY CONFLICT ANALYSIS")?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "Analyzing: {}", self.sources.join(", "))?;

        for severity in Severity::ALL {
            writeln!(out)?;
            let title = format!(" PRIORITY {} / {} ", severity.priority(), severity.name());
            writeln!(out, "{title:=^width$}", width = RULE_WIDTH)?;
            for category in Category::ORDER {
                if category.severity() != severity {
                    continue;
                }
                if category == Category::NamespaceAgnosticGroup && !self.namespace_agnostic {
                    continue;
                }
                self.write_section(out, category)?;
            }
        }

        writeln!(out)?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "CONFLICT SUMMARY")?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "Sources analyzed: {}", self.sources.len())?;
        for severity in Severity::ALL {
            writeln!(out, "{}: {}", severity.name(), self.summary.total(severity))?;
            for count in self.counts.iter().filter(|c| c.severity == severity) {
                if count.category == Category::NamespaceAgnosticGroup && !self.namespace_agnostic {
                    continue;
                }
                writeln!(out, "  {}: {}", count.category.title(), count.count)?;
            }
        }
        writeln!(out)?;
        writeln!(out, "{}", self.verdict())
    }

    fn write_section(&self, out: &mut String, category: Category) -> std::fmt::Result {
        let count = self.count(category);
        writeln!(out)?;
        writeln!(out, "{} ({count})", category.title())?;
        writeln!(out, "{}", "-".repeat(SECTION_WIDTH))?;
        if count == 0 {
            return writeln!(out, "  none");
        }

        let shown = if self.list_limit == 0 {
            count
        } else {
            self.list_limit.min(count)
        };
        for finding in self.findings_in(category).take(shown) {
            write_finding(out, finding)?;
        }
        if shown < count {
            writeln!(out, "  ... and {} more", count - shown)?;
        }
        Ok(())
    }
}

fn category_rank(category: Category) -> usize {
    Category::ORDER
        .iter()
        .position(|&c| c == category)
        .unwrap_or(Category::ORDER.len())
}

fn write_finding(out: &mut String, finding: &Finding) -> std::fmt::Result {
    match &finding.evidence {
        Evidence::Collision { conflicts } => {
            writeln!(out, "  {}", finding.uris.join(", "))?;
            writeln!(out, "    Sources: {}", finding.sources.join(", "))?;
            for conflict in conflicts {
                writeln!(
                    out,
                    "    {} conflict: {}",
                    conflict.dimension,
                    conflict.values.join(" | ")
                )?;
                for entry in &conflict.per_source {
                    writeln!(out, "      {}: {}", entry.source, entry.values.join(", "))?;
                }
            }
        }
        Evidence::TypeClash { declarations } => {
            writeln!(out, "  {}", finding.uris.join(", "))?;
            for (kind, source) in declarations {
                writeln!(out, "    {kind} in {source}")?;
            }
        }
        Evidence::SharedLabel { label, members } => {
            writeln!(out, "  Label '{label}':")?;
            write_members(out, members)?;
        }
        Evidence::SimilarName { key, members } => {
            writeln!(out, "  Similar name '{key}':")?;
            write_members(out, members)?;
        }
        Evidence::LocalNameGroup {
            local_name,
            namespaces,
            members,
        } => {
            writeln!(out, "  NAMESPACE-AGNOSTIC URI GROUP")?;
            writeln!(
                out,
                "  Local name '{local_name}' appears in {} namespaces: {}",
                namespaces.len(),
                namespaces.join(", ")
            )?;
            write_members(out, members)?;
        }
        Evidence::InversePair {
            rule,
            pattern,
            first,
            first_name,
            second,
            second_name,
        } => {
            writeln!(out, "  {} ({first_name})", first.uri)?;
            writeln!(out, "    Sources: {}", first.sources.join(", "))?;
            writeln!(out, "  <-> {} ({second_name})", second.uri)?;
            writeln!(out, "    Sources: {}", second.sources.join(", "))?;
            let rule = match rule {
                crate::detect::InverseRule::LocalName => "local name",
                crate::detect::InverseRule::Label => "label",
            };
            writeln!(out, "    Matched {rule} pattern {}/{}", pattern.0, pattern.1)?;
        }
        Evidence::Unlabeled => {
            writeln!(
                out,
                "  {}  [{}]",
                finding.uris.join(", "),
                finding.sources.join(", ")
            )?;
        }
        Evidence::Underspecified { kinds } => {
            let kinds: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
            writeln!(
                out,
                "  {} ({})  [{}]",
                finding.uris.join(", "),
                kinds.join(", "),
                finding.sources.join(", ")
            )?;
        }
    }
    Ok(())
}

fn write_members(out: &mut String, members: &[Member]) -> std::fmt::Result {
    for member in members {
        if member.labels.is_empty() {
            writeln!(out, "    {}", member.uri)?;
        } else {
            let labels: Vec<String> = member.labels.iter().map(|l| format!("\"{l}\"")).collect();
            writeln!(out, "    {} [{}]", member.uri, labels.join(", "))?;
        }
        writeln!(out, "      Sources: {}", member.sources.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::testing::*;
    use crate::detect::{self, InverseRule};
    use crate::graph::index::CombinedIndex;

    fn report_for(config: &DetectorConfig, sources: Vec<crate::graph::SourceGraph>) -> Report {
        let index = CombinedIndex::build(&sources);
        let findings = detect::run_all(&index, config);
        Report::new(index.source_ids().to_vec(), findings, config)
    }

    fn unlabeled(local: &str) -> Finding {
        Finding::new(
            Category::UnlabeledClass,
            vec![uri(local)],
            "no label",
            vec!["a.ttl".into()],
            Evidence::Unlabeled,
        )
    }

    #[test]
    fn safe_when_only_semantic_and_informational() {
        let config = DetectorConfig::default();
        let report = report_for(
            &config,
            vec![source(
                "a.ttl",
                vec![class("A"), label("A", "Thing"), class("B"), label("B", "thing"), class("C")],
            )],
        );
        assert!(report.safe_to_merge());
        assert_eq!(report.summary.critical, 0);
        assert_eq!(report.count(Category::SemanticDuplicate), 1);
        assert_eq!(report.count(Category::UnlabeledClass), 1);
        assert!(report.render().contains(SAFE_VERDICT));
    }

    #[test]
    fn critical_findings_flip_the_verdict() {
        let config = DetectorConfig::default();
        let report = report_for(
            &config,
            vec![
                source("a.ttl", vec![object_property("hasEngine")]),
                source("b.ttl", vec![datatype_property("hasEngine")]),
            ],
        );
        assert!(!report.safe_to_merge());
        assert_eq!(report.count(Category::UriCollision), 1);
        assert_eq!(report.count(Category::PropertyTypeConflict), 1);
        assert_eq!(report.summary.critical, 2);
        assert_eq!(
            report.verdict(),
            "2 CRITICAL conflicts found! These MUST be resolved before merging."
        );
    }

    #[test]
    fn findings_are_sorted_into_pass_order() {
        let clash = Finding::new(
            Category::PropertyTypeConflict,
            vec![uri("x")],
            "clash",
            vec!["a.ttl".into()],
            Evidence::TypeClash {
                declarations: Vec::new(),
            },
        );
        let report = Report::new(
            vec!["a.ttl".into()],
            vec![unlabeled("C"), clash],
            &DetectorConfig::default(),
        );
        assert_eq!(report.findings[0].category, Category::PropertyTypeConflict);
        assert_eq!(report.counts.len(), Category::ORDER.len());
    }

    #[test]
    fn render_has_tiers_and_sections() {
        let report = Report::new(
            vec!["a.ttl".into()],
            vec![unlabeled("C")],
            &DetectorConfig::default(),
        );
        let text = report.render();
        assert!(text.contains("PRIORITY 1 / CRITICAL"));
        assert!(text.contains("PRIORITY 2 / SEMANTIC"));
        assert!(text.contains("PRIORITY 3 / INFORMATIONAL"));
        assert!(text.contains("Classes without labels (1)"));
        assert!(text.contains("URI collisions (0)"));
        assert!(!text.contains(AGNOSTIC_BANNER));
        assert!(!text.contains("Namespace-agnostic URI groups"));
    }

    #[test]
    fn list_limit_truncates_rendering_but_not_counts() {
        let config = DetectorConfig {
            list_limit: 2,
            ..DetectorConfig::default()
        };
        let findings = vec![unlabeled("A"), unlabeled("B"), unlabeled("C")];
        let report = Report::new(vec!["a.ttl".into()], findings, &config);
        let text = report.render();
        assert_eq!(report.count(Category::UnlabeledClass), 3);
        assert!(text.contains("... and 1 more"));
        assert!(!text.contains(&uri("C")));
    }

    #[test]
    fn agnostic_mode_opens_with_banner() {
        let config = DetectorConfig {
            namespace_agnostic: true,
            ..DetectorConfig::default()
        };
        let report = report_for(
            &config,
            vec![
                source("a.ttl", vec![class("Track")]),
                source(
                    "b.ttl",
                    vec![crate::graph::Triple::iri(
                        "http://other.org/Track",
                        crate::vocab::RDF_TYPE,
                        crate::vocab::OWL_CLASS,
                    )],
                ),
            ],
        );
        let text = report.render();
        assert!(text.starts_with(AGNOSTIC_BANNER));
        assert!(text.contains("NAMESPACE-AGNOSTIC URI GROUP"));
        assert!(text.contains("Local name 'track'"));
        assert_eq!(report.count(Category::NamespaceAgnosticGroup), 1);
    }

    #[test]
    fn inverse_pairs_render_both_sides() {
        let report = report_for(
            &DetectorConfig::default(),
            vec![source(
                "a.ttl",
                vec![object_property("inputSignal"), object_property("outputSignal")],
            )],
        );
        let finding = report.findings_in(Category::InverseProperty).next().unwrap();
        assert!(matches!(
            finding.evidence,
            Evidence::InversePair {
                rule: InverseRule::LocalName,
                ..
            }
        ));
        let text = report.render();
        assert!(text.contains("(inputSignal)"));
        assert!(text.contains("<-> http://ex.org/onto#outputSignal (outputSignal)"));
    }

    #[test]
    fn json_carries_summary() {
        let report = Report::new(vec!["a.ttl".into()], vec![unlabeled("C")], &DetectorConfig::default());
        let json = report.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["safe_to_merge"], true);
        assert_eq!(value["summary"]["informational"], 1);
        assert_eq!(value["findings"][0]["category"], "UnlabeledClass");
    }
}
