// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # onto-merge-check
//!
//! Pre-merge conflict detection for OWL/RDFS ontologies. Given several ontology
//! sources that are about to be merged, it reports where a naive union would
//! break or silently blur the model, before anything is merged.
//!
//! ## Architecture
//!
//! - **Loading** (`graph::loader`): parallel per-file parsing through `oxigraph`,
//!   with per-file failures downgraded to warnings
//! - **Indexing** (`graph::index`): per-source entity records plus a merged,
//!   corpus-wide view and a normalized class-label lookup
//! - **Detection** (`detect`): independent passes tagged CRITICAL, SEMANTIC or
//!   INFORMATIONAL, run concurrently with `rayon`
//! - **Reporting** (`report`): pass-ordered findings, per-category counts and the
//!   safe-to-merge verdict, as text or JSON
//!
//! ## Library usage
//!
//! ```no_run
//! use onto_merge_check::{DetectorConfig, analyze};
//!
//! let analysis = analyze(&["core.ttl", "rail.owl"], &DetectorConfig::default()).unwrap();
//! for warning in &analysis.outcome.warnings {
//!     eprintln!("{warning}");
//! }
//! println!("{}", analysis.report.render());
//! assert!(analysis.report.safe_to_merge());
//! ```

pub mod config;
pub mod detect;
pub mod error;
pub mod graph;
pub mod paths;
pub mod report;
pub mod vocab;

use std::path::Path;

pub use config::DetectorConfig;
pub use detect::{Category, Evidence, Finding, Severity};
pub use error::{OntoError, OntoResult};
pub use graph::SourceGraph;
pub use graph::index::CombinedIndex;
pub use graph::loader::{LoadOutcome, LoadWarning};
pub use report::Report;

/// Run every pass over already-loaded sources with the default configuration.
pub fn detect(sources: &[SourceGraph]) -> Report {
    detect_with(sources, &DetectorConfig::default())
}

/// Run every enabled pass over already-loaded sources.
pub fn detect_with(sources: &[SourceGraph], config: &DetectorConfig) -> Report {
    let index = CombinedIndex::build(sources);
    let findings = detect::run_all(&index, config);
    let report = Report::new(index.source_ids().to_vec(), findings, config);
    tracing::info!(
        critical = report.summary.critical,
        semantic = report.summary.semantic,
        informational = report.summary.informational,
        safe_to_merge = report.safe_to_merge(),
        "analysis complete"
    );
    report
}

/// Everything one run produced: what loaded, what was skipped, and the report.
#[derive(Debug)]
pub struct Analysis {
    pub outcome: LoadOutcome,
    pub report: Report,
}

/// Load `paths` and analyze whatever loaded.
///
/// # Errors
///
/// [`OntoError::NoValidInput`] if none of the paths could be loaded.
pub fn analyze<P: AsRef<Path> + Sync>(paths: &[P], config: &DetectorConfig) -> OntoResult<Analysis> {
    let outcome = graph::loader::load(paths)?;
    let report = detect_with(&outcome.sources, config);
    Ok(Analysis { outcome, report })
}
