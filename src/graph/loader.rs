//! Triple-store adapter: parses ontology files into [`SourceGraph`]s.
//!
//! Parsing is delegated to `oxigraph`'s streaming RDF parsers. Files are loaded
//! in parallel; a file that is missing or fails to parse is skipped with a
//! [`LoadWarning`] and never cancels the others. Only a run in which nothing
//! loads is an error.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::{NamedOrBlankNode, Term as OxTerm};
use rayon::prelude::*;

use crate::error::{LoadError, OntoError, OntoResult};

use super::{SourceGraph, Term, Triple};

/// Files above this size get a "may take a while" notice before parsing.
const LARGE_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// A source that was skipped during loading.
#[derive(Debug)]
pub struct LoadWarning {
    /// The path as given by the caller.
    pub path: PathBuf,
    /// Why it was skipped.
    pub error: LoadError,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "skipped {}: {}", self.path.display(), self.error)
    }
}

/// Result of loading a batch of files.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Successfully loaded sources, in input order.
    pub sources: Vec<SourceGraph>,
    /// One warning per skipped input, in input order.
    pub warnings: Vec<LoadWarning>,
}

/// Load every path, collecting successes and warnings.
///
/// # Errors
///
/// [`OntoError::NoValidInput`] if not a single source could be loaded.
pub fn load<P: AsRef<Path> + Sync>(paths: &[P]) -> OntoResult<LoadOutcome> {
    let ids = source_ids(paths);
    let results: Vec<(PathBuf, Result<SourceGraph, LoadError>)> = paths
        .par_iter()
        .zip(ids)
        .map(|(p, id)| {
            let path = p.as_ref();
            (path.to_path_buf(), load_source_as(path, id))
        })
        .collect();

    let mut outcome = LoadOutcome::default();
    for (path, result) in results {
        match result {
            Ok(source) => {
                tracing::info!(source = %source.id, triples = source.len(), "loaded ontology");
                outcome.sources.push(source);
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "skipping ontology source");
                outcome.warnings.push(LoadWarning { path, error });
            }
        }
    }

    if outcome.sources.is_empty() {
        return Err(OntoError::NoValidInput {
            attempted: paths.len(),
        });
    }
    Ok(outcome)
}

/// Load a single file, choosing the syntax from its extension. The source id is
/// the file name.
pub fn load_source(path: &Path) -> Result<SourceGraph, LoadError> {
    load_source_as(path, file_name_id(path))
}

fn load_source_as(path: &Path, id: String) -> Result<SourceGraph, LoadError> {
    let shown = path.display().to_string();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: shown.clone(),
            }
        } else {
            LoadError::Io {
                path: shown.clone(),
                source: e,
            }
        }
    })?;

    if let Ok(meta) = file.metadata() {
        if meta.len() > LARGE_FILE_BYTES {
            tracing::info!(
                path = %shown,
                size_mb = meta.len() / (1024 * 1024),
                "large file detected, this may take a while"
            );
        }
    }

    let base = file_base_iri(path);
    parse_reader(id, format_for(path), base.as_deref(), BufReader::new(file)).map_err(
        |message| LoadError::Parse {
            path: shown,
            message,
        },
    )
}

/// Parse triples from any reader. Quads in named graphs are flattened.
///
/// Relative IRIs resolve against `base_iri` when one is given. Blank-node labels
/// are prefixed with the source id so `_:b0` in two documents stays two nodes.
pub fn parse_reader(
    id: impl Into<String>,
    format: RdfFormat,
    base_iri: Option<&str>,
    reader: impl Read,
) -> Result<SourceGraph, String> {
    let id = id.into();
    let mut parser = RdfParser::from_format(format);
    if let Some(base) = base_iri {
        parser = parser.with_base_iri(base).map_err(|e| e.to_string())?;
    }

    let mut triples = Vec::new();
    for quad in parser.for_reader(reader) {
        let quad = quad.map_err(|e| e.to_string())?;
        let subject = match quad.subject {
            NamedOrBlankNode::NamedNode(n) => n.into_string(),
            NamedOrBlankNode::BlankNode(b) => format!("_:{}", scoped_blank(&id, b.as_str())),
        };
        let object = match quad.object {
            OxTerm::NamedNode(n) => Term::Iri(n.into_string()),
            OxTerm::BlankNode(b) => Term::Blank(scoped_blank(&id, b.as_str())),
            OxTerm::Literal(l) => Term::Literal(l.value().to_string()),
            #[allow(unreachable_patterns)]
            _ => continue,
        };
        triples.push(Triple {
            subject,
            predicate: quad.predicate.into_string(),
            object,
        });
    }
    Ok(SourceGraph::new(id, triples))
}

fn scoped_blank(source: &str, label: &str) -> String {
    format!("{source}:{label}")
}

/// `file://` URL of the canonical path, used as the document base.
fn file_base_iri(path: &Path) -> Option<String> {
    let canonical = path.canonicalize().ok()?;
    url::Url::from_file_path(canonical)
        .ok()
        .map(|u| u.to_string())
}

/// Syntax implied by the file extension. Unknown extensions are read as Turtle.
pub fn format_for(path: &Path) -> RdfFormat {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("nt") => RdfFormat::NTriples,
        Some("n3") => RdfFormat::N3,
        Some("rdf" | "owl" | "xml") => RdfFormat::RdfXml,
        _ => RdfFormat::Turtle,
    }
}

fn file_name_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One id per input: the file name, or the path as given once that file name is
/// taken by an earlier input.
fn source_ids<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    let mut taken = HashSet::new();
    let mut ids = Vec::with_capacity(paths.len());
    for p in paths {
        let path = p.as_ref();
        let name = file_name_id(path);
        let base = if taken.contains(&name) {
            path.display().to_string()
        } else {
            name.clone()
        };
        let mut id = base.clone();
        let mut n = 2;
        while taken.contains(&id) {
            id = format!("{base} #{n}");
            n += 1;
        }
        if id != name {
            tracing::warn!(file_name = %name, source = %id, "duplicate file name, using a longer source id");
        }
        taken.insert(id.clone());
        ids.push(id);
    }
    ids
}
