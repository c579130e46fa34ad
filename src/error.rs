//! Rich diagnostic error types for onto-merge-check.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know what went wrong and how to
//! fix it. Detection passes have no error type: they are pure computations over
//! an already-built index.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum OntoError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Report(#[from] ReportError),

    #[error("no valid input: none of the {attempted} ontology source(s) could be loaded")]
    #[diagnostic(
        code(onto::load::no_valid_input),
        help(
            "Every input was missing or failed to parse, so there is nothing to compare. \
             Check the warnings above for the individual failures."
        )
    )]
    NoValidInput { attempted: usize },
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Failure to turn one input file into a set of triples.
///
/// These are recovered locally: the source is skipped and the error is surfaced
/// as a [`crate::graph::loader::LoadWarning`].
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("file not found: {path}")]
    #[diagnostic(
        code(onto::load::not_found),
        help("Check the path. The remaining sources are still analyzed.")
    )]
    NotFound { path: String },

    #[error("failed to read {path}")]
    #[diagnostic(
        code(onto::load::io),
        help("Ensure the file is readable by the current user.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    #[diagnostic(
        code(onto::load::parse),
        help(
            "The file is not valid in the syntax implied by its extension \
             (.ttl Turtle, .nt N-Triples, .n3 N3, .rdf/.owl/.xml RDF/XML; anything \
             else is read as Turtle)."
        )
    )]
    Parse { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read detector config: {path}")]
    #[diagnostic(
        code(onto::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse detector config {path}: {message}")]
    #[diagnostic(
        code(onto::config::parse),
        help(
            "Check the TOML syntax. Known keys: namespace_agnostic, domain_conflicts, \
             list_limit, extra_inverse_patterns."
        )
    )]
    Parse { path: String, message: String },

    #[error("failed to write detector config: {path}")]
    #[diagnostic(
        code(onto::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("failed to serialize report: {message}")]
    #[diagnostic(code(onto::report::serialize))]
    Serialize { message: String },

    #[error("failed to write report log: {path}")]
    #[diagnostic(
        code(onto::report::write),
        help(
            "The output directory could not be created or written. \
             Pass a different directory with --output-dir, or --no-log-file."
        )
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for functions returning onto-merge-check results.
pub type OntoResult<T> = std::result::Result<T, OntoError>;
