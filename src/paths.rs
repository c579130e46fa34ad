//! Log-file placement and naming for the CLI.
//!
//! Unless a name is given explicitly, a log is named after the analyzed sources
//! and the time of the run:
//!
//! - one source: `conflict_analysis_<stem>_<YYYYmmdd_HHMMSS>.log`
//! - several: `conflict_analysis_multi_<YYYYmmdd_HHMMSS>.log`

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::error::ReportError;

/// Directory logs are written to when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "logs";

const FILE_STAMP: &str = "%Y%m%d_%H%M%S";
const HEADER_STAMP: &str = "%Y-%m-%d %H:%M:%S";
const RULE_WIDTH: usize = 80;

/// File name for a run over `sources` (source identifiers, i.e. file names).
pub fn log_file_name(log_name: Option<&str>, sources: &[String], now: &NaiveDateTime) -> String {
    if let Some(name) = log_name {
        return name.to_string();
    }
    let stamp = now.format(FILE_STAMP);
    match sources {
        [single] => {
            let stem = Path::new(single)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| single.clone());
            format!("conflict_analysis_{stem}_{stamp}.log")
        }
        _ => format!("conflict_analysis_multi_{stamp}.log"),
    }
}

pub fn log_file_path(
    output_dir: &Path,
    log_name: Option<&str>,
    sources: &[String],
    now: &NaiveDateTime,
) -> PathBuf {
    output_dir.join(log_file_name(log_name, sources, now))
}

/// First two lines of every log.
pub fn log_header(now: &NaiveDateTime) -> String {
    format!(
        "CONFLICT ANALYSIS LOG - {}\n{}\n",
        now.format(HEADER_STAMP),
        "=".repeat(RULE_WIDTH)
    )
}

/// Write header, run preamble and `body` to `path`, creating parent directories.
pub fn write_log(
    path: &Path,
    sources: &[String],
    now: &NaiveDateTime,
    body: &str,
) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Write {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut content = log_header(now);
    content.push_str(&format!("Ontology Files: {}\n", sources.join(", ")));
    content.push_str(&format!("Log File: {}\n", path.display()));
    content.push_str(&format!("Analysis Started: {}\n", now.format(HEADER_STAMP)));
    content.push_str(&"=".repeat(RULE_WIDTH));
    content.push('\n');
    content.push_str(body);

    std::fs::write(path, content).map_err(io_err)?;
    tracing::info!(path = %path.display(), "wrote conflict log");
    Ok(())
}
