//! onto-merge-check CLI: pre-merge conflict analysis for ontology files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use miette::Result;

use onto_merge_check::error::OntoError;
use onto_merge_check::paths;
use onto_merge_check::{DetectorConfig, analyze};

#[derive(Parser)]
#[command(
    name = "onto-merge-check",
    version,
    about = "Analyze ontology conflicts across multiple files before merging"
)]
struct Cli {
    /// Ontology files to analyze (.ttl, .nt, .n3, .owl, .rdf, .xml).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output directory for the log file.
    #[arg(short, long, default_value = paths::DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Custom log file name (default: derived from the inputs and the time).
    #[arg(short, long)]
    log_name: Option<String>,

    /// Also group entities by local name across namespaces.
    #[arg(long)]
    agnostic: bool,

    /// Detector config file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum items listed per report section (0 = all).
    #[arg(long)]
    limit: Option<usize>,

    /// Report format on stdout.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the report without writing a log file.
    #[arg(long)]
    no_log_file: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(report) => {
            let no_input = matches!(
                report.downcast_ref::<OntoError>(),
                Some(OntoError::NoValidInput { .. })
            );
            eprintln!("{report:?}");
            ExitCode::from(if no_input { 2 } else { 1 })
        }
    }
}

/// Returns whether the corpus is safe to merge.
fn run(cli: Cli) -> Result<bool> {
    let mut config = match &cli.config {
        Some(path) => DetectorConfig::load(path).map_err(OntoError::from)?,
        None => DetectorConfig::default(),
    };
    if cli.agnostic {
        config.namespace_agnostic = true;
    }
    if let Some(limit) = cli.limit {
        config.list_limit = limit;
    }

    let started = chrono::Local::now().naive_local();
    let analysis = analyze(&cli.files, &config)?;

    for warning in &analysis.outcome.warnings {
        eprintln!("Warning: {warning}");
    }

    let report = &analysis.report;
    let text = report.render();
    match cli.format {
        Format::Text => println!("{text}"),
        Format::Json => println!("{}", report.to_json().map_err(OntoError::from)?),
    }

    if !cli.no_log_file {
        let log_path = paths::log_file_path(
            &cli.output_dir,
            cli.log_name.as_deref(),
            &report.sources,
            &started,
        );
        paths::write_log(&log_path, &report.sources, &started, &text).map_err(OntoError::from)?;
        eprintln!("Analysis complete. Results saved to: {}", log_path.display());
    }

    Ok(report.safe_to_merge())
}
