//! asset-annotate: assign sequential ids to the core asset file
//!
//! Every attribute, category and lot gets an integer `id` matching its
//! position. Lot ids run across all categories.
//!
//! Usage:
//!   # Annotate ./core.asset.json in place
//!   asset-annotate
//!
//!   # Annotate another file, pretty-printed, via temp file and rename
//!   asset-annotate assets/core.asset.json --pretty --atomic
//!
//!   # Print the annotated document without touching the file
//!   asset-annotate --dry-run
//!
//!   # Fail if any id is missing or out of place
//!   asset-annotate --check

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use asset_annotate::{
    annotate_file, check_file, preview, AnnotateConfig, WriteMode, DEFAULT_ASSET_PATH,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "asset-annotate")]
#[command(about = "Assign sequential ids to attributes, categories and lots", long_about = None)]
struct Args {
    /// Asset file to annotate
    #[arg(value_name = "FILE", default_value = DEFAULT_ASSET_PATH)]
    input: PathBuf,

    /// Write the result here instead of overwriting FILE
    #[arg(long, short = 'o', conflicts_with_all = ["dry_run", "check"])]
    output: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,

    /// Write through a temporary file and rename it into place
    #[arg(long)]
    atomic: bool,

    /// Print the annotated document to stdout instead of writing it
    #[arg(long, conflicts_with = "check")]
    dry_run: bool,

    /// Only verify existing ids; exit with status 1 on any mismatch
    #[arg(long, conflicts_with_all = ["pretty", "atomic"])]
    check: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logger(args.quiet);

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    if args.check {
        let mismatches = check_file(&args.input)
            .with_context(|| format!("failed to check {}", args.input.display()))?;
        if mismatches.is_empty() {
            tracing::info!(path = %args.input.display(), "all ids are in place");
            return Ok(ExitCode::SUCCESS);
        }
        for mismatch in &mismatches {
            println!("{}", mismatch);
        }
        tracing::warn!(count = mismatches.len(), "found entries with stale or missing ids");
        return Ok(ExitCode::FAILURE);
    }

    let config = AnnotateConfig {
        input: args.input,
        output: args.output,
        pretty: args.pretty,
        write_mode: if args.atomic {
            WriteMode::Atomic
        } else {
            WriteMode::Direct
        },
    };

    if args.dry_run {
        let (output, report) = preview(&config)
            .with_context(|| format!("failed to annotate {}", config.input.display()))?;
        println!("{}", output);
        tracing::info!(ids = report.total(), "dry run, nothing written");
        return Ok(ExitCode::SUCCESS);
    }

    annotate_file(&config)
        .with_context(|| format!("failed to annotate {}", config.input.display()))?;
    Ok(ExitCode::SUCCESS)
}

/// Log to stderr, honoring `RUST_LOG` when it is set
fn setup_logger(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
