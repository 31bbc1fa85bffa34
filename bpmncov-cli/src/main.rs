//! bpmncov CLI - BPMN-to-test coverage reports

use bpmncov_core::{config::CONFIG_FILE_NAME, Config, CoverageError, Project, RunSummary};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bpmncov")]
#[command(
    about = "Report which BPMN nodes are covered by tests tagged with [bpmn:<id>]",
    long_about = None
)]
struct Cli {
    /// Project root (default: current directory)
    #[arg(long, env = "BPMNCOV_ROOT")]
    root: Option<PathBuf>,

    /// Config file (default: <root>/bpmncov.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = open_project(cli.root, cli.config).and_then(|project| {
        tracing::debug!(root = %project.root.display(), "running coverage report");
        let summary = bpmncov_core::run(&project)?;
        Ok((project, summary))
    });

    match result {
        Ok((project, summary)) => print_summary(&project, &summary, cli.json),
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "code": error_code(&e),
                    "message": e.to_string(),
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(s) => eprintln!("{}", s),
                    Err(_) => eprintln!("Error: {}", e),
                }
            } else {
                eprintln!("Error: {}", e);
                if e.is_input_error() {
                    eprintln!(
                        "Hint: set [document] path in {} to your BPMN file",
                        CONFIG_FILE_NAME
                    );
                }
            }
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_project(root: Option<PathBuf>, config: Option<PathBuf>) -> bpmncov_core::Result<Project> {
    let root = match root {
        Some(r) => r,
        None => std::env::current_dir()?,
    };
    match config {
        Some(path) => Ok(Project::new(root, Config::load(&path)?)),
        None => Project::open(root),
    }
}

fn error_code(e: &CoverageError) -> &'static str {
    match e {
        CoverageError::InputMissing(_) => "input_missing",
        CoverageError::Parse { .. } => "parse_error",
        CoverageError::DuplicateNodeId { .. } => "duplicate_node_id",
        CoverageError::ConfigParse(_) => "config_error",
        CoverageError::GlobPattern(_) | CoverageError::MarkerPattern(_) => "pattern_error",
        _ => "error",
    }
}

fn print_summary(project: &Project, run: &RunSummary, json: bool) {
    use colored::Colorize;

    if json {
        match serde_json::to_string_pretty(run) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Error: {}", e),
        }
        return;
    }

    let s = &run.summary;
    let coverage = format!("{:.1}%", s.percent);
    let coverage = if s.missing == 0 {
        coverage.green()
    } else {
        coverage.yellow()
    };
    println!(
        "{}: {} of {} BPMN nodes covered ({}) from {} test files",
        "Coverage".bold(),
        s.covered,
        s.total,
        coverage,
        run.files_scanned
    );
    if s.orphans > 0 {
        println!(
            "{}: {} references to unknown BPMN ids",
            "Orphans".red(),
            s.orphans
        );
    }
    for path in &run.outputs {
        let shown = path.strip_prefix(&project.root).unwrap_or(path);
        println!("{} {}", "Wrote".green(), shown.display());
    }
}
