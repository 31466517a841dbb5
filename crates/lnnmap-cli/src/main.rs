//! lnnmap CLI - command-line driver for the checkpoint-segmented LNN mapper.
//!
//! Provides commands for:
//! - Mapping a single QASM file against a coupling graph
//! - Batch-mapping a directory of QASM files, mirroring the original
//!   benchmark driver

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use lnnmap_cli::pipeline::{render_results_csv, run_batch, run_file, CouplingSource, RunConfig};
use lnnmap_map::CouplingGraph;

/// lnnmap - a linear-nearest-neighbour qubit mapper.
#[derive(Parser)]
#[command(name = "lnnmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output: swap count, free-swap count, initial mapping,
    /// total cost, and wall time.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Clone)]
struct RunArgs {
    /// Output path for the mapped program.
    #[arg(short, long, default_value = "output.qasm")]
    output: PathBuf,

    /// Depth-band width for checkpoint insertion (§4.2). Must be ≥ 1.
    #[arg(long, default_value = "3")]
    checkpoint_offset: usize,

    /// Number of checkpoints considered by the search heuristic (§4.3). Must
    /// be ≥ 1.
    #[arg(long, default_value = "2")]
    checkpoint_look_ahead: usize,

    /// Named default topology (`linear`, `grid`, `heavy-hex`) or a path to a
    /// JSON edge-list file.
    #[arg(long, default_value = "linear")]
    coupling: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a single QASM file through the mapping pipeline (§6's default
    /// subcommand).
    Run {
        /// Path to the input QASM file.
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        args: RunArgs,
    },

    /// Map every `.qasm` file in a directory with the default configuration,
    /// mirroring the original benchmark driver (§2.2). Unlike `run`, this
    /// takes no `--checkpoint-offset`/`--checkpoint-look-ahead`/`--coupling`
    /// overrides: `benchmark.py` always ran every file the same way.
    Batch {
        /// Directory of input `.qasm` files.
        input_dir: PathBuf,

        /// Directory to write mapped output files into.
        output_dir: PathBuf,

        /// Path for the per-file results CSV.
        #[arg(long, default_value = "results.csv")]
        result: PathBuf,
    },
}

/// A coupling map read from a JSON edge-list file: `{"qubit_count": n,
/// "edges": [[a, b], ...]}`.
#[derive(Deserialize)]
struct CouplingFile {
    qubit_count: usize,
    edges: Vec<(usize, usize)>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let _ = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .try_init();

    match cli.command {
        Commands::Run { input, args } => cmd_run(&input, &args, cli.verbose),
        Commands::Batch {
            input_dir,
            output_dir,
            result,
        } => cmd_batch(&input_dir, &output_dir, &result, cli.verbose),
    }
}

fn cmd_run(input: &PathBuf, args: &RunArgs, verbose: bool) -> Result<()> {
    let config = build_config(args)?;
    let report = run_file(input, &args.output, &config)?;

    if verbose {
        print_report(&report);
    }

    Ok(())
}

fn cmd_batch(
    input_dir: &PathBuf,
    output_dir: &PathBuf,
    result_path: &PathBuf,
    verbose: bool,
) -> Result<()> {
    let config = RunConfig::default();
    let reports = run_batch(input_dir, output_dir, &config)?;

    std::fs::write(result_path, render_results_csv(&reports))
        .with_context(|| format!("failed to write results file: {}", result_path.display()))?;

    if verbose {
        for (file, report) in &reports {
            println!("--- {} ---", file);
            print_report(report);
        }
    }

    println!(
        "mapped {} file(s), results written to {}",
        reports.len(),
        result_path.display()
    );

    Ok(())
}

fn build_config(args: &RunArgs) -> Result<RunConfig> {
    Ok(RunConfig {
        mapper: lnnmap_core::MapperConfig::new(args.checkpoint_offset, args.checkpoint_look_ahead),
        coupling: resolve_coupling_source(&args.coupling)?,
    })
}

/// Resolves `--coupling`: a path to a JSON edge-list file on disk, or a
/// named default topology sized against each circuit at mapping time.
fn resolve_coupling_source(spec: &str) -> Result<CouplingSource> {
    let path = PathBuf::from(spec);
    if path.is_file() {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read coupling file: {}", path.display()))?;
        let parsed: CouplingFile = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse coupling file: {}", path.display()))?;
        let graph = CouplingGraph::from_edges(parsed.qubit_count, &parsed.edges)
            .context("coupling file describes an invalid graph")?;
        return Ok(CouplingSource::Fixed(graph));
    }

    Ok(CouplingSource::Named(spec.to_string()))
}

fn print_report(report: &lnnmap_cli::pipeline::RunReport) {
    println!("Swaps:       {}", report.swap_count);
    println!("Free swaps:  {}", report.free_swap_count);
    println!("Initial map: {:?}", report.initial_mapping);
    println!("Total cost:  {}", report.total_cost);
    println!("Wall time:   {:.2?}", report.wall_time);
}
