//! CLI-level wiring around [`lnnmap_map::map_circuit`]: file I/O, coupling
//! resolution, and the `--verbose` report (§6).

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use lnnmap_core::MapperConfig;
use lnnmap_map::{map_circuit, CouplingGraph, PipelineTiming};
use tracing::info;

/// Where the coupling graph for a run comes from: a named default topology,
/// sized to each circuit's qubit count as it is ingested, or a fixed graph
/// read once from a JSON edge-list file (§6).
#[derive(Debug, Clone)]
pub enum CouplingSource {
    Named(String),
    Fixed(CouplingGraph),
}

impl CouplingSource {
    /// Resolves the coupling graph for a circuit with `qubit_count` logical
    /// qubits. A `Fixed` graph must already match that qubit count exactly,
    /// since the mapper's permutation is square over the logical space
    /// (§3, §9 state identity).
    fn resolve(&self, qubit_count: usize) -> Result<CouplingGraph> {
        match self {
            CouplingSource::Named(name) => CouplingGraph::named(name, qubit_count)
                .with_context(|| format!("unknown coupling topology: {}", name)),
            CouplingSource::Fixed(graph) => {
                anyhow::ensure!(
                    graph.qubit_count() == qubit_count,
                    "coupling file describes {} physical qubits but circuit uses {}",
                    graph.qubit_count(),
                    qubit_count
                );
                Ok(graph.clone())
            }
        }
    }
}

/// Configuration for a single `lnnmap run` invocation, gathering the mapper
/// config together with the CLI-only knobs (coupling source, verbosity).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub mapper: MapperConfig,
    pub coupling: CouplingSource,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            mapper: MapperConfig::default(),
            coupling: CouplingSource::Named("linear".to_string()),
        }
    }
}

/// Everything the `--verbose` flag prints: swap/free-swap counts, the
/// initial mapping, total cost, and wall time (§6).
#[derive(Debug, Clone)]
pub struct RunReport {
    pub swap_count: usize,
    pub free_swap_count: usize,
    pub initial_mapping: Vec<usize>,
    pub total_cost: u32,
    pub wall_time: std::time::Duration,
    pub timing: PipelineTiming,
}

/// Parses `input_path`, maps it against the coupling graph resolved from
/// `config`, and writes the rewritten program to `output_path`.
pub fn run_file(
    input_path: &Path,
    output_path: &Path,
    config: &RunConfig,
) -> Result<RunReport> {
    let start = Instant::now();

    let source = fs::read_to_string(input_path)
        .with_context(|| format!("failed to read input file: {}", input_path.display()))?;
    let ingested = lnnmap_qasm::parse_program(&source)
        .with_context(|| format!("failed to parse {}", input_path.display()))?;

    info!(
        file = %input_path.display(),
        qubits = ingested.qubit_count,
        gates = ingested.gates.len(),
        "ingested program"
    );

    let coupling = config.coupling.resolve(ingested.qubit_count)?;

    let result = map_circuit(
        &ingested.gates,
        ingested.qubit_count,
        &coupling,
        &config.mapper,
    )
    .with_context(|| format!("failed to map {}", input_path.display()))?;

    let rendered = lnnmap_qasm::render_program(
        &result.reconstructed.gates,
        &ingested.cregs,
        coupling.qubit_count(),
        &result.reconstructed.initial_mapping,
    )
    .with_context(|| "failed to render mapped program")?;

    fs::write(output_path, rendered)
        .with_context(|| format!("failed to write output file: {}", output_path.display()))?;

    let total_cost = result
        .reconstructed
        .gates
        .iter()
        .map(|g| g.kind.cost())
        .sum();

    Ok(RunReport {
        swap_count: result.reconstructed.swap_count,
        free_swap_count: result.reconstructed.free_swap_count,
        initial_mapping: result.reconstructed.initial_mapping.l2p().to_vec(),
        total_cost,
        wall_time: start.elapsed(),
        timing: result.timing,
    })
}

/// Maps every `.qasm` file in `input_dir` into `output_dir`, mirroring the
/// original benchmark driver (§2.2). Returns one report per input file, in
/// directory-listing order, alongside the file name it was produced from.
pub fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    config: &RunConfig,
) -> Result<Vec<(String, RunReport)>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let mut entries: Vec<_> = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read input directory: {}", input_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "qasm").unwrap_or(false))
        .collect();
    entries.sort();

    let mut reports = Vec::with_capacity(entries.len());
    for input_path in entries {
        let file_name = input_path
            .file_name()
            .expect("directory entry always has a file name")
            .to_string_lossy()
            .into_owned();
        let output_path = output_dir.join(&file_name);

        let report = run_file(&input_path, &output_path, config)
            .with_context(|| format!("failed to map batch entry: {}", file_name))?;
        reports.push((file_name, report));
    }

    Ok(reports)
}

/// Renders a batch run's reports as CSV with columns `file,cost,swaps,free_swaps`.
pub fn render_results_csv(reports: &[(String, RunReport)]) -> String {
    let mut csv = String::from("file,cost,swaps,free_swaps\n");
    for (name, report) in reports {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            name, report.total_cost, report.swap_count, report.free_swap_count
        ));
    }
    csv
}
