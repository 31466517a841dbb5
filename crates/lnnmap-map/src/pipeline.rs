//! Top-level mapping pipeline: ties coupling analysis, DAG construction,
//! checkpoint insertion, search, and reconstruction into one call (§2.1).

use std::time::{Duration, Instant};

use lnnmap_core::{GateSpec, MapperConfig, Result};
use tracing::info;

use crate::checkpoint::insert_checkpoints;
use crate::coupling::CouplingGraph;
use crate::dag::Dag;
use crate::reconstruct::{reconstruct, Reconstructed};
use crate::search;

/// Per-stage timing breakdown, surfaced to the CLI's `--verbose` report.
#[derive(Debug, Clone, Default)]
pub struct PipelineTiming {
    pub dag_construction: Duration,
    pub checkpoint_insertion: Duration,
    pub search: Duration,
    pub reconstruction: Duration,
}

/// The outcome of mapping a single circuit: the reconstructed physical gate
/// sequence plus its timing breakdown.
pub struct MapResult {
    pub reconstructed: Reconstructed,
    pub timing: PipelineTiming,
}

/// Runs the full mapping pipeline over an already-ingested gate sequence.
///
/// `gates` and `qubit_count` come from `lnnmap_qasm::ingest`; `coupling`
/// describes the target device (§2); `config` governs checkpoint sizing.
pub fn map_circuit(
    gates: &[GateSpec],
    qubit_count: usize,
    coupling: &CouplingGraph,
    config: &MapperConfig,
) -> Result<MapResult> {
    let mut timing = PipelineTiming::default();

    let start = Instant::now();
    let mut dag = Dag::from_gates(gates);
    timing.dag_construction = start.elapsed();
    info!(gates = gates.len(), dag_nodes = dag.len(), "dependency DAG built");

    let start = Instant::now();
    let root_checkpoint = insert_checkpoints(&mut dag, config.checkpoint_offset)?;
    timing.checkpoint_insertion = start.elapsed();
    info!(offset = config.checkpoint_offset, "checkpoints inserted");

    let start = Instant::now();
    let winner = search::run(&dag, coupling, root_checkpoint, config.checkpoint_look_ahead)?;
    timing.search = start.elapsed();
    info!(cost = winner.cost, "search converged");

    let start = Instant::now();
    let reconstructed = reconstruct(&winner, qubit_count)?;
    timing.reconstruction = start.elapsed();
    info!(
        swaps = reconstructed.swap_count,
        free_swaps = reconstructed.free_swap_count,
        gates = reconstructed.gates.len(),
        "reconstruction complete"
    );

    Ok(MapResult {
        reconstructed,
        timing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lnnmap_core::GateKind;

    #[test]
    fn maps_a_simple_bell_pair() {
        let gates = vec![
            GateSpec::single(GateKind::X, 0),
            GateSpec::two_qubit(GateKind::Cnot, 0, 1),
        ];
        let coupling = CouplingGraph::linear(2);
        let config = MapperConfig::default();

        let result = map_circuit(&gates, 2, &coupling, &config).unwrap();
        assert_eq!(result.reconstructed.gates.len(), 2);
        assert!(result.reconstructed.initial_mapping.is_valid_permutation());
    }

    #[test]
    fn unmappable_circuit_surfaces_the_error() {
        let gates = vec![GateSpec::two_qubit(GateKind::Cnot, 0, 1)];
        let coupling = CouplingGraph::from_edges(2, &[]).unwrap();
        let config = MapperConfig::default();

        assert!(map_circuit(&gates, 2, &coupling, &config).is_err());
    }
}
