//! Property-based checks of the full mapping pipeline against randomly
//! generated CNOT-only circuits over a linear coupling map (§8).

use lnnmap_core::{GateKind, GateSpec, MapperConfig};
use lnnmap_map::{map_circuit, CouplingGraph};
use proptest::prelude::*;

/// A random circuit: `qubit_count` qubits and a handful of CNOTs between
/// distinct, in-range qubits.
fn arb_cnot_circuit() -> impl Strategy<Value = (usize, Vec<GateSpec>)> {
    (2_usize..=6).prop_flat_map(|qubit_count| {
        prop::collection::vec(arb_cnot(qubit_count), 1..=8)
            .prop_map(move |gates| (qubit_count, gates))
    })
}

fn arb_cnot(qubit_count: usize) -> impl Strategy<Value = GateSpec> {
    (0..qubit_count, 0..qubit_count)
        .prop_filter("operands must differ", |(a, b)| a != b)
        .prop_map(|(a, b)| GateSpec::two_qubit(GateKind::Cnot, a, b))
}

proptest! {
    /// Every emitted `CNOT` sits on physically adjacent qubits, and the
    /// reconstructed initial mapping is always a genuine permutation.
    #[test]
    fn emitted_cnots_are_always_adjacent((qubit_count, gates) in arb_cnot_circuit()) {
        let coupling = CouplingGraph::linear(qubit_count);
        let config = MapperConfig::default();

        if let Ok(result) = map_circuit(&gates, qubit_count, &coupling, &config) {
            prop_assert!(result.reconstructed.initial_mapping.is_valid_permutation());

            for gate in &result.reconstructed.gates {
                if gate.kind == GateKind::Cnot || gate.kind == GateKind::Swap {
                    let p2 = gate.q2.as_qubit().expect("two-qubit gate carries a qubit operand");
                    prop_assert!(coupling.are_adjacent(gate.q1, p2));
                }
            }
        }
    }

    /// Total emitted cost equals the original gates' cost plus 30 per swap
    /// and 30 per bridge (each bridge is a CNOT's cost of 10 plus three more
    /// CNOTs at 10 each, i.e. 30 over the single CNOT it replaces).
    #[test]
    fn total_cost_matches_the_cost_model((qubit_count, gates) in arb_cnot_circuit()) {
        let coupling = CouplingGraph::linear(qubit_count);
        let config = MapperConfig::default();

        if let Ok(result) = map_circuit(&gates, qubit_count, &coupling, &config) {
            let original_cost: u32 = gates.iter().map(|g| g.kind.cost()).sum();
            let cnot_count = result
                .reconstructed
                .gates
                .iter()
                .filter(|g| g.kind == GateKind::Cnot)
                .count();
            let bridge_count = cnot_count.saturating_sub(gates.len());
            let emitted_cost: u32 = result.reconstructed.gates.iter().map(|g| g.kind.cost()).sum();

            let expected = original_cost
                + 30 * result.reconstructed.swap_count as u32
                + 30 * bridge_count as u32;
            prop_assert_eq!(emitted_cost, expected);
        }
    }

    /// Mapping an already-mapped program against the same coupling graph is
    /// idempotent: no further swaps or free swaps are needed, and the
    /// program loads under the identity mapping.
    #[test]
    fn remapping_mapped_output_is_idempotent((qubit_count, gates) in arb_cnot_circuit()) {
        let coupling = CouplingGraph::linear(qubit_count);
        let config = MapperConfig::default();

        if let Ok(first) = map_circuit(&gates, qubit_count, &coupling, &config) {
            let second = map_circuit(
                &first.reconstructed.gates,
                qubit_count,
                &coupling,
                &config,
            )
            .expect("already-adjacent gates must remain mappable");

            prop_assert_eq!(second.reconstructed.swap_count, 0);
            prop_assert_eq!(second.reconstructed.free_swap_count, 0);
            prop_assert_eq!(second.reconstructed.initial_mapping.l2p().to_vec(), coupling_identity(qubit_count));
        }
    }
}

fn coupling_identity(qubit_count: usize) -> Vec<usize> {
    (0..qubit_count).collect()
}
