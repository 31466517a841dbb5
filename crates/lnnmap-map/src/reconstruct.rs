//! Reconstruction and free-swap back-propagation (§4.5).

use std::rc::Rc;

use lnnmap_core::{GateKind, GateSpec, MapError, Mapping, Operand, Result};

use crate::state::State;

/// The final, physical-indexed gate sequence plus the initial mapping it
/// must be loaded under, and swap/free-swap counts for reporting.
pub struct Reconstructed {
    pub gates: Vec<GateSpec>,
    pub initial_mapping: Mapping,
    pub swap_count: usize,
    pub free_swap_count: usize,
}

/// Walks the winning state's parent chain to recover the emitted gate
/// sequence in program order, then back-propagates every `FREE_SWAP` into
/// the initial mapping and drops it from the output.
pub fn reconstruct(final_state: &Rc<State>, qubit_count: usize) -> Result<Reconstructed> {
    let mut gates = Vec::new();
    let mut cursor = Some(final_state.clone());
    while let Some(state) = cursor {
        if let Some(spec) = &state.output {
            gates.push(spec.clone());
        }
        cursor = state.parent.clone();
    }
    gates.reverse();

    let mut initial_mapping = Mapping::identity(qubit_count);
    let mut swap_count = 0usize;
    let mut free_swap_count = 0usize;

    for i in 0..gates.len() {
        match gates[i].kind {
            GateKind::Swap => swap_count += 1,
            GateKind::FreeSwap => {
                free_swap_count += 1;
                let p1 = gates[i].q1;
                let p2 = gates[i].q2.as_qubit().expect("free swap always carries a qubit operand");

                let l1 = initial_mapping.physical_to_logical(p1);
                let l2 = initial_mapping.physical_to_logical(p2);
                initial_mapping.swap_in_place(l1, l2);

                for earlier in &mut gates[..i] {
                    if earlier.kind != GateKind::FreeSwap {
                        relabel(earlier, p1, p2);
                    }
                }
            }
            _ => {}
        }
    }

    gates.retain(|g| g.kind != GateKind::FreeSwap);

    if !initial_mapping.is_valid_permutation() {
        return Err(MapError::ReconstructionError(
            "back-propagated initial mapping is not a valid permutation".into(),
        ));
    }

    Ok(Reconstructed {
        gates,
        initial_mapping,
        swap_count,
        free_swap_count,
    })
}

/// Relabels every occurrence of physical qubit `p1` to `p2` and vice versa in
/// a single already-emitted gate. `MEASURE`'s second operand is a classical
/// bit and is never touched; `BARRIER`'s qubit list is relabeled in full.
fn relabel(gate: &mut GateSpec, p1: usize, p2: usize) {
    let swapped = |q: usize| if q == p1 { p2 } else if q == p2 { p1 } else { q };
    let is_measure = gate.kind == GateKind::Measure;

    gate.q1 = swapped(gate.q1);
    match &mut gate.q2 {
        Operand::Qubit(q) if !is_measure => *q = swapped(*q),
        Operand::Qubits(qs) => {
            for q in qs.iter_mut() {
                *q = swapped(*q);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::insert_checkpoints;
    use crate::coupling::CouplingGraph;
    use crate::dag::Dag;
    use crate::search;
    use lnnmap_core::GateSpec;

    #[test]
    fn adjacent_cnot_reconstructs_with_no_swaps() {
        let gates = vec![GateSpec::two_qubit(GateKind::Cnot, 0, 1)];
        let mut dag = Dag::from_gates(&gates);
        let c0 = insert_checkpoints(&mut dag, 3).unwrap();
        let coupling = CouplingGraph::linear(2);
        let winner = search::run(&dag, &coupling, c0, 2).unwrap();

        let reconstructed = reconstruct(&winner, 2).unwrap();
        assert_eq!(reconstructed.free_swap_count, 0);
        assert_eq!(reconstructed.gates.len(), 1);
        assert_eq!(reconstructed.gates[0].kind, GateKind::Cnot);
        assert!(reconstructed.initial_mapping.is_valid_permutation());
    }

    #[test]
    fn free_swap_never_survives_into_the_final_gate_list() {
        let gates = vec![GateSpec::two_qubit(GateKind::Cnot, 0, 2)];
        let mut dag = Dag::from_gates(&gates);
        let c0 = insert_checkpoints(&mut dag, 3).unwrap();
        let coupling = CouplingGraph::linear(3);
        let winner = search::run(&dag, &coupling, c0, 2).unwrap();

        let reconstructed = reconstruct(&winner, 3).unwrap();
        assert!(reconstructed
            .gates
            .iter()
            .all(|g| g.kind != GateKind::FreeSwap));
    }
}
