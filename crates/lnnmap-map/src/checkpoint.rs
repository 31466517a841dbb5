//! Checkpoint insertion (§4.2): partitions the DAG into depth bands of width
//! `checkpoint_offset` and threads a chain of checkpoint sentinels between
//! them, bounding the search frontier to a sliding window of bands.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use lnnmap_core::{MapError, Result};

use crate::dag::{Dag, NodeId};

/// Runs checkpoint insertion over `dag` and returns the handle of `C_0`, the
/// root checkpoint preceding the original frontier.
///
/// Traverses gates in non-decreasing depth, ties broken by ascending handle
/// (the DAG's construction order) for determinism, mirroring the
/// `PriorityQueue`-driven traversal of the original implementation.
pub fn insert_checkpoints(dag: &mut Dag, checkpoint_offset: usize) -> Result<NodeId> {
    assert!(checkpoint_offset >= 1, "checkpoint_offset must be >= 1");

    let mut checkpoints: HashMap<usize, NodeId> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut heap: BinaryHeap<Reverse<(usize, usize)>> = BinaryHeap::new();

    let c0 = dag.push_checkpoint();
    checkpoints.insert(0, c0);

    for gate in dag.frontier().to_vec() {
        dag.node_mut(c0).children.push(gate);
        dag.node_mut(gate).parents.push(c0);
        heap.push(Reverse((dag.node(gate).depth, gate.0)));
    }

    while let Some(Reverse((depth, handle))) = heap.pop() {
        let current = NodeId(handle);
        if !visited.insert(current) {
            continue;
        }

        let next_band = (depth / checkpoint_offset + 1) * checkpoint_offset;
        let prev_band = (depth / checkpoint_offset) * checkpoint_offset;

        let next_cp = *checkpoints
            .entry(next_band)
            .or_insert_with(|| dag.push_checkpoint());
        let prev_cp = *checkpoints
            .entry(prev_band)
            .or_insert_with(|| dag.push_checkpoint());

        dag.node_mut(next_cp).depth = next_band;
        dag.node_mut(prev_cp)
            .checkpoint
            .as_mut()
            .unwrap()
            .next = Some(next_cp);
        dag.node_mut(next_cp)
            .checkpoint
            .as_mut()
            .unwrap()
            .prev = Some(prev_cp);
        dag.node_mut(prev_cp)
            .checkpoint
            .as_mut()
            .unwrap()
            .gates
            .push(current);

        let children = dag.node(current).children.clone();
        let mut new_children = Vec::with_capacity(children.len());

        for child in children {
            let child_depth = dag.node(child).depth;
            heap.push(Reverse((child_depth, child.0)));

            if child_depth >= next_band {
                let cp_depth = (child_depth / checkpoint_offset) * checkpoint_offset;
                let cp = *checkpoints
                    .entry(cp_depth)
                    .or_insert_with(|| dag.push_checkpoint());
                dag.node_mut(cp).depth = cp_depth;
                if !dag.node(cp).children.contains(&child) {
                    dag.node_mut(cp).children.push(child);
                }

                let parents = &mut dag.node_mut(child).parents;
                parents.retain(|&p| p != current);
                if !parents.contains(&cp) {
                    parents.push(cp);
                }

                new_children.push(next_cp);
                if !dag.node(next_cp).parents.contains(&current) {
                    dag.node_mut(next_cp).parents.push(current);
                }
            } else {
                new_children.push(child);
            }
        }
        dag.node_mut(current).children = new_children;
    }

    let terminal_candidates: Vec<NodeId> = checkpoints
        .values()
        .copied()
        .filter(|&cp| dag.node(cp).checkpoint.as_ref().unwrap().next.is_none())
        .collect();

    if terminal_candidates.len() != 1 {
        return Err(MapError::MalformedDag(terminal_candidates.len()));
    }

    let terminal = terminal_candidates[0];
    dag.node_mut(terminal).checkpoint.as_mut().unwrap().done = true;

    Ok(c0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lnnmap_core::{GateKind, GateSpec};

    #[test]
    fn single_gate_produces_root_and_terminal_checkpoint() {
        let gates = vec![GateSpec::single(GateKind::X, 0)];
        let mut dag = Dag::from_gates(&gates);
        let c0 = insert_checkpoints(&mut dag, 3).unwrap();

        assert!(dag.node(c0).is_checkpoint());
        let terminal_count = dag
            .iter_handles()
            .filter(|&id| {
                dag.node(id)
                    .checkpoint
                    .as_ref()
                    .map(|cp| cp.done)
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(terminal_count, 1);
    }

    #[test]
    fn bands_split_at_the_configured_offset() {
        // A chain of 5 dependent CNOTs spans depths 0..5; offset 2 should
        // produce checkpoints at 0, 2, 4, 6.
        let gates = vec![
            GateSpec::two_qubit(GateKind::Cnot, 0, 1),
            GateSpec::two_qubit(GateKind::Cnot, 1, 2),
            GateSpec::two_qubit(GateKind::Cnot, 2, 3),
            GateSpec::two_qubit(GateKind::Cnot, 3, 4),
            GateSpec::two_qubit(GateKind::Cnot, 4, 5),
        ];
        let mut dag = Dag::from_gates(&gates);
        let c0 = insert_checkpoints(&mut dag, 2).unwrap();

        let band_depths: HashSet<usize> = dag
            .iter_handles()
            .filter(|&id| dag.node(id).is_checkpoint())
            .map(|id| dag.node(id).depth)
            .collect();
        assert_eq!(band_depths, HashSet::from([0, 2, 4, 6]));
        assert_eq!(dag.node(c0).depth, 0);
    }

    #[test]
    fn malformed_dag_yields_two_terminal_checkpoints() {
        // Two independent frontier gates, normally both depth 0. Forcing the
        // second one's depth to 5 simulates a DAG whose depth bookkeeping
        // disagrees with its structure: the two gates now fall into
        // non-adjacent checkpoint bands that never get linked into a single
        // chain, leaving two checkpoints with no `next` pointer.
        let gates = vec![
            GateSpec::single(GateKind::X, 0),
            GateSpec::single(GateKind::X, 1),
        ];
        let mut dag = Dag::from_gates(&gates);
        dag.node_mut(NodeId(1)).depth = 5;

        let err = insert_checkpoints(&mut dag, 2).unwrap_err();
        assert!(matches!(err, MapError::MalformedDag(2)));
    }
}
