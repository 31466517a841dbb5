//! Dependency DAG construction (§4.1) and its checkpoint extension (§3).
//!
//! Nodes live in a contiguous arena and are referenced by stable integer
//! handles rather than `Rc`/pointers, so the DAG is acyclic-by-construction
//! and cheap to clone or rewire during checkpoint insertion.

use std::collections::HashMap;

use lnnmap_core::GateSpec;

/// A stable handle into a [`Dag`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Checkpoint-specific fields, present only on nodes inserted by checkpoint
/// insertion (§4.2), never on ordinary gate nodes.
#[derive(Debug, Clone, Default)]
pub struct CheckpointData {
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    /// Gate handles in the band immediately preceding this checkpoint.
    pub gates: Vec<NodeId>,
    pub done: bool,
}

/// A node in the dependency DAG: either an original gate or a checkpoint
/// sentinel inserted by §4.2.
#[derive(Debug, Clone)]
pub struct DagNode {
    /// `None` for checkpoint nodes.
    pub spec: Option<GateSpec>,
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
    pub checkpoint: Option<CheckpointData>,
}

impl DagNode {
    pub fn is_checkpoint(&self) -> bool {
        self.checkpoint.is_some()
    }
}

/// The dependency DAG: a gate arena plus the frontier (gates with no
/// parents) computed during construction.
#[derive(Debug, Clone)]
pub struct Dag {
    nodes: Vec<DagNode>,
    frontier: Vec<NodeId>,
}

impl Dag {
    /// Builds the dependency DAG from a linear, program-order gate sequence
    /// (§4.1). Maintains `last_gate[q]`, the most recent gate to touch
    /// logical qubit `q`; a new gate's parents are the prior touches of its
    /// dependency qubits (`GateSpec::dependency_qubits`).
    pub fn from_gates(gates: &[GateSpec]) -> Self {
        let mut nodes = Vec::with_capacity(gates.len());
        let mut last_gate: HashMap<usize, NodeId> = HashMap::new();
        let mut frontier = Vec::new();

        for spec in gates {
            let id = NodeId(nodes.len());
            let dep_qubits = spec.dependency_qubits();

            let mut parents: Vec<NodeId> = dep_qubits
                .iter()
                .filter_map(|q| last_gate.get(q).copied())
                .collect();
            parents.sort_unstable();
            parents.dedup();

            let depth = parents
                .iter()
                .map(|p| nodes[p.0].depth + 1)
                .max()
                .unwrap_or(0);

            if parents.is_empty() {
                frontier.push(id);
            }
            for &parent in &parents {
                nodes[parent.0].children.push(id);
            }

            nodes.push(DagNode {
                spec: Some(spec.clone()),
                parents,
                children: Vec::new(),
                depth,
                checkpoint: None,
            });

            for q in dep_qubits {
                last_gate.insert(q, id);
            }
        }

        Self { nodes, frontier }
    }

    pub fn node(&self, id: NodeId) -> &DagNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut DagNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn frontier(&self) -> &[NodeId] {
        &self.frontier
    }

    /// Appends a new checkpoint node and returns its handle.
    pub fn push_checkpoint(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DagNode {
            spec: None,
            parents: Vec::new(),
            children: Vec::new(),
            depth: 0,
            checkpoint: Some(CheckpointData::default()),
        });
        id
    }

    pub fn iter_handles(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
}
