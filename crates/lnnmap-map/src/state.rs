//! Search state (§3 "State (search node)") and state transitions (§4.4).

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use lnnmap_core::{GateKind, GateSpec, Mapping, Operand};

use crate::coupling::CouplingGraph;
use crate::dag::{Dag, NodeId};

const BRIDGE_DISTANCE: usize = 3;

/// A node in the search space. Immutable once constructed; successors share
/// their ancestry through a reference-counted `parent` chain (§5, §9), so
/// reconstruction never needs to copy a state to walk it.
#[derive(Debug, Clone)]
pub struct State {
    pub working_set: BTreeSet<NodeId>,
    pub resolved: BTreeSet<NodeId>,
    pub mapping: Mapping,
    pub cost: u32,
    pub remaining_cost: u32,
    /// The physical-level gate emitted by the transition that produced this
    /// state. Absent for the root.
    pub output: Option<GateSpec>,
    pub parent: Option<Rc<State>>,
    pub used_qubits: BTreeSet<usize>,
    pub checkpoint: NodeId,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
            && self.remaining_cost == other.remaining_cost
            && self.mapping == other.mapping
            && self.working_set == other.working_set
    }
}
impl Eq for State {}

impl Hash for State {
    /// A weak hash matching the original implementation's `cost ^
    /// remaining_cost ^ mapping_hash`: frontier equality is still checked in
    /// full by `eq`, so collisions here only cost an extra comparison.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cost.hash(state);
        self.remaining_cost.hash(state);
        self.mapping.hash(state);
    }
}

impl State {
    /// Builds the root state: working set `{C_0}`, zero cost, remaining cost
    /// equal to the sum of every original gate's cost.
    pub fn root(dag: &Dag, root_checkpoint: NodeId) -> Self {
        let remaining_cost: u32 = dag
            .iter_handles()
            .filter_map(|id| dag.node(id).spec.as_ref())
            .map(|spec| spec.cost())
            .sum();

        let mut working_set = BTreeSet::new();
        working_set.insert(root_checkpoint);

        Self {
            working_set,
            resolved: BTreeSet::new(),
            mapping: Mapping::identity(dag_qubit_count(dag)),
            cost: 0,
            remaining_cost,
            output: None,
            parent: None,
            used_qubits: BTreeSet::new(),
            checkpoint: root_checkpoint,
        }
    }

    /// True iff the working set is empty, or contains only the terminal
    /// (`done`) checkpoint (§3, §4.3).
    pub fn is_done(&self, dag: &Dag) -> bool {
        if self.working_set.is_empty() {
            return true;
        }
        if self.working_set.len() != 1 {
            return false;
        }
        let only = *self.working_set.iter().next().unwrap();
        dag.node(only)
            .checkpoint
            .as_ref()
            .map(|cp| cp.done)
            .unwrap_or(false)
    }

    fn is_resolvable(&self, dag: &Dag, gate: NodeId) -> bool {
        dag.node(gate)
            .parents
            .iter()
            .all(|p| self.resolved.contains(p))
    }

    fn is_executable(&self, dag: &Dag, coupling: &CouplingGraph, gate: NodeId) -> bool {
        let node = dag.node(gate);
        match &node.spec {
            Some(spec) if spec.kind.is_two_qubit() => {
                self.execution_distance(spec, coupling) == 1
            }
            Some(_) => true,
            None => node
                .checkpoint
                .as_ref()
                .map(|cp| cp.next.is_some())
                .unwrap_or(false),
        }
    }

    fn execution_distance(&self, spec: &GateSpec, coupling: &CouplingGraph) -> usize {
        let p1 = self.mapping.logical_to_physical(spec.q1);
        let p2 = self.mapping.logical_to_physical(spec.q2.as_qubit().unwrap());
        coupling.distance(p1, p2)
    }

    /// Folds every gate currently both resolvable and executable into this
    /// state, one at a time, until none remain (§4.4 step 1). Returns `None`
    /// if no gate could be executed.
    pub fn execute_eager(self: &Rc<Self>, dag: &Dag, coupling: &CouplingGraph) -> Option<Rc<Self>> {
        let mut current = self.clone();
        let mut changed = false;
        loop {
            let candidate = current
                .working_set
                .iter()
                .copied()
                .find(|&g| current.is_resolvable(dag, g) && current.is_executable(dag, coupling, g));
            match candidate {
                Some(gate) => {
                    current = Rc::new(current.execute_gate(dag, gate));
                    changed = true;
                }
                None => break,
            }
        }
        if changed {
            Some(current)
        } else {
            None
        }
    }

    /// Executes a single resolvable, executable gate, producing the successor
    /// state. `self` is the shared ancestor the new state's `parent` points
    /// back to.
    fn execute_gate(self: &Rc<Self>, dag: &Dag, gate: NodeId) -> State {
        let node = dag.node(gate);

        let mut working_set = self.working_set.clone();
        working_set.remove(&gate);
        for &child in &node.children {
            working_set.insert(child);
        }

        let mut resolved = self.resolved.clone();
        resolved.insert(gate);

        let gate_cost = node.spec.as_ref().map(|s| s.cost()).unwrap_or(0);
        let cost = self.cost + gate_cost;
        let remaining_cost = self.remaining_cost - gate_cost;

        let mut used_qubits = self.used_qubits.clone();
        let output = node.spec.as_ref().map(|spec| {
            let physical = to_physical(spec, &self.mapping);
            if physical.kind.is_two_qubit() {
                used_qubits.insert(physical.q1);
                used_qubits.insert(physical.q2.as_qubit().unwrap());
            }
            physical
        });

        let checkpoint = if node.is_checkpoint() {
            node.checkpoint.as_ref().unwrap().next.unwrap()
        } else {
            self.checkpoint
        };

        State {
            working_set,
            resolved,
            mapping: self.mapping.clone(),
            cost,
            remaining_cost,
            output,
            parent: Some(self.clone()),
            used_qubits,
            checkpoint,
        }
    }

    /// Generates all non-eager successors (§4.4 steps 2-3): bridge expansion
    /// for resolvable distance-3 CNOTs, and swap expansion for every
    /// two-qubit gate in the working set, whether or not its parents are
    /// resolved yet.
    pub fn generate_successors(self: &Rc<Self>, dag: &Dag, coupling: &CouplingGraph) -> Vec<Rc<State>> {
        let mut successors = Vec::new();

        let two_qubit_gates: Vec<NodeId> = self
            .working_set
            .iter()
            .copied()
            .filter(|&g| {
                dag.node(g)
                    .spec
                    .as_ref()
                    .map(|s| s.kind.is_two_qubit())
                    .unwrap_or(false)
            })
            .collect();

        for gate in two_qubit_gates {
            let spec = dag.node(gate).spec.clone().unwrap();
            let resolvable = self.is_resolvable(dag, gate);
            if resolvable
                && spec.kind == GateKind::Cnot
                && self.execution_distance(&spec, coupling) == BRIDGE_DISTANCE
            {
                successors.extend(self.generate_bridge(dag, gate, &spec, coupling));
            }

            successors.extend(self.generate_swap(spec.q1, coupling));
            successors.extend(self.generate_swap(spec.q2.as_qubit().unwrap(), coupling));
        }

        successors
    }

    /// Expands a resolvable distance-3 CNOT into a chain of four physical
    /// CNOTs per common neighbour of its endpoints (§4.4 step 2): `CNOT(pi,
    /// p2)`, `CNOT(p1,pi)`, `CNOT(pi,p2)`, `CNOT(p1,pi)`, at costs `+10,
    /// +20, +30, +40`. Only the last of the four advances the frontier and
    /// the mapping is unchanged throughout; the first three exist solely so
    /// reconstruction recovers all four physical gates in order.
    fn generate_bridge(
        self: &Rc<Self>,
        dag: &Dag,
        gate: NodeId,
        spec: &GateSpec,
        coupling: &CouplingGraph,
    ) -> Vec<Rc<State>> {
        let p1 = self.mapping.logical_to_physical(spec.q1);
        let p2 = self.mapping.logical_to_physical(spec.q2.as_qubit().unwrap());

        coupling
            .common_neighbours(p1, p2)
            .into_iter()
            .map(|pi| {
                let s1 = Rc::new(State {
                    working_set: self.working_set.clone(),
                    resolved: self.resolved.clone(),
                    mapping: self.mapping.clone(),
                    cost: self.cost + 10,
                    remaining_cost: self.remaining_cost,
                    output: Some(GateSpec::two_qubit(GateKind::Cnot, pi, p2)),
                    parent: Some(self.clone()),
                    used_qubits: self.used_qubits.clone(),
                    checkpoint: self.checkpoint,
                });
                let s2 = Rc::new(State {
                    working_set: self.working_set.clone(),
                    resolved: self.resolved.clone(),
                    mapping: self.mapping.clone(),
                    cost: self.cost + 20,
                    remaining_cost: self.remaining_cost,
                    output: Some(GateSpec::two_qubit(GateKind::Cnot, p1, pi)),
                    parent: Some(s1),
                    used_qubits: self.used_qubits.clone(),
                    checkpoint: self.checkpoint,
                });
                let s3 = Rc::new(State {
                    working_set: self.working_set.clone(),
                    resolved: self.resolved.clone(),
                    mapping: self.mapping.clone(),
                    cost: self.cost + 30,
                    remaining_cost: self.remaining_cost,
                    output: Some(GateSpec::two_qubit(GateKind::Cnot, pi, p2)),
                    parent: Some(s2),
                    used_qubits: self.used_qubits.clone(),
                    checkpoint: self.checkpoint,
                });

                let node = dag.node(gate);
                let mut working_set = self.working_set.clone();
                working_set.remove(&gate);
                for &child in &node.children {
                    working_set.insert(child);
                }
                let mut resolved = self.resolved.clone();
                resolved.insert(gate);
                let mut used_qubits = self.used_qubits.clone();
                used_qubits.insert(p1);
                used_qubits.insert(p2);
                used_qubits.insert(pi);

                Rc::new(State {
                    working_set,
                    resolved,
                    mapping: self.mapping.clone(),
                    cost: self.cost + 40,
                    remaining_cost: self.remaining_cost - GateKind::Cnot.cost(),
                    output: Some(GateSpec::two_qubit(GateKind::Cnot, p1, pi)),
                    parent: Some(s3),
                    used_qubits,
                    checkpoint: self.checkpoint,
                })
            })
            .collect()
    }

    /// Expands a single logical qubit's physical position into one successor
    /// per coupling neighbour (§4.4 step 3). A swap between two qubits
    /// neither of which has hosted a committed two-qubit gate yet is "free":
    /// it costs nothing and is absorbed into the initial mapping by
    /// back-propagation (§4.5) rather than emitted.
    fn generate_swap(self: &Rc<Self>, logical_qubit: usize, coupling: &CouplingGraph) -> Vec<Rc<State>> {
        let p = self.mapping.logical_to_physical(logical_qubit);
        coupling
            .neighbours(p)
            .iter()
            .map(|&pn| {
                let ln = self.mapping.physical_to_logical(pn);
                let mapping = self.mapping.swap(logical_qubit, ln);

                if self.used_qubits.contains(&p) || self.used_qubits.contains(&pn) {
                    let mut used_qubits = self.used_qubits.clone();
                    used_qubits.insert(p);
                    used_qubits.insert(pn);
                    Rc::new(State {
                        working_set: self.working_set.clone(),
                        resolved: self.resolved.clone(),
                        mapping,
                        cost: self.cost + GateKind::Swap.cost(),
                        remaining_cost: self.remaining_cost,
                        output: Some(GateSpec::two_qubit(GateKind::Swap, p, pn)),
                        parent: Some(self.clone()),
                        used_qubits,
                        checkpoint: self.checkpoint,
                    })
                } else {
                    Rc::new(State {
                        working_set: self.working_set.clone(),
                        resolved: self.resolved.clone(),
                        mapping,
                        cost: self.cost,
                        remaining_cost: self.remaining_cost,
                        output: Some(GateSpec::two_qubit(GateKind::FreeSwap, p, pn)),
                        parent: Some(self.clone()),
                        used_qubits: self.used_qubits.clone(),
                        checkpoint: self.checkpoint,
                    })
                }
            })
            .collect()
    }

    /// The heuristic `h(s)` (§4.3): remaining gate cost plus an
    /// intentionally non-admissible swap-penalty term summed over
    /// unresolved CNOTs in the active checkpoint's look-ahead window. Reads
    /// from the checkpoint *preceding* the active one, then walks forward.
    pub fn heuristic(&self, dag: &Dag, coupling: &CouplingGraph, look_ahead: usize) -> u32 {
        let prev = match dag.node(self.checkpoint).checkpoint.as_ref().unwrap().prev {
            Some(prev) => prev,
            None => return self.remaining_cost,
        };

        let mut penalty = 0u32;
        for gate in gates_to_consider(dag, prev, look_ahead) {
            if self.resolved.contains(&gate) {
                continue;
            }
            let Some(spec) = dag.node(gate).spec.as_ref() else {
                continue;
            };
            if spec.kind != GateKind::Cnot {
                continue;
            }
            let distance = self.execution_distance(spec, coupling);
            penalty += distance.saturating_sub(1) as u32;
        }

        self.remaining_cost + penalty * 30
    }

    pub fn total_cost(&self, dag: &Dag, coupling: &CouplingGraph, look_ahead: usize) -> u32 {
        self.cost + self.heuristic(dag, coupling, look_ahead)
    }

    pub fn checkpoint_depth(&self, dag: &Dag) -> usize {
        dag.node(self.checkpoint).depth
    }
}

/// Walks `cp.gates` for up to `look_ahead` checkpoints starting at `start`,
/// following the `next` chain (mirrors `Checkpoint.gates_to_consider`).
fn gates_to_consider(dag: &Dag, start: NodeId, look_ahead: usize) -> BTreeSet<NodeId> {
    let mut gates = BTreeSet::new();
    let mut cursor = Some(start);
    for _ in 0..look_ahead {
        let Some(cp) = cursor else { break };
        let data = dag.node(cp).checkpoint.as_ref().unwrap();
        gates.extend(data.gates.iter().copied());
        cursor = data.next;
    }
    gates
}

/// Converts a logical-indexed gate spec to its physical-indexed counterpart
/// under `mapping`. `MEASURE`'s classical-bit operand is left untouched.
fn to_physical(spec: &GateSpec, mapping: &Mapping) -> GateSpec {
    let q1 = mapping.logical_to_physical(spec.q1);
    match &spec.q2 {
        Operand::Qubit(q2) => GateSpec::new(
            spec.kind,
            q1,
            Operand::Qubit(mapping.logical_to_physical(*q2)),
            spec.params.clone(),
        ),
        Operand::Qubits(qs) => GateSpec::new(
            spec.kind,
            q1,
            Operand::Qubits(qs.iter().map(|&q| mapping.logical_to_physical(q)).collect()),
            spec.params.clone(),
        ),
        other => GateSpec::new(spec.kind, q1, other.clone(), spec.params.clone()),
    }
}

fn dag_qubit_count(dag: &Dag) -> usize {
    dag.iter_handles()
        .filter_map(|id| dag.node(id).spec.as_ref())
        .flat_map(|spec| spec.dependency_qubits())
        .max()
        .map(|m| m + 1)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::insert_checkpoints;
    use lnnmap_core::GateKind;

    #[test]
    fn root_state_working_set_is_the_root_checkpoint() {
        let gates = vec![GateSpec::two_qubit(GateKind::Cnot, 0, 1)];
        let mut dag = Dag::from_gates(&gates);
        let c0 = insert_checkpoints(&mut dag, 3).unwrap();
        let root = State::root(&dag, c0);
        assert_eq!(root.working_set, BTreeSet::from([c0]));
        assert_eq!(root.remaining_cost, 10);
    }

    #[test]
    fn eager_execution_resolves_an_adjacent_cnot() {
        let gates = vec![GateSpec::two_qubit(GateKind::Cnot, 0, 1)];
        let mut dag = Dag::from_gates(&gates);
        let c0 = insert_checkpoints(&mut dag, 3).unwrap();
        let coupling = CouplingGraph::linear(2);
        let root = Rc::new(State::root(&dag, c0));

        let next = root.execute_eager(&dag, &coupling).unwrap();
        assert!(next.is_done(&dag));
        assert_eq!(next.cost, 10);
    }

    #[test]
    fn distant_cnot_generates_swap_successors() {
        let gates = vec![GateSpec::two_qubit(GateKind::Cnot, 0, 2)];
        let mut dag = Dag::from_gates(&gates);
        let c0 = insert_checkpoints(&mut dag, 3).unwrap();
        let coupling = CouplingGraph::linear(3);
        let root = Rc::new(State::root(&dag, c0));
        let advanced = root.execute_eager(&dag, &coupling).unwrap();

        assert!(!advanced.is_done(&dag));
        let successors = advanced.generate_successors(&dag, &coupling);
        assert!(!successors.is_empty());
        assert!(successors.iter().any(|s| matches!(
            s.output.as_ref().map(|g| g.kind),
            Some(GateKind::Swap) | Some(GateKind::FreeSwap)
        )));
    }
}
