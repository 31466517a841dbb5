//! The A*-style best-first search over mapping states (§4.3).

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::rc::Rc;

use lnnmap_core::{MapError, Result};
use tracing::{debug, trace};

use crate::coupling::CouplingGraph;
use crate::dag::Dag;
use crate::state::State;

/// A priority-queue entry ordering states ascending by total cost `f(s)`,
/// tie-broken by deeper active-checkpoint depth (preferring states that have
/// committed further into the circuit), then by insertion order for
/// reproducibility (§5).
struct QueueEntry {
    total_cost: u32,
    checkpoint_depth: usize,
    sequence: u64,
    state: Rc<State>,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.total_cost == other.total_cost
            && self.checkpoint_depth == other.checkpoint_depth
            && self.sequence == other.sequence
    }
}
impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse every key so the smallest total
        // cost, deepest checkpoint, and earliest insertion sort highest.
        other
            .total_cost
            .cmp(&self.total_cost)
            .then_with(|| self.checkpoint_depth.cmp(&other.checkpoint_depth))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Runs the checkpoint-gated A* search to completion and returns the winning
/// terminal state, or `MapError::Unmappable` if the frontier is exhausted
/// first.
///
/// The checkpoint-depth gate (`D_max`): a popped state is discarded if its
/// active checkpoint lies behind the deepest checkpoint any *accepted*
/// (non-discarded) state has reached so far. `D_max` is updated only when a
/// state is popped and accepted, not merely generated as a successor — this
/// is a deliberate simplification of the original algorithm's successor-time
/// update, recorded as an open-question decision in DESIGN.md.
pub fn run(dag: &Dag, coupling: &CouplingGraph, root_checkpoint: crate::dag::NodeId, checkpoint_look_ahead: usize) -> Result<Rc<State>> {
    let root = Rc::new(State::root(dag, root_checkpoint));

    let mut heap: BinaryHeap<QueueEntry> = BinaryHeap::new();
    let mut visited: HashSet<Rc<State>> = HashSet::new();
    let mut sequence = 0u64;
    let mut max_checkpoint_depth = root.checkpoint_depth(dag);

    push(&mut heap, &mut sequence, root, dag, coupling, checkpoint_look_ahead);

    while let Some(entry) = heap.pop() {
        let state = entry.state;

        if entry.checkpoint_depth < max_checkpoint_depth {
            trace!(depth = entry.checkpoint_depth, max = max_checkpoint_depth, "state discarded by checkpoint gate");
            continue;
        }
        if !visited.insert(state.clone()) {
            continue;
        }
        max_checkpoint_depth = max_checkpoint_depth.max(entry.checkpoint_depth);

        if state.is_done(dag) {
            debug!(cost = state.cost, "search converged");
            return Ok(state);
        }

        for successor in successors(&state, dag, coupling) {
            push(&mut heap, &mut sequence, successor, dag, coupling, checkpoint_look_ahead);
        }
    }

    Err(MapError::Unmappable)
}

/// Computes the successor set for a state: the eager-execution fixpoint if
/// any gate is immediately executable, otherwise bridge and swap expansion
/// (§4.4). `execute_eager` already loops internally to a fixpoint, so a
/// single call either reaches a done state, or leaves no further gate
/// immediately executable and falls through to bridge/swap expansion.
fn successors(state: &Rc<State>, dag: &Dag, coupling: &CouplingGraph) -> Vec<Rc<State>> {
    match state.execute_eager(dag, coupling) {
        Some(advanced) if advanced.is_done(dag) => vec![advanced],
        Some(advanced) => advanced.generate_successors(dag, coupling),
        None => state.generate_successors(dag, coupling),
    }
}

fn push(
    heap: &mut BinaryHeap<QueueEntry>,
    sequence: &mut u64,
    state: Rc<State>,
    dag: &Dag,
    coupling: &CouplingGraph,
    checkpoint_look_ahead: usize,
) {
    let total_cost = state.total_cost(dag, coupling, checkpoint_look_ahead);
    let checkpoint_depth = state.checkpoint_depth(dag);
    let entry = QueueEntry {
        total_cost,
        checkpoint_depth,
        sequence: *sequence,
        state,
    };
    *sequence += 1;
    heap.push(entry);
}
