//! Coupling analysis (§2 step 1).
//!
//! Computes per-qubit neighbour sets and an all-pairs distance matrix from a
//! coupling map via breadth-first search, and provides a small set of named
//! default device topologies (§2.2).

use std::collections::{HashSet, VecDeque};

use lnnmap_core::MapError;

/// An undirected coupling graph over physical qubit indices, plus its
/// derived neighbour sets and all-pairs distance matrix.
#[derive(Debug, Clone)]
pub struct CouplingGraph {
    qubit_count: usize,
    neighbours: Vec<Vec<usize>>,
    distances: Vec<Vec<usize>>,
}

impl CouplingGraph {
    /// Builds a coupling graph from an edge list, treating each edge as
    /// undirected regardless of the order its endpoints are given in.
    pub fn from_edges(qubit_count: usize, edges: &[(usize, usize)]) -> lnnmap_core::Result<Self> {
        let mut neighbours = vec![Vec::new(); qubit_count];
        let mut seen = HashSet::new();
        for &(a, b) in edges {
            if a >= qubit_count || b >= qubit_count {
                return Err(MapError::QubitOutOfRange(a.max(b), qubit_count));
            }
            let edge = (a.min(b), a.max(b));
            if seen.insert(edge) {
                neighbours[a].push(b);
                neighbours[b].push(a);
            }
        }
        for adj in &mut neighbours {
            adj.sort_unstable();
            adj.dedup();
        }

        let distances = (0..qubit_count)
            .map(|source| bfs_distances(source, &neighbours))
            .collect();

        Ok(Self {
            qubit_count,
            neighbours,
            distances,
        })
    }

    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    pub fn neighbours(&self, physical: usize) -> &[usize] {
        &self.neighbours[physical]
    }

    /// Distance between two physical qubits, or `usize::MAX` if disconnected.
    pub fn distance(&self, p1: usize, p2: usize) -> usize {
        self.distances[p1][p2]
    }

    pub fn are_adjacent(&self, p1: usize, p2: usize) -> bool {
        self.distance(p1, p2) == 1
    }

    /// Physical qubits adjacent to both `p1` and `p2`, used by bridge
    /// expansion (§4.4 step 2) to pick the bridging qubit.
    pub fn common_neighbours(&self, p1: usize, p2: usize) -> Vec<usize> {
        self.neighbours[p1]
            .iter()
            .filter(|n| self.neighbours[p2].contains(n))
            .copied()
            .collect()
    }

    /// A linear chain `0 - 1 - ... - (n-1)`.
    pub fn linear(qubit_count: usize) -> Self {
        let edges: Vec<_> = (0..qubit_count.saturating_sub(1))
            .map(|i| (i, i + 1))
            .collect();
        Self::from_edges(qubit_count, &edges).expect("linear topology is self-consistent")
    }

    /// A rectangular grid of `rows * cols` qubits, row-major indexed, with
    /// horizontal and vertical nearest-neighbour edges.
    pub fn grid(rows: usize, cols: usize) -> Self {
        let mut edges = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let idx = r * cols + c;
                if c + 1 < cols {
                    edges.push((idx, idx + 1));
                }
                if r + 1 < rows {
                    edges.push((idx, idx + cols));
                }
            }
        }
        Self::from_edges(rows * cols, &edges).expect("grid topology is self-consistent")
    }

    /// A fixed heavy-hex-like layout: alternating rows of densely connected
    /// qubits joined by single bridge qubits, echoing IBM's heavy-hex devices.
    pub fn heavy_hex(rows: usize, cols: usize) -> Self {
        let bridges_per_gap = cols.div_ceil(2);
        let bridge_rows = rows.saturating_sub(1);
        let qubit_count = rows * cols + bridge_rows * bridges_per_gap;

        let mut edges = Vec::new();
        for row in 0..rows {
            let main_row_offset: usize = (0..row)
                .map(|r| cols + if r < rows - 1 { bridges_per_gap } else { 0 })
                .sum();

            for c in 0..cols.saturating_sub(1) {
                edges.push((main_row_offset + c, main_row_offset + c + 1));
            }

            if row < rows - 1 {
                let bridge_row_offset = main_row_offset + cols;
                let next_main_offset = main_row_offset + cols + bridges_per_gap;
                for b in 0..bridges_per_gap {
                    let bridge_col = b * 2;
                    if bridge_col < cols {
                        let bridge_idx = bridge_row_offset + b;
                        edges.push((main_row_offset + bridge_col, bridge_idx));
                        edges.push((bridge_idx, next_main_offset + bridge_col));
                    }
                }
            }
        }
        Self::from_edges(qubit_count, &edges).expect("heavy-hex topology is self-consistent")
    }

    /// Resolves a built-in topology by name, with an explicit qubit count
    /// for the parameterized shapes.
    pub fn named(name: &str, qubit_count: usize) -> Option<Self> {
        match name {
            "linear" => Some(Self::linear(qubit_count)),
            "grid" => {
                let side = (qubit_count as f64).sqrt().round() as usize;
                Some(Self::grid(side, qubit_count.div_ceil(side.max(1))).truncated(qubit_count))
            }
            "heavy-hex" | "heavy_hex" => Some(
                Self::heavy_hex(2, qubit_count.div_ceil(2).max(1)).truncated(qubit_count),
            ),
            _ => None,
        }
    }

    /// Restricts the graph to its first `qubit_count` physical indices,
    /// dropping edges to excluded qubits. Used by [`Self::named`] so the
    /// parameterized topologies (`grid`, `heavy-hex`) always return exactly
    /// the requested qubit count even when their natural shape would
    /// overshoot it; the mapper's permutation is square over the logical
    /// space and cannot tolerate a larger device (§3, §9).
    fn truncated(&self, qubit_count: usize) -> Self {
        if qubit_count >= self.qubit_count {
            return self.clone();
        }
        let edges: Vec<_> = (0..qubit_count)
            .flat_map(|q| {
                self.neighbours[q]
                    .iter()
                    .filter(move |&&n| n < qubit_count && n > q)
                    .map(move |&n| (q, n))
            })
            .collect();
        Self::from_edges(qubit_count, &edges).expect("truncation cannot introduce invalid edges")
    }
}

fn bfs_distances(source: usize, neighbours: &[Vec<usize>]) -> Vec<usize> {
    let n = neighbours.len();
    let mut dist = vec![usize::MAX; n];
    dist[source] = 0;
    let mut queue = VecDeque::new();
    queue.push_back(source);
    while let Some(node) = queue.pop_front() {
        let d = dist[node];
        for &next in &neighbours[node] {
            if dist[next] == usize::MAX {
                dist[next] = d + 1;
                queue.push_back(next);
            }
        }
    }
    dist
}
