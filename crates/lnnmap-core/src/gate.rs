//! Gate kinds and the linear, pre-DAG gate descriptor.
//!
//! This module provides:
//! - `GateKind`: the nine gate kinds the mapper recognizes, with fixed costs
//! - `Operand`: the second operand of a gate, whose meaning depends on kind
//! - `GateSpec`: a gate as produced by ingest, before dependency wiring

use serde::{Deserialize, Serialize};

/// The gate kinds understood by the mapper.
///
/// Each kind has a fixed cost in the cost model used throughout the engine:
/// `CNOT` = 10, `SWAP` = 30, `X`/`SQRT_X` = 1, all others = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    Cnot,
    Swap,
    Measure,
    RotateZ,
    SqrtX,
    Barrier,
    X,
    FreeSwap,
    Checkpoint,
}

impl GateKind {
    /// Returns the fixed cost of a gate of this kind.
    pub fn cost(&self) -> u32 {
        match self {
            GateKind::Cnot => 10,
            GateKind::Swap => 30,
            GateKind::X | GateKind::SqrtX => 1,
            GateKind::Measure
            | GateKind::RotateZ
            | GateKind::Barrier
            | GateKind::FreeSwap
            | GateKind::Checkpoint => 0,
        }
    }

    /// Returns true for gates that act on exactly two qubits (`CNOT`, `SWAP`).
    pub fn is_two_qubit(&self) -> bool {
        matches!(self, GateKind::Cnot | GateKind::Swap)
    }

    /// Returns the assembly mnemonic for this kind, or `None` for kinds that
    /// never appear verbatim in the textual format (`FREE_SWAP`, `CHECKPOINT`).
    pub fn mnemonic(&self) -> Option<&'static str> {
        match self {
            GateKind::Cnot => Some("cx"),
            GateKind::Swap => Some("swap"),
            GateKind::Measure => Some("measure"),
            GateKind::RotateZ => Some("rz"),
            GateKind::SqrtX => Some("sx"),
            GateKind::Barrier => Some("barrier"),
            GateKind::X => Some("x"),
            GateKind::FreeSwap | GateKind::Checkpoint => None,
        }
    }

    /// Resolves a mnemonic from the textual format to a `GateKind`.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        match name {
            "cx" => Some(GateKind::Cnot),
            "swap" => Some(GateKind::Swap),
            "measure" => Some(GateKind::Measure),
            "rz" => Some(GateKind::RotateZ),
            "sx" => Some(GateKind::SqrtX),
            "barrier" => Some(GateKind::Barrier),
            "x" => Some(GateKind::X),
            _ => None,
        }
    }
}

/// The second operand of a gate. Its meaning is kind-dependent: a qubit for
/// `CNOT`/`SWAP`, a classical-bit index for `MEASURE`, a qubit list for
/// `BARRIER`, and absent for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    None,
    Qubit(usize),
    ClassicalBit(usize),
    Qubits(Vec<usize>),
}

impl Operand {
    pub fn as_qubit(&self) -> Option<usize> {
        match self {
            Operand::Qubit(q) => Some(*q),
            _ => None,
        }
    }

    pub fn as_qubits(&self) -> &[usize] {
        match self {
            Operand::Qubits(qs) => qs,
            _ => &[],
        }
    }
}

/// A gate in linear program order, before dependency wiring.
///
/// Produced by ingest (`lnnmap-qasm`) with operand indices already normalized
/// across registers into a single logical qubit index space, and consumed by
/// DAG construction (`lnnmap-map`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSpec {
    pub kind: GateKind,
    pub q1: usize,
    pub q2: Operand,
    pub params: Vec<f64>,
}

impl GateSpec {
    pub fn new(kind: GateKind, q1: usize, q2: Operand, params: Vec<f64>) -> Self {
        Self {
            kind,
            q1,
            q2,
            params,
        }
    }

    pub fn single(kind: GateKind, q1: usize) -> Self {
        Self::new(kind, q1, Operand::None, Vec::new())
    }

    pub fn two_qubit(kind: GateKind, q1: usize, q2: usize) -> Self {
        Self::new(kind, q1, Operand::Qubit(q2), Vec::new())
    }

    /// Returns the set of qubits this gate depends on for dependency wiring
    /// (§4.1): both operands for `CNOT`/`SWAP`, only `q1` for `MEASURE`, all
    /// listed qubits for `BARRIER`, and only `q1` for single-qubit gates.
    pub fn dependency_qubits(&self) -> Vec<usize> {
        match self.kind {
            GateKind::Cnot | GateKind::Swap => {
                let mut qs = vec![self.q1];
                if let Some(q2) = self.q2.as_qubit() {
                    qs.push(q2);
                }
                qs
            }
            GateKind::Barrier => self.q2.as_qubits().to_vec(),
            _ => vec![self.q1],
        }
    }

    pub fn cost(&self) -> u32 {
        self.kind.cost()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn costs_match_spec_table() {
        assert_eq!(GateKind::Cnot.cost(), 10);
        assert_eq!(GateKind::Swap.cost(), 30);
        assert_eq!(GateKind::X.cost(), 1);
        assert_eq!(GateKind::SqrtX.cost(), 1);
        assert_eq!(GateKind::Measure.cost(), 0);
        assert_eq!(GateKind::RotateZ.cost(), 0);
        assert_eq!(GateKind::Barrier.cost(), 0);
        assert_eq!(GateKind::FreeSwap.cost(), 0);
        assert_eq!(GateKind::Checkpoint.cost(), 0);
    }

    #[test]
    fn mnemonic_roundtrip() {
        for kind in [
            GateKind::Cnot,
            GateKind::Swap,
            GateKind::Measure,
            GateKind::RotateZ,
            GateKind::SqrtX,
            GateKind::Barrier,
            GateKind::X,
        ] {
            let mnemonic = kind.mnemonic().unwrap();
            assert_eq!(GateKind::from_mnemonic(mnemonic), Some(kind));
        }
        assert_eq!(GateKind::from_mnemonic("unknown_gate"), None);
    }

    #[test]
    fn dependency_qubits_barrier() {
        let g = GateSpec::new(GateKind::Barrier, 0, Operand::Qubits(vec![0, 1, 2]), vec![]);
        assert_eq!(g.dependency_qubits(), vec![0, 1, 2]);
    }

    #[test]
    fn dependency_qubits_measure_ignores_classical_bit() {
        let g = GateSpec::new(GateKind::Measure, 3, Operand::ClassicalBit(1), vec![]);
        assert_eq!(g.dependency_qubits(), vec![3]);
    }
}
