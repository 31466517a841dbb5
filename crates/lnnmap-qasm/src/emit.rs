//! Emitter adapter: renders the reconstructed physical gate list back to the
//! textual format (§4.6).

use lnnmap_core::{GateKind, GateSpec, Mapping, Operand};

use crate::error::{QasmError, Result};
use crate::ingest::ClassicalRegister;

/// Renders `gates` (already expressed over physical qubit indices) plus the
/// classical register declarations and the initial logical→physical mapping
/// into a single-qreg textual program.
///
/// Fails if `gates` contains a kind with no surface mnemonic (`FREE_SWAP`,
/// `CHECKPOINT`): both indicate a reconstruction bug, never a legitimate
/// output.
pub fn render_program(
    gates: &[GateSpec],
    cregs: &[ClassicalRegister],
    qubit_count: usize,
    initial_mapping: &Mapping,
) -> Result<String> {
    let mut out = String::new();
    out.push_str("OPENQASM 2.0;\n");
    out.push_str(&format!("qreg q[{}];\n", qubit_count));
    for creg in cregs {
        out.push_str(&format!("creg {}[{}];\n", creg.name, creg.size));
    }

    for gate in gates {
        out.push_str(&render_gate(gate, cregs)?);
        out.push('\n');
    }

    out.push_str("// i");
    for p in initial_mapping.l2p() {
        out.push(' ');
        out.push_str(&p.to_string());
    }
    out.push('\n');

    Ok(out)
}

fn render_gate(gate: &GateSpec, cregs: &[ClassicalRegister]) -> Result<String> {
    match gate.kind {
        GateKind::Cnot => Ok(format!("cx q[{}],q[{}];", gate.q1, gate.q2.as_qubit().unwrap())),
        GateKind::Swap => Ok(format!("swap q[{}],q[{}];", gate.q1, gate.q2.as_qubit().unwrap())),
        GateKind::X => Ok(format!("x q[{}];", gate.q1)),
        GateKind::SqrtX => Ok(format!("sx q[{}];", gate.q1)),
        GateKind::RotateZ => {
            let theta = gate.params.first().copied().unwrap_or(0.0);
            Ok(format!("rz({}) q[{}];", theta, gate.q1))
        }
        GateKind::Barrier => {
            let qs = gate.q2.as_qubits();
            let args = qs
                .iter()
                .map(|q| format!("q[{}]", q))
                .collect::<Vec<_>>()
                .join(",");
            Ok(format!("barrier {};", args))
        }
        GateKind::Measure => {
            let bit = match gate.q2 {
                Operand::ClassicalBit(b) => b,
                _ => {
                    return Err(QasmError::BuildError(
                        "MEASURE gate missing classical-bit operand".to_string(),
                    ))
                }
            };
            let (name, idx) = resolve_classical_bit_name(cregs, bit)?;
            Ok(format!("measure q[{}] -> {}[{}];", gate.q1, name, idx))
        }
        GateKind::FreeSwap => Err(QasmError::BuildError(
            "FREE_SWAP survived into emission".to_string(),
        )),
        GateKind::Checkpoint => Err(QasmError::BuildError(
            "CHECKPOINT survived into emission".to_string(),
        )),
    }
}

fn resolve_classical_bit_name(
    cregs: &[ClassicalRegister],
    bit: usize,
) -> Result<(String, usize)> {
    let mut offset = 0usize;
    for creg in cregs {
        if bit < offset + creg.size {
            return Ok((creg.name.clone(), bit - offset));
        }
        offset += creg.size;
    }
    Err(QasmError::BuildError(format!(
        "classical bit {} has no owning creg",
        bit
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_single_cnot_with_mapping_comment() {
        let gates = vec![GateSpec::two_qubit(GateKind::Cnot, 0, 1)];
        let mapping = Mapping::identity(2);
        let rendered = render_program(&gates, &[], 2, &mapping).unwrap();
        assert!(rendered.contains("cx q[0],q[1];"));
        assert!(rendered.contains("// i 0 1"));
    }

    #[test]
    fn rejects_free_swap_in_emission() {
        let gates = vec![GateSpec::two_qubit(GateKind::FreeSwap, 0, 1)];
        let mapping = Mapping::identity(2);
        assert!(render_program(&gates, &[], 2, &mapping).is_err());
    }

    #[test]
    fn renders_measure_with_resolved_creg() {
        let cregs = vec![ClassicalRegister {
            name: "c".to_string(),
            size: 2,
        }];
        let gates = vec![GateSpec::new(
            GateKind::Measure,
            1,
            Operand::ClassicalBit(1),
            vec![],
        )];
        let mapping = Mapping::identity(2);
        let rendered = render_program(&gates, &cregs, 2, &mapping).unwrap();
        assert!(rendered.contains("measure q[1] -> c[1];"));
    }
}
