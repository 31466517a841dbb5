//! Ingest: resolves the parsed AST into a linear `GateSpec` sequence (§4.0).
//!
//! Quantum registers are assigned contiguous offsets into one logical qubit
//! index space, in declaration order. Classical register declarations are
//! recorded verbatim for the emitter but are otherwise inert here: the
//! engine never sees classical bits.

use std::collections::HashMap;

use lnnmap_core::{GateKind, GateSpec, Operand};

use crate::ast::{Argument, Program, Statement};
use crate::error::{QasmError, Result};

/// A classical register declaration, carried through to the emitter verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassicalRegister {
    pub name: String,
    pub size: usize,
}

/// The result of ingest: a flat logical qubit space and the gates that act
/// on it, in program order.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedProgram {
    pub qubit_count: usize,
    pub gates: Vec<GateSpec>,
    pub cregs: Vec<ClassicalRegister>,
}

struct RegisterMap {
    offsets: HashMap<String, (usize, usize)>,
}

impl RegisterMap {
    fn resolve(&self, arg: &Argument) -> Result<usize> {
        match arg {
            Argument::Indexed(name, idx) => {
                let (start, size) = self.offsets.get(name).ok_or_else(|| {
                    QasmError::BuildError(format!("undefined qreg '{}'", name))
                })?;
                if idx >= size {
                    return Err(QasmError::BuildError(format!(
                        "index {} out of bounds for qreg '{}' of size {}",
                        idx, name, size
                    )));
                }
                Ok(start + idx)
            }
            Argument::Id(name) => {
                let (start, size) = self.offsets.get(name).ok_or_else(|| {
                    QasmError::BuildError(format!("undefined qreg '{}'", name))
                })?;
                if *size == 1 {
                    Ok(*start)
                } else {
                    Err(QasmError::BuildError(format!(
                        "register '{}' used without index but has size {}",
                        name, size
                    )))
                }
            }
        }
    }
}

/// Resolves a parsed program into the flat `GateSpec` sequence consumed by
/// DAG construction. An unrecognized gate mnemonic is the only place
/// [`lnnmap_core::MapError::UnknownGate`] can originate (§4.0).
pub fn ingest(program: &Program) -> Result<IngestedProgram> {
    let mut qreg_offsets = HashMap::new();
    let mut qubit_count = 0usize;
    let mut cregs = Vec::new();

    for stmt in &program.statements {
        match stmt {
            Statement::QRegDecl { name, size } => {
                if qreg_offsets.contains_key(name) {
                    return Err(QasmError::BuildError(format!(
                        "duplicate qreg '{}'",
                        name
                    )));
                }
                qreg_offsets.insert(name.clone(), (qubit_count, *size));
                qubit_count += size;
            }
            Statement::CRegDecl { name, size } => {
                cregs.push(ClassicalRegister {
                    name: name.clone(),
                    size: *size,
                });
            }
            _ => {}
        }
    }

    if qubit_count == 0 {
        return Err(QasmError::BuildError(
            "no quantum registers declared".to_string(),
        ));
    }

    let registers = RegisterMap {
        offsets: qreg_offsets,
    };
    let mut gates = Vec::new();

    for stmt in &program.statements {
        match stmt {
            Statement::GateCall { name, params, args } => {
                gates.push(resolve_gate_call(&registers, name, params, args)?);
            }
            Statement::Measure { qubit, target } => {
                let q = registers.resolve(qubit)?;
                let c = resolve_classical_bit(&cregs, target)?;
                gates.push(GateSpec::new(
                    GateKind::Measure,
                    q,
                    Operand::ClassicalBit(c),
                    Vec::new(),
                ));
            }
            Statement::Barrier { args } => {
                let qs = args
                    .iter()
                    .map(|a| registers.resolve(a))
                    .collect::<Result<Vec<_>>>()?;
                let first = *qs.first().unwrap_or(&0);
                gates.push(GateSpec::new(
                    GateKind::Barrier,
                    first,
                    Operand::Qubits(qs),
                    Vec::new(),
                ));
            }
            Statement::QRegDecl { .. } | Statement::CRegDecl { .. } => {}
        }
    }

    Ok(IngestedProgram {
        qubit_count,
        gates,
        cregs,
    })
}

fn resolve_classical_bit(cregs: &[ClassicalRegister], arg: &Argument) -> Result<usize> {
    let mut offset = 0usize;
    match arg {
        Argument::Indexed(name, idx) => {
            for creg in cregs {
                if &creg.name == name {
                    if *idx >= creg.size {
                        return Err(QasmError::BuildError(format!(
                            "index {} out of bounds for creg '{}' of size {}",
                            idx, name, creg.size
                        )));
                    }
                    return Ok(offset + idx);
                }
                offset += creg.size;
            }
            Err(QasmError::BuildError(format!(
                "undefined creg '{}'",
                name
            )))
        }
        Argument::Id(name) => {
            for creg in cregs {
                if &creg.name == name {
                    if creg.size != 1 {
                        return Err(QasmError::BuildError(format!(
                            "creg '{}' used without index but has size {}",
                            name, creg.size
                        )));
                    }
                    return Ok(offset);
                }
                offset += creg.size;
            }
            Err(QasmError::BuildError(format!(
                "undefined creg '{}'",
                name
            )))
        }
    }
}

fn resolve_gate_call(
    registers: &RegisterMap,
    name: &str,
    params: &[f64],
    args: &[Argument],
) -> Result<GateSpec> {
    let kind = GateKind::from_mnemonic(name)
        .ok_or_else(|| QasmError::Map(lnnmap_core::MapError::UnknownGate(name.to_string())))?;

    let qubits: Vec<usize> = args
        .iter()
        .map(|a| registers.resolve(a))
        .collect::<Result<_>>()?;

    match kind {
        GateKind::Cnot | GateKind::Swap => {
            if qubits.len() != 2 {
                return Err(QasmError::BuildError(format!(
                    "'{}' expects 2 qubit operands, got {}",
                    name,
                    qubits.len()
                )));
            }
            Ok(GateSpec::two_qubit(kind, qubits[0], qubits[1]))
        }
        GateKind::RotateZ => {
            if qubits.len() != 1 || params.len() != 1 {
                return Err(QasmError::BuildError(
                    "'rz' expects one qubit and one parameter".to_string(),
                ));
            }
            Ok(GateSpec::new(kind, qubits[0], Operand::None, params.to_vec()))
        }
        GateKind::SqrtX | GateKind::X => {
            if qubits.len() != 1 {
                return Err(QasmError::BuildError(format!(
                    "'{}' expects 1 qubit operand, got {}",
                    name,
                    qubits.len()
                )));
            }
            Ok(GateSpec::single(kind, qubits[0]))
        }
        GateKind::Measure | GateKind::Barrier => unreachable!(
            "measure/barrier are parsed as dedicated statements, not gate calls"
        ),
        GateKind::FreeSwap | GateKind::Checkpoint => unreachable!(
            "FREE_SWAP/CHECKPOINT have no surface mnemonic"
        ),
    }
}
