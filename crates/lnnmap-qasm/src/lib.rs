//! # lnnmap-qasm
//!
//! The textual quantum-assembly format: a `nom`-based parser into an AST,
//! register-normalizing ingest into the shared `GateSpec` sequence, and an
//! emitter back to the same textual format (§4.6 of the mapper design).

pub mod ast;
pub mod emit;
pub mod error;
pub mod ingest;
pub mod parser;

pub use emit::render_program;
pub use error::{QasmError, Result};
pub use ingest::{ingest, ClassicalRegister, IngestedProgram};
pub use parser::parse_qasm_str;

/// Parses and ingests source text in one step.
pub fn parse_program(source: &str) -> Result<IngestedProgram> {
    let ast = parse_qasm_str(source)?;
    ingest(&ast)
}
