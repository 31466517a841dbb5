//! The unified error taxonomy for the mapping engine (§7).

use thiserror::Error;

/// All fatal conditions the mapper can surface. None are recovered locally:
/// no partial results are ever emitted on failure.
#[derive(Error, Debug)]
pub enum MapError {
    /// A mnemonic outside the recognized set (§6).
    #[error("unknown gate: {0}")]
    UnknownGate(String),

    /// Checkpoint insertion found zero or more than one terminal checkpoint.
    #[error("malformed DAG: expected exactly one terminal checkpoint, found {0}")]
    MalformedDag(usize),

    /// The search exhausted its frontier without reaching a done state.
    #[error("unmappable circuit: search frontier exhausted without a solution")]
    Unmappable,

    /// The mapping produced by reconstruction/back-propagation is not a
    /// permutation, or a `FREE_SWAP` survived into emission.
    #[error("reconstruction error: {0}")]
    ReconstructionError(String),

    /// The input circuit cannot fit the device (too many logical qubits).
    #[error("qubit index {0} exceeds device capacity {1}")]
    QubitOutOfRange(usize, usize),

    /// Input unreadable or output unwritable.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for mapping-engine operations.
pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_render_distinct_messages() {
        assert!(MapError::UnknownGate("ccx".into())
            .to_string()
            .contains("ccx"));
        assert!(MapError::MalformedDag(2).to_string().contains('2'));
        assert!(matches!(MapError::Unmappable, MapError::Unmappable));
    }

    #[test]
    fn result_alias_works() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }
        fn returns_err() -> Result<i32> {
            Err(MapError::Unmappable)
        }
        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
