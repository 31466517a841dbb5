//! # lnnmap-core
//!
//! Shared data contracts for the lnnmap linear-nearest-neighbour qubit mapper.
//!
//! This crate provides:
//! - `GateKind`, `Operand`, `GateSpec`: the gate vocabulary shared by ingest,
//!   the DAG, and emission
//! - `Mapping`: the logical-to-physical permutation
//! - `MapError`: the unified error taxonomy
//! - `MapperConfig`: serde-backed configuration
//!
//! No algorithm lives here: checkpoint insertion, search, and reconstruction
//! are owned by `lnnmap-map`; the textual format is owned by `lnnmap-qasm`.

pub mod config;
pub mod error;
pub mod gate;
pub mod mapping;
pub mod prelude;

pub use config::MapperConfig;
pub use error::{MapError, Result};
pub use gate::{GateKind, GateSpec, Operand};
pub use mapping::Mapping;
