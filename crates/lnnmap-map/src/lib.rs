//! # lnnmap-map
//!
//! The mapping engine: coupling analysis, checkpoint-segmented dependency
//! DAG construction, checkpoint-gated A* search, and reconstruction with
//! free-swap back-propagation.

pub mod checkpoint;
pub mod coupling;
pub mod dag;
pub mod pipeline;
pub mod reconstruct;
pub mod search;
pub mod state;

pub use checkpoint::insert_checkpoints;
pub use coupling::CouplingGraph;
pub use dag::{Dag, DagNode, NodeId};
pub use pipeline::{map_circuit, MapResult, PipelineTiming};
pub use reconstruct::{reconstruct, Reconstructed};
pub use state::State;
