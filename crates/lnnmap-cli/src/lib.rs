//! # lnnmap-cli
//!
//! Command-line driver for the mapping engine: reads a QASM file, maps it
//! against a coupling graph, and writes the rewritten program back out.
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use lnnmap_cli::{run_file, RunConfig};
//!
//! let config = RunConfig::default();
//! let report = run_file(Path::new("input.qasm"), Path::new("output.qasm"), &config)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod pipeline;

pub use pipeline::{run_file, RunConfig, RunReport};
