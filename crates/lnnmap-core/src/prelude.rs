//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use lnnmap_core::prelude::*;
//! ```

pub use crate::config::MapperConfig;
pub use crate::error::{MapError, Result};
pub use crate::gate::{GateKind, GateSpec, Operand};
pub use crate::mapping::Mapping;
