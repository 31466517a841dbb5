//! Errors raised while parsing, building, or emitting the textual format.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QasmError {
    #[error("parse error: {0}")]
    ParseError(String),

    #[error("build error: {0}")]
    BuildError(String),

    #[error(transparent)]
    Map(#[from] lnnmap_core::MapError),
}

pub type Result<T> = std::result::Result<T, QasmError>;
