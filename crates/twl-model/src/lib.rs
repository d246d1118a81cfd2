//! Descriptor model for trace instrumentation generation.
//!
//! The model is populated once from configuration and read-only during
//! generation: options, function signatures, user types, wrappable
//! functions, a generator profile (the template table driving code
//! emission), and the tracer that owns them all.

mod function;
mod generator;
mod options;
mod signature;
mod tracer;
mod types;

pub use function::*;
pub use generator::*;
pub use options::*;
pub use signature::*;
pub use tracer::*;
pub use types::*;

use thiserror::Error;

/// Descriptor model errors.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("trace function not found: {0}")]
    TraceNotFound(String),
    #[error("unknown template slot: {0}")]
    UnknownSlot(String),
    #[error("unknown lock model: {0}")]
    UnknownLockModel(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
