//! twl - link-time trace instrumentation generator.
//!
//! Reads a declarative tracer configuration, generates a C wrapper file
//! that intercepts the selected functions via `--wrap` symbol wrapping
//! (plus, for the CTF backend, a matching metadata description), compiles
//! the wrapper, and optionally performs the final instrumented link.
//!
//! # Example
//!
//! ```ignore
//! use twl::{RunConfig, TraceLinker, config};
//!
//! let tracer = config::load("tracer.yaml".as_ref())?;
//! let mut linker = TraceLinker::new(tracer, RunConfig::default());
//! let artifacts = linker.generate()?;
//! ```

pub mod config;
mod linker;

pub use linker::*;

// Re-export from sub-crates
pub use twl_emit::{CtfEmitter, EmitError, PlainEmitter, TraceEmitter, generate, resolve_type_sizes};
pub use twl_model::{
    Function, Generator, LockModel, ModelError, OptionRecord, Options, Signature, Slot, Tracer,
    UserType,
};
pub use twl_sizeof::{Compiler, OracleError, SizeOracle, TypeEntry};

use thiserror::Error;

/// Driver errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Model(#[from] twl_model::ModelError),
    #[error(transparent)]
    Emit(#[from] twl_emit::EmitError),
    #[error(transparent)]
    Oracle(#[from] twl_sizeof::OracleError),
    #[error("wrapper compilation failed: {0}")]
    Compile(String),
    #[error("link failed: {0}")]
    Link(String),
}

pub type Result<T> = std::result::Result<T, Error>;
