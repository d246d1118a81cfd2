//! Compiled-probe type-size oracle.
//!
//! `sizeof()` cannot be evaluated by the generator process, so a probe
//! translation unit is compiled for the target: one packed record per
//! requested type is placed into a reserved object-file section with its
//! length field initialized to `sizeof(type)`, and the section is decoded
//! back out of the object file.

mod cc;
mod decode;
mod oracle;
mod probe;

pub use cc::*;
pub use decode::*;
pub use oracle::*;
pub use probe::*;

use thiserror::Error;

/// Oracle errors.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("object file error: {0}")]
    Object(#[from] twl_elf::ObjectError),
    #[error("compilation failed: {0}")]
    Compile(String),
}

pub type Result<T> = std::result::Result<T, OracleError>;
