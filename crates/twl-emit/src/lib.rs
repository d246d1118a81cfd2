//! Wrapper code emission.
//!
//! Turns the descriptor model into a compilable C wrapper file: name and
//! signature tables, enable/trigger bitmaps, and one `__wrap_` function
//! per trace, rendered from the generator profile's templates. The CTF
//! backend additionally emits a matching trace-format metadata stream.

mod body;
mod emitters;
mod sizes;
mod tables;
mod tokens;
mod wrapper;

pub use emitters::*;
pub use sizes::*;
pub use tables::generate_bitmap;
pub use tokens::*;
pub use wrapper::*;

use thiserror::Error;

/// Emission errors.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error(transparent)]
    Model(#[from] twl_model::ModelError),
    #[error(transparent)]
    Oracle(#[from] twl_sizeof::OracleError),
}

pub type Result<T> = std::result::Result<T, EmitError>;
