//! ELF object-file reader.
//!
//! Parses relocatable objects far enough to enumerate sections by name and
//! expose their raw bytes. Little-endian ELF32 and ELF64 only.

mod constants;
mod object;

pub use constants::*;
pub use object::*;

use thiserror::Error;

/// ELF parsing errors.
#[derive(Error, Debug)]
pub enum ObjectError {
    #[error("ELF data too small")]
    TooSmall,
    #[error("Invalid ELF magic number")]
    InvalidMagic,
    #[error("Only little-endian ELF supported")]
    NotLittleEndian,
    #[error("Unsupported ELF class: {0}")]
    UnsupportedClass(u8),
    #[error("Section header out of bounds")]
    SectionOutOfBounds,
}

pub type Result<T> = std::result::Result<T, ObjectError>;
