//! ELF format constants.

/// ELF magic number ("\x7fELF", little-endian u32).
pub const ELF_MAGIC: u32 = 0x464c_457f;

/// 32-bit ELF class.
pub const ELF_CLASS_32: u8 = 1;
/// 64-bit ELF class.
pub const ELF_CLASS_64: u8 = 2;

/// Little-endian data encoding.
pub const ELF_DATA_LSB: u8 = 1;

/// Section holds no file data (e.g. `.bss`).
pub const SHT_NOBITS: u32 = 8;
/// Null section (index 0).
pub const SHT_NULL: u32 = 0;
