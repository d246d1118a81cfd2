//! Per-trace emission backends.

mod ctf;
mod plain;

pub use ctf::CtfEmitter;
pub use plain::PlainEmitter;

use crate::wrapper::GenContext;
use crate::Result;

/// Per-trace emission strategy.
///
/// The base generator owns the tables and bitmaps; an emitter renders the
/// wrapper for each trace in declared order, advancing the zero-based
/// trace index as it goes, and may maintain a metadata stream of its own.
pub trait TraceEmitter {
    /// Emit every requested trace into `out`.
    ///
    /// # Errors
    ///
    /// An unresolved trace name aborts the run.
    fn emit_traces(&mut self, out: &mut String, cx: &GenContext<'_>) -> Result<()>;
}
