//! Code-only trace emission.

use crate::wrapper::GenContext;
use crate::{Result, body};

use super::TraceEmitter;

/// Emits the per-trace wrappers with no side channel.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainEmitter;

impl PlainEmitter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TraceEmitter for PlainEmitter {
    fn emit_traces(&mut self, out: &mut String, cx: &GenContext<'_>) -> Result<()> {
        out.push_str("/*\n * Wrappers.\n */\n");

        for (index, trace) in cx.tracer.traces.iter().enumerate() {
            let sig = cx.tracer.find_signature(trace)?;
            let generator = &cx.tracer.generator;

            out.push('\n');
            body::emit_size_macros(out, generator, sig);
            body::emit_wrapper_open(out, sig);
            body::emit_entry(out, generator, sig, index);
            body::emit_real_call(out, sig);
            body::emit_exit(out, generator, sig, index);
        }

        Ok(())
    }
}
