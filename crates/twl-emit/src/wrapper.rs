//! Generation orchestration.

use std::fmt::Write;

use twl_model::Tracer;

use crate::emitters::TraceEmitter;
use crate::{Result, tables};

/// Shared read-only state handed to the per-trace emitter.
pub struct GenContext<'a> {
    /// The tracer being generated.
    pub tracer: &'a Tracer,
}

/// Generate the wrapper source: preamble, per-function include blocks,
/// name and signature tables, enable/trigger bitmaps, the generator's
/// code block, then the per-trace wrappers via the emitter.
///
/// # Errors
///
/// Any trace name without a matching signature aborts the whole run; the
/// output should be discarded.
pub fn generate(tracer: &Tracer, emitter: &mut dyn TraceEmitter, out: &mut String) -> Result<()> {
    out.push_str("/*\n * Trace wrapper.\n *  Automatically generated.\n */\n");

    out.push('\n');
    writeln!(out, "/*\n * Tracer: {}\n */", tracer.name).expect("formatting preamble");
    for define in &tracer.defines {
        writeln!(out, "{define}").expect("formatting preamble");
    }

    out.push('\n');
    writeln!(out, "/*\n * Generator: {}\n */", tracer.generator.name)
        .expect("formatting preamble");
    for define in &tracer.generator.defines {
        writeln!(out, "{define}").expect("formatting preamble");
    }
    for header in &tracer.generator.headers {
        writeln!(out, "{header}").expect("formatting preamble");
    }
    out.push('\n');

    tables::generate_functions(out, tracer);
    tables::generate_names(out, tracer);
    tables::generate_signatures(out, tracer)?;
    tables::generate_enables(out, tracer);
    tables::generate_triggers(out, tracer);

    out.push('\n');
    for line in &tracer.generator.code {
        writeln!(out, "{line}").expect("formatting preamble");
    }
    out.push('\n');

    let cx = GenContext { tracer };
    emitter.emit_traces(out, &cx)
}
