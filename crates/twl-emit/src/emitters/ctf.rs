//! CTF (Common Trace Format) trace emission.
//!
//! Emits the same wrappers as the plain backend while building a CTF
//! metadata description in lock-step: stream `n` and its entry/exit
//! events (ids 0 and 1) correspond one-to-one with the wrapper generated
//! for trace `n`.

use std::fmt::Write;

use twl_model::{Signature, Tracer, UserType};

use crate::wrapper::GenContext;
use crate::{Result, body};

use super::TraceEmitter;

/// Emits wrappers plus the matching CTF metadata stream.
#[derive(Clone, Debug, Default)]
pub struct CtfEmitter {
    metadata: String,
}

impl CtfEmitter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            metadata: String::new(),
        }
    }

    /// The accumulated metadata description.
    #[must_use]
    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    /// Consume the emitter, returning the metadata description.
    #[must_use]
    pub fn into_metadata(self) -> String {
        self.metadata
    }

    /// Fixed type aliases, the trace block, the clock block, and the
    /// user-type declarations. Clock values are substitution placeholders
    /// filled in by a later pass.
    fn emit_preamble(&mut self, tracer: &Tracer) {
        let m = &mut self.metadata;
        m.push_str("/* CTF 1.8 */\n\n");
        m.push_str("typealias integer { size = 8; align = 8; signed = false; } := uint8_t;\n");
        m.push_str("typealias integer { size = 16; align = 8; signed = false; } := uint16_t;\n");
        m.push_str("typealias integer { size = 32; align = 8; signed = false; } := uint32_t;\n");
        m.push_str("typealias integer { size = 64; align = 8; signed = false; } := uint64_t;\n");
        m.push_str(
            "typealias integer { size = 64; align = 8; signed = false; \
             map = clock.monotonic.value; } := uint64_clock_monotonic_t;\n",
        );
        m.push('\n');
        m.push_str("trace {\n");
        m.push_str("    major = 1;\n");
        m.push_str("    minor = 8;\n");
        m.push_str("    byte_order = le;\n");
        m.push_str("    packet.header := struct {\n");
        m.push_str("        uint32_t magic;\n");
        m.push_str("        uint32_t stream_id;\n");
        m.push_str("    };\n");
        m.push_str("};\n\n");
        m.push_str("clock {\n");
        m.push_str("    name = monotonic;\n");
        m.push_str("    freq = @CLOCK_FREQ@;\n");
        m.push_str("    offset_s = @CLOCK_OFFSET_S@;\n");
        m.push_str("    offset = @CLOCK_OFFSET@;\n");
        m.push_str("};\n\n");

        for t in &tracer.types {
            m.push_str(&ctf_type_decl(t));
            m.push('\n');
        }
    }

    /// Open the trace's stream block and emit its entry event (id 0).
    fn emit_stream_entry(&mut self, trace: &str, sig: &Signature, index: usize) {
        let m = &mut self.metadata;
        writeln!(m, "stream {{").expect("formatting metadata");
        writeln!(m, "    id = {index};").expect("formatting metadata");
        m.push_str("    event.header := struct {\n");
        m.push_str("        uint32_t id;\n");
        m.push_str("        uint64_clock_monotonic_t timestamp;\n");
        m.push_str("    };\n");
        m.push_str("};\n\n");

        writeln!(m, "event {{").expect("formatting metadata");
        m.push_str("    id = 0;\n");
        writeln!(m, "    name = \"{trace}_entry\";").expect("formatting metadata");
        writeln!(m, "    stream_id = {index};").expect("formatting metadata");
        m.push_str("    fields := struct {\n");
        push_event_header(m);
        if sig.has_args() {
            for (i, arg) in sig.args.iter().enumerate() {
                writeln!(m, "        {arg} a{};", i + 1).expect("formatting metadata");
            }
        }
        m.push_str("    };\n");
        m.push_str("};\n\n");
    }

    /// Emit the trace's exit event (id 1), with the trailing return field
    /// when the signature carries one.
    fn emit_exit_event(&mut self, trace: &str, sig: &Signature, index: usize) {
        let m = &mut self.metadata;
        writeln!(m, "event {{").expect("formatting metadata");
        m.push_str("    id = 1;\n");
        writeln!(m, "    name = \"{trace}_exit\";").expect("formatting metadata");
        writeln!(m, "    stream_id = {index};").expect("formatting metadata");
        m.push_str("    fields := struct {\n");
        push_event_header(m);
        if sig.has_ret() {
            writeln!(m, "        {} ret;", sig.ret).expect("formatting metadata");
        }
        m.push_str("    };\n");
        m.push_str("};\n\n");
    }
}

/// The fixed four-field event header: function index, two execution-state
/// fields, timestamp.
fn push_event_header(m: &mut String) {
    m.push_str("        uint32_t func_index;\n");
    m.push_str("        uint32_t executing_thread;\n");
    m.push_str("        uint32_t executing_status;\n");
    m.push_str("        uint64_clock_monotonic_t now;\n");
}

/// Translate a user type into its CTF declaration.
fn ctf_type_decl(t: &UserType) -> String {
    let mut s = String::new();
    if t.members.len() > 1 && t.name.contains("enumeration") {
        let base = base_word(&t.name, "enumeration");
        write!(s, "enum {base} : integer {{ size = 32; align = 8; signed = true; }} {{ ")
            .expect("formatting metadata");
        for m in &t.members {
            write!(s, "{m}, ").expect("formatting metadata");
        }
        s.push_str("};\n");
    } else if t.members.len() > 1 {
        if t.name.starts_with("struct") {
            writeln!(s, "{} {{", t.name).expect("formatting metadata");
        } else {
            writeln!(s, "struct {} {{", t.name).expect("formatting metadata");
        }
        for m in &t.members {
            writeln!(s, "    {m};").expect("formatting metadata");
        }
        s.push_str("};\n");
    } else if t.name.contains("array") {
        let base = base_word(&t.name, "array");
        let mut mem = t.members.first().map_or("", String::as_str).splitn(2, ' ');
        let elem = mem.next().unwrap_or("");
        let bounds = mem.next().unwrap_or("");
        writeln!(s, "typedef {elem} {base}{bounds};").expect("formatting metadata");
    } else {
        let bits = t.size().unwrap_or(0) * 8;
        writeln!(
            s,
            "typealias integer {{ size = {bits}; align = 8; signed = false; }} := {};",
            t.name
        )
        .expect("formatting metadata");
    }
    s
}

/// First word of a declared name that does not carry the form keyword.
fn base_word<'a>(name: &'a str, keyword: &str) -> &'a str {
    name.split_whitespace()
        .find(|w| !w.contains(keyword))
        .unwrap_or(name)
}

impl TraceEmitter for CtfEmitter {
    fn emit_traces(&mut self, out: &mut String, cx: &GenContext<'_>) -> Result<()> {
        self.emit_preamble(cx.tracer);

        out.push_str("/*\n * Wrappers.\n */\n");

        for (index, trace) in cx.tracer.traces.iter().enumerate() {
            let sig = cx.tracer.find_signature(trace)?;
            let generator = &cx.tracer.generator;

            out.push('\n');
            body::emit_size_macros(out, generator, sig);
            body::emit_wrapper_open(out, sig);

            self.emit_stream_entry(trace, sig, index);
            body::emit_entry(out, generator, sig, index);
            body::emit_real_call(out, sig);
            self.emit_exit_event(trace, sig, index);
            body::emit_exit(out, generator, sig, index);
        }

        Ok(())
    }
}
