//! Name table, signature tables, and bitmap emission.

use std::fmt::Write;

use twl_model::Tracer;

use crate::Result;

/// Emit the per-function define/include blocks for every function that
/// owns at least one requested trace.
pub(crate) fn generate_functions(out: &mut String, tracer: &Tracer) {
    out.push_str("/*\n * Functions.\n */\n");

    for function in &tracer.functions {
        if !tracer.traces.iter().any(|t| function.signature(t).is_some()) {
            continue;
        }
        out.push('\n');
        writeln!(out, "/*\n * Function: {}\n */", function.name).expect("formatting functions");
        for define in &function.defines {
            writeln!(out, "{define}").expect("formatting functions");
        }
        for header in &function.headers {
            writeln!(out, "{header}").expect("formatting functions");
        }
    }
}

/// Emit the trace name string table.
pub(crate) fn generate_names(out: &mut String, tracer: &Tracer) {
    if tracer.options.is("gen-names", "disable") {
        return;
    }

    out.push_str("\n/*\n * Names.\n */\n");
    writeln!(
        out,
        "uint32_t __twl_trace_names_size = {};",
        tracer.traces.len()
    )
    .expect("formatting names");
    writeln!(
        out,
        "const char* const __twl_trace_names[{}] =",
        tracer.traces.len()
    )
    .expect("formatting names");
    out.push_str("{\n");
    for (i, trace) in tracer.traces.iter().enumerate() {
        writeln!(out, "  /* {i:3} */ \"{trace}\",").expect("formatting names");
    }
    out.push_str("};\n");
}

/// Emit the per-trace signature tables.
///
/// Each trace gets an argument-descriptor array (first row the return
/// value, then the arguments, with `{ 0, "void" }` standing in for an
/// absent side) and the summary table indexes them all.
pub(crate) fn generate_signatures(out: &mut String, tracer: &Tracer) -> Result<()> {
    if tracer.options.is("gen-sigs", "disable") {
        return Ok(());
    }

    out.push_str("\n/*\n * Signatures.\n */\n\n");
    out.push_str("typedef struct {\n");
    out.push_str(" uint32_t          size;\n");
    out.push_str(" const char* const type;\n");
    out.push_str("} __twl_trace_sig_arg;\n\n");
    out.push_str("typedef struct {\n");
    out.push_str(" uint32_t                   argc;\n");
    out.push_str(" const __twl_trace_sig_arg* args;\n");
    out.push_str("} __twl_trace_sig;\n\n");

    for trace in &tracer.traces {
        let sig = tracer.find_signature(trace)?;
        let rows = sig_rows(sig);

        writeln!(
            out,
            "const __twl_trace_sig_arg __twl_trace_sig_args_{trace}[{rows}] ="
        )
        .expect("formatting signatures");
        out.push_str("{\n");
        if sig.has_ret() {
            writeln!(out, "  {{ sizeof({}), \"{}\" }},", sig.ret, sig.ret)
                .expect("formatting signatures");
        } else {
            out.push_str("  { 0, \"void\" },\n");
        }
        if sig.has_args() {
            for arg in &sig.args {
                writeln!(out, "  {{ sizeof({arg}), \"{arg}\" }},")
                    .expect("formatting signatures");
            }
        } else {
            out.push_str("  { 0, \"void\" },\n");
        }
        out.push_str("};\n\n");
    }

    writeln!(
        out,
        "const __twl_trace_sig __twl_trace_signatures[{}] =",
        tracer.traces.len()
    )
    .expect("formatting signatures");
    out.push_str("{\n");
    for trace in &tracer.traces {
        let sig = tracer.find_signature(trace)?;
        writeln!(
            out,
            "  {{ {}, __twl_trace_sig_args_{trace} }},",
            sig_rows(sig)
        )
        .expect("formatting signatures");
    }
    out.push_str("};\n");

    Ok(())
}

fn sig_rows(sig: &twl_model::Signature) -> usize {
    1 + if sig.has_args() { sig.args.len() } else { 1 }
}

/// Emit the enabled-function bitmap.
pub(crate) fn generate_enables(out: &mut String, tracer: &Tracer) {
    if tracer.options.is("gen-enables", "disable") {
        return;
    }
    out.push_str("\n/*\n * Enables.\n */\n");
    generate_bitmap(
        out,
        &tracer.traces,
        &tracer.enables,
        "enables",
        tracer.options.is("gen-enables", "global-on"),
    );
}

/// Emit the triggered-function bitmap.
pub(crate) fn generate_triggers(out: &mut String, tracer: &Tracer) {
    if tracer.options.is("gen-triggers", "disable") {
        return;
    }
    out.push_str("\n/*\n * Triggers.\n */\n");
    generate_bitmap(
        out,
        &tracer.traces,
        &tracer.triggers,
        "triggers",
        tracer.options.is("gen-triggers", "global-on"),
    );
}

/// Emit one bitmap over the trace universe: bit `i` is set when trace `i`
/// appears in `names`, or unconditionally with `global_set`.
pub fn generate_bitmap(
    out: &mut String,
    traces: &[String],
    names: &[String],
    label: &str,
    global_set: bool,
) {
    let words = traces.len().div_ceil(32).max(1);
    let mut bits = vec![0u32; words];
    for (i, trace) in traces.iter().enumerate() {
        if global_set || names.iter().any(|n| n == trace) {
            bits[i / 32] |= 1 << (i % 32);
        }
    }

    writeln!(out, "uint32_t __twl_trace_{label}_size = {};", traces.len())
        .expect("formatting bitmap");
    writeln!(out, "const uint32_t __twl_trace_{label}[{words}] =").expect("formatting bitmap");
    out.push_str("{\n");
    for chunk in bits.chunks(4) {
        out.push(' ');
        for word in chunk {
            write!(out, " 0x{word:08x},").expect("formatting bitmap");
        }
        out.push('\n');
    }
    out.push_str("};\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use twl_model::{Function, Signature};

    fn tracer() -> Tracer {
        let mut f = Function::new("io");
        f.add_signature(Signature::new(
            "read",
            vec!["int".into(), "void*".into()],
            "ssize_t",
        ));
        f.add_signature(Signature::new("sync", vec![], ""));
        let mut t = Tracer::new("test");
        t.functions.push(f);
        t.traces = vec!["read".into(), "sync".into()];
        t
    }

    #[test]
    fn test_names_table() {
        let mut out = String::new();
        generate_names(&mut out, &tracer());
        assert!(out.contains("uint32_t __twl_trace_names_size = 2;"));
        assert!(out.contains("const char* const __twl_trace_names[2] ="));
        assert!(out.contains("/*   0 */ \"read\","));
        assert!(out.contains("/*   1 */ \"sync\","));
    }

    #[test]
    fn test_names_table_disabled() {
        let mut t = tracer();
        t.options.set("gen-names", "disable");
        let mut out = String::new();
        generate_names(&mut out, &t);
        assert!(out.is_empty());
    }

    #[test]
    fn test_signature_tables() {
        let mut out = String::new();
        generate_signatures(&mut out, &tracer()).unwrap();
        // read: ret + 2 args
        assert!(out.contains("const __twl_trace_sig_arg __twl_trace_sig_args_read[3] ="));
        assert!(out.contains("  { sizeof(ssize_t), \"ssize_t\" },"));
        assert!(out.contains("  { sizeof(int), \"int\" },"));
        assert!(out.contains("  { sizeof(void*), \"void*\" },"));
        // sync: void/void
        assert!(out.contains("const __twl_trace_sig_arg __twl_trace_sig_args_sync[2] ="));
        assert!(out.contains("  { 0, \"void\" },"));
        // summary
        assert!(out.contains("const __twl_trace_sig __twl_trace_signatures[2] ="));
        assert!(out.contains("  { 3, __twl_trace_sig_args_read },"));
        assert!(out.contains("  { 2, __twl_trace_sig_args_sync },"));
    }

    #[test]
    fn test_signatures_unknown_trace_fails() {
        let mut t = tracer();
        t.traces.push("fsync".into());
        let mut out = String::new();
        let err = generate_signatures(&mut out, &t).unwrap_err();
        assert!(err.to_string().contains("fsync"));
    }

    #[test]
    fn test_bitmap_bits_follow_selection() {
        let universe: Vec<String> = (0..40).map(|i| format!("f{i}")).collect();
        let selected = vec!["f0".to_string(), "f33".to_string(), "f7".to_string()];

        let mut out = String::new();
        generate_bitmap(&mut out, &universe, &selected, "enables", false);

        assert!(out.contains("uint32_t __twl_trace_enables_size = 40;"));
        assert!(out.contains("const uint32_t __twl_trace_enables[2] ="));
        // bits 0 and 7 in word 0, bit 1 in word 1
        assert!(out.contains("0x00000081,"));
        assert!(out.contains("0x00000002,"));
    }

    #[test]
    fn test_bitmap_global_set() {
        let universe = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut out = String::new();
        generate_bitmap(&mut out, &universe, &[], "triggers", true);
        assert!(out.contains("0x00000007,"));
    }

    #[test]
    fn test_bitmap_empty_selection() {
        let universe = vec!["a".to_string(), "b".to_string()];
        let mut out = String::new();
        generate_bitmap(&mut out, &universe, &[], "enables", false);
        assert!(out.contains("0x00000000,"));
    }

    #[test]
    fn test_function_blocks_only_traced() {
        let mut t = tracer();
        let mut unused = Function::new("unused");
        unused.headers.push("#include <unused.h>".into());
        unused.add_signature(Signature::new("nothing", vec![], ""));
        t.functions.push(unused);
        t.functions[0].headers.push("#include <unistd.h>".into());

        let mut out = String::new();
        generate_functions(&mut out, &t);
        assert!(out.contains(" * Function: io"));
        assert!(out.contains("#include <unistd.h>"));
        assert!(!out.contains("unused.h"));
    }
}
