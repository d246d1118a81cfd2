//! Per-trace wrapper emission: size macros, declarations, and the
//! `__wrap_` body. Every statement is gated on its template slot being
//! non-empty; an empty slot is omitted entirely.

use std::fmt::Write;

use twl_model::{Generator, LockModel, Signature, Slot};

use crate::tokens::{expand_arg, expand_func, expand_ret};

/// Emit the three per-trace data size macros as `sizeof()` sums.
///
/// The total covers the arguments plus, when a ret-trace template is
/// configured, the return value; the entry macro covers the arguments
/// only and the ret macro the return value only. An empty sum renders as
/// `0`.
pub(crate) fn emit_size_macros(out: &mut String, generator: &Generator, sig: &Signature) {
    let mut total = Vec::new();
    let mut entry = Vec::new();
    let mut ret = Vec::new();

    if sig.has_args() {
        for arg in &sig.args {
            let term = format!("sizeof({arg})");
            total.push(term.clone());
            entry.push(term);
        }
    }
    if sig.has_ret() && generator.has(Slot::RetTrace) {
        let term = format!("sizeof({})", sig.ret);
        total.push(term.clone());
        ret.push(term);
    }

    writeln!(out, "#define FUNC_DATA_SIZE_{} ({})", sig.name, sum(&total))
        .expect("formatting size macros");
    writeln!(
        out,
        "#define FUNC_DATA_ENTRY_SIZE_{} ({})",
        sig.name,
        sum(&entry)
    )
    .expect("formatting size macros");
    writeln!(out, "#define FUNC_DATA_RET_SIZE_{} ({})", sig.name, sum(&ret))
        .expect("formatting size macros");
}

fn sum(terms: &[String]) -> String {
    if terms.is_empty() {
        "0".to_string()
    } else {
        terms.join(" + ")
    }
}

/// Emit the original declaration, the `__real_` declaration, and open the
/// `__wrap_` definition.
pub(crate) fn emit_wrapper_open(out: &mut String, sig: &Signature) {
    writeln!(out, "{};", sig.decl("")).expect("formatting wrapper");
    writeln!(out, "{};", sig.decl("__real_")).expect("formatting wrapper");
    writeln!(out, "{}", sig.decl("__wrap_")).expect("formatting wrapper");
    out.push_str("{\n");
}

/// Emit the wrapper body up to the real call: locals, lock acquisition,
/// entry allocation and traces, and the per-argument trace statements.
pub(crate) fn emit_entry(out: &mut String, generator: &Generator, sig: &Signature, index: usize) {
    if generator.has(Slot::LockLocal) {
        writeln!(out, "{}", generator.template(Slot::LockLocal)).expect("formatting wrapper");
    }
    if generator.has(Slot::BufferLocal) {
        writeln!(out, "{}", generator.template(Slot::BufferLocal)).expect("formatting wrapper");
    }
    if sig.has_ret() {
        writeln!(out, " {} ret;", sig.ret).expect("formatting wrapper");
    }

    if generator.has(Slot::LockAcquire) {
        writeln!(out, "{}", generator.template(Slot::LockAcquire)).expect("formatting wrapper");
    }
    if generator.has(Slot::EntryAlloc) {
        writeln!(
            out,
            " {}",
            expand_func(generator.template(Slot::EntryAlloc), sig, index, true)
        )
        .expect("formatting wrapper");
    }
    if generator.has(Slot::LockRelease) && generator.lock_model == LockModel::Alloc {
        writeln!(out, "{}", generator.template(Slot::LockRelease)).expect("formatting wrapper");
    }
    if generator.has(Slot::CtfHeaderTrace) {
        writeln!(
            out,
            " {}",
            expand_func(generator.template(Slot::CtfHeaderTrace), sig, index, false)
        )
        .expect("formatting wrapper");
    }
    if generator.has(Slot::EntryTrace) {
        writeln!(
            out,
            " {}",
            expand_func(generator.template(Slot::EntryTrace), sig, index, true)
        )
        .expect("formatting wrapper");
    }
    if generator.has(Slot::LockRelease) && generator.lock_model == LockModel::Trace {
        writeln!(out, "{}", generator.template(Slot::LockRelease)).expect("formatting wrapper");
    }
    if sig.has_args() && generator.has(Slot::ArgTrace) {
        for (i, arg) in sig.args.iter().enumerate() {
            writeln!(
                out,
                " {}",
                expand_arg(generator.template(Slot::ArgTrace), arg, i + 1)
            )
            .expect("formatting wrapper");
        }
    }
}

/// Emit the forwarded call to the real symbol, capturing the return value
/// when the signature carries one.
pub(crate) fn emit_real_call(out: &mut String, sig: &Signature) {
    let mut line = String::new();
    if sig.has_ret() {
        line.push_str(" ret =");
    }
    write!(line, " __real_{}(", sig.name).expect("formatting wrapper");
    if sig.has_args() {
        for i in 1..=sig.args.len() {
            if i > 1 {
                line.push_str(", ");
            }
            write!(line, "a{i}").expect("formatting wrapper");
        }
    }
    line.push_str(");");
    writeln!(out, "{line}").expect("formatting wrapper");
}

/// Emit the wrapper body after the real call: exit allocation and traces,
/// the return-value trace, the final lock release, and the return.
pub(crate) fn emit_exit(out: &mut String, generator: &Generator, sig: &Signature, index: usize) {
    if generator.has(Slot::LockAcquire) {
        writeln!(out, "{}", generator.template(Slot::LockAcquire)).expect("formatting wrapper");
    }
    if generator.has(Slot::ExitAlloc) {
        writeln!(
            out,
            " {}",
            expand_func(generator.template(Slot::ExitAlloc), sig, index, false)
        )
        .expect("formatting wrapper");
    }
    if generator.has(Slot::LockRelease) && generator.lock_model == LockModel::Alloc {
        writeln!(out, "{}", generator.template(Slot::LockRelease)).expect("formatting wrapper");
    }
    if generator.has(Slot::ExitTrace) {
        writeln!(
            out,
            " {}",
            expand_func(generator.template(Slot::ExitTrace), sig, index, false)
        )
        .expect("formatting wrapper");
    }
    if sig.has_ret() && generator.has(Slot::RetTrace) {
        writeln!(
            out,
            " {}",
            expand_ret(generator.template(Slot::RetTrace), &sig.ret)
        )
        .expect("formatting wrapper");
    }
    if generator.has(Slot::LockRelease) {
        writeln!(out, "{}", generator.template(Slot::LockRelease)).expect("formatting wrapper");
    }
    if sig.has_ret() {
        out.push_str(" return ret;\n");
    }
    out.push_str("}\n");
}
