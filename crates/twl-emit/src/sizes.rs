//! Type-size resolution across the trace work list.
//!
//! Collects every argument and return type the traces reference, adds the
//! user-declared types, and runs the oracle once for the whole batch. The
//! resolved sizes land back in the tracer's type list, where the CTF
//! backend reads them.

use tracing::debug;
use twl_model::{Tracer, UserType};
use twl_sizeof::{SizeOracle, TypeEntry};

use crate::Result;

/// Headers always included ahead of the probe's prefix code.
const PROBE_HEADERS: &str = "#include <string.h>\n#include <stdint.h>\n#include <stdbool.h>\n";

/// Resolve the size of every type the traces and user declarations
/// reference, in place.
///
/// # Errors
///
/// Fails when a trace name has no signature or when the probe compile
/// fails; no sizes are resolved in either case.
pub fn resolve_type_sizes(tracer: &mut Tracer, oracle: &SizeOracle) -> Result<()> {
    let mut names: Vec<String> = Vec::new();
    for trace in &tracer.traces {
        let sig = tracer.find_signature(trace)?;
        if sig.has_ret() {
            names.push(sig.ret.clone());
        }
        if sig.has_args() {
            names.extend(sig.args.iter().cloned());
        }
    }
    names.sort();
    names.dedup();

    let mut entries: Vec<TypeEntry> = names.into_iter().map(TypeEntry::new).collect();

    // Add user types not already referenced by a signature.
    for t in &tracer.types {
        let base = t.base_name();
        if !entries.iter().any(|e| e.name == base) {
            let mut entry = TypeEntry::new(base);
            entry.size = t.size();
            entries.push(entry);
        }
    }

    debug!(types = entries.len(), "resolving type sizes");

    let prefix = ordered_type_decls(&tracer.types);
    oracle.resolve(&mut entries, &prefix, PROBE_HEADERS)?;

    copy_sizes(tracer, &entries);
    Ok(())
}

/// Copy resolved sizes back into the tracer's type list, appending a bare
/// entry for any resolved type that was not user-declared.
fn copy_sizes(tracer: &mut Tracer, entries: &[TypeEntry]) {
    for entry in entries {
        let Some(size) = entry.size else { continue };
        if let Some(t) = tracer
            .types
            .iter_mut()
            .find(|t| t.base_name() == entry.name)
        {
            t.set_size(size);
        } else {
            tracer
                .types
                .push(UserType::with_size(entry.name.clone(), Vec::new(), size));
        }
    }
}

/// Emit user-type declarations ordered so a type is declared before any
/// type whose members reference it.
#[must_use]
pub fn ordered_type_decls(types: &[UserType]) -> String {
    let mut pending: Vec<&UserType> = types.iter().collect();
    let mut out = String::new();

    while !pending.is_empty() {
        let mut progressed = false;
        let mut i = 0;
        while i < pending.len() {
            let depends = pending[i].members.iter().any(|m| {
                let mref = ref_name(m);
                pending
                    .iter()
                    .enumerate()
                    .any(|(j, t)| j != i && ref_name(&t.name) == mref)
            });
            if depends {
                i += 1;
            } else {
                out.push_str(&pending[i].decl());
                pending.remove(i);
                progressed = true;
            }
        }
        if !progressed {
            // Mutually referential declarations; emit the remainder as-is.
            for t in &pending {
                out.push_str(&t.decl());
            }
            break;
        }
    }

    out
}

/// The name by which a declaration references a type: `struct` keeps its
/// keyword, `array`/`enumeration` declarations are referenced by their
/// base name, anything else by its first word.
fn ref_name(decl_name: &str) -> String {
    let mut words = decl_name.split_whitespace();
    match words.next() {
        Some("struct") => format!("struct {}", words.next().unwrap_or("")),
        Some("array" | "enumeration") => words.next().unwrap_or("").to_string(),
        Some(first) => first.to_string(),
        None => String::new(),
    }
}
