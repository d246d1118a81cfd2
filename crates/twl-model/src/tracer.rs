//! The tracer: the root of the descriptor model.

use std::io;

use crate::{Function, Generator, ModelError, Options, Result, Signature, UserType};

/// The tracer owns the functions, generator profile, and user types, and
/// carries the trace/enable/trigger name lists. The `traces` list is the
/// authoritative work list for generation.
#[derive(Clone, Debug, Default)]
pub struct Tracer {
    /// Tracer name.
    pub name: String,
    /// Global define statements.
    pub defines: Vec<String>,
    /// Function names enabled by default.
    pub enables: Vec<String>,
    /// Function names triggered by default.
    pub triggers: Vec<String>,
    /// Trace names to instrument, in declared order.
    pub traces: Vec<String>,
    /// Global options.
    pub options: Options,
    /// Wrappable function groups.
    pub functions: Vec<Function>,
    /// The generator profile.
    pub generator: Generator,
    /// User-declared types.
    pub types: Vec<UserType>,
}

impl Tracer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Resolve a trace name to its signature across all functions.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::TraceNotFound`] when no function carries the
    /// trace name.
    pub fn find_signature(&self, trace: &str) -> Result<&Signature> {
        self.functions
            .iter()
            .find_map(|f| f.signature(trace))
            .ok_or_else(|| ModelError::TraceNotFound(trace.to_string()))
    }

    /// Look up an option value.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name)
    }

    /// Dump the tracer state, for diagnostics.
    pub fn dump(&self, out: &mut impl io::Write) -> io::Result<()> {
        writeln!(out, " Tracer: {}", self.name)?;
        writeln!(out, "  Traces: {}", self.traces.len())?;
        for trace in &self.traces {
            writeln!(out, "   {trace}")?;
        }
        writeln!(out, "  Functions: {}", self.functions.len())?;
        for function in &self.functions {
            writeln!(out, "   Function: {}", function.name)?;
            writeln!(out, "    Headers: {}", function.headers.len())?;
            for header in &function.headers {
                writeln!(out, "     {header}")?;
            }
            writeln!(out, "    Defines: {}", function.defines.len())?;
            for define in &function.defines {
                writeln!(out, "     {define}")?;
            }
            writeln!(out, "    Signatures: {}", function.signatures.len())?;
            let mut names: Vec<&String> = function.signatures.keys().collect();
            names.sort();
            for name in names {
                let sig = &function.signatures[name];
                writeln!(out, "     {name}: {};", sig.decl(""))?;
            }
        }
        writeln!(out, "  Generator: {}", self.generator.name)?;
        for slot in crate::Slot::ALL {
            if self.generator.has(slot) {
                writeln!(
                    out,
                    "   {}: {}",
                    slot.key(),
                    self.generator.template(slot)
                )?;
            }
        }
        Ok(())
    }
}
