//! Wrappable functions.

use rustc_hash::FxHashMap;

use crate::Signature;

/// A group of wrappable functions: the headers and defines needed to
/// declare them, and the trace-name → signature map.
#[derive(Clone, Debug, Default)]
pub struct Function {
    /// Group name.
    pub name: String,
    /// Include statements.
    pub headers: Vec<String>,
    /// Define statements.
    pub defines: Vec<String>,
    /// Signatures keyed by trace name; keys are unique.
    pub signatures: FxHashMap<String, Signature>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a signature under its own name.
    pub fn add_signature(&mut self, sig: Signature) {
        self.signatures.insert(sig.name.clone(), sig);
    }

    /// Look up a signature by trace name.
    #[must_use]
    pub fn signature(&self, trace: &str) -> Option<&Signature> {
        self.signatures.get(trace)
    }
}
