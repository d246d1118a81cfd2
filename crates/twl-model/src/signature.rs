//! Function signatures.

use std::fmt::Write;

/// A function's argument/return type shape, independent of its wrapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    /// The function's name.
    pub name: String,
    /// Ordered argument type names.
    pub args: Vec<String>,
    /// Return type name; empty means `void`.
    pub ret: String,
}

impl Signature {
    pub fn new(name: impl Into<String>, args: Vec<String>, ret: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args,
            ret: ret.into(),
        }
    }

    /// Does the signature carry a return value?
    #[must_use]
    pub fn has_ret(&self) -> bool {
        !(self.ret.is_empty() || self.ret == "void")
    }

    /// Does the signature carry any arguments? A single `void` argument
    /// counts as none.
    #[must_use]
    pub fn has_args(&self) -> bool {
        !(self.args.is_empty() || (self.args.len() == 1 && self.args[0] == "void"))
    }

    /// Return type name with the empty form normalized to `void`.
    #[must_use]
    pub fn ret_type(&self) -> &str {
        if self.ret.is_empty() { "void" } else { &self.ret }
    }

    /// Render the function's C declaration, with positional `aN` argument
    /// labels and an optional symbol prefix (`__real_`, `__wrap_`).
    #[must_use]
    pub fn decl(&self, prefix: &str) -> String {
        let mut ds = format!("{} {}{}(", self.ret_type(), prefix, self.name);
        if self.has_args() {
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    ds.push_str(", ");
                }
                write!(ds, "{arg} a{}", i + 1).expect("formatting declaration");
            }
        } else {
            ds.push_str("void");
        }
        ds.push(')');
        ds
    }
}
