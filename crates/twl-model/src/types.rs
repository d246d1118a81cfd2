//! User-declared types.

use std::fmt::Write;

/// A user type: a declared name, its member declarations, and a size that
/// is unknown until resolved against the target compiler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserType {
    /// Declared type name. May carry an `array`, `enumeration`, or
    /// `struct` keyword selecting the declaration form.
    pub name: String,
    /// Ordered member declaration strings.
    pub members: Vec<String>,
    size: Option<u32>,
}

impl UserType {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            members,
            size: None,
        }
    }

    /// Create a type with an already-known size.
    pub fn with_size(name: impl Into<String>, members: Vec<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            members,
            size: Some(size),
        }
    }

    /// Resolved size in bytes, if known.
    #[must_use]
    pub const fn size(&self) -> Option<u32> {
        self.size
    }

    /// Record the resolved size.
    pub const fn set_size(&mut self, size: u32) {
        self.size = Some(size);
    }

    /// The name used to reference this type from other declarations: the
    /// `array`/`enumeration` keyword stripped, `struct` kept.
    #[must_use]
    pub fn base_name(&self) -> String {
        self.name
            .replace("array ", "")
            .replace("enumeration ", "")
    }

    /// Render the C declaration for this type.
    #[must_use]
    pub fn decl(&self) -> String {
        let mut s = String::new();
        if self.name.contains("struct") {
            writeln!(s, "{} {{", self.name).expect("formatting type");
            for m in &self.members {
                writeln!(s, "    {m};").expect("formatting type");
            }
            s.push_str("};\n");
        } else if self.name.contains("array") {
            let base = second_word(&self.name);
            let mut mem = self.members.first().map_or("", String::as_str).splitn(2, ' ');
            let elem = mem.next().unwrap_or("");
            let bounds = mem.next().unwrap_or("");
            writeln!(s, "{elem} {base}{bounds};").expect("formatting type");
        } else if self.name.contains("enumeration") {
            let base = second_word(&self.name);
            write!(s, "enum {base}_e {{ ").expect("formatting type");
            for m in &self.members {
                write!(s, "{m}, ").expect("formatting type");
            }
            writeln!(s, "}} {base};").expect("formatting type");
        } else if self.members.len() > 1 {
            writeln!(s, "typedef struct {}_s {{", self.name).expect("formatting type");
            for m in &self.members {
                writeln!(s, "    {m};").expect("formatting type");
            }
            writeln!(s, "}} {};", self.name).expect("formatting type");
        } else {
            let mem = self.members.first().map_or("", String::as_str);
            writeln!(s, "typedef {mem} {};", self.name).expect("formatting type");
        }
        s
    }
}

/// Second whitespace-separated word of a declared name, or the whole name
/// when there is only one word.
fn second_word(name: &str) -> &str {
    name.split_whitespace().nth(1).unwrap_or(name)
}
