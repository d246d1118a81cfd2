//! Declarative tracer configuration.
//!
//! A single YAML document describes the tracer: options, trace lists,
//! functions with their signatures, the generator profile's template
//! table, and user types. Loading turns the document into the descriptor
//! model.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use twl_model::{Function, Generator, LockModel, Signature, Slot, Tracer, UserType};

use crate::Result;

/// Top-level configuration document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigDoc {
    /// Tracer name.
    pub name: String,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub enables: Vec<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(default)]
    pub traces: Vec<String>,
    #[serde(default)]
    pub functions: Vec<FunctionDoc>,
    pub generator: GeneratorDoc,
    #[serde(default)]
    pub types: Vec<TypeDoc>,
}

/// One wrappable function group.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FunctionDoc {
    pub name: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub signatures: BTreeMap<String, SignatureDoc>,
}

/// One signature: argument types and an optional return type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SignatureDoc {
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default, rename = "return")]
    pub ret: String,
}

/// The generator profile: lock model and slot-keyed templates.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GeneratorDoc {
    pub name: String,
    #[serde(default)]
    pub lock_model: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub defines: Vec<String>,
    #[serde(default)]
    pub code: Vec<String>,
    #[serde(default)]
    pub templates: BTreeMap<String, String>,
}

/// One user type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TypeDoc {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

/// Load a tracer from a configuration file.
///
/// # Errors
///
/// Fails on I/O errors, malformed YAML, unknown template slots, or an
/// unknown lock model.
pub fn load(path: &Path) -> Result<Tracer> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Parse a tracer from configuration text.
pub fn parse(text: &str) -> Result<Tracer> {
    let doc: ConfigDoc = serde_yaml::from_str(text)?;
    doc.into_tracer()
}

impl ConfigDoc {
    /// Convert the document into the descriptor model.
    pub fn into_tracer(self) -> Result<Tracer> {
        let mut tracer = Tracer::new(self.name);
        tracer.defines = self.defines;
        tracer.enables = self.enables;
        tracer.triggers = self.triggers;
        tracer.traces = self.traces;
        for (name, value) in self.options {
            tracer.options.set(name, value);
        }

        for doc in self.functions {
            let mut function = Function::new(doc.name);
            function.headers = doc.headers;
            function.defines = doc.defines;
            for (name, sig) in doc.signatures {
                function.add_signature(Signature::new(name, sig.args, sig.ret));
            }
            tracer.functions.push(function);
        }

        let mut generator = Generator::new(self.generator.name);
        generator.lock_model = LockModel::parse(&self.generator.lock_model)?;
        generator.headers = self.generator.headers;
        generator.defines = self.generator.defines;
        generator.code = self.generator.code;
        for (key, text) in self.generator.templates {
            generator.set_template(Slot::from_key(&key)?, text);
        }
        tracer.generator = generator;

        for doc in self.types {
            tracer.types.push(UserType::new(doc.name, doc.members));
        }

        Ok(tracer)
    }
}
