//! The trace link driver: generate, compile, link.

use std::fs;
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, error, info, info_span};
use twl_emit::{CtfEmitter, PlainEmitter, generate, resolve_type_sizes};
use twl_model::Tracer;
use twl_sizeof::{Compiler, SizeOracle, compile_object};

use crate::{Error, Result};

/// Per-run settings, carried explicitly rather than as process state.
#[derive(Clone, Debug, Default)]
pub struct RunConfig {
    /// Dump the tracer state to stderr when generation fails.
    pub dump_on_error: bool,
    /// Retain intermediate artifacts instead of deleting them.
    pub keep: bool,
    /// Base path (without extension) for the retained wrapper
    /// source/object. When unset, artifacts live in a temporary
    /// directory.
    pub wrapper_base: Option<PathBuf>,
    /// Target compiler.
    pub compiler: Compiler,
    /// Emit CTF metadata alongside the wrapper code.
    pub ctf: bool,
}

/// Paths produced by a generation run. Holds the temporary directory (if
/// any) alive until the artifacts are no longer needed.
#[derive(Debug)]
pub struct Artifacts {
    /// Generated wrapper source.
    pub wrapper_c: PathBuf,
    /// Compiled wrapper object.
    pub wrapper_o: PathBuf,
    /// CTF metadata description, when the CTF backend ran.
    pub metadata: Option<PathBuf>,
    _temp: Option<tempfile::TempDir>,
}

/// Drives the pipeline: resolve type sizes, generate the wrapper and
/// metadata, compile the wrapper, and link the instrumented output.
pub struct TraceLinker {
    tracer: Tracer,
    run: RunConfig,
}

impl TraceLinker {
    #[must_use]
    pub const fn new(tracer: Tracer, run: RunConfig) -> Self {
        Self { tracer, run }
    }

    #[must_use]
    pub const fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Generate and compile the wrapper.
    ///
    /// # Errors
    ///
    /// Any failure aborts the run; with `dump_on_error` set the tracer
    /// state is dumped to stderr first.
    pub fn generate(&mut self) -> Result<Artifacts> {
        match self.generate_inner() {
            Ok(artifacts) => Ok(artifacts),
            Err(e) => {
                if self.run.dump_on_error {
                    let _ = self.tracer.dump(&mut std::io::stderr());
                }
                Err(e)
            }
        }
    }

    fn generate_inner(&mut self) -> Result<Artifacts> {
        let mut oracle = SizeOracle::new(self.run.compiler.clone());
        if self.run.keep {
            if let Some(base) = self.artifact_dir() {
                oracle = oracle.with_keep_dir(base);
            }
        }
        resolve_type_sizes(&mut self.tracer, &oracle)?;

        let mut code = String::new();
        let metadata_text = if self.run.ctf {
            let mut emitter = CtfEmitter::new();
            generate(&self.tracer, &mut emitter, &mut code)?;
            Some(emitter.into_metadata())
        } else {
            generate(&self.tracer, &mut PlainEmitter::new(), &mut code)?;
            None
        };

        let mut temp = None;
        let (wrapper_c, wrapper_o) = match &self.run.wrapper_base {
            Some(base) => (base.with_extension("c"), base.with_extension("o")),
            None => {
                let dir = tempfile::tempdir()?;
                let c = dir.path().join("wrapper.c");
                let o = dir.path().join("wrapper.o");
                if self.run.keep {
                    let kept = dir.keep();
                    info!(dir = %kept.display(), "keeping temporary artifacts");
                } else {
                    temp = Some(dir);
                }
                (c, o)
            }
        };

        fs::write(&wrapper_c, &code)?;
        info!(wrapper = %wrapper_c.display(), "generated wrapper");

        let metadata = match metadata_text {
            Some(text) => Some(self.write_metadata(&text)?),
            None => None,
        };

        compile_object(&self.run.compiler, &wrapper_c, &wrapper_o)
            .map_err(|e| Error::Compile(e.to_string()))?;
        debug!(object = %wrapper_o.display(), "compiled wrapper");

        Ok(Artifacts {
            wrapper_c,
            wrapper_o,
            metadata,
            _temp: temp,
        })
    }

    /// Write the CTF metadata to a named, retained location.
    fn write_metadata(&self, text: &str) -> Result<PathBuf> {
        let path = if let Some(base) = &self.run.wrapper_base {
            let path = base.with_extension("metadata");
            fs::write(&path, text)?;
            path
        } else {
            let file = tempfile::Builder::new()
                .prefix(&format!("{}-", self.tracer.name))
                .suffix(".metadata")
                .tempfile()?;
            let (mut file, path) = file.keep().map_err(|e| Error::Io(e.error))?;
            file.write_all(text.as_bytes())?;
            path
        };
        info!(metadata = %path.display(), "wrote trace metadata");
        Ok(path)
    }

    /// Link the instrumented output: one `--wrap` per trace, the wrapper
    /// object, then the caller's link arguments.
    ///
    /// # Errors
    ///
    /// A non-zero linker exit is fatal, with the captured stderr in the
    /// error.
    pub fn link(&self, wrapper_o: &Path, link_args: &[String]) -> Result<()> {
        let mut cmd = Command::new(self.run.compiler.command());
        for trace in &self.tracer.traces {
            cmd.arg(format!("-Wl,--wrap={trace}"));
        }
        cmd.arg(wrapper_o);
        cmd.args(link_args);

        debug!(cc = self.run.compiler.command(), "linking");

        let output = {
            let _span = info_span!("link").entered();
            cmd.stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output()
                .map_err(|e| {
                    Error::Link(format!("failed to run {}: {e}", self.run.compiler.command()))
                })?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr, "link failed");
            return Err(Error::Link(stderr.trim().to_string()));
        }

        Ok(())
    }

    /// Directory holding retained artifacts, derived from the wrapper
    /// base path.
    fn artifact_dir(&self) -> Option<PathBuf> {
        self.run.wrapper_base.as_ref().map(|base| {
            match base.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twl_model::{Function, Generator, Signature, Slot};

    fn tracer() -> Tracer {
        let mut f = Function::new("io");
        f.add_signature(Signature::new("sync", vec![], ""));
        let mut generator = Generator::new("g");
        generator.set_template(Slot::EntryTrace, "trace_entry(@FUNC_INDEX@);");
        let mut t = Tracer::new("t");
        t.functions.push(f);
        t.traces.push("sync".into());
        t.generator = generator;
        t
    }

    #[test]
    fn test_generate_fails_on_unknown_trace() {
        let mut t = tracer();
        t.traces.push("mystery".into());
        let mut linker = TraceLinker::new(t, RunConfig::default());
        let err = linker.generate().unwrap_err();
        assert!(err.to_string().contains("mystery"));
    }

    #[test]
    fn test_artifact_dir_from_wrapper_base() {
        let run = RunConfig {
            wrapper_base: Some(PathBuf::from("out/wrapper")),
            ..RunConfig::default()
        };
        let linker = TraceLinker::new(tracer(), run);
        assert_eq!(linker.artifact_dir(), Some(PathBuf::from("out")));
    }
}
