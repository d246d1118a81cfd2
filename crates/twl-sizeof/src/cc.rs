//! Target compiler description and invocation.

use std::path::Path;
use std::process::{Command, Stdio};
use std::str::FromStr;

use tracing::{debug, error, info_span};

use crate::{OracleError, Result};

/// Target C compiler to invoke for probes and generated wrappers.
///
/// Accepts any compiler command (e.g. "cc", "gcc-13", "clang-20",
/// "arm-none-eabi-gcc") plus a base flag set applied before the fixed
/// `-O2 -g -c` compile flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compiler {
    command: String,
    cflags: Vec<String>,
}

impl Compiler {
    /// Create a compiler with the given command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            cflags: Vec::new(),
        }
    }

    /// Replace the base flag set.
    #[must_use]
    pub fn with_cflags(mut self, cflags: Vec<String>) -> Self {
        self.cflags = cflags;
        self
    }

    /// Append one base flag.
    pub fn push_cflag(&mut self, flag: impl Into<String>) {
        self.cflags.push(flag.into());
    }

    /// Command to invoke.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Base flags applied to every compile.
    #[must_use]
    pub fn cflags(&self) -> &[String] {
        &self.cflags
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new("cc")
    }
}

impl FromStr for Compiler {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("compiler command cannot be empty".to_string());
        }
        Ok(Self::new(s))
    }
}

impl std::fmt::Display for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command)
    }
}

/// Compile one source file to an object file with `-O2 -g -c`.
///
/// # Errors
///
/// Returns [`OracleError::Compile`] carrying the compiler's stderr when
/// the process cannot be spawned, exits non-zero, or dies on a signal.
pub fn compile_object(compiler: &Compiler, source: &Path, object: &Path) -> Result<()> {
    let mut cmd = Command::new(compiler.command());
    cmd.args(compiler.cflags());
    cmd.args(["-O2", "-g", "-c"]);
    cmd.arg("-o").arg(object).arg(source);

    debug!(cc = compiler.command(), source = %source.display(), "compiling");

    let output = {
        let _span = info_span!("compile_object").entered();
        cmd.stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                OracleError::Compile(format!("failed to run {}: {e}", compiler.command()))
            })?
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(stderr = %stderr, source = %source.display(), "compilation failed");
        return Err(OracleError::Compile(format!(
            "{}: {}",
            source.display(),
            stderr.trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiler_defaults() {
        let cc = Compiler::default();
        assert_eq!(cc.command(), "cc");
        assert!(cc.cflags().is_empty());
    }

    #[test]
    fn test_compiler_from_str() {
        let cc: Compiler = "gcc-13".parse().unwrap();
        assert_eq!(cc.command(), "gcc-13");
        assert!("".parse::<Compiler>().is_err());
    }

    #[test]
    fn test_compiler_cflags() {
        let mut cc = Compiler::new("gcc").with_cflags(vec!["-Wall".to_string()]);
        cc.push_cflag("-I/opt/include");
        assert_eq!(cc.cflags(), ["-Wall", "-I/opt/include"]);
    }
}
