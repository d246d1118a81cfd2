//! The size oracle: probe → compile → decode.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use twl_elf::ObjectFile;

use crate::{
    Compiler, Result, TYPE_MAP_SECTION, compile_object, decode_type_map, name_field_width,
    probe_source,
};

/// A type whose size is pending or resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeEntry {
    /// Exact type name as it appears in source.
    pub name: String,
    /// Resolved size in bytes; `None` until the oracle has run.
    pub size: Option<u32>,
}

impl TypeEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
        }
    }

    /// Create an entry with an already-known size.
    pub fn with_size(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size: Some(size),
        }
    }
}

/// Resolves type sizes by compiling a probe and decoding the type-map
/// section out of the resulting object file.
#[derive(Clone, Debug, Default)]
pub struct SizeOracle {
    compiler: Compiler,
    keep_dir: Option<PathBuf>,
}

impl SizeOracle {
    #[must_use]
    pub const fn new(compiler: Compiler) -> Self {
        Self {
            compiler,
            keep_dir: None,
        }
    }

    /// Retain the probe source and object under the given directory
    /// instead of a deleted temporary directory.
    #[must_use]
    pub fn with_keep_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.keep_dir = Some(dir.into());
        self
    }

    /// Resolve the size of every entry, in place.
    ///
    /// `prefix_code` must declare every non-builtin name; `headers` is
    /// emitted ahead of it. Entries whose name never appears in the
    /// compiled section keep `size = None`; the caller is responsible for
    /// detecting those. A missing type-map section resolves nothing and is
    /// not an error, since some build configurations strip unused
    /// sections.
    ///
    /// # Errors
    ///
    /// Probe compilation failure is fatal for the whole batch; no entry is
    /// resolved.
    pub fn resolve(
        &self,
        types: &mut [TypeEntry],
        prefix_code: &str,
        headers: &str,
    ) -> Result<()> {
        if types.is_empty() {
            return Ok(());
        }

        let width = name_field_width(types);
        let source = probe_source(types, prefix_code, headers);

        let mut _guard = None;
        let dir: PathBuf = match &self.keep_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                dir.clone()
            }
            None => {
                let tmp = tempfile::tempdir()?;
                let path = tmp.path().to_path_buf();
                _guard = Some(tmp);
                path
            }
        };

        let c_path = dir.join("type_probe.c");
        let o_path = dir.join("type_probe.o");
        fs::write(&c_path, source)?;
        compile_object(&self.compiler, &c_path, &o_path)?;

        let section = read_type_map(&o_path)?;
        let Some(section) = section else {
            debug!(
                section = TYPE_MAP_SECTION,
                "type map section missing; no sizes resolved"
            );
            return Ok(());
        };

        apply_sizes(types, &decode_type_map(&section, width));
        Ok(())
    }
}

/// Read the type-map section bytes out of an object file, if present.
fn read_type_map(object: &Path) -> Result<Option<Vec<u8>>> {
    let bytes = fs::read(object)?;
    let object = ObjectFile::parse(&bytes)?;
    Ok(object.section_data(TYPE_MAP_SECTION).map(<[u8]>::to_vec))
}

/// Assign decoded sizes to the pending entries by exact name, preserving
/// entry order. Later duplicates overwrite earlier ones.
pub(crate) fn apply_sizes(types: &mut [TypeEntry], decoded: &[(String, u32)]) {
    for (name, size) in decoded {
        for entry in types.iter_mut() {
            if entry.name == *name {
                entry.size = Some(*size);
            }
        }
    }
}
