//! Generator profiles.
//!
//! A generator is a named bundle of code templates defining how
//! entry/exit/argument/return events are rendered and how a lock protects
//! buffer allocation. Templates live in a slot-keyed table so a new
//! backend is a configuration addition, not a code change.

use rustc_hash::FxHashMap;

use crate::ModelError;

/// Lock release policy relative to buffer allocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LockModel {
    /// Release right after buffer allocation.
    #[default]
    Alloc,
    /// Release right after the entry trace statement.
    Trace,
}

impl LockModel {
    /// Parse a lock model tag. The empty tag selects the default.
    pub fn parse(s: &str) -> Result<Self, ModelError> {
        match s {
            "" | "alloc" => Ok(Self::Alloc),
            "trace" => Ok(Self::Trace),
            other => Err(ModelError::UnknownLockModel(other.to_string())),
        }
    }
}

/// A template slot within a generator profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    LockLocal,
    LockAcquire,
    LockRelease,
    BufferLocal,
    EntryTrace,
    EntryAlloc,
    ArgTrace,
    ExitTrace,
    ExitAlloc,
    RetTrace,
    CtfHeaderTrace,
}

impl Slot {
    /// All slots, in configuration order.
    pub const ALL: [Self; 11] = [
        Self::LockLocal,
        Self::LockAcquire,
        Self::LockRelease,
        Self::BufferLocal,
        Self::EntryTrace,
        Self::EntryAlloc,
        Self::ArgTrace,
        Self::ExitTrace,
        Self::ExitAlloc,
        Self::RetTrace,
        Self::CtfHeaderTrace,
    ];

    /// Configuration key for this slot.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::LockLocal => "lock-local",
            Self::LockAcquire => "lock-acquire",
            Self::LockRelease => "lock-release",
            Self::BufferLocal => "buffer-local",
            Self::EntryTrace => "entry-trace",
            Self::EntryAlloc => "entry-alloc",
            Self::ArgTrace => "arg-trace",
            Self::ExitTrace => "exit-trace",
            Self::ExitAlloc => "exit-alloc",
            Self::RetTrace => "ret-trace",
            Self::CtfHeaderTrace => "ctf-header-trace",
        }
    }

    /// Parse a configuration key.
    pub fn from_key(key: &str) -> Result<Self, ModelError> {
        Self::ALL
            .into_iter()
            .find(|s| s.key() == key)
            .ok_or_else(|| ModelError::UnknownSlot(key.to_string()))
    }
}

/// A named set of code templates plus the lock model and support text.
#[derive(Clone, Debug, Default)]
pub struct Generator {
    /// Generator profile name.
    pub name: String,
    /// Lock release policy.
    pub lock_model: LockModel,
    /// Include statements emitted in the wrapper preamble.
    pub headers: Vec<String>,
    /// Define statements emitted in the wrapper preamble.
    pub defines: Vec<String>,
    /// Free-form code lines inserted before the wrappers.
    pub code: Vec<String>,
    templates: FxHashMap<Slot, String>,
}

impl Generator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Install a template. An empty template means the slot's emission
    /// step is disabled.
    pub fn set_template(&mut self, slot: Slot, text: impl Into<String>) {
        self.templates.insert(slot, text.into());
    }

    /// The template for a slot; empty when unset.
    #[must_use]
    pub fn template(&self, slot: Slot) -> &str {
        self.templates.get(&slot).map_or("", String::as_str)
    }

    /// Is the slot's emission step enabled?
    #[must_use]
    pub fn has(&self, slot: Slot) -> bool {
        !self.template(slot).is_empty()
    }
}
