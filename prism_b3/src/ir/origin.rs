//! Provenance handles.
//!
//! Values carry an [`Origin`]: an opaque, copyable reference into the
//! procedure's [`OriginTable`]. The IR never interprets an origin; it only
//! forwards it through rewrites and resolves it to text for dumps.

use std::fmt;

use super::arena::{Arena, Id};

/// Human-readable provenance, e.g. `"bc#12 in foo"`.
#[derive(Debug, Clone)]
pub struct OriginEntry {
    description: String,
}

impl OriginEntry {
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Origin(Id<OriginEntry>);

impl Origin {
    /// No provenance.
    pub const NONE: Origin = Origin(Id::INVALID);

    #[inline]
    pub fn is_some(self) -> bool {
        self.0.is_valid()
    }

    #[inline]
    pub fn is_none(self) -> bool {
        !self.is_some()
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_some() {
            write!(f, "Origin({})", self.0.index())
        } else {
            f.write_str("Origin(none)")
        }
    }
}

/// Owns every origin description of a procedure.
#[derive(Debug, Default)]
pub struct OriginTable {
    entries: Arena<OriginEntry>,
}

impl OriginTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, description: impl Into<String>) -> Origin {
        let description = description.into();
        Origin(self.entries.alloc_with(|_| OriginEntry { description }))
    }

    /// Description of `origin`, or `None` for [`Origin::NONE`].
    pub fn describe(&self, origin: Origin) -> Option<&str> {
        if origin.is_none() {
            return None;
        }
        self.entries.get(origin.0).map(OriginEntry::description)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
