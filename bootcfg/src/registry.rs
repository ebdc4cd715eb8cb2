//! Ordered boot entry registry

use crate::error::{BootConfigError, Result};
use crate::types::BootEntry;
use alloc::vec::Vec;

/// Boot entries in the order they were declared.
///
/// Entries are appended by the parser only; callers get read access plus
/// selection of the default entry.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<BootEntry>,
    default: usize,
}

impl Registry {
    /// Empty registry
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            default: 0,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entry was loaded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, `None` past the end
    pub fn get(&self, index: usize) -> Option<&BootEntry> {
        self.entries.get(index)
    }

    /// First entry named `name`. Names are not unique.
    pub fn find(&self, name: &str) -> Option<&BootEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> core::slice::Iter<'_, BootEntry> {
        self.entries.iter()
    }

    /// All entries as a slice
    pub fn entries(&self) -> &[BootEntry] {
        &self.entries
    }

    /// Position of the default entry
    pub fn default_index(&self) -> usize {
        self.default
    }

    /// The default entry, `None` if the registry is empty
    pub fn default_entry(&self) -> Option<&BootEntry> {
        self.entries.get(self.default)
    }

    /// Select the default entry
    pub fn set_default(&mut self, index: usize) -> Result<()> {
        if index >= self.entries.len() {
            return Err(BootConfigError::EntryOutOfRange(index));
        }
        self.default = index;
        Ok(())
    }

    /// Append an entry, returning its position
    pub(crate) fn push(&mut self, entry: BootEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut BootEntry> {
        self.entries.get_mut(index)
    }

    /// Drop every entry and reset the default
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.default = 0;
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a BootEntry;
    type IntoIter = core::slice::Iter<'a, BootEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
