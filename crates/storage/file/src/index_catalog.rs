//! Maps an index's human-readable name to the `PageId` of its header page.
//!
//! This is the catalog the CLI and the tree engine consult when a caller
//! opens an index by name: `Open` looks up (or creates) the header page
//! here, and `Destroy` removes the mapping once the index's pages are freed.

use page::page_id::{FileId, PageId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Catalog of open/known indexes, keyed by name.
#[derive(Debug, Default)]
pub struct IndexCatalog {
    entries: RwLock<HashMap<String, PageId>>,
    next_file_id: RwLock<FileId>,
}

impl IndexCatalog {
    /// Creates a new, empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next unused `FileId` for a newly created index. Each
    /// open index owns the page-number space of exactly one `FileId`.
    pub fn allocate_file_id(&self) -> FileId {
        let mut guard = self
            .next_file_id
            .write()
            .expect("IndexCatalog poisoned: another thread panicked while holding the lock");
        let id = *guard;
        *guard += 1;
        id
    }

    /// Resolves an index name to its header page id, if it has been
    /// registered (`GetFileEntry` in the external-interface terminology).
    pub fn get_file_entry(&self, name: &str) -> Option<PageId> {
        let guard = self
            .entries
            .read()
            .expect("IndexCatalog poisoned: another thread panicked while holding the lock");
        guard.get(name).copied()
    }

    /// Registers `name` as backed by the header page `pid` (`AddFileEntry`).
    pub fn add_file_entry(&self, name: impl Into<String>, pid: PageId) {
        let mut guard = self
            .entries
            .write()
            .expect("IndexCatalog poisoned: another thread panicked while holding the lock");
        guard.insert(name.into(), pid);
    }

    /// Removes `name` from the catalog (`DeleteFileEntry`). A no-op if the
    /// name was never registered.
    pub fn delete_file_entry(&self, name: &str) {
        let mut guard = self
            .entries
            .write()
            .expect("IndexCatalog poisoned: another thread panicked while holding the lock");
        guard.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_an_entry() {
        let catalog = IndexCatalog::new();
        assert_eq!(catalog.get_file_entry("orders"), None);

        catalog.add_file_entry("orders", PageId::new(3, 0));
        assert_eq!(catalog.get_file_entry("orders"), Some(PageId::new(3, 0)));

        catalog.delete_file_entry("orders");
        assert_eq!(catalog.get_file_entry("orders"), None);
    }
}
