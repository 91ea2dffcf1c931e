//! Defines a temporary implementation for the `InMemoryFileManager`
//!
use crate::api::FileManager;
use crate::file_catalog::FileCatalog;
use page::page_id::PageId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// An in-memory file manager, used by tests and the unit-test harness for
/// the `btree` crate so they don't touch the filesystem.
#[derive(Debug)]
pub struct InMemoryFileManager {
    // Kept for interface parity with `DiskFileManager`; this implementation
    // does not need to resolve file ids to paths.
    file_catalog: Arc<FileCatalog>,
    pages: RwLock<HashMap<PageId, Box<[u8]>>>,
}

impl FileManager for InMemoryFileManager {
    fn new(file_catalog: Arc<FileCatalog>) -> Self {
        Self {
            file_catalog,
            pages: RwLock::new(HashMap::new()),
        }
    }

    fn read_page(&self, page_id: PageId, destination: &mut [u8]) -> bool {
        if let Some(page) = self.pages.read().unwrap().get(&page_id) {
            destination.copy_from_slice(page);
            true
        } else {
            false
        }
    }

    fn write_page(&self, page_id: PageId, page_data: &[u8]) {
        let boxed = page_data.to_vec().into_boxed_slice();
        self.pages.write().unwrap().insert(page_id, boxed);
    }
}
