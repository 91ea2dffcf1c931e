//! Index file surface (§6 "Index file surface (exposed)"): the public API
//! a caller opens an index through — `Open`, `Destroy`, `Insert`, `Delete`,
//! `OpenScan`, `PrintTree`, `PrintWhole`, `DumpStatistics`.

use crate::engine::{self, TreeHandle};
use crate::entry::RecordId;
use crate::errors::TreeResult;
use crate::header_page;
use crate::maintenance::{self, PrintOption, Statistics};
use crate::scan::ScanCursor;
use file::api::FileManager;
use file::file_catalog::FileCatalog;
use file::index_catalog::IndexCatalog;
use page::page_id::PageId;
use page::page_type::PageType;
use std::path::PathBuf;
use std::rc::Rc;
use storage_api::storage_manager::StorageManager;

/// A named, open B+ tree index. Wraps a [`TreeHandle`] plus the catalog
/// bookkeeping needed to find it again by name and to forget it on
/// [`IndexFile::destroy`].
#[derive(Debug)]
pub struct IndexFile<F: FileManager> {
    handle: TreeHandle<F>,
    index_catalog: Rc<IndexCatalog>,
    name: String,
}

impl<F: FileManager> IndexFile<F> {
    /// `Open(name) -> handle`: create-if-absent, else open. The header page
    /// is pinned once for the returned handle's entire lifetime (§3
    /// "Lifecycle"); `path` is only consulted on first creation, to
    /// register the backing file with `file_catalog`.
    pub fn open(
        name: &str,
        storage: Rc<StorageManager<F>>,
        index_catalog: Rc<IndexCatalog>,
        file_catalog: &FileCatalog,
        path: PathBuf,
    ) -> TreeResult<Self> {
        let header_page_id = match index_catalog.get_file_entry(name) {
            Some(existing) => {
                // Pin once and leak the guard deliberately: this is the
                // base pin the handle holds for its whole lifetime, not a
                // transient read.
                let guard = storage.read_page(existing)?;
                drop(guard);
                existing
            }
            None => {
                let file_id = index_catalog.allocate_file_id();
                file_catalog.add_file(file_id, path);
                let header_id = PageId::new(file_id, 0);
                let mut guard = storage.new_page_at(header_id, PageType::Header)?;
                header_page::set_root(&mut guard, None)?;
                drop(guard);
                index_catalog.add_file_entry(name, header_id);
                header_id
            }
        };

        Ok(Self {
            handle: TreeHandle::new(storage, header_page_id.file_id, header_page_id),
            index_catalog,
            name: name.to_string(),
        })
    }

    /// The name this index was opened under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Destroy(handle)`: frees every page reachable from the root plus the
    /// header page itself, then removes the catalog entry. Consumes the
    /// handle — there is nothing left to operate on afterwards.
    pub fn destroy(self) -> TreeResult<()> {
        maintenance::destroy_file(&self.handle)?;
        self.index_catalog.delete_file_entry(&self.name);
        Ok(())
    }

    /// `Insert(key, rid)`.
    pub fn insert(&self, key: &[u8], rid: RecordId) -> TreeResult<()> {
        engine::insert(&self.handle, key, rid)
    }

    /// `Delete(key, rid)`.
    pub fn delete(&self, key: &[u8], rid: RecordId) -> TreeResult<()> {
        engine::delete(&self.handle, key, rid)
    }

    /// `OpenScan(lowKey, highKey) -> scan`.
    pub fn open_scan(&self, low_key: Option<&[u8]>, high_key: Option<&[u8]>) -> TreeResult<ScanCursor<F>> {
        ScanCursor::open(&self.handle, low_key, high_key)
    }

    /// `PrintTree(root, option)`.
    pub fn print_tree(&self, option: PrintOption) -> TreeResult<String> {
        maintenance::print_tree(&self.handle, option)
    }

    /// `PrintWhole`.
    pub fn print_whole(&self) -> TreeResult<String> {
        maintenance::print_whole(&self.handle)
    }

    /// `DumpStatistics`.
    pub fn dump_statistics(&self) -> TreeResult<Statistics> {
        maintenance::dump_statistics(&self.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffer::buffer::BufferManager;
    use file::in_memory_file_manager::InMemoryFileManager;
    use std::sync::Arc;

    fn env() -> (Rc<StorageManager<InMemoryFileManager>>, Rc<IndexCatalog>, Arc<FileCatalog>) {
        let file_catalog = Arc::new(FileCatalog::new());
        let fm = Rc::new(InMemoryFileManager::new(file_catalog.clone()));
        let bm = Rc::new(BufferManager::new(fm, 16));
        let storage = Rc::new(StorageManager::new(bm));
        (storage, Rc::new(IndexCatalog::new()), file_catalog)
    }

    #[test]
    fn open_twice_by_name_reuses_the_same_header() {
        let (storage, catalog, fc) = env();
        let first = IndexFile::open("orders", storage.clone(), catalog.clone(), &fc, "orders.tbl".into()).unwrap();
        first.insert(b"0001", RecordId::new(PageId::new(0, 0), 1)).unwrap();

        let reopened = IndexFile::open("orders", storage, catalog, &fc, "orders.tbl".into()).unwrap();
        let mut scan = reopened.open_scan(None, None).unwrap();
        assert_eq!(scan.get_next().unwrap().unwrap().0, b"0001".to_vec());
    }

    #[test]
    fn destroy_then_reopen_gives_a_fresh_empty_index() {
        let (storage, catalog, fc) = env();
        let idx = IndexFile::open("t0", storage.clone(), catalog.clone(), &fc, "t0.tbl".into()).unwrap();
        idx.insert(b"0001", RecordId::new(PageId::new(0, 0), 1)).unwrap();
        idx.destroy().unwrap();

        let fresh = IndexFile::open("t0", storage, catalog, &fc, "t0.tbl".into()).unwrap();
        let stats = fresh.dump_statistics().unwrap();
        assert_eq!(stats.leaf_pages, 0);
        assert_eq!(stats.leaf_entries, 0);
    }
}
