//! C7: the range-scan cursor. Iterates the leaf linked list between
//! optional low/high keys, tolerating empty intermediate pages and holding
//! only identifiers + slot numbers between `GetNext` calls (§4.6, §5 "scan
//! tolerance").

use crate::engine::{self, TreeHandle};
use crate::entry::RecordId;
use crate::errors::TreeResult;
use file::api::FileManager;
use page::page_id::{FileId, INVALID_PAGE_NUMBER, PageId};
use std::rc::Rc;
use storage_api::storage_manager::StorageManager;

/// `OpenScan(lowKey, highKey) -> scan`. Either bound may be absent; see §6
/// for the four resulting range shapes.
#[derive(Debug)]
pub struct ScanCursor<F: FileManager> {
    storage: Rc<StorageManager<F>>,
    file_id: FileId,
    low_key: Option<Vec<u8>>,
    high_key: Option<Vec<u8>>,
    start_leaf: Option<PageId>,
    cursor: Option<(PageId, u32)>,
    finished: bool,
}

impl<F: FileManager> ScanCursor<F> {
    /// `Open(lowKey, highKey)`: computes the starting leaf via
    /// `Search(lowKey ?? "")`; an empty tree (no starting leaf) marks the
    /// scan finished before the first `GetNext`.
    pub(crate) fn open(
        handle: &TreeHandle<F>,
        low_key: Option<&[u8]>,
        high_key: Option<&[u8]>,
    ) -> TreeResult<Self> {
        let search_key = low_key.unwrap_or(&[]);
        let start_leaf = engine::search(handle, search_key)?;
        Ok(Self {
            storage: Rc::clone(&handle.storage),
            file_id: handle.file_id,
            low_key: low_key.map(|k| k.to_vec()),
            high_key: high_key.map(|k| k.to_vec()),
            finished: start_leaf.is_none(),
            start_leaf,
            cursor: None,
        })
    }

    /// `GetNext() -> rid, key`. `Ok(None)` is `Done`.
    pub fn get_next(&mut self) -> TreeResult<Option<(Vec<u8>, RecordId)>> {
        if self.finished {
            return Ok(None);
        }

        let first_call = self.cursor.is_none();
        let mut candidate = match self.cursor {
            Some((page_id, slot)) => self.advance(page_id, Some(slot))?,
            None => {
                let Some(start) = self.start_leaf else {
                    self.finished = true;
                    return Ok(None);
                };
                self.advance(start, None)?
            }
        };

        // On the very first result, skip entries strictly below `low_key` —
        // `Search` only guarantees landing on the leftmost *leaf* that may
        // contain a qualifying key, not the first qualifying slot in it.
        if first_call {
            if let Some(low) = &self.low_key {
                while let Some((page_id, slot, key, _)) = &candidate {
                    if key.as_slice() < low.as_slice() {
                        candidate = self.advance(*page_id, Some(*slot))?;
                    } else {
                        break;
                    }
                }
            }
        }

        match candidate {
            None => {
                self.finished = true;
                Ok(None)
            }
            Some((page_id, slot, key, rid)) => {
                if let Some(high) = &self.high_key {
                    if key.as_slice() > high.as_slice() {
                        self.finished = true;
                        return Ok(None);
                    }
                }
                self.cursor = Some((page_id, slot));
                Ok(Some((key, rid)))
            }
        }
    }

    /// Finds the next entry starting from `leaf_id`: if `from_slot` is
    /// `Some`, resumes just past it on that leaf via `Leaf.GetNext`;
    /// otherwise takes the leaf's first entry. Either way, an exhausted or
    /// empty leaf causes a hop along `next_page` to the next leaf, which is
    /// always probed from its own first entry. Pins the leaf only for the
    /// duration of this call.
    fn advance(
        &self,
        mut leaf_id: PageId,
        mut from_slot: Option<u32>,
    ) -> TreeResult<Option<(PageId, u32, Vec<u8>, RecordId)>> {
        loop {
            let guard = self.storage.read_page(leaf_id)?;
            let entry = match from_slot {
                Some(slot) => crate::leaf::next(&guard, slot)?,
                None => crate::leaf::first(&guard)?,
            };
            let next_page_number = guard.next_page()?;
            drop(guard);
            self.storage.unpin_page(leaf_id, false)?;

            if let Some((slot, key, rid)) = entry {
                return Ok(Some((leaf_id, slot, key, rid)));
            }
            if next_page_number == INVALID_PAGE_NUMBER {
                return Ok(None);
            }
            leaf_id = PageId::new(self.file_id, next_page_number);
            from_slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::RecordId;
    use buffer::buffer::BufferManager;
    use file::file_catalog::FileCatalog;
    use file::in_memory_file_manager::InMemoryFileManager;
    use page::page_type::PageType;
    use std::sync::Arc;

    fn handle() -> TreeHandle<InMemoryFileManager> {
        let catalog = Arc::new(FileCatalog::new());
        let fm = Rc::new(InMemoryFileManager::new(catalog));
        let bm = Rc::new(BufferManager::new(fm, 16));
        let storage = Rc::new(StorageManager::new(bm));
        let header = storage.new_page(0, PageType::Header).unwrap();
        let header_id = header.page_id();
        drop(header);
        storage.unpin_page(header_id, true).unwrap();
        TreeHandle::new(storage, 0, header_id)
    }

    fn rid(n: u32) -> RecordId {
        RecordId::new(PageId::new(0, n), n + 1)
    }

    #[test]
    fn scan_over_an_empty_tree_is_immediately_done() {
        let handle = handle();
        let mut cursor = ScanCursor::open(&handle, None, None).unwrap();
        assert_eq!(cursor.get_next().unwrap(), None);
    }

    #[test]
    fn full_scan_returns_every_key_in_order() {
        let handle = handle();
        for k in [b"0003", b"0001", b"0002"] {
            engine::insert(&handle, k, rid(k[3] as u32)).unwrap();
        }
        let mut cursor = ScanCursor::open(&handle, None, None).unwrap();
        let mut seen = Vec::new();
        while let Some((key, _)) = cursor.get_next().unwrap() {
            seen.push(key);
        }
        assert_eq!(seen, vec![b"0001".to_vec(), b"0002".to_vec(), b"0003".to_vec()]);
    }

    #[test]
    fn bounded_scan_respects_both_edges() {
        let handle = handle();
        for k in 0..10u32 {
            let key = format!("{k:04}");
            engine::insert(&handle, key.as_bytes(), rid(k)).unwrap();
        }
        let mut cursor = ScanCursor::open(&handle, Some(b"0003"), Some(b"0006")).unwrap();
        let mut seen = Vec::new();
        while let Some((key, _)) = cursor.get_next().unwrap() {
            seen.push(String::from_utf8(key).unwrap());
        }
        assert_eq!(seen, vec!["0003", "0004", "0005", "0006"]);
    }

    #[test]
    fn exact_match_scan_returns_every_duplicate() {
        let handle = handle();
        engine::insert(&handle, b"0005", rid(1)).unwrap();
        engine::insert(&handle, b"0005", rid(2)).unwrap();
        engine::insert(&handle, b"0004", rid(3)).unwrap();
        engine::insert(&handle, b"0006", rid(4)).unwrap();

        let mut cursor = ScanCursor::open(&handle, Some(b"0005"), Some(b"0005")).unwrap();
        let mut seen = Vec::new();
        while let Some((key, data_rid)) = cursor.get_next().unwrap() {
            seen.push((key, data_rid));
        }
        assert_eq!(seen, vec![(b"0005".to_vec(), rid(1)), (b"0005".to_vec(), rid(2))]);
    }
}
