//! Thin façade over a [`BufferManager`], adding page-number allocation.
//!
//! Everything here is a pass-through to the buffer manager's pin/unpin
//! contract; the one piece of state this layer owns is the monotonically
//! increasing page-number counter used to hand out fresh `PageId`s for
//! `NewPage`. Freed pages are not recycled — the tree never shrinks a file,
//! it only ever grows it, matching the Non-goal that rules out on-disk
//! garbage collection.

use buffer::buffer::BufferManager;
use buffer::errors::BufferError;
use buffer::guards::{PageReadGuard, PageWriteGuard};
use file::api::FileManager;
use page::page_id::{FileId, PageId};
use page::page_type::PageType;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Coordinates a buffer manager and per-file page-number allocation.
#[derive(Debug)]
pub struct StorageManager<F: FileManager> {
    buffer_manager: Rc<BufferManager<F>>,
    next_page_number: RefCell<HashMap<FileId, u32>>,
}

impl<F: FileManager> StorageManager<F> {
    /// Wraps an existing buffer manager.
    pub fn new(buffer_manager: Rc<BufferManager<F>>) -> Self {
        Self {
            buffer_manager,
            next_page_number: RefCell::new(HashMap::new()),
        }
    }

    /// Reserves the next unused page number in `file_id` without touching
    /// the buffer pool. Used when a caller needs a `PageId` up front, e.g.
    /// to write it into a sibling's link before the sibling itself exists.
    pub fn reserve_page_id(&self, file_id: FileId) -> PageId {
        let mut counters = self.next_page_number.borrow_mut();
        let counter = counters.entry(file_id).or_insert(0);
        let page_number = *counter;
        *counter += 1;
        PageId::new(file_id, page_number)
    }

    /// Count of page numbers ever handed out for `file_id` (i.e. one past
    /// the highest allocated page number). Used by whole-file traversals
    /// that walk page numbers in order rather than following tree links.
    pub fn page_count(&self, file_id: FileId) -> u32 {
        self.next_page_number.borrow().get(&file_id).copied().unwrap_or(0)
    }

    /// Allocates a fresh page and pins it (`NewPage`).
    pub fn new_page(
        &self,
        file_id: FileId,
        page_type: PageType,
    ) -> Result<PageWriteGuard<'_>, BufferError> {
        let page_id = self.reserve_page_id(file_id);
        self.buffer_manager.new_page(page_id, page_type)
    }

    /// Allocates a fresh page at an already-reserved id, e.g. from
    /// [`Self::reserve_page_id`] (`NewPage` with a caller-chosen id).
    pub fn new_page_at(
        &self,
        page_id: PageId,
        page_type: PageType,
    ) -> Result<PageWriteGuard<'_>, BufferError> {
        self.buffer_manager.new_page(page_id, page_type)
    }

    /// Pins `page_id` for reading (`PinPage`).
    pub fn read_page(&self, page_id: PageId) -> Result<PageReadGuard<'_>, BufferError> {
        self.buffer_manager.pin_page(page_id)
    }

    /// Pins `page_id` for writing (`PinPage`).
    pub fn write_page(&self, page_id: PageId) -> Result<PageWriteGuard<'_>, BufferError> {
        self.buffer_manager.pin_page_mut(page_id)
    }

    /// `UnpinPage`.
    pub fn unpin_page(&self, page_id: PageId, dirty: bool) -> Result<(), BufferError> {
        self.buffer_manager.unpin_page(page_id, dirty)
    }

    /// `FreePage`.
    pub fn free_page(&self, page_id: PageId) -> Result<(), BufferError> {
        self.buffer_manager.free_page(page_id)
    }

    /// Flushes every dirty resident page to disk.
    pub fn flush_all_pages(&self) {
        self.buffer_manager.flush_all_pages();
    }
}
