//! Single-threaded buffer pool implementing the pin/unpin discipline the
//! tree engine is built against: `NewPage`, `PinPage`, `UnpinPage`,
//! `FreePage`.
//!
//! There is deliberately no concurrency here — no locks, no condition
//! variables, no background writer. Every frame's mutable state lives
//! behind a `Cell`/`RefCell` purely so `BufferManager`'s methods can take
//! `&self` (several pages are often pinned at once, e.g. a parent and a
//! child mid-split) while the borrow checker still catches a caller
//! confusing a read pin with a write pin on the same frame.

use crate::errors::BufferError;
use crate::frame::{BufferFrame, FrameId};
use crate::guards::{PageReadGuard, PageWriteGuard};
use file::api::FileManager;
use page::PAGE_SIZE;
use page::page::Page;
use page::page_id::PageId;
use page::page_type::PageType;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The buffer manager responsible for the cache pool of data pages.
#[derive(Debug)]
pub struct BufferManager<F: FileManager> {
    file_manager: Rc<F>,
    page_table: RefCell<HashMap<PageId, FrameId>>,
    frames: Vec<BufferFrame>,
}

impl<F: FileManager> BufferManager<F> {
    /// Creates a new buffer manager with `pool_size` frames.
    pub fn new(file_manager: Rc<F>, pool_size: usize) -> Self {
        let mut frames = Vec::with_capacity(pool_size);
        frames.resize_with(pool_size, BufferFrame::default);
        Self {
            file_manager,
            page_table: RefCell::new(HashMap::new()),
            frames,
        }
    }

    /// `NewPage`: claims a frame, zeroes and re-initializes it as
    /// `page_type`, and pins it once. The new page is dirty by
    /// construction — nothing has written it to disk yet.
    pub fn new_page(&self, page_id: PageId, page_type: PageType) -> Result<PageWriteGuard<'_>, BufferError> {
        let frame_id = self.claim_frame(page_id)?;
        self.frames[frame_id]
            .page
            .borrow_mut()
            .initialize(page_id, page_type)?;
        self.frames[frame_id].dirty.set(true);
        Ok(self.write_guard(frame_id))
    }

    /// `PinPage`: increments the pin count, reading the page in from disk
    /// first if it isn't already resident.
    pub fn pin_page(&self, page_id: PageId) -> Result<PageReadGuard<'_>, BufferError> {
        let frame_id = self.resident_frame(page_id)?;
        Ok(self.read_guard(frame_id))
    }

    /// Same as [`Self::pin_page`] but returns a guard allowing mutation.
    pub fn pin_page_mut(&self, page_id: PageId) -> Result<PageWriteGuard<'_>, BufferError> {
        let frame_id = self.resident_frame(page_id)?;
        Ok(self.write_guard(frame_id))
    }

    /// `UnpinPage`: decrements the pin count. `dirty` is OR'd onto the
    /// frame's dirty bit — it never clears it. Actual write-back happens at
    /// [`Self::flush_page`]/[`Self::flush_all_pages`] time, or when the
    /// frame is later chosen as an eviction victim.
    pub fn unpin_page(&self, page_id: PageId, dirty: bool) -> Result<(), BufferError> {
        let frame_id = *self
            .page_table
            .borrow()
            .get(&page_id)
            .ok_or(BufferError::PageNotBuffered(page_id))?;
        let frame = &self.frames[frame_id];

        if dirty {
            frame.dirty.set(true);
        }

        let pin_count = frame.pin_count.get();
        if pin_count == 0 {
            return Err(BufferError::UnpinUnderflow(page_id));
        }
        frame.pin_count.set(pin_count - 1);
        Ok(())
    }

    /// `FreePage`: returns the page to the free list. Implicitly unpins —
    /// the caller must hold exactly the one pin it acquired to create or
    /// open the page. Discards any unwritten changes; a page being freed is
    /// logically gone, not merely evicted.
    pub fn free_page(&self, page_id: PageId) -> Result<(), BufferError> {
        let frame_id = *self
            .page_table
            .borrow()
            .get(&page_id)
            .ok_or(BufferError::PageNotBuffered(page_id))?;
        let frame = &self.frames[frame_id];

        let pin_count = frame.pin_count.get();
        if pin_count > 1 {
            return Err(BufferError::StillPinned { page_id, pin_count });
        }

        self.page_table.borrow_mut().remove(&page_id);
        frame.page_id.set(None);
        frame.pin_count.set(0);
        frame.dirty.set(false);
        Ok(())
    }

    /// Writes a single resident dirty page back to disk and clears its
    /// dirty bit. A no-op if the page isn't resident or isn't dirty.
    pub fn flush_page(&self, page_id: PageId) -> Result<(), BufferError> {
        let Some(&frame_id) = self.page_table.borrow().get(&page_id) else {
            return Ok(());
        };
        let frame = &self.frames[frame_id];
        if frame.dirty.get() {
            self.file_manager
                .write_page(page_id, frame.page.borrow().data());
            frame.dirty.set(false);
        }
        Ok(())
    }

    /// Flushes every resident dirty page.
    pub fn flush_all_pages(&self) {
        let ids: Vec<PageId> = self.page_table.borrow().keys().copied().collect();
        for page_id in ids {
            let _ = self.flush_page(page_id);
        }
    }

    /// Resolves `page_id` to a resident frame, pinning it: either it is
    /// already cached (pin count bumped) or a frame is claimed and its
    /// bytes are read in from disk.
    fn resident_frame(&self, page_id: PageId) -> Result<FrameId, BufferError> {
        if let Some(&frame_id) = self.page_table.borrow().get(&page_id) {
            let frame = &self.frames[frame_id];
            frame.pin_count.set(frame.pin_count.get() + 1);
            return Ok(frame_id);
        }

        let frame_id = self.claim_frame(page_id)?;

        let mut buf = Box::new([0u8; PAGE_SIZE]);
        if !self.file_manager.read_page(page_id, &mut buf[..]) {
            self.page_table.borrow_mut().remove(&page_id);
            self.frames[frame_id].page_id.set(None);
            self.frames[frame_id].pin_count.set(0);
            return Err(BufferError::IoReadFailed(page_id));
        }
        *self.frames[frame_id].page.borrow_mut() = Page::new_from_bytes(page_id, buf);

        Ok(frame_id)
    }

    /// Finds an unpinned frame and claims it for `for_page_id`, flushing
    /// and evicting whatever page it previously held.
    fn claim_frame(&self, for_page_id: PageId) -> Result<FrameId, BufferError> {
        for (frame_id, frame) in self.frames.iter().enumerate() {
            if frame.pin_count.get() != 0 {
                continue;
            }

            if let Some(old_page_id) = frame.page_id.get() {
                if frame.dirty.get() {
                    self.file_manager
                        .write_page(old_page_id, frame.page.borrow().data());
                }
                self.page_table.borrow_mut().remove(&old_page_id);
            }

            frame.page_id.set(Some(for_page_id));
            frame.pin_count.set(1);
            frame.dirty.set(false);
            self.page_table.borrow_mut().insert(for_page_id, frame_id);
            return Ok(frame_id);
        }

        Err(BufferError::BufferFull {
            page_id: for_page_id,
        })
    }

    fn read_guard(&self, frame_id: FrameId) -> PageReadGuard<'_> {
        PageReadGuard {
            guard: self.frames[frame_id].page.borrow(),
        }
    }

    fn write_guard(&self, frame_id: FrameId) -> PageWriteGuard<'_> {
        PageWriteGuard {
            guard: self.frames[frame_id].page.borrow_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use file::file_catalog::FileCatalog;
    use file::in_memory_file_manager::InMemoryFileManager;
    use std::sync::Arc;

    fn manager(pool_size: usize) -> BufferManager<InMemoryFileManager> {
        let catalog = Arc::new(FileCatalog::new());
        let fm = Rc::new(InMemoryFileManager::new(catalog));
        BufferManager::new(fm, pool_size)
    }

    #[test]
    fn new_page_is_pinned_and_dirty() {
        let bm = manager(2);
        let pid = PageId::new(0, 0);
        let guard = bm.new_page(pid, PageType::Leaf).unwrap();
        assert_eq!(guard.slot_count().unwrap(), 0);
        drop(guard);
        bm.unpin_page(pid, true).unwrap();
    }

    #[test]
    fn pin_page_survives_a_round_trip_through_eviction() {
        let bm = manager(1);
        let a = PageId::new(0, 0);
        let b = PageId::new(0, 1);

        {
            let _guard = bm.new_page(a, PageType::Leaf).unwrap();
        }
        bm.unpin_page(a, true).unwrap();

        // Only one frame: claiming it for `b` evicts and flushes `a`.
        {
            let _guard = bm.new_page(b, PageType::Leaf).unwrap();
        }
        bm.unpin_page(b, true).unwrap();

        let guard = bm.pin_page(a).unwrap();
        assert_eq!(guard.page_id(), a);
    }

    #[test]
    fn buffer_full_when_every_frame_is_pinned() {
        let bm = manager(1);
        let a = PageId::new(0, 0);
        let b = PageId::new(0, 1);
        let _g = bm.new_page(a, PageType::Leaf).unwrap();
        assert!(matches!(
            bm.new_page(b, PageType::Leaf),
            Err(BufferError::BufferFull { .. })
        ));
    }

    #[test]
    fn free_page_rejects_still_pinned() {
        let bm = manager(2);
        let pid = PageId::new(0, 0);
        {
            let _guard = bm.new_page(pid, PageType::Leaf).unwrap();
        }
        let _ = bm.pin_page(pid).unwrap();
        assert!(matches!(
            bm.free_page(pid),
            Err(BufferError::StillPinned { .. })
        ));
    }
}
