use crate::PAGE_SIZE;
use crate::errors::page_error::{PageResult, WithPageId};
use crate::errors::page_op_error::PageOpError;
use crate::insertion_plan::InsertionPlan;
use crate::page_id::PageId;
use crate::page_type::PageType;

/// Wrapper around a fixed-size byte array representing one page.
///
/// `Page` only knows about the raw, unsorted heap layout: a header, a data
/// region, and a slot directory. Key-ordering, leaf/index semantics, and
/// sibling links are layered on top of this by the `btree` crate.
#[derive(Debug)]
pub struct Page {
    pub(crate) page_id: PageId,
    pub(crate) data: Box<[u8; PAGE_SIZE]>,
}

impl Page {
    /// Creates a page with all bytes zeroed. Callers must `initialize` it
    /// (or load real bytes into it) before use.
    pub fn new_zeroed(page_id: PageId) -> Self {
        Self {
            page_id,
            data: Box::new([0; PAGE_SIZE]),
        }
    }

    /// Wipes the page and resets its header for the given type. Used when a
    /// buffer frame is being reused for a freshly-allocated page.
    pub fn initialize(&mut self, page_id: PageId, page_type: PageType) -> PageResult<()> {
        (&mut *self.data)[..].fill(0);
        self.page_id = page_id;

        let mut header = self
            .header_mut()
            .map_err(PageOpError::from)
            .with_page_id(page_id)?;

        header
            .default(page_id.page_number, page_type)
            .map_err(PageOpError::from)
            .with_page_id(page_id)?;

        Ok(())
    }

    /// Retrieves the row stored at `slot_index`.
    pub fn row(&self, slot_index: u32) -> PageResult<&[u8]> {
        self.read_row_internal(slot_index)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Plans where a new row of `row_len` bytes would land in the page.
    pub fn plan_insert(&self, row_len: usize) -> PageResult<InsertionPlan> {
        self.plan_insert_internal(row_len)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Inserts a row using a previously computed `InsertionPlan`.
    pub fn insert_heap(&mut self, plan: InsertionPlan, row: Vec<u8>) -> PageResult<()> {
        self.insert_row_unsorted_internal(plan, row)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Deletes the row at `slot_index`, invalidating its slot.
    pub fn delete_row(&mut self, slot_index: usize, compact_requested: bool) -> PageResult<()> {
        self.delete_row_internal(slot_index, compact_requested)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Replaces the contents of the row at `slot_index`.
    pub fn update_row(&mut self, slot_index: usize, row: Vec<u8>) -> PageResult<()> {
        self.update_internal(slot_index, row)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Deletes the row at `slot_index` and closes the hole in the slot
    /// directory, shrinking `slot_count` by one.
    pub fn remove_slot(&mut self, slot_index: usize) -> PageResult<()> {
        self.remove_slot_internal(slot_index)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Permutes the slot directory so slot `i` holds whatever slot
    /// `order[i]` held before the call. `order` must be a permutation of
    /// `0..slot_count`. Used to keep a sorted page's directory in key order
    /// after a row lands at the end via [`Self::insert_heap`].
    pub fn reposition_slots(&mut self, order: &[u32]) -> PageResult<()> {
        self.reposition_slots_internal(order)
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Number of live slots currently tracked in the header.
    pub fn slot_count(&self) -> PageResult<u16> {
        self.header_ref()
            .and_then(|h| h.get_slot_count())
            .map_err(|e| PageOpError::from(crate::errors::slot_error::SlotError::from(e)))
            .with_page_id(self.page_id)
    }

    /// Immutable reference to the page's raw bytes.
    pub fn data(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    /// Mutable reference to the page's raw bytes, e.g. for I/O.
    pub fn data_mut(&mut self) -> &mut [u8; PAGE_SIZE] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_resets_header() {
        let mut page = Page::new_zeroed(PageId::new(1, 0));
        page.initialize(PageId::new(1, 0), PageType::Leaf).unwrap();
        assert_eq!(page.slot_count().unwrap(), 0);
    }
}
