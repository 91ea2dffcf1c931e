use super::api::Page;
use crate::PAGE_SIZE;
use crate::errors::page_error::{PageResult, WithPageId};
use crate::errors::page_op_error::PageOpError;
use crate::page_id::PageId;
use crate::page_type::PageType;

impl Page {
    /// Wraps an existing `PAGE_SIZE` buffer, e.g. bytes just read from disk.
    pub fn new_from_bytes(page_id: PageId, bytes: Box<[u8; PAGE_SIZE]>) -> Self {
        Self {
            page_id,
            data: bytes,
        }
    }

    /// Allocates a brand-new, empty page of the given type.
    pub fn new_empty(page_id: PageId, page_type: PageType) -> PageResult<Self> {
        let mut page = Page::new_zeroed(page_id);

        let mut header = page
            .header_mut()
            .map_err(PageOpError::from)
            .with_page_id(page_id)?;
        header
            .default(page_id.page_number, page_type)
            .map_err(PageOpError::from)
            .with_page_id(page_id)?;

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_empty_leaf_has_no_live_slots() {
        let page = Page::new_empty(PageId::new(0, 1), PageType::Leaf).unwrap();
        assert_eq!(page.slot_count().unwrap(), 0);
    }
}
