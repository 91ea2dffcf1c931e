use super::api::Page;
use crate::header::{HEADER_SIZE, HeaderMut, HeaderRef};
use crate::page_id::PageId;

impl Page {
    /// The id this page is currently addressed by.
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Re-addresses this page, e.g. after it is evicted and refilled with a
    /// different page's bytes by the buffer manager.
    pub(crate) fn set_page_id(&mut self, page_id: PageId) {
        self.page_id = page_id;
    }

    pub(crate) fn header_ref(&self) -> Result<HeaderRef<'_>, crate::errors::header_error::HeaderError> {
        HeaderRef::new(&self.data[..HEADER_SIZE]).ok_or(
            crate::errors::header_error::HeaderError::HeaderSliceSizeMismatch {
                actual: self.data.len(),
                expected: HEADER_SIZE,
            },
        )
    }

    pub(crate) fn header_mut(&mut self) -> Result<HeaderMut<'_>, crate::errors::header_error::HeaderError> {
        let len = self.data.len();
        HeaderMut::new(&mut self.data[..HEADER_SIZE]).ok_or(
            crate::errors::header_error::HeaderError::HeaderSliceSizeMismatch {
                actual: len,
                expected: HEADER_SIZE,
            },
        )
    }
}
