//! Thin public accessors for header fields the `btree` crate reads and
//! writes directly: node-type tag, sibling/leftmost-child links, free
//! space, and the header page's root pointer.

use super::api::Page;
use crate::errors::page_error::{PageResult, WithPageId};
use crate::errors::page_op_error::PageOpError;

impl Page {
    /// Raw node-type tag stored in the header. `0` and other values outside
    /// `PageType`'s range mean the page has never been initialized or is
    /// corrupt; callers map this through `PageType::try_from`.
    pub fn page_type_raw(&self) -> PageResult<u16> {
        self.header_ref()
            .and_then(|h| h.get_page_type())
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Leaf: previous leaf in key order. Index: leftmost child pointer.
    pub fn prev_page(&self) -> PageResult<u32> {
        self.header_ref()
            .and_then(|h| h.get_prev_page())
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Sets the `prev_page` field.
    pub fn set_prev_page(&mut self, value: u32) -> PageResult<()> {
        let page_id = self.page_id;
        self.header_mut()
            .and_then(|mut h| h.set_prev_page(value))
            .map_err(PageOpError::from)
            .with_page_id(page_id)
    }

    /// Leaf: next leaf in key order. Unused on index pages.
    pub fn next_page(&self) -> PageResult<u32> {
        self.header_ref()
            .and_then(|h| h.get_next_page())
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Sets the `next_page` field.
    pub fn set_next_page(&mut self, value: u32) -> PageResult<()> {
        let page_id = self.page_id;
        self.header_mut()
            .and_then(|mut h| h.set_next_page(value))
            .map_err(PageOpError::from)
            .with_page_id(page_id)
    }

    /// Total free bytes in the page, including fragmented holes that would
    /// need a compaction pass to use.
    pub fn free_space(&self) -> PageResult<u16> {
        self.header_ref()
            .and_then(|h| h.get_free_space())
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Header page only: the current root page number.
    pub fn root_page_number(&self) -> PageResult<u32> {
        self.header_ref()
            .and_then(|h| h.get_root_page_number())
            .map_err(PageOpError::from)
            .with_page_id(self.page_id)
    }

    /// Header page only: overwrites the root page number.
    pub fn set_root_page_number(&mut self, value: u32) -> PageResult<()> {
        let page_id = self.page_id;
        self.header_mut()
            .and_then(|mut h| h.set_root_page_number(value))
            .map_err(PageOpError::from)
            .with_page_id(page_id)
    }
}
