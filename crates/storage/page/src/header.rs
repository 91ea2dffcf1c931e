//! Layout and accessors for the fixed header every page carries.
//!
//! # Page Header Layout
//!
//! The header occupies the first [`HEADER_SIZE`] bytes of every page. All
//! fields are little-endian.
//!
//! | Field              | Type | Offset                  | Meaning |
//! |--------------------|------|-------------------------|---------|
//! | `slot_count`       | u16  | [`SLOT_COUNT`]          | Number of live slots. |
//! | `free_start`       | u16  | [`FREE_START`]          | Start of the free-space region (grows up). |
//! | `free_end`         | u16  | [`FREE_END`]            | End of the free-space region (grows down). |
//! | `free_space`       | u16  | [`FREE_SPACE`]          | Total free bytes available. |
//! | `can_compact`      | u16  | [`CAN_COMPACT`]         | Whether fragmentation needs a compaction pass. |
//! | `page_type`        | u16  | [`PAGE_TYPE`]           | `PageType` tag. |
//! | `page_number`      | u32  | [`PAGE_NUMBER`]         | Logical page number within the file. |
//! | `prev_page`        | u32  | [`PREV_PAGE`]           | Leaf: previous leaf in key order. Index: leftmost child. |
//! | `next_page`        | u32  | [`NEXT_PAGE`]           | Leaf: next leaf in key order. Unused on index pages. |
//! | `root_page_number` | u32  | [`ROOT_PAGE_NUMBER`]    | Header page only: current root page number. |
//!
//! Fields beyond `ROOT_PAGE_NUMBER` up to `HEADER_SIZE` are reserved padding.

use crate::errors::header_error::HeaderError;
use binary_helpers::le::{read_le, write_le};
use paste::paste;

/// Size of the header in bytes.
pub const HEADER_SIZE: usize = 128;

/// Sentinel stored in `prev_page`/`next_page`/`root_page_number` meaning "no page".
pub const INVALID_PAGE_NUMBER: u32 = u32::MAX;

/// Read-only view into a page's header.
#[derive(Debug)]
pub struct HeaderRef<'a> {
    bytes: &'a [u8; HEADER_SIZE],
}

impl<'a> HeaderRef<'a> {
    /// Builds a `HeaderRef` from the first `HEADER_SIZE` bytes of a page.
    pub fn new(bytes: &'a [u8]) -> Option<Self> {
        (bytes.len() == HEADER_SIZE).then(|| HeaderRef {
            bytes: bytes.try_into().unwrap(),
        })
    }
}

/// Mutable view into a page's header.
#[derive(Debug)]
pub struct HeaderMut<'a> {
    bytes: &'a mut [u8; HEADER_SIZE],
}

impl<'a> HeaderMut<'a> {
    /// Builds a `HeaderMut` from the first `HEADER_SIZE` bytes of a page.
    pub fn new(bytes: &'a mut [u8]) -> Option<Self> {
        (bytes.len() == HEADER_SIZE).then(|| HeaderMut {
            bytes: bytes.try_into().unwrap(),
        })
    }

    /// Resets the header to the empty state for a freshly allocated page.
    pub fn default(
        &mut self,
        page_number: u32,
        page_type: crate::page_type::PageType,
    ) -> Result<(), HeaderError> {
        self.set_slot_count(0)?;
        self.set_free_start(HEADER_SIZE as u16)?;
        self.set_free_end((crate::PAGE_SIZE - 1) as u16)?;
        self.set_free_space((crate::PAGE_SIZE - HEADER_SIZE) as u16)?;
        self.set_can_compact(0)?;
        self.set_page_type(u16::from(page_type))?;
        self.set_page_number(page_number)?;
        self.set_prev_page(INVALID_PAGE_NUMBER)?;
        self.set_next_page(INVALID_PAGE_NUMBER)?;
        self.set_root_page_number(INVALID_PAGE_NUMBER)?;
        Ok(())
    }
}

/// Defines header field constants plus getter/setter methods on `HeaderRef`/`HeaderMut`.
macro_rules! impl_header_accessors {
    ( $( $field_name:ident : $field_type:ty = $field_offset:expr ; )* ) => {
        paste! {
            $(
                #[doc = concat!("Byte offset of `", stringify!($field_name), "` (", stringify!($field_type), ").")]
                pub const [<$field_name:upper>] : usize = $field_offset;

                impl<'a> HeaderRef<'a> {
                    #[doc = concat!("Reads the `", stringify!($field_name), "` field.")]
                    pub fn [<get_ $field_name>](&self) -> Result<$field_type, HeaderError> {
                        Ok(read_le::<$field_type>(self.bytes, $field_offset)?)
                    }
                }

                impl<'a> HeaderMut<'a> {
                    #[doc = concat!("Writes the `", stringify!($field_name), "` field.")]
                    pub fn [<set_ $field_name>](&mut self, val: $field_type) -> Result<(), HeaderError> {
                        write_le::<$field_type>(self.bytes, $field_offset, val)?;
                        Ok(())
                    }
                }
            )*
        }
    };
}

impl_header_accessors! {
    slot_count : u16 = 0;
    free_start : u16 = 2;
    free_end   : u16 = 4;
    free_space : u16 = 6;
    can_compact : u16 = 8;
    page_type : u16 = 10;
    page_number : u32 = 12;
    prev_page : u32 = 16;
    next_page : u32 = 20;
    root_page_number : u32 = 24;
}
