use crate::errors::header_error::HeaderError;
use crate::errors::slot_error::SlotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum InsertError {
    #[error("unable to insert a row of {row_len} bytes into a page with {page_free_space} free bytes")]
    NotEnoughSpace {
        row_len: usize,
        page_free_space: usize,
    },
    #[error("error while accessing the slot array")]
    SlotError(#[from] SlotError),
    #[error("error while accessing the header")]
    HeaderError(#[from] HeaderError),
}
