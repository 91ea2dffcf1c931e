use crate::errors::delete_error::DeleteError;
use crate::errors::header_error::HeaderError;
use crate::errors::insert_error::InsertError;
use crate::errors::slot_error::SlotError;
use binary_helpers::conversions::ConversionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum UpdateError {
    #[error("unable to update a row to {row_len} bytes in a page with {page_free_space} free bytes")]
    NotEnoughSpace {
        row_len: usize,
        page_free_space: usize,
    },
    #[error("error while accessing the slot array")]
    SlotError(#[from] SlotError),
    #[error("error while accessing the header")]
    HeaderError(#[from] HeaderError),
    #[error("error while inserting the updated row")]
    InsertError(#[from] InsertError),
    #[error("error converting between numeric types")]
    ConversionError(#[from] ConversionError),
    #[error("error while deleting the old row")]
    DeleteError(#[from] DeleteError),
}
