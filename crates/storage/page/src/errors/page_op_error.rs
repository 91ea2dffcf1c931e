use crate::errors::delete_error::DeleteError;
use crate::errors::header_error::HeaderError;
use crate::errors::insert_error::InsertError;
use crate::errors::read_row_error::ReadRowError;
use crate::errors::slot_error::SlotError;
use crate::errors::update_error::UpdateError;
use thiserror::Error;

/// Aggregator error type for all possible page-related sub-errors.
#[derive(Debug, Error)]
pub(crate) enum PageOpError {
    #[error("error while accessing the header")]
    Header(#[from] HeaderError),
    #[error("error while accessing the slot array")]
    Slot(#[from] SlotError),
    #[error("error while reading a row")]
    ReadRow(#[from] ReadRowError),
    #[error("error while inserting a row")]
    Insert(#[from] InsertError),
    #[error("error while deleting a row")]
    DeleteRow(#[from] DeleteError),
    #[error("error while updating a row")]
    UpdateRow(#[from] UpdateError),
}
