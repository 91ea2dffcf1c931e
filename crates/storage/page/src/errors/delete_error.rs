use crate::errors::header_error::HeaderError;
use crate::errors::slot_error::SlotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DeleteError {
    #[error("error while accessing the slot array")]
    SlotError(#[from] SlotError),
    #[error("error while accessing the header")]
    HeaderError(#[from] HeaderError),
}
