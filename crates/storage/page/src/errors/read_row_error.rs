use crate::errors::slot_error::SlotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ReadRowError {
    #[error("error while reading the slot array")]
    SlotError(#[from] SlotError),
}
