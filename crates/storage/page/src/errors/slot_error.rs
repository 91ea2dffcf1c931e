use crate::errors::header_error::HeaderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum SlotError {
    #[error("slot array region expected to be {expected_size} bytes, was {actual_size}")]
    SlotRegionSizeMismatch {
        expected_size: usize,
        actual_size: usize,
    },
    #[error("attempted to read a slot from a slice of the wrong size: expected {expected_size}, got {actual_size}")]
    SlotSizeMismatch {
        expected_size: usize,
        actual_size: usize,
    },
    #[error("attempted to access an invalid slot index: {slot_index}")]
    InvalidSlot { slot_index: usize },
    #[error("error interpreting slot binary data")]
    BinaryError(#[from] binary_helpers::bin_error::BinaryError),
    #[error("error reading page header")]
    HeaderError(#[from] HeaderError),
}
