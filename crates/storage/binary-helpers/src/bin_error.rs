use std::array::TryFromSliceError;
use thiserror::Error;

/// Errors raised while reading or writing fixed-width integers in a byte slice.
#[derive(Error, Debug)]
pub enum BinaryError {
    #[error(
        "attempted to read {expected} bytes starting at offset {from_offset}, but the slice does not contain that range"
    )]
    ReadSliceSizeMismatch { expected: usize, from_offset: usize },
    #[error("error converting a slice to a fixed-size array")]
    SliceConversionError(#[from] TryFromSliceError),
    #[error("error writing data due to a size mismatch: source {src} vs target {target}")]
    WriteSliceSizeMismatch { src: usize, target: usize },
}
