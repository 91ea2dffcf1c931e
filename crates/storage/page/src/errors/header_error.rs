use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum HeaderError {
    #[error("error reading/writing a header field")]
    BinaryError(#[from] binary_helpers::bin_error::BinaryError),
    #[error("expected a {expected}-byte header slice, got {actual}")]
    HeaderSliceSizeMismatch { actual: usize, expected: usize },
}
