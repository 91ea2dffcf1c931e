//! Public-facing error kinds for the tree engine, per the error-kinds
//! table: `KeyTooLong`, `NoSpace`, `NotFound`, `IoFault`, `Corruption`.
//! `NoSpace` is caught internally and turned into a split; it only ever
//! reaches a caller in the pathological case where even a freshly split,
//! otherwise-empty page cannot hold the entry.

use crate::key::KeyError;
use buffer::errors::BufferError;
use page::page_id::PageId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error(transparent)]
    KeyTooLong(#[from] KeyError),

    #[error("no room for this entry even after a split")]
    NoSpace,

    #[error("no entry found matching the given key/record")]
    NotFound,

    #[error("buffer manager or catalog I/O failure: {0}")]
    IoFault(#[from] BufferError),

    #[error("page {page_id} carries an invalid or unexpected node-type tag")]
    Corruption { page_id: PageId },

    #[error(transparent)]
    Page(#[from] page::errors::page_error::PageError),
}

pub type TreeResult<T> = Result<T, TreeError>;
