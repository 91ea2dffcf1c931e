use page::page_id::PageId;
use thiserror::Error;

/// Errors raised by the buffer manager.
#[derive(Debug, Error)]
pub enum BufferError {
    /// All frames are pinned; no victim could be found for replacement.
    #[error("buffer pool is full: no unpinned frame available to host {page_id}")]
    BufferFull { page_id: PageId },
    /// The file manager could not supply the bytes for a page.
    #[error("failed to read {0} from disk")]
    IoReadFailed(PageId),
    /// The file manager could not persist a page's bytes.
    #[error("failed to write {0} to disk")]
    IoWriteFailed(PageId),
    /// `UnpinPage`/`FreePage` was called for a page not currently resident.
    #[error("page {0} is not currently buffered")]
    PageNotBuffered(PageId),
    /// `UnpinPage` was called more times than the page was pinned.
    #[error("page {0} was unpinned while its pin count was already zero")]
    UnpinUnderflow(PageId),
    /// `FreePage` was called on a page that is still pinned by someone else.
    #[error("cannot free {page_id}: still pinned ({pin_count} pin(s) outstanding)")]
    StillPinned { page_id: PageId, pin_count: u32 },
    /// Propagated from the underlying `Page` byte-layout operations.
    #[error(transparent)]
    Page(#[from] page::errors::page_error::PageError),
}
