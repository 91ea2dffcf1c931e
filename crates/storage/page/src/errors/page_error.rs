use crate::errors::page_op_error::PageOpError;
use crate::page_id::PageId;

/// Public-facing error type returned by the `page` crate, always carrying
/// the id of the page the failure occurred on.
#[derive(Debug, thiserror::Error)]
#[error("error on page {page_id}: {source}")]
pub struct PageError {
    pub(crate) page_id: PageId,
    pub(crate) source: PageOpError,
}

impl PageError {
    /// Whether this failure means "the page has no room for that row",
    /// as opposed to a structural or I/O problem. Callers that react to
    /// space exhaustion (e.g. by splitting a node) need this without
    /// reaching into the crate-private error hierarchy.
    pub fn is_not_enough_space(&self) -> bool {
        matches!(
            self.source,
            PageOpError::Insert(crate::errors::insert_error::InsertError::NotEnoughSpace { .. })
                | PageOpError::UpdateRow(
                    crate::errors::update_error::UpdateError::NotEnoughSpace { .. }
                )
        )
    }

    /// The id of the page the failure occurred on.
    pub fn page_id(&self) -> PageId {
        self.page_id
    }
}

/// Public facing result type of page operations.
pub type PageResult<T> = Result<T, PageError>;

/// Helper trait to attach `page_id` context when surfacing an internal error.
pub(crate) trait WithPageId<T> {
    fn with_page_id(self, page_id: PageId) -> PageResult<T>;
}

impl<T> WithPageId<T> for Result<T, PageOpError> {
    fn with_page_id(self, page_id: PageId) -> PageResult<T> {
        self.map_err(|source| PageError { page_id, source })
    }
}
