//! C5: the header page. Its only payload is the current root page
//! identifier; root may be absent (`INVALID_PAGE`) for an empty tree.

use crate::errors::TreeResult;
use page::page::Page;
use page::page_id::{INVALID_PAGE_NUMBER, PageId};

/// Reads the current root, or `None` for an empty tree.
pub fn root(page: &Page) -> TreeResult<Option<PageId>> {
    let raw = page.root_page_number()?;
    if raw == INVALID_PAGE_NUMBER {
        Ok(None)
    } else {
        Ok(Some(PageId::new(page.page_id().file_id, raw)))
    }
}

/// Overwrites the root pointer.
pub fn set_root(page: &mut Page, root: Option<PageId>) -> TreeResult<()> {
    let raw = root.map(|p| p.page_number).unwrap_or(INVALID_PAGE_NUMBER);
    page.set_root_page_number(raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use page::page_type::PageType;

    #[test]
    fn fresh_header_page_has_no_root() {
        let page = Page::new_empty(PageId::new(3, 0), PageType::Header).unwrap();
        assert_eq!(root(&page).unwrap(), None);
    }

    #[test]
    fn root_round_trips() {
        let mut page = Page::new_empty(PageId::new(3, 0), PageType::Header).unwrap();
        set_root(&mut page, Some(PageId::new(3, 7))).unwrap();
        assert_eq!(root(&page).unwrap(), Some(PageId::new(3, 7)));
    }
}
