use std::convert::TryFrom;

/// Tag stored in a page's header identifying what kind of page it is.
///
/// The B+ tree only ever distinguishes `Leaf` from `Index` on the page
/// header itself (spec's `NodeType`); `Header` marks the single
/// always-pinned page that stores the current root pointer.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    /// The index's header page: holds the root `PageId` and nothing else.
    Header = 1,
    /// A B+ tree index (internal) page: separator keys and child pointers.
    Index = 2,
    /// A B+ tree leaf page: keys and data-record identifiers.
    Leaf = 3,
}

impl From<PageType> for u16 {
    fn from(p: PageType) -> Self {
        p as u16
    }
}

impl TryFrom<u16> for PageType {
    type Error = ();

    fn try_from(v: u16) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(PageType::Header),
            2 => Ok(PageType::Index),
            3 => Ok(PageType::Leaf),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_u16() {
        for pt in [PageType::Header, PageType::Index, PageType::Leaf] {
            let encoded: u16 = pt.into();
            assert_eq!(PageType::try_from(encoded).unwrap(), pt);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(PageType::try_from(99).is_err());
    }
}
