use page::page::Page;
use std::cell::{Ref, RefMut};
use std::ops::{Deref, DerefMut};

/// Read access to a pinned page's bytes.
///
/// Holding this guard does not by itself keep the page pinned — pinning is
/// tracked explicitly via [`crate::buffer::BufferManager::pin_page`] /
/// [`crate::buffer::BufferManager::unpin_page`]. The guard only scopes the
/// `RefCell` borrow so the borrow-checker catches a caller trying to read
/// and write the same frame at once.
#[derive(Debug)]
pub struct PageReadGuard<'a> {
    pub(crate) guard: Ref<'a, Page>,
}

impl<'a> Deref for PageReadGuard<'a> {
    type Target = Page;
    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Write access to a pinned page's bytes.
#[derive(Debug)]
pub struct PageWriteGuard<'a> {
    pub(crate) guard: RefMut<'a, Page>,
}

impl<'a> Deref for PageWriteGuard<'a> {
    type Target = Page;
    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<'a> DerefMut for PageWriteGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}
