//! C6: the tree engine. Orchestrates insert (with leaf/index splits and
//! root growth), delete (with empty-root collapse), and directed descent,
//! owning the pin discipline around every page it touches.

use crate::entry::RecordId;
use crate::errors::{TreeError, TreeResult};
use crate::header_page;
use crate::index_page;
use crate::key::validate_key;
use crate::leaf;
use crate::sorted_page::available_space;
use buffer::guards::{PageReadGuard, PageWriteGuard};
use file::api::FileManager;
use page::page::Page;
use page::page_id::{FileId, PageId};
use page::page_type::PageType;
use std::rc::Rc;
use storage_api::storage_manager::StorageManager;
use tracing::{debug, trace};

/// A handle to one open index: a storage backend, the file it lives in,
/// and the identifier of its always-pinned header page.
///
/// Deliberately thin — no in-memory tree structure is cached here. Every
/// operation re-reads pages through the buffer manager, which is the only
/// thing resolving page identifiers to bytes.
#[derive(Debug)]
pub struct TreeHandle<F: FileManager> {
    pub(crate) storage: Rc<StorageManager<F>>,
    pub(crate) file_id: FileId,
    pub(crate) header_page_id: PageId,
}

impl<F: FileManager> TreeHandle<F> {
    /// Wraps an index whose header page is already pinned once (the base
    /// pin held for the handle's entire lifetime).
    pub(crate) fn new(storage: Rc<StorageManager<F>>, file_id: FileId, header_page_id: PageId) -> Self {
        Self {
            storage,
            file_id,
            header_page_id,
        }
    }

    pub fn file_id(&self) -> FileId {
        self.file_id
    }

    pub fn header_page_id(&self) -> PageId {
        self.header_page_id
    }

    /// Pins `page_id`, runs `f` against a read-only view, and unpins
    /// before returning — the minimum pin footprint for one read.
    pub(crate) fn read<R>(
        &self,
        page_id: PageId,
        f: impl FnOnce(&Page) -> TreeResult<R>,
    ) -> TreeResult<R> {
        let guard: PageReadGuard<'_> = self.storage.read_page(page_id)?;
        let result = f(&guard);
        drop(guard);
        self.storage.unpin_page(page_id, false)?;
        result
    }

    /// Same as [`Self::read`] but pins for mutation and always marks the
    /// page dirty on unpin — a failed mutation may have partially applied,
    /// and an unnecessary write-back is harmless where a missed one is not.
    pub(crate) fn write<R>(
        &self,
        page_id: PageId,
        f: impl FnOnce(&mut Page) -> TreeResult<R>,
    ) -> TreeResult<R> {
        let mut guard: PageWriteGuard<'_> = self.storage.write_page(page_id)?;
        let result = f(&mut guard);
        drop(guard);
        self.storage.unpin_page(page_id, true)?;
        result
    }

    pub(crate) fn root(&self) -> TreeResult<Option<PageId>> {
        self.read(self.header_page_id, |p| header_page::root(p))
    }

    pub(crate) fn set_root(&self, root: Option<PageId>) -> TreeResult<()> {
        self.write(self.header_page_id, |p| header_page::set_root(p, root))
    }
}

pub(crate) fn node_kind(page: &Page) -> TreeResult<PageType> {
    let raw = page.page_type_raw()?;
    PageType::try_from(raw).map_err(|_| TreeError::Corruption {
        page_id: page.page_id(),
    })
}

/// `Search(key)`: the identifier of the leftmost leaf that may contain a
/// key `>=` the query, or `None` for an empty tree.
pub fn search<F: FileManager>(handle: &TreeHandle<F>, key: &[u8]) -> TreeResult<Option<PageId>> {
    let Some(mut current) = handle.root()? else {
        return Ok(None);
    };
    loop {
        match handle.read(current, |p| node_kind(p))? {
            PageType::Leaf => return Ok(Some(current)),
            PageType::Index => {
                current = handle.read(current, |p| index_page::get_page_id(p, key))?;
            }
            PageType::Header => {
                return Err(TreeError::Corruption { page_id: current });
            }
        }
    }
}

/// `Insert(key, rid)` — §4.5.1 cases A/B/C.
pub fn insert<F: FileManager>(handle: &TreeHandle<F>, key: &[u8], rid: RecordId) -> TreeResult<()> {
    validate_key(key)?;

    let Some(root_id) = handle.root()? else {
        // Case A: empty tree.
        let mut guard = handle.storage.new_page(handle.file_id, PageType::Leaf)?;
        leaf::insert(&mut guard, key, rid)?;
        let new_root = guard.page_id();
        drop(guard);
        handle.storage.unpin_page(new_root, true)?;
        handle.set_root(Some(new_root))?;
        debug!(page_id = %new_root, "installed first leaf as root");
        return Ok(());
    };

    if handle.read(root_id, |p| node_kind(p))? == PageType::Leaf {
        // Case B: root is a leaf. Try the in-place insert first and only
        // fall back to a split on `NoSpace` — checking `AvailableSpace`
        // against `EntryLen` alone misses the slot-directory overhead the
        // underlying heap page also charges for, so the cheap pre-check
        // can be wrong in either direction; the real arbiter is the insert
        // itself (§7: "NoSpace ... caught internally; triggers a split").
        match handle.write(root_id, |p| leaf::insert(p, key, rid).map(|_| ())) {
            Ok(()) => return Ok(()),
            Err(TreeError::NoSpace) => {}
            Err(e) => return Err(e),
        }

        let (new_leaf_id, sep) = split_leaf(handle, root_id, key, rid)?;
        let new_root_id = grow_root(handle, root_id, &sep, new_leaf_id)?;
        debug!(old_root = %root_id, new_root = %new_root_id, "root leaf split, new index root installed");
        return Ok(());
    }

    // Case C: root is an index page. Descend, pushing every index page
    // visited onto a path stack; unpin before moving to the next level.
    let mut stack: Vec<PageId> = Vec::new();
    let mut current = root_id;
    let leaf_id = loop {
        match handle.read(current, |p| node_kind(p))? {
            PageType::Index => {
                let child = handle.read(current, |p| index_page::get_page_id(p, key))?;
                stack.push(current);
                current = child;
            }
            PageType::Leaf => break current,
            PageType::Header => return Err(TreeError::Corruption { page_id: current }),
        }
    };

    match handle.write(leaf_id, |p| leaf::insert(p, key, rid).map(|_| ())) {
        Ok(()) => return Ok(()),
        Err(TreeError::NoSpace) => {}
        Err(e) => return Err(e),
    }

    let (mut child_id, mut sep) = split_leaf(handle, leaf_id, key, rid)?;
    while let Some(parent_id) = stack.pop() {
        match handle.write(parent_id, |p| index_page::insert(p, &sep, child_id).map(|_| ())) {
            Ok(()) => return Ok(()),
            Err(TreeError::NoSpace) => {}
            Err(e) => return Err(e),
        }
        let (new_index_id, new_sep) = split_index(handle, parent_id, &sep, child_id)?;
        child_id = new_index_id;
        sep = new_sep;
    }

    // The stack emptied while a separator still needs a home: grow the root.
    let new_root_id = grow_root(handle, root_id, &sep, child_id)?;
    debug!(old_root = %root_id, new_root = %new_root_id, "index split propagated to a new root");
    Ok(())
}

/// Allocates a new index root whose leftmost child is the former root,
/// installing `(sep, child_id)` as its sole entry, and updates the header.
fn grow_root<F: FileManager>(
    handle: &TreeHandle<F>,
    former_root: PageId,
    sep: &[u8],
    child_id: PageId,
) -> TreeResult<PageId> {
    let mut guard = handle.storage.new_page(handle.file_id, PageType::Index)?;
    index_page::set_leftmost_child(&mut guard, former_root)?;
    index_page::insert(&mut guard, sep, child_id)?;
    let new_root_id = guard.page_id();
    drop(guard);
    handle.storage.unpin_page(new_root_id, true)?;
    handle.set_root(Some(new_root_id))?;
    Ok(new_root_id)
}

/// Leaf split (§4.5.3): splice a new leaf `N` after `L`, move all of `L`'s
/// entries to `N`, then refill `L` from `N`'s front until their available
/// space is as close to equal as it gets, deciding along the way where the
/// not-yet-inserted new entry belongs.
fn split_leaf<F: FileManager>(
    handle: &TreeHandle<F>,
    l_id: PageId,
    new_key: &[u8],
    new_rid: RecordId,
) -> TreeResult<(PageId, Vec<u8>)> {
    let mut n_guard = handle.storage.new_page(handle.file_id, PageType::Leaf)?;
    let n_id = n_guard.page_id();

    let mut l_guard = handle.storage.write_page(l_id)?;
    let old_next = l_guard.next_page()?;
    n_guard.set_prev_page(l_id.page_number)?;
    n_guard.set_next_page(old_next)?;
    l_guard.set_next_page(n_id.page_number)?;

    let slot_count = l_guard.slot_count()?;
    let mut entries = Vec::with_capacity(slot_count as usize);
    for idx in 0..slot_count as u32 {
        entries.push(leaf::get(&l_guard, idx)?);
    }
    for idx in (0..slot_count as u32).rev() {
        sorted_page_remove(&mut l_guard, idx)?;
    }
    for (key, rid) in &entries {
        leaf::insert(&mut n_guard, key, *rid)?;
    }

    let mut inserted = false;
    while available_space(&l_guard)? > available_space(&n_guard)? {
        let Some((front_slot, front_key, front_rid)) = leaf::first(&n_guard)? else {
            break;
        };
        if !inserted && new_key < front_key.as_slice() {
            leaf::insert(&mut l_guard, new_key, new_rid)?;
            inserted = true;
        } else {
            leaf::delete(&mut n_guard, &front_key, front_rid)?;
            let _ = front_slot;
            leaf::insert(&mut l_guard, &front_key, front_rid)?;
        }
    }
    if !inserted {
        leaf::insert(&mut n_guard, new_key, new_rid)?;
    }

    let sep = leaf::first(&n_guard)?
        .map(|(_, k, _)| k)
        .expect("a just-split leaf always keeps at least one entry");

    // If L's old next-leaf still exists, fix its back-link to point at N.
    if old_next != page::page_id::INVALID_PAGE_NUMBER {
        let old_next_id = PageId::new(l_id.file_id, old_next);
        drop(l_guard);
        drop(n_guard);
        handle.storage.unpin_page(l_id, true)?;
        handle.storage.unpin_page(n_id, true)?;
        handle.write(old_next_id, |p| {
            p.set_prev_page(n_id.page_number)?;
            Ok(())
        })?;
    } else {
        drop(l_guard);
        drop(n_guard);
        handle.storage.unpin_page(l_id, true)?;
        handle.storage.unpin_page(n_id, true)?;
    }

    trace!(l = %l_id, n = %n_id, "leaf split");
    Ok((n_id, sep))
}

/// Index split (§4.5.4): same redistribution as a leaf split, then the new
/// page's first entry is popped off to become its leftmost child — the
/// separator belongs to neither sibling.
fn split_index<F: FileManager>(
    handle: &TreeHandle<F>,
    i_id: PageId,
    new_key: &[u8],
    new_child: PageId,
) -> TreeResult<(PageId, Vec<u8>)> {
    let mut n_guard = handle.storage.new_page(handle.file_id, PageType::Index)?;
    let n_id = n_guard.page_id();
    let mut i_guard = handle.storage.write_page(i_id)?;

    let slot_count = i_guard.slot_count()?;
    let mut entries = Vec::with_capacity(slot_count as usize);
    for idx in 0..slot_count as u32 {
        entries.push(index_page::get(&i_guard, idx)?);
    }
    for idx in (0..slot_count as u32).rev() {
        sorted_page_remove(&mut i_guard, idx)?;
    }
    for (key, child) in &entries {
        index_page::insert(&mut n_guard, key, *child)?;
    }

    let mut inserted = false;
    while available_space(&i_guard)? > available_space(&n_guard)? {
        let Some((_, front_key, front_child)) = index_page::first(&n_guard)? else {
            break;
        };
        if !inserted && new_key < front_key.as_slice() {
            index_page::insert(&mut i_guard, new_key, new_child)?;
            inserted = true;
        } else {
            index_page::delete(&mut n_guard, &front_key)?;
            index_page::insert(&mut i_guard, &front_key, front_child)?;
        }
    }
    if !inserted {
        index_page::insert(&mut n_guard, new_key, new_child)?;
    }

    let (_, sep, leftmost) = index_page::first(&n_guard)?
        .expect("a just-split index page always keeps at least one entry");
    index_page::delete(&mut n_guard, &sep)?;
    index_page::set_leftmost_child(&mut n_guard, leftmost)?;

    drop(i_guard);
    drop(n_guard);
    handle.storage.unpin_page(i_id, true)?;
    handle.storage.unpin_page(n_id, true)?;

    trace!(i = %i_id, n = %n_id, "index split");
    Ok((n_id, sep))
}

/// Removes the entry at `slot` from a page already held open by the
/// caller, without the extra pin/unpin round trip `Page::remove_slot`'s
/// public callers elsewhere go through.
fn sorted_page_remove(page: &mut Page, slot: u32) -> TreeResult<()> {
    page.remove_slot(slot as usize)?;
    Ok(())
}

/// `Delete(key, rid)` — §4.5.2: no merge or redistribution. An empty root
/// leaf collapses the tree; the optional separator repair from §9 runs
/// when the deleted key was the leaf's minimum.
pub fn delete<F: FileManager>(handle: &TreeHandle<F>, key: &[u8], rid: RecordId) -> TreeResult<()> {
    let Some(root_id) = handle.root()? else {
        return Err(TreeError::NotFound);
    };

    let mut stack: Vec<PageId> = Vec::new();
    let mut current = root_id;
    let leaf_id = loop {
        match handle.read(current, |p| node_kind(p))? {
            PageType::Index => {
                let child = handle.read(current, |p| index_page::get_page_id(p, key))?;
                stack.push(current);
                current = child;
            }
            PageType::Leaf => break current,
            PageType::Header => return Err(TreeError::Corruption { page_id: current }),
        }
    };

    let old_min = handle.read(leaf_id, |p| Ok(leaf::first(p)?.map(|(_, k, _)| k)))?;

    let deleted = handle.write(leaf_id, |p| leaf::delete(p, key, rid))?;
    if !deleted {
        return Err(TreeError::NotFound);
    }

    if leaf_id == root_id {
        if handle.read(leaf_id, |p| Ok(p.slot_count()? == 0))? {
            handle.storage.free_page(leaf_id)?;
            handle.set_root(None)?;
        }
        return Ok(());
    }

    let Some(old_min_key) = old_min else {
        return Ok(());
    };
    if old_min_key != key {
        return Ok(());
    }

    let Some((_, new_min_key, _)) = handle.read(leaf_id, |p| leaf::first(p))? else {
        return Ok(());
    };

    for ancestor in stack.iter().rev() {
        let has_separator = handle.read(*ancestor, |p| index_page::find_key(p, &old_min_key))?;
        if has_separator.is_some() {
            handle.write(*ancestor, |p| index_page::adjust_key(p, &new_min_key, &old_min_key))?;
            break;
        }
    }
    Ok(())
}
