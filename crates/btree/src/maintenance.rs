//! C8: maintenance traversals — `DestroyFile`, `PrintTree`/`PrintWhole`, and
//! `DumpStatistics` — all post-order or whole-file walks over the tree.

use crate::engine::{TreeHandle, node_kind};
use crate::errors::TreeResult;
use crate::index_page;
use crate::leaf;
use file::api::FileManager;
use page::page_id::PageId;
use page::page_type::PageType;
use std::fmt::Write as _;

/// `PrintTree(root, option)`'s `RECURSIVE` vs single-page choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintOption {
    /// Dump only the root page.
    Single,
    /// Dump the root and recurse over every child.
    Recursive,
}

/// Running min/max/total over one population of page fill levels (bytes
/// used out of the page's data region), from which an average is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillStats {
    min: Option<u16>,
    max: Option<u16>,
    total: u64,
    count: u32,
}

impl FillStats {
    fn record(&mut self, used: u16) {
        self.min = Some(self.min.map_or(used, |m| m.min(used)));
        self.max = Some(self.max.map_or(used, |m| m.max(used)));
        self.total += used as u64;
        self.count += 1;
    }

    pub fn min(&self) -> u16 {
        self.min.unwrap_or(0)
    }

    pub fn max(&self) -> u16 {
        self.max.unwrap_or(0)
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total as f64 / self.count as f64
        }
    }
}

/// `DumpStatistics`'s result: page/entry counts, the depth of the
/// first-leaf descent path (§4.7/§9 — not a true tree-wide height, since
/// splits never rebalance), and per-node-type fill statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics {
    pub leaf_pages: u32,
    pub index_pages: u32,
    pub leaf_entries: u32,
    pub index_entries: u32,
    pub height: u32,
    pub leaf_fill: FillStats,
    pub index_fill: FillStats,
}

/// `DestroyFile`: post-order free of every page reachable from the root,
/// then the header page itself (releasing the base pin it has held for the
/// handle's lifetime — `FreePage` tolerates a pin count of exactly one).
pub fn destroy_file<F: FileManager>(handle: &TreeHandle<F>) -> TreeResult<()> {
    if let Some(root) = handle.root()? {
        destroy_subtree(handle, root)?;
    }
    handle.storage.free_page(handle.header_page_id)?;
    Ok(())
}

fn destroy_subtree<F: FileManager>(handle: &TreeHandle<F>, page_id: PageId) -> TreeResult<()> {
    match handle.read(page_id, node_kind)? {
        PageType::Leaf => handle.storage.free_page(page_id),
        PageType::Index => {
            let leftmost = handle.read(page_id, |p| index_page::leftmost_child(p))?;
            let children = handle.read(page_id, collect_children)?;
            destroy_subtree(handle, leftmost)?;
            for child in children {
                destroy_subtree(handle, child)?;
            }
            handle.storage.free_page(page_id)
        }
        PageType::Header => Err(crate::errors::TreeError::Corruption { page_id }),
    }
}

fn collect_children(page: &page::page::Page) -> TreeResult<Vec<PageId>> {
    let mut children = Vec::new();
    let mut cur = index_page::first(page)?;
    while let Some((slot, _, child)) = cur {
        children.push(child);
        cur = index_page::next(page, slot)?;
    }
    Ok(children)
}

/// `PrintTree(root, option)`: dumps one page, recursing over children when
/// `option` is [`PrintOption::Recursive`].
pub fn print_tree<F: FileManager>(handle: &TreeHandle<F>, option: PrintOption) -> TreeResult<String> {
    let mut out = String::new();
    match handle.root()? {
        None => out.push_str("(empty tree)\n"),
        Some(root) => print_subtree(handle, root, option, 0, &mut out)?,
    }
    Ok(out)
}

fn print_subtree<F: FileManager>(
    handle: &TreeHandle<F>,
    page_id: PageId,
    option: PrintOption,
    depth: usize,
    out: &mut String,
) -> TreeResult<()> {
    let indent = "  ".repeat(depth);
    match handle.read(page_id, node_kind)? {
        PageType::Leaf => {
            let entries = handle.read(page_id, |p| {
                let mut v = Vec::new();
                let mut cur = leaf::first(p)?;
                while let Some((slot, key, rid)) = cur {
                    v.push((key, rid));
                    cur = leaf::next(p, slot)?;
                }
                Ok(v)
            })?;
            let _ = writeln!(out, "{indent}leaf {page_id} ({} entries)", entries.len());
            for (key, rid) in entries {
                let _ = writeln!(out, "{indent}  {} -> {rid}", String::from_utf8_lossy(&key));
            }
        }
        PageType::Index => {
            let leftmost = handle.read(page_id, |p| index_page::leftmost_child(p))?;
            let entries = handle.read(page_id, |p| {
                let mut v = Vec::new();
                let mut cur = index_page::first(p)?;
                while let Some((slot, key, child)) = cur {
                    v.push((key, child));
                    cur = index_page::next(p, slot)?;
                }
                Ok(v)
            })?;
            let _ = writeln!(out, "{indent}index {page_id} ({} separators)", entries.len());
            if option == PrintOption::Recursive {
                print_subtree(handle, leftmost, option, depth + 1, out)?;
                for (key, child) in &entries {
                    let _ = writeln!(out, "{indent}  sep {}", String::from_utf8_lossy(key));
                    print_subtree(handle, *child, option, depth + 1, out)?;
                }
            }
        }
        PageType::Header => return Err(crate::errors::TreeError::Corruption { page_id }),
    }
    Ok(())
}

/// `PrintWhole`: every page belonging to the index's file, in file (page
/// number) order rather than tree order.
pub fn print_whole<F: FileManager>(handle: &TreeHandle<F>) -> TreeResult<String> {
    let mut out = String::new();
    let count = handle.storage.page_count(handle.file_id);
    for page_number in 0..count {
        let page_id = PageId::new(handle.file_id, page_number);
        if page_id == handle.header_page_id {
            let root = handle.root()?;
            let _ = writeln!(out, "header {page_id} (root = {root:?})");
            continue;
        }
        match handle.read(page_id, node_kind) {
            Ok(PageType::Leaf) => {
                let n = handle.read(page_id, |p| Ok(p.slot_count()?))?;
                let _ = writeln!(out, "leaf {page_id} ({n} entries)");
            }
            Ok(PageType::Index) => {
                let n = handle.read(page_id, |p| Ok(p.slot_count()?))?;
                let _ = writeln!(out, "index {page_id} ({n} separators)");
            }
            Ok(PageType::Header) => {
                let _ = writeln!(out, "header {page_id}");
            }
            Err(_) => {
                let _ = writeln!(out, "{page_id} (unreadable or freed)");
            }
        }
    }
    Ok(out)
}

/// `DumpStatistics`: a single traversal counting leaf/index pages and
/// entries, the depth of the first-leaf descent path, and per-node-type
/// fill factor.
pub fn dump_statistics<F: FileManager>(handle: &TreeHandle<F>) -> TreeResult<Statistics> {
    let mut stats = Statistics::default();
    let Some(root) = handle.root()? else {
        return Ok(stats);
    };
    stats.height = first_leaf_depth(handle, root)?;
    walk_collect(handle, root, &mut stats)?;
    Ok(stats)
}

fn first_leaf_depth<F: FileManager>(handle: &TreeHandle<F>, root: PageId) -> TreeResult<u32> {
    let mut depth: i32 = 0;
    let mut current = root;
    loop {
        match handle.read(current, node_kind)? {
            PageType::Leaf => return Ok(depth.unsigned_abs()),
            PageType::Index => {
                depth -= 1;
                current = handle.read(current, |p| index_page::leftmost_child(p))?;
            }
            PageType::Header => return Err(crate::errors::TreeError::Corruption { page_id: current }),
        }
    }
}

fn walk_collect<F: FileManager>(
    handle: &TreeHandle<F>,
    page_id: PageId,
    stats: &mut Statistics,
) -> TreeResult<()> {
    match handle.read(page_id, node_kind)? {
        PageType::Leaf => {
            let (slot_count, free_space) =
                handle.read(page_id, |p| Ok((p.slot_count()?, p.free_space()?)))?;
            stats.leaf_pages += 1;
            stats.leaf_entries += slot_count as u32;
            stats.leaf_fill.record(page::PAGE_SIZE as u16 - free_space);
        }
        PageType::Index => {
            let (slot_count, free_space) =
                handle.read(page_id, |p| Ok((p.slot_count()?, p.free_space()?)))?;
            stats.index_pages += 1;
            stats.index_entries += slot_count as u32;
            stats.index_fill.record(page::PAGE_SIZE as u16 - free_space);

            let leftmost = handle.read(page_id, |p| index_page::leftmost_child(p))?;
            let children = handle.read(page_id, collect_children)?;
            walk_collect(handle, leftmost, stats)?;
            for child in children {
                walk_collect(handle, child, stats)?;
            }
        }
        PageType::Header => return Err(crate::errors::TreeError::Corruption { page_id }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use crate::entry::RecordId;
    use buffer::buffer::BufferManager;
    use file::file_catalog::FileCatalog;
    use file::in_memory_file_manager::InMemoryFileManager;
    use page::page_id::PageId as Pid;
    use std::rc::Rc;
    use std::sync::Arc;
    use storage_api::storage_manager::StorageManager;

    fn handle() -> TreeHandle<InMemoryFileManager> {
        let catalog = Arc::new(FileCatalog::new());
        let fm = Rc::new(InMemoryFileManager::new(catalog));
        let bm = Rc::new(BufferManager::new(fm, 16));
        let storage = Rc::new(StorageManager::new(bm));
        let header = storage.new_page(0, PageType::Header).unwrap();
        let header_id = header.page_id();
        drop(header);
        storage.unpin_page(header_id, true).unwrap();
        TreeHandle::new(storage, 0, header_id)
    }

    #[test]
    fn statistics_on_an_empty_tree_are_all_zero() {
        let handle = handle();
        let stats = dump_statistics(&handle).unwrap();
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn statistics_count_one_leaf() {
        let handle = handle();
        for k in 0..5u32 {
            let key = format!("{k:04}");
            engine::insert(&handle, key.as_bytes(), RecordId::new(Pid::new(0, k), k + 1)).unwrap();
        }
        let stats = dump_statistics(&handle).unwrap();
        assert_eq!(stats.leaf_pages, 1);
        assert_eq!(stats.index_pages, 0);
        assert_eq!(stats.leaf_entries, 5);
        assert_eq!(stats.height, 0);
    }

    #[test]
    fn destroy_file_frees_every_page() {
        let handle = handle();
        for k in 0..40u32 {
            let key = format!("{k:04}");
            engine::insert(&handle, key.as_bytes(), RecordId::new(Pid::new(0, k), k + 1)).unwrap();
        }
        destroy_file(&handle).unwrap();
        // The header's frame should be free for immediate reuse.
        let reused = handle.storage.new_page(0, PageType::Header);
        assert!(reused.is_ok());
    }

    #[test]
    fn print_tree_mentions_every_entry_when_recursive() {
        let handle = handle();
        for k in 0..30u32 {
            let key = format!("{k:04}");
            engine::insert(&handle, key.as_bytes(), RecordId::new(Pid::new(0, k), k + 1)).unwrap();
        }
        let dump = print_tree(&handle, PrintOption::Recursive).unwrap();
        assert!(dump.contains("0000"));
        assert!(dump.contains("0029"));
    }
}
