//! C4: index pages hold `(key, childPageId)` entries. The page's
//! `prev_page` field is repurposed to carry the leftmost child pointer —
//! the child covering keys strictly less than the page's first separator.

use crate::entry::{pack_index_entry, unpack_index_entry};
use crate::errors::TreeResult;
use crate::sorted_page::{delete_sorted, insert_sorted};
use page::page::Page;
use page::page_id::PageId;

/// `Insert(key, childPid) -> slotRid`.
pub fn insert(page: &mut Page, key: &[u8], child: PageId) -> TreeResult<u32> {
    let bytes = pack_index_entry(key, child)?;
    insert_sorted(page, bytes, key, |row| unpack_index_entry(row).0)
}

/// `GetCurrent(slot) -> key, childPid`.
pub fn get(page: &Page, slot: u32) -> TreeResult<(Vec<u8>, PageId)> {
    let (key, child) = unpack_index_entry(page.row(slot)?);
    Ok((key.to_vec(), child))
}

/// `GetFirst -> slotRid, key, childPid`.
pub fn first(page: &Page) -> TreeResult<Option<(u32, Vec<u8>, PageId)>> {
    if page.slot_count()? == 0 {
        return Ok(None);
    }
    let (key, child) = get(page, 0)?;
    Ok(Some((0, key, child)))
}

/// `GetNext(cursor) -> slotRid, key, childPid`.
pub fn next(page: &Page, cursor: u32) -> TreeResult<Option<(u32, Vec<u8>, PageId)>> {
    let next_slot = cursor + 1;
    if next_slot >= page.slot_count()? as u32 {
        return Ok(None);
    }
    let (key, child) = get(page, next_slot)?;
    Ok(Some((next_slot, key, child)))
}

/// `LeftmostChild()`.
pub fn leftmost_child(page: &Page) -> TreeResult<PageId> {
    Ok(PageId::new(page.page_id().file_id, page.prev_page()?))
}

/// `SetLeftmostChild(pid)`.
pub fn set_leftmost_child(page: &mut Page, child: PageId) -> TreeResult<()> {
    page.set_prev_page(child.page_number)?;
    Ok(())
}

/// Index of the rightmost entry whose key is `<= key`, or `None` if every
/// entry's key is greater (in which case the leftmost child covers it).
fn rightmost_le(page: &Page, key: &[u8]) -> TreeResult<Option<u32>> {
    let slot_count = page.slot_count()? as u32;
    let mut found = None;
    for idx in 0..slot_count {
        let (entry_key, _) = get(page, idx)?;
        if entry_key.as_slice() <= key {
            found = Some(idx);
        } else {
            break;
        }
    }
    Ok(found)
}

/// `GetPageID(key) -> childPid`.
pub fn get_page_id(page: &Page, key: &[u8]) -> TreeResult<PageId> {
    match rightmost_le(page, key)? {
        Some(idx) => Ok(get(page, idx)?.1),
        None => leftmost_child(page),
    }
}

/// Slot index of the entry whose key exactly equals `target`, if any.
/// Used by the optional separator-repair path after a leaf's minimum key
/// is deleted (the source's "FindKey" helper).
pub fn find_key(page: &Page, target: &[u8]) -> TreeResult<Option<u32>> {
    let slot_count = page.slot_count()? as u32;
    for idx in 0..slot_count {
        let (entry_key, _) = get(page, idx)?;
        if entry_key.as_slice() == target {
            return Ok(Some(idx));
        }
    }
    Ok(None)
}

/// `Delete(key)`: finds the leftmost slot whose key is `> key`, steps back
/// one, and deletes it — the entry whose key is the greatest `<= key`.
pub fn delete(page: &mut Page, key: &[u8]) -> TreeResult<()> {
    let slot_count = page.slot_count()? as u32;
    let mut leftmost_greater = slot_count;
    for idx in 0..slot_count {
        let (entry_key, _) = get(page, idx)?;
        if entry_key.as_slice() > key {
            leftmost_greater = idx;
            break;
        }
    }
    if let Some(target) = leftmost_greater.checked_sub(1) {
        delete_sorted(page, target)?;
    }
    Ok(())
}

/// `AdjustKey(newKey, oldKey)`: overwrites the key bytes of the entry
/// located as in [`get_page_id`] for `oldKey`, keeping its child pointer.
pub fn adjust_key(page: &mut Page, new_key: &[u8], old_key: &[u8]) -> TreeResult<()> {
    if let Some(idx) = rightmost_le(page, old_key)? {
        let (_, child) = get(page, idx)?;
        let bytes = pack_index_entry(new_key, child)?;
        page.update_row(idx as usize, bytes)?;
    }
    Ok(())
}

/// `GetSibling(key) -> (PageId, isLeft)`: a neighbor of the child covering
/// `key`, preferring the entry immediately to its right; falls back to the
/// left neighbor when the covering child is the page's rightmost. Not used
/// by insert/delete/search (those follow the split/descent algorithms
/// exactly); a standalone traversal primitive a repair or maintenance tool
/// can use to locate an adjacent subtree.
pub fn sibling_of(page: &Page, key: &[u8]) -> TreeResult<Option<(PageId, bool)>> {
    let slot_count = page.slot_count()? as u32;
    match rightmost_le(page, key)? {
        None => match first(page)? {
            Some((_, _, child)) => Ok(Some((child, false))),
            None => Ok(None),
        },
        Some(idx) => {
            let right = idx + 1;
            if right < slot_count {
                Ok(Some((get(page, right)?.1, false)))
            } else if idx == 0 {
                Ok(Some((leftmost_child(page)?, true)))
            } else {
                Ok(Some((get(page, idx - 1)?.1, true)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page::page_type::PageType;

    fn new_index(file_id: u32, leftmost: PageId) -> Page {
        let mut page = Page::new_empty(PageId::new(file_id, 0), PageType::Index).unwrap();
        set_leftmost_child(&mut page, leftmost).unwrap();
        page
    }

    #[test]
    fn get_page_id_falls_back_to_leftmost_child() {
        let leftmost = PageId::new(0, 99);
        let mut page = new_index(0, leftmost);
        insert(&mut page, b"0010", PageId::new(0, 1)).unwrap();
        assert_eq!(get_page_id(&page, b"0005").unwrap(), leftmost);
        assert_eq!(get_page_id(&page, b"0010").unwrap(), PageId::new(0, 1));
        assert_eq!(get_page_id(&page, b"0020").unwrap(), PageId::new(0, 1));
    }

    #[test]
    fn delete_removes_greatest_entry_le_key() {
        let mut page = new_index(0, PageId::new(0, 99));
        insert(&mut page, b"0010", PageId::new(0, 1)).unwrap();
        insert(&mut page, b"0020", PageId::new(0, 2)).unwrap();
        delete(&mut page, b"0015").unwrap();
        assert_eq!(page.slot_count().unwrap(), 1);
        assert_eq!(get(&page, 0).unwrap().0, b"0020".to_vec());
    }

    #[test]
    fn sibling_of_prefers_the_right_neighbor() {
        let mut page = new_index(0, PageId::new(0, 99));
        insert(&mut page, b"0010", PageId::new(0, 1)).unwrap();
        insert(&mut page, b"0020", PageId::new(0, 2)).unwrap();
        assert_eq!(sibling_of(&page, b"0005").unwrap(), Some((PageId::new(0, 1), false)));
        assert_eq!(sibling_of(&page, b"0010").unwrap(), Some((PageId::new(0, 2), false)));
    }

    #[test]
    fn sibling_of_falls_back_left_at_the_rightmost_child() {
        let mut page = new_index(0, PageId::new(0, 99));
        insert(&mut page, b"0010", PageId::new(0, 1)).unwrap();
        insert(&mut page, b"0020", PageId::new(0, 2)).unwrap();
        assert_eq!(sibling_of(&page, b"0020").unwrap(), Some((PageId::new(0, 1), true)));
    }

    #[test]
    fn adjust_key_preserves_child_pointer() {
        let mut page = new_index(0, PageId::new(0, 99));
        insert(&mut page, b"0010", PageId::new(0, 1)).unwrap();
        adjust_key(&mut page, b"0005", b"0010").unwrap();
        let (key, child) = get(&page, 0).unwrap();
        assert_eq!(key, b"0005".to_vec());
        assert_eq!(child, PageId::new(0, 1));
    }
}
