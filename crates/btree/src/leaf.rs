//! C3: leaf pages hold `(key, RecordId)` entries and link into the
//! doubly-linked leaf chain via `prev_page`/`next_page`.

use crate::entry::{RecordId, pack_leaf_entry, unpack_leaf_entry};
use crate::errors::TreeResult;
use crate::sorted_page::{delete_sorted, insert_sorted};
use page::page::Page;

/// `Insert(key, dataRid) -> slotRid`.
pub fn insert(page: &mut Page, key: &[u8], rid: RecordId) -> TreeResult<u32> {
    let bytes = pack_leaf_entry(key, rid)?;
    insert_sorted(page, bytes, key, |row| unpack_leaf_entry(row).0)
}

/// `GetCurrent(slot) -> key, dataRid`.
pub fn get(page: &Page, slot: u32) -> TreeResult<(Vec<u8>, RecordId)> {
    let (key, rid) = unpack_leaf_entry(page.row(slot)?);
    Ok((key.to_vec(), rid))
}

/// `GetFirst -> slotRid, key, dataRid`, or `None` on an empty leaf.
pub fn first(page: &Page) -> TreeResult<Option<(u32, Vec<u8>, RecordId)>> {
    if page.slot_count()? == 0 {
        return Ok(None);
    }
    let (key, rid) = get(page, 0)?;
    Ok(Some((0, key, rid)))
}

/// `GetNext(cursor) -> slotRid, key, dataRid`. `Done` (`None`) past the
/// last slot.
pub fn next(page: &Page, cursor: u32) -> TreeResult<Option<(u32, Vec<u8>, RecordId)>> {
    let next_slot = cursor + 1;
    if next_slot >= page.slot_count()? as u32 {
        return Ok(None);
    }
    let (key, rid) = get(page, next_slot)?;
    Ok(Some((next_slot, key, rid)))
}

/// `Delete(key, dataRid)`: linear scan from the last slot backwards for the
/// first slot matching both key and rid, so duplicate keys can be told
/// apart by their data pointer. `Ok(false)` means no match was found.
pub fn delete(page: &mut Page, key: &[u8], rid: RecordId) -> TreeResult<bool> {
    let slot_count = page.slot_count()?;
    for idx in (0..slot_count as u32).rev() {
        let (row_key, row_rid) = get(page, idx)?;
        if row_key == key && row_rid == rid {
            delete_sorted(page, idx)?;
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use page::page_id::PageId;
    use page::page_type::PageType;

    fn new_leaf() -> Page {
        Page::new_empty(PageId::new(0, 0), PageType::Leaf).unwrap()
    }

    #[test]
    fn insert_then_iterate_in_sorted_order() {
        let mut page = new_leaf();
        for k in [b"0003", b"0001", b"0002"] {
            insert(&mut page, k, RecordId::new(PageId::new(0, 0), 0)).unwrap();
        }
        let mut seen = Vec::new();
        let mut cur = first(&page).unwrap();
        while let Some((slot, key, _)) = cur {
            seen.push(key);
            cur = next(&page, slot).unwrap();
        }
        assert_eq!(seen, vec![b"0001".to_vec(), b"0002".to_vec(), b"0003".to_vec()]);
    }

    #[test]
    fn delete_matches_key_and_rid_not_just_key() {
        let mut page = new_leaf();
        let r1 = RecordId::new(PageId::new(0, 1), 0);
        let r2 = RecordId::new(PageId::new(0, 2), 0);
        insert(&mut page, b"0001", r1).unwrap();
        insert(&mut page, b"0001", r2).unwrap();

        assert!(delete(&mut page, b"0001", r1).unwrap());
        assert_eq!(page.slot_count().unwrap(), 1);
        let (_, remaining) = get(&page, 0).unwrap();
        assert_eq!(remaining, r2);
    }

    #[test]
    fn delete_of_unknown_entry_reports_not_found() {
        let mut page = new_leaf();
        insert(&mut page, b"0001", RecordId::new(PageId::new(0, 0), 0)).unwrap();
        assert!(!delete(&mut page, b"0002", RecordId::new(PageId::new(0, 0), 0)).unwrap());
    }
}
