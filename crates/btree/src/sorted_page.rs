//! C2: the sorted-page discipline shared by leaf and index pages.
//!
//! `Page` (from the `page` crate) only knows about an unsorted heap of
//! rows. This module layers key order on top: inserting finds the right
//! position by scanning existing rows, appends the new row to the heap,
//! then [`page::page::Page::reposition_slots`] shuffles the directory so
//! slot index and sorted rank coincide. Deleting goes through
//! [`page::page::Page::remove_slot`], which is the one primitive that
//! actually closes the directory hole rather than leaving a tombstone.

use crate::errors::{TreeError, TreeResult};
use crate::key::key_cmp;
use page::page::Page;
use std::cmp::Ordering;

/// Inserts `entry_bytes` into `page`'s sorted directory and returns the
/// slot index it ends up at. `key_of` extracts the key portion from a raw
/// row's bytes, since leaf and index entries unpack differently.
pub fn insert_sorted(
    page: &mut Page,
    entry_bytes: Vec<u8>,
    new_key: &[u8],
    key_of: impl Fn(&[u8]) -> &[u8],
) -> TreeResult<u32> {
    let old_slot_count = page.slot_count()?;

    let mut pos = old_slot_count as u32;
    for idx in 0..old_slot_count as u32 {
        let existing_key = key_of(page.row(idx)?);
        if key_cmp(existing_key, new_key) == Ordering::Greater {
            pos = idx;
            break;
        }
    }

    let plan = page.plan_insert(entry_bytes.len()).map_err(|e| {
        if e.is_not_enough_space() {
            TreeError::NoSpace
        } else {
            TreeError::from(e)
        }
    })?;
    page.insert_heap(plan, entry_bytes)?;

    if pos != old_slot_count as u32 {
        let mut order: Vec<u32> = (0..old_slot_count as u32).collect();
        order.insert(pos as usize, old_slot_count as u32);
        page.reposition_slots(&order)?;
    }

    Ok(pos)
}

/// Deletes the entry at `slot_index`, closing the directory hole.
pub fn delete_sorted(page: &mut Page, slot_index: u32) -> TreeResult<()> {
    page.remove_slot(slot_index as usize)?;
    Ok(())
}

/// `AvailableSpace`.
pub fn available_space(page: &Page) -> TreeResult<u16> {
    Ok(page.free_space()?)
}
