use super::api::Page;
use crate::PAGE_SIZE;
use crate::errors::insert_error::InsertError;
use crate::errors::slot_error::SlotError;
use crate::header::HEADER_SIZE;
use crate::insertion_plan::{InsertionOffset, InsertionPlan, InsertionSlot};
use crate::slot::SLOT_SIZE;
use crate::slot_array::{SlotArrayMut, SlotArrayRef};

impl Page {
    pub(super) fn slot_array_ref(&self) -> Result<SlotArrayRef<'_>, SlotError> {
        let header = self.header_ref().map_err(SlotError::from)?;
        let slot_count = header.get_slot_count().map_err(SlotError::from)?;
        let free_end = header.get_free_end().map_err(SlotError::from)? as usize;
        SlotArrayRef::new(&self.data[(free_end + 1)..PAGE_SIZE], slot_count)
    }

    pub(super) fn slot_array_mut(&mut self) -> Result<SlotArrayMut<'_>, SlotError> {
        let header = self.header_ref().map_err(SlotError::from)?;
        let slot_count = header.get_slot_count().map_err(SlotError::from)?;
        let free_end = header.get_free_end().map_err(SlotError::from)? as usize;
        SlotArrayMut::new(&mut self.data[(free_end + 1)..PAGE_SIZE], slot_count)
    }

    /// True if `length != 0`, i.e. the slot currently addresses live data.
    pub(super) fn is_slot_valid(offset: u16, length: u16) -> bool {
        let _ = offset;
        length != 0
    }

    /// Finds a usable insertion point for a row of `row_len` bytes, without
    /// mutating the page. Returns `InsertError::NotEnoughSpace` if the row
    /// cannot fit even after compaction.
    pub(super) fn plan_insert_internal(&self, row_len: usize) -> Result<InsertionPlan, InsertError> {
        let header = self.header_ref()?;
        let free_start = header.get_free_start()?;
        let free_end = header.get_free_end()?;
        let free_space = header.get_free_space()? as usize;
        let slot_count = header.get_slot_count()?;
        drop(header);

        let slots = self.slot_array_ref().map_err(InsertError::from)?;
        let mut reuse_slot = None;
        for idx in 0..slot_count as u32 {
            let slot = slots.slot_ref(idx).map_err(InsertError::from)?;
            if !Self::is_slot_valid(slot.offset()?, slot.length()?) {
                reuse_slot = Some(idx as usize);
                break;
            }
        }

        let slot = match reuse_slot {
            Some(idx) => InsertionSlot::Reuse(idx),
            None => InsertionSlot::New,
        };
        let needs_new_slot = matches!(slot, InsertionSlot::New);
        let total_needed = row_len + if needs_new_slot { SLOT_SIZE } else { 0 };

        if free_space < total_needed {
            return Err(InsertError::NotEnoughSpace {
                row_len,
                page_free_space: free_space,
            });
        }

        let contiguous_free = (free_end as usize + 1).saturating_sub(free_start as usize);
        let offset = if contiguous_free >= total_needed {
            InsertionOffset::Exact(free_start as usize)
        } else {
            InsertionOffset::AfterCompactionFreeStart
        };

        Ok(InsertionPlan { slot, offset })
    }

    /// Defragments the data region, packing all live rows contiguously from
    /// `HEADER_SIZE` forward and updating their slots to match.
    pub(super) fn compact(&mut self) -> Result<(), SlotError> {
        let header = self.header_ref().map_err(SlotError::from)?;
        let slot_count = header.get_slot_count().map_err(SlotError::from)?;
        let free_start = header.get_free_start().map_err(SlotError::from)? as usize;
        drop(header);

        let mut packed = Vec::with_capacity(free_start - HEADER_SIZE);
        let mut new_offsets: Vec<(u32, u16, u16)> = Vec::new();

        {
            let slots = self.slot_array_ref()?;
            for idx in 0..slot_count as u32 {
                let slot = slots.slot_ref(idx)?;
                let (offset, length) = (slot.offset()?, slot.length()?);
                if !Self::is_slot_valid(offset, length) {
                    continue;
                }
                let new_offset = (HEADER_SIZE + packed.len()) as u16;
                let row_bytes = &self.data[offset as usize..(offset as usize + length as usize)];
                packed.extend_from_slice(row_bytes);
                new_offsets.push((idx, new_offset, length));
            }
        }

        let new_free_start = HEADER_SIZE + packed.len();
        self.data[HEADER_SIZE..new_free_start].copy_from_slice(&packed);
        self.data[new_free_start..free_start].fill(0);

        {
            let mut slots = self.slot_array_mut()?;
            for (idx, offset, length) in new_offsets {
                slots.set_slot(idx, offset, length)?;
            }
        }

        let mut header = self.header_mut().map_err(SlotError::from)?;
        header.set_free_start(new_free_start as u16)?;
        header.set_can_compact(0)?;
        Ok(())
    }
}
