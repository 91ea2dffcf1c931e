use super::api::Page;
use crate::errors::insert_error::InsertError;
use crate::insertion_plan::{InsertionOffset, InsertionPlan, InsertionSlot};
use crate::slot::SLOT_SIZE;

impl Page {
    pub(super) fn insert_row_unsorted_internal(
        &mut self,
        plan: InsertionPlan,
        bytes: Vec<u8>,
    ) -> Result<(), InsertError> {
        let row_len = bytes.len();

        if matches!(plan.offset, InsertionOffset::AfterCompactionFreeStart) {
            self.compact()?;
        }

        let offset = match plan.offset {
            InsertionOffset::Exact(offset) => offset,
            InsertionOffset::AfterCompactionFreeStart => {
                self.header_ref()?.get_free_start()? as usize
            }
        };

        self.data[offset..(offset + row_len)].copy_from_slice(&bytes);

        let slot_index = match plan.slot {
            InsertionSlot::Reuse(idx) => idx as u32,
            InsertionSlot::New => {
                let slot_count = self.header_ref()?.get_slot_count()?;
                slot_count as u32
            }
        };

        let row_len_u16 = row_len as u16;

        {
            let mut header = self.header_mut()?;
            if matches!(plan.slot, InsertionSlot::New) {
                let new_slot_count = header.get_slot_count()? + 1;
                header.set_slot_count(new_slot_count)?;
                let free_end = header.get_free_end()?;
                header.set_free_end(free_end - SLOT_SIZE as u16)?;
            }
            header.set_free_start((offset + row_len) as u16)?;
            let free_space = header.get_free_space()?;
            let consumed = row_len_u16
                + if matches!(plan.slot, InsertionSlot::New) {
                    SLOT_SIZE as u16
                } else {
                    0
                };
            header.set_free_space(free_space - consumed)?;
        }

        let mut slots = self.slot_array_mut()?;
        slots.set_slot(slot_index, offset as u16, row_len_u16)?;

        Ok(())
    }
}
