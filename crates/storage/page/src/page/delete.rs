use super::api::Page;
use crate::errors::delete_error::DeleteError;
use crate::errors::slot_error::SlotError;

impl Page {
    pub(super) fn delete_row_internal(
        &mut self,
        slot_index: usize,
        compact_requested: bool,
    ) -> Result<(), DeleteError> {
        let (offset, length) = {
            let slots = self.slot_array_ref()?;
            let slot = slots.slot_ref(slot_index as u32)?;
            let (offset, length) = (slot.offset()?, slot.length()?);
            if !Self::is_slot_valid(offset, length) {
                return Err(DeleteError::from(SlotError::InvalidSlot { slot_index }));
            }
            (offset, length)
        };

        {
            let mut slots = self.slot_array_mut()?;
            slots.set_slot(slot_index as u32, 0, 0)?;
        }

        {
            let mut header = self.header_mut()?;
            let free_space = header.get_free_space()?;
            header.set_free_space(free_space + length)?;
        }

        let shrunk = self.try_to_find_new_free_start(offset, length)?;

        if compact_requested {
            self.compact()?;
        } else if !shrunk {
            let mut header = self.header_mut()?;
            header.set_can_compact(1)?;
        }

        Ok(())
    }

    /// If the row just freed ended exactly at `free_start`, the data region
    /// can shrink immediately without leaving a hole. Returns whether the
    /// shrink happened.
    pub(super) fn try_to_find_new_free_start(
        &mut self,
        offset: u16,
        length: u16,
    ) -> Result<bool, DeleteError> {
        let mut header = self.header_mut()?;
        let free_start = header.get_free_start()?;
        if offset + length == free_start {
            header.set_free_start(offset)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
