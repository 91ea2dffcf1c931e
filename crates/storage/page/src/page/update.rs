use super::api::Page;
use crate::errors::slot_error::SlotError;
use crate::errors::update_error::UpdateError;
use std::cmp::Ordering;

impl Page {
    pub(super) fn update_internal(
        &mut self,
        slot_index: usize,
        new_row: Vec<u8>,
    ) -> Result<(), UpdateError> {
        let new_len = new_row.len();
        let (old_offset, old_length) = {
            let slots = self.slot_array_ref()?;
            let slot = slots.slot_ref(slot_index as u32)?;
            let (offset, length) = (slot.offset()?, slot.length()?);
            if !Self::is_slot_valid(offset, length) {
                return Err(UpdateError::from(SlotError::InvalidSlot { slot_index }));
            }
            (offset, length)
        };

        match new_len.cmp(&(old_length as usize)) {
            Ordering::Equal => {
                self.data[old_offset as usize..(old_offset as usize + new_len)]
                    .copy_from_slice(&new_row);
            }
            Ordering::Less => {
                let new_len_u16 = new_len as u16;
                self.data[old_offset as usize..(old_offset as usize + new_len)]
                    .copy_from_slice(&new_row);
                {
                    let mut slots = self.slot_array_mut()?;
                    slots.set_slot(slot_index as u32, old_offset, new_len_u16)?;
                }
                let reclaimed = old_length - new_len_u16;
                {
                    let mut header = self.header_mut()?;
                    let free_space = header.get_free_space()?;
                    header.set_free_space(free_space + reclaimed)?;
                }
                self.try_to_find_new_free_start(old_offset + new_len_u16, reclaimed)?;
            }
            Ordering::Greater => {
                self.grow_row_in_place(slot_index, old_offset, old_length, new_row)?;
            }
        }

        Ok(())
    }

    /// Handles the case where the updated row no longer fits in its old
    /// slot's space: frees the old bytes, makes room if necessary, and
    /// re-writes the row at a new offset while keeping the same slot index.
    fn grow_row_in_place(
        &mut self,
        slot_index: usize,
        old_offset: u16,
        old_length: u16,
        new_row: Vec<u8>,
    ) -> Result<(), UpdateError> {
        let new_len = new_row.len();

        {
            let mut slots = self.slot_array_mut()?;
            slots.set_slot(slot_index as u32, 0, 0)?;
        }
        {
            let mut header = self.header_mut()?;
            let free_space = header.get_free_space()?;
            header.set_free_space(free_space + old_length)?;
        }
        self.try_to_find_new_free_start(old_offset, old_length)?;

        let free_space = self.header_ref()?.get_free_space()? as usize;
        if free_space < new_len {
            return Err(UpdateError::NotEnoughSpace {
                row_len: new_len,
                page_free_space: free_space,
            });
        }

        let free_start = self.header_ref()?.get_free_start()? as usize;
        let free_end = self.header_ref()?.get_free_end()? as usize;
        let contiguous_free = (free_end + 1).saturating_sub(free_start);
        if contiguous_free < new_len {
            self.compact()?;
        }

        let offset = self.header_ref()?.get_free_start()?;
        let new_len_u16 = new_len as u16;
        self.data[offset as usize..(offset as usize + new_len)].copy_from_slice(&new_row);

        {
            let mut slots = self.slot_array_mut()?;
            slots.set_slot(slot_index as u32, offset, new_len_u16)?;
        }
        {
            let mut header = self.header_mut()?;
            header.set_free_start(offset + new_len_u16)?;
            let free_space = header.get_free_space()?;
            header.set_free_space(free_space - new_len_u16)?;
        }

        Ok(())
    }
}
