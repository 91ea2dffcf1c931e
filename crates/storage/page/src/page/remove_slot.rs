use super::api::Page;
use crate::errors::delete_error::DeleteError;
use crate::slot::SLOT_SIZE;

impl Page {
    /// Deletes the row at `slot_index` and closes the resulting hole in the
    /// slot directory: every slot after `slot_index` shifts down by one and
    /// `slot_count` shrinks by one. Unlike [`Self::delete_row`], this never
    /// leaves a dead slot behind for a later insert to reuse — it is for
    /// callers that keep their own directory free of holes (sorted pages),
    /// where "live slot count" must mean exactly that.
    pub(super) fn remove_slot_internal(&mut self, slot_index: usize) -> Result<(), DeleteError> {
        self.delete_row_internal(slot_index, false)?;

        let slot_count = self.header_ref()?.get_slot_count()? as usize;
        let order: Vec<u32> = (0..slot_count as u32)
            .filter(|&idx| idx as usize != slot_index)
            .collect();
        self.reposition_slots_internal(&order)?;

        let mut header = self.header_mut()?;
        header.set_slot_count((slot_count - 1) as u16)?;
        let free_end = header.get_free_end()?;
        header.set_free_end(free_end + SLOT_SIZE as u16)?;
        let free_space = header.get_free_space()?;
        header.set_free_space(free_space + SLOT_SIZE as u16)?;
        Ok(())
    }
}
