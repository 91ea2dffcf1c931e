use super::api::Page;
use crate::errors::slot_error::SlotError;

impl Page {
    /// Permutes the slot directory in place: after this call, slot `i`
    /// holds whatever slot `order[i]` held before the call. `order` must be
    /// a permutation of `0..slot_count`.
    ///
    /// This does not move any row bytes — only the (offset, length) pairs
    /// in the directory are reshuffled. It exists so a sorted page can keep
    /// its slot directory in key order without re-inserting rows: insert a
    /// new row (landing at the last slot), then reorder so the directory
    /// reads in sorted order.
    pub(super) fn reposition_slots_internal(&mut self, order: &[u32]) -> Result<(), SlotError> {
        let old: Vec<(u16, u16)> = {
            let slots = self.slot_array_ref()?;
            let mut out = Vec::with_capacity(order.len());
            for idx in 0..order.len() as u32 {
                let slot = slots.slot_ref(idx)?;
                out.push((slot.offset()?, slot.length()?));
            }
            out
        };

        let mut slots = self.slot_array_mut()?;
        for (new_index, &old_index) in order.iter().enumerate() {
            let (offset, length) = old
                .get(old_index as usize)
                .copied()
                .ok_or(SlotError::InvalidSlot {
                    slot_index: old_index as usize,
                })?;
            slots.set_slot(new_index as u32, offset, length)?;
        }
        Ok(())
    }
}
