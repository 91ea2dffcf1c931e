//! Zero-copy views into the *slot array region* of a page.
//!
//! The slot array grows inward from the end of the page toward the
//! beginning, so new slots extend into free space from the right without
//! shifting existing ones. Consequently logical slot index 0 is the *last*
//! `SLOT_SIZE` chunk in the region, and indices increase leftward:
//!
//! ```text
//!     physical_start = slot_array_len - (slot_index + 1) * SLOT_SIZE
//!     physical_end   = physical_start + SLOT_SIZE
//! ```

use crate::errors::slot_error::SlotError;
use crate::slot::{SLOT_SIZE, SlotMut, SlotRef};
use std::ops::Range;

/// Immutable zero-copy view into the slot array of a page.
#[derive(Debug)]
pub(crate) struct SlotArrayRef<'a> {
    bytes: &'a [u8],
}

impl<'a> SlotArrayRef<'a> {
    pub(super) fn new(bytes: &'a [u8], slot_count: u16) -> Result<Self, SlotError> {
        let expected_len = slot_count as usize * SLOT_SIZE;
        if bytes.len() != expected_len {
            return Err(SlotError::SlotRegionSizeMismatch {
                expected_size: expected_len,
                actual_size: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    pub(crate) fn slot_ref(&self, slot_index: u32) -> Result<SlotRef<'a>, SlotError> {
        let range = get_slot_range(self.bytes.len(), slot_index)?;
        let slot_bytes = self.bytes.get(range).ok_or(SlotError::InvalidSlot {
            slot_index: slot_index as usize,
        })?;
        SlotRef::from_raw(slot_index, slot_bytes)
    }
}

/// Mutable zero-copy view into the slot array of a page.
#[derive(Debug)]
pub(crate) struct SlotArrayMut<'a> {
    bytes: &'a mut [u8],
}

impl<'a> SlotArrayMut<'a> {
    pub(super) fn new(bytes: &'a mut [u8], slot_count: u16) -> Result<Self, SlotError> {
        let expected_len = slot_count as usize * SLOT_SIZE;
        if bytes.len() != expected_len {
            return Err(SlotError::SlotRegionSizeMismatch {
                expected_size: expected_len,
                actual_size: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    pub(crate) fn slot_ref(&self, slot_index: u32) -> Result<SlotRef<'_>, SlotError> {
        let range = get_slot_range(self.bytes.len(), slot_index)?;
        let slot_bytes = self.bytes.get(range).ok_or(SlotError::InvalidSlot {
            slot_index: slot_index as usize,
        })?;
        SlotRef::from_raw(slot_index, slot_bytes)
    }

    pub(crate) fn slot_mut(&mut self, slot_index: u32) -> Result<SlotMut<'_>, SlotError> {
        let range = get_slot_range(self.bytes.len(), slot_index)?;
        let slot_bytes = self.bytes.get_mut(range).ok_or(SlotError::InvalidSlot {
            slot_index: slot_index as usize,
        })?;
        SlotMut::from_raw(slot_index, slot_bytes)
    }

    pub(crate) fn set_slot(
        &mut self,
        slot_index: u32,
        slot_offset: u16,
        slot_length: u16,
    ) -> Result<(), SlotError> {
        let mut slot_mut = self.slot_mut(slot_index)?;
        slot_mut.set_length(slot_length)?;
        slot_mut.set_offset(slot_offset)?;
        Ok(())
    }
}

fn get_slot_start(slot_array_size: usize, slot_index: u32) -> Result<usize, SlotError> {
    slot_array_size
        .checked_sub((slot_index as usize + 1) * SLOT_SIZE)
        .ok_or(SlotError::InvalidSlot {
            slot_index: slot_index as usize,
        })
}

fn get_slot_range(slot_array_size: usize, slot_index: u32) -> Result<Range<usize>, SlotError> {
    let start = get_slot_start(slot_array_size, slot_index)?;
    Ok(start..(start + SLOT_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_region_of_wrong_size() {
        let bytes = vec![0u8; 10];
        let result = SlotArrayRef::new(&bytes, 3);
        assert!(matches!(
            result,
            Err(SlotError::SlotRegionSizeMismatch {
                expected_size: 12,
                actual_size: 10
            })
        ));
    }

    #[test]
    fn reads_slots_in_reverse_order() {
        let mut bytes = vec![0u8; SLOT_SIZE * 2];
        bytes[4..8].copy_from_slice(&[1, 0, 2, 0]); // slot 0
        bytes[0..4].copy_from_slice(&[3, 0, 4, 0]); // slot 1

        let slot_array = SlotArrayRef::new(&bytes, 2).unwrap();
        let slot0 = slot_array.slot_ref(0).unwrap();
        assert_eq!(slot0.offset().unwrap(), 1);
        assert_eq!(slot0.length().unwrap(), 2);
        let slot1 = slot_array.slot_ref(1).unwrap();
        assert_eq!(slot1.offset().unwrap(), 3);
        assert_eq!(slot1.length().unwrap(), 4);
    }

    #[test]
    fn out_of_bounds_index_is_rejected() {
        let bytes = vec![0u8; SLOT_SIZE * 2];
        let slot_array = SlotArrayRef::new(&bytes, 2).unwrap();
        assert!(matches!(
            slot_array.slot_ref(3),
            Err(SlotError::InvalidSlot { slot_index: 3 })
        ));
    }

    #[test]
    fn mutable_view_writes_and_reads_back() {
        let mut bytes = vec![0u8; SLOT_SIZE * 2];
        let mut slot_array = SlotArrayMut::new(&mut bytes, 2).unwrap();
        slot_array.set_slot(0, 10, 20).unwrap();
        slot_array.set_slot(1, 30, 40).unwrap();

        assert_eq!(slot_array.slot_ref(0).unwrap().offset().unwrap(), 10);
        assert_eq!(slot_array.slot_ref(0).unwrap().length().unwrap(), 20);
        assert_eq!(slot_array.slot_ref(1).unwrap().offset().unwrap(), 30);
        assert_eq!(slot_array.slot_ref(1).unwrap().length().unwrap(), 40);
    }
}
