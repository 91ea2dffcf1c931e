use crate::errors::slot_error::SlotError;
use binary_helpers::le::{read_le, write_le};

/// Fixed size of a slot in bytes: a `u16` offset followed by a `u16` length.
pub(crate) const SLOT_SIZE: usize = 4;

/// A zero-copy read-only view into a 4-byte slot in the page's slot array.
#[derive(Debug)]
pub(crate) struct SlotRef<'a> {
    slot_index: u32,
    bytes: &'a [u8; SLOT_SIZE],
}

impl<'a> SlotRef<'a> {
    #[inline]
    pub(super) fn from_raw(slot_index: u32, bytes: &'a [u8]) -> Result<Self, SlotError> {
        if bytes.len() != SLOT_SIZE {
            return Err(SlotError::SlotSizeMismatch {
                expected_size: SLOT_SIZE,
                actual_size: bytes.len(),
            });
        }

        let bytes_array: &[u8; SLOT_SIZE] = bytes
            .try_into()
            .unwrap_or_else(|_| unreachable!("length checked above"));

        Ok(Self {
            slot_index,
            bytes: bytes_array,
        })
    }

    #[inline]
    pub(crate) fn slot_index(&self) -> u32 {
        self.slot_index
    }

    #[inline]
    pub(crate) fn offset(&self) -> Result<u16, SlotError> {
        Ok(read_le::<u16>(self.bytes, 0)?)
    }

    #[inline]
    pub(crate) fn length(&self) -> Result<u16, SlotError> {
        Ok(read_le::<u16>(self.bytes, 2)?)
    }
}

/// A zero-copy mutable view into a 4-byte slot in the page's slot array.
#[derive(Debug)]
pub(crate) struct SlotMut<'a> {
    slot_index: u32,
    bytes: &'a mut [u8; SLOT_SIZE],
}

impl<'a> SlotMut<'a> {
    #[inline]
    pub(super) fn from_raw(slot_index: u32, bytes: &'a mut [u8]) -> Result<Self, SlotError> {
        if bytes.len() != SLOT_SIZE {
            return Err(SlotError::SlotSizeMismatch {
                expected_size: SLOT_SIZE,
                actual_size: bytes.len(),
            });
        }

        let bytes_array: &mut [u8; SLOT_SIZE] = bytes
            .try_into()
            .unwrap_or_else(|_| unreachable!("length checked above"));

        Ok(Self {
            slot_index,
            bytes: bytes_array,
        })
    }

    #[inline]
    pub(crate) fn offset(&self) -> Result<u16, SlotError> {
        Ok(read_le::<u16>(self.bytes, 0)?)
    }

    #[inline]
    pub(crate) fn length(&self) -> Result<u16, SlotError> {
        Ok(read_le::<u16>(self.bytes, 2)?)
    }

    #[inline]
    pub(crate) fn set_offset(&mut self, offset: u16) -> Result<(), SlotError> {
        Ok(write_le::<u16>(self.bytes, 0, offset)?)
    }

    #[inline]
    pub(crate) fn set_length(&mut self, length: u16) -> Result<(), SlotError> {
        Ok(write_le::<u16>(self.bytes, 2, length)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_ref_reads_fields() {
        let bytes = [0x01, 0x00, 0x02, 0x00];
        let slot = SlotRef::from_raw(5, &bytes).unwrap();
        assert_eq!(slot.slot_index(), 5);
        assert_eq!(slot.offset().unwrap(), 1);
        assert_eq!(slot.length().unwrap(), 2);
    }

    #[test]
    fn slot_ref_rejects_wrong_size() {
        let bytes = [0x01, 0x02, 0x03];
        let res = SlotRef::from_raw(1, &bytes);
        assert!(matches!(
            res,
            Err(SlotError::SlotSizeMismatch {
                expected_size: 4,
                actual_size: 3
            })
        ));
    }

    #[test]
    fn slot_mut_roundtrips_writes() {
        let mut bytes = [0x00, 0x00, 0x00, 0x00];
        {
            let mut slot = SlotMut::from_raw(1, &mut bytes).unwrap();
            slot.set_offset(0x0102).unwrap();
            slot.set_length(0x0304).unwrap();
            assert_eq!(slot.offset().unwrap(), 0x0102);
            assert_eq!(slot.length().unwrap(), 0x0304);
        }
        assert_eq!(bytes, [0x02, 0x01, 0x04, 0x03]);
    }

    #[test]
    fn slot_mut_handles_max_values() {
        let mut bytes = [0x00, 0x00, 0x00, 0x00];
        let mut slot = SlotMut::from_raw(7, &mut bytes).unwrap();
        slot.set_offset(u16::MAX).unwrap();
        slot.set_length(u16::MAX).unwrap();
        assert_eq!(slot.offset().unwrap(), u16::MAX);
        assert_eq!(slot.length().unwrap(), u16::MAX);
    }
}
