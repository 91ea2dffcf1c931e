//! C1: packing and unpacking `(key, payload)` entries.
//!
//! The payload is a child `PageId` on index pages, a [`RecordId`] on leaf
//! pages. Entries are packed back to back with no alignment padding: key
//! bytes, a single NUL terminator, then the fixed-width payload.

use crate::key::{key_len, validate_key};
use binary_helpers::le::{read_le, write_le};
use page::page_id::{FileId, PageId};
use page::page_type::PageType;
use std::fmt;

/// Sentinel slot number meaning "no slot", mirroring `PageId::invalid`.
pub const INVALID_SLOT: u32 = u32::MAX;

/// Identifies one record in a data file external to the index: the page
/// holding it and its slot number. The index never interprets this value,
/// only stores and returns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId {
    pub page_id: PageId,
    pub slot: u32,
}

impl RecordId {
    pub fn new(page_id: PageId, slot: u32) -> Self {
        Self { page_id, slot }
    }

    /// The "no record" sentinel returned past the end of a leaf's entries.
    pub fn invalid(file_id: FileId) -> Self {
        Self {
            page_id: PageId::invalid(file_id),
            slot: INVALID_SLOT,
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.page_id.is_invalid() && self.slot == INVALID_SLOT
    }

    const PACKED_SIZE: usize = 12;

    fn pack(&self, out: &mut Vec<u8>) {
        let mut buf = [0u8; Self::PACKED_SIZE];
        write_le::<u32>(&mut buf, 0, self.page_id.file_id).expect("fixed-size buffer");
        write_le::<u32>(&mut buf, 4, self.page_id.page_number).expect("fixed-size buffer");
        write_le::<u32>(&mut buf, 8, self.slot).expect("fixed-size buffer");
        out.extend_from_slice(&buf);
    }

    fn unpack(bytes: &[u8]) -> Self {
        let file_id = read_le::<u32>(bytes, 0).expect("payload-sized slice");
        let page_number = read_le::<u32>(bytes, 4).expect("payload-sized slice");
        let slot = read_le::<u32>(bytes, 8).expect("payload-sized slice");
        Self {
            page_id: PageId::new(file_id, page_number),
            slot,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.page_id, self.slot)
    }
}

fn pack_page_id(page_id: PageId, out: &mut Vec<u8>) {
    let mut buf = [0u8; PageId::PACKED_SIZE];
    write_le::<u32>(&mut buf, 0, page_id.file_id).expect("fixed-size buffer");
    write_le::<u32>(&mut buf, 4, page_id.page_number).expect("fixed-size buffer");
    out.extend_from_slice(&buf);
}

fn unpack_page_id(bytes: &[u8]) -> PageId {
    let file_id = read_le::<u32>(bytes, 0).expect("payload-sized slice");
    let page_number = read_le::<u32>(bytes, 4).expect("payload-sized slice");
    PageId::new(file_id, page_number)
}

trait PackedSize {
    const PACKED_SIZE: usize;
}

impl PackedSize for PageId {
    const PACKED_SIZE: usize = 8;
}

/// Packed length of the payload carried by an entry on `node_type` pages.
pub fn payload_size(node_type: PageType) -> usize {
    match node_type {
        PageType::Leaf => RecordId::PACKED_SIZE,
        PageType::Index => PageId::PACKED_SIZE,
        PageType::Header => 0,
    }
}

/// `EntryLen(k, nodeType)`.
pub fn entry_len(key: &[u8], node_type: PageType) -> usize {
    key_len(key) + payload_size(node_type)
}

/// Packs a leaf `(key, dataRid)` entry.
pub fn pack_leaf_entry(key: &[u8], rid: RecordId) -> Result<Vec<u8>, crate::key::KeyError> {
    validate_key(key)?;
    let mut bytes = Vec::with_capacity(entry_len(key, PageType::Leaf));
    bytes.extend_from_slice(key);
    bytes.push(0);
    rid.pack(&mut bytes);
    Ok(bytes)
}

/// Unpacks a leaf entry's bytes into `(key, dataRid)`.
pub fn unpack_leaf_entry(bytes: &[u8]) -> (&[u8], RecordId) {
    let key_end = bytes.len() - RecordId::PACKED_SIZE - 1;
    let key = &bytes[..key_end];
    let rid = RecordId::unpack(&bytes[key_end + 1..]);
    (key, rid)
}

/// Packs an index `(key, childPid)` entry.
pub fn pack_index_entry(key: &[u8], child: PageId) -> Result<Vec<u8>, crate::key::KeyError> {
    validate_key(key)?;
    let mut bytes = Vec::with_capacity(entry_len(key, PageType::Index));
    bytes.extend_from_slice(key);
    bytes.push(0);
    pack_page_id(child, &mut bytes);
    Ok(bytes)
}

/// Unpacks an index entry's bytes into `(key, childPid)`.
pub fn unpack_index_entry(bytes: &[u8]) -> (&[u8], PageId) {
    let key_end = bytes.len() - PageId::PACKED_SIZE - 1;
    let key = &bytes[..key_end];
    let child = unpack_page_id(&bytes[key_end + 1..]);
    (key, child)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_entry_round_trips() {
        let rid = RecordId::new(PageId::new(0, 7), 3);
        let packed = pack_leaf_entry(b"0042", rid).unwrap();
        let (key, unpacked_rid) = unpack_leaf_entry(&packed);
        assert_eq!(key, b"0042");
        assert_eq!(unpacked_rid, rid);
    }

    #[test]
    fn index_entry_round_trips() {
        let child = PageId::new(0, 11);
        let packed = pack_index_entry(b"0100", child).unwrap();
        let (key, unpacked_child) = unpack_index_entry(&packed);
        assert_eq!(key, b"0100");
        assert_eq!(unpacked_child, child);
    }

    #[test]
    fn pack_rejects_oversized_keys() {
        let oversized = vec![b'x'; crate::key::MAX_KEY_SIZE];
        let rid = RecordId::new(PageId::new(0, 0), 0);
        assert!(pack_leaf_entry(&oversized, rid).is_err());
    }
}
