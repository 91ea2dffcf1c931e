//! C1: compare, measure, and validate keys.
//!
//! A key is a byte string; the on-disk representation NUL-terminates it
//! (a holdover from the original char* convention), but since every
//! record's total length is already known from its slot, packing and
//! unpacking never need to scan for that terminator — only count past it.

use std::cmp::Ordering;
use thiserror::Error;

/// Maximum packed key length, including the NUL terminator.
pub const MAX_KEY_SIZE: usize = 220;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("key of {len} packed bytes exceeds the {max}-byte maximum")]
    KeyTooLong { len: usize, max: usize },
}

/// Packed length of `key`, including its NUL terminator.
pub fn key_len(key: &[u8]) -> usize {
    key.len() + 1
}

/// Lexicographic comparison over at most `MAX_KEY_SIZE` bytes.
pub fn key_cmp(a: &[u8], b: &[u8]) -> Ordering {
    let bound = MAX_KEY_SIZE - 1;
    a[..a.len().min(bound)].cmp(&b[..b.len().min(bound)])
}

/// Rejects keys whose packed length would exceed `MAX_KEY_SIZE`.
pub fn validate_key(key: &[u8]) -> Result<(), KeyError> {
    let len = key_len(key);
    if len > MAX_KEY_SIZE {
        return Err(KeyError::KeyTooLong {
            len,
            max: MAX_KEY_SIZE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_len_counts_the_terminator() {
        assert_eq!(key_len(b"0001"), 5);
    }

    #[test]
    fn validate_rejects_oversized_keys() {
        let oversized = vec![b'a'; MAX_KEY_SIZE];
        assert_eq!(
            validate_key(&oversized),
            Err(KeyError::KeyTooLong {
                len: MAX_KEY_SIZE + 1,
                max: MAX_KEY_SIZE
            })
        );
    }

    #[test]
    fn validate_accepts_a_key_at_the_boundary() {
        let boundary = vec![b'a'; MAX_KEY_SIZE - 1];
        assert!(validate_key(&boundary).is_ok());
    }

    #[test]
    fn cmp_is_lexicographic() {
        assert_eq!(key_cmp(b"0001", b"0002"), Ordering::Less);
        assert_eq!(key_cmp(b"0002", b"0002"), Ordering::Equal);
        assert_eq!(key_cmp(b"0010", b"0002"), Ordering::Greater);
    }
}
