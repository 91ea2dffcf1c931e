//! Little-endian binary primitives shared by the storage crates.
//!
//! This crate knows nothing about pages, keys, or trees — only how to read
//! and write fixed-width integers inside a byte slice, and how to narrow a
//! `usize` into the smaller integer types those on-disk layouts use.

pub mod bin_error;
pub mod conversions;
pub mod le;
