//! Describes where a new row will land in a page before it is written.
//!
//! Computing a plan separately from performing the insert lets a caller
//! check whether a row fits (and see if compaction is required) without
//! committing to the mutation.

/// Where the row's bytes will be copied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionOffset {
    /// The row will land at `free_start` after the page is compacted first.
    AfterCompactionFreeStart,
    /// The row will land at this exact byte offset, no compaction needed.
    Exact(usize),
}

/// Which slot directory entry will point at the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionSlot {
    /// A brand new slot must be appended to the slot array.
    New,
    /// An existing, currently-invalid slot will be reused.
    Reuse(usize),
}

/// A fully resolved plan for inserting one row into a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPlan {
    pub slot: InsertionSlot,
    pub offset: InsertionOffset,
}
