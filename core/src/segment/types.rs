use std::fmt;
use std::ops::Range;
use bytes::Bytes;

use crate::utils::hex_preview;

/// Zero-copy view into a shared, immutable storage block.
///
/// Every segment narrowed from the same fragment holds a clone of the same
/// `Bytes` owner, so the storage lives as long as the longest-lived segment.
#[derive(Clone, PartialEq, Eq)]
pub struct Segment {
    owner: Bytes,
    offset: usize,
    len: usize,
}

impl Segment {
    /// Segment spanning the whole of `owner`.
    pub fn new(owner: Bytes) -> Self {
        let len = owner.len();
        Segment { owner, offset: 0, len }
    }

    /// Segment over `owner[offset..offset + len]`.
    ///
    /// Returns `None` when the bounds fall outside the owner.
    pub fn with_bounds(owner: Bytes, offset: usize, len: usize) -> Option<Self> {
        let end = offset.checked_add(len)?;
        if end > owner.len() {
            return None;
        }
        Some(Segment { owner, offset, len })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offset of this view inside its owner.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Borrow the viewed bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.owner[self.range()]
    }

    /// Shared handle to the viewed bytes (refcount bump, no copy).
    pub fn bytes(&self) -> Bytes {
        self.owner.slice(self.range())
    }

    /// Narrow to `[start, end)` relative to this segment.
    ///
    /// Callers guarantee `start <= end <= self.len()`.
    pub fn narrow(&self, start: usize, end: usize) -> Segment {
        debug_assert!(start <= end && end <= self.len, "narrow out of bounds");
        Segment {
            owner: self.owner.clone(),
            offset: self.offset + start,
            len: end - start,
        }
    }

    /// True when both segments reference the same storage block.
    pub fn shares_storage_with(&self, other: &Segment) -> bool {
        self.owner.as_ptr() == other.owner.as_ptr() && self.owner.len() == other.owner.len()
    }

    /// Produce a concise debug summary of the segment
    pub fn summary(&self) -> String {
        format!(
            "Segment {{ offset: {}, len: {}, owner_len: {}, head: {} }}",
            self.offset,
            self.len,
            self.owner.len(),
            hex_preview(self.as_slice()),
        )
    }

    #[inline]
    fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

impl AsRef<[u8]> for Segment {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
