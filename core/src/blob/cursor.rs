use std::sync::Arc;
use bytes::{Buf, Bytes, BytesMut};

use crate::blob::types::SegmentList;

/// Forward-only synchronous reader over a blob's segments.
///
/// `chunk()` borrows straight from segment storage, so reading through the
/// cursor never allocates. Wrap with [`Buf::reader`] for `std::io::Read`.
#[derive(Debug, Clone)]
pub struct BlobCursor {
    list: Arc<SegmentList>,
    index: usize,
    offset: usize,
    remaining: usize,
}

impl BlobCursor {
    pub(crate) fn new(list: Arc<SegmentList>) -> Self {
        let remaining = list.size();
        BlobCursor { list, index: 0, offset: 0, remaining }
    }

    /// Bytes already consumed.
    pub fn position(&self) -> usize {
        self.list.size() - self.remaining
    }
}

impl Buf for BlobCursor {
    fn remaining(&self) -> usize {
        self.remaining
    }

    fn chunk(&self) -> &[u8] {
        match self.list.segments.get(self.index) {
            Some(seg) => &seg.as_slice()[self.offset..],
            None => &[],
        }
    }

    fn advance(&mut self, mut cnt: usize) {
        assert!(
            cnt <= self.remaining,
            "cannot advance past end: {} > {}",
            cnt,
            self.remaining
        );
        self.remaining -= cnt;

        while cnt > 0 {
            let left = self.list.segments[self.index].len() - self.offset;
            if cnt < left {
                self.offset += cnt;
                return;
            }
            cnt -= left;
            self.index += 1;
            self.offset = 0;
        }
    }

    fn copy_to_bytes(&mut self, len: usize) -> Bytes {
        // Zero-copy when the request stays inside the current segment.
        if let Some(seg) = self.list.segments.get(self.index) {
            if self.offset + len <= seg.len() {
                let out = seg.bytes().slice(self.offset..self.offset + len);
                self.advance(len);
                return out;
            }
        }

        assert!(len <= self.remaining, "copy_to_bytes out of range");
        let mut out = BytesMut::with_capacity(len);
        while out.len() < len {
            let chunk = self.chunk();
            let n = chunk.len().min(len - out.len());
            out.extend_from_slice(&chunk[..n]);
            self.advance(n);
        }
        out.freeze()
    }
}
