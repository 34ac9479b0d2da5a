use std::sync::Arc;
use log::trace;

use crate::blob::types::{Blob, SegmentList};
use crate::utils::resolve_range;

impl Blob {
    /// View of `[start, end)`.
    ///
    /// - omitted bounds default to `0` and `size`
    /// - negative bounds count back from `size`; all bounds clamp to `[0, size]`
    /// - the result carries no type tag
    ///
    /// No bytes are copied. A range covering the whole blob returns a blob
    /// sharing this blob's segment list.
    pub fn slice(&self, start: Option<i64>, end: Option<i64>) -> Blob {
        self.slice_with_type(start, end, "")
    }

    /// Same as [`Blob::slice`] with an explicit type tag for the result.
    pub fn slice_with_type(&self, start: Option<i64>, end: Option<i64>, content_type: &str) -> Blob {
        let size = self.size();
        let (start, end) = resolve_range(start, end, size);

        // Fast path
        if start == 0 && end == size {
            trace!("[SLICE] full range, sharing {} segments", self.segment_count());
            return Blob::from_list(self.list.clone(), content_type);
        }

        if start >= end {
            trace!("[SLICE] empty range {}..{} of {}", start, end, size);
            return Blob::from_list(Arc::new(SegmentList::default()), content_type);
        }

        let list = &self.list;
        let first = list.first_overlapping(start);
        let mut pos = list.start_of(first);
        let mut out = Vec::new();

        for seg in &list.segments[first..] {
            if pos >= end {
                break;
            }
            let seg_end = pos + seg.len();
            let lo = start.saturating_sub(pos);
            let hi = end.min(seg_end) - pos;
            out.push(seg.narrow(lo, hi));
            pos = seg_end;
        }

        trace!("[SLICE] {}..{} of {} -> {} segments", start, end, size, out.len());
        Blob::from_list(Arc::new(SegmentList::new(out)), content_type)
    }
}

#[cfg(test)]
mod tests {
    use crate::blob::{Blob, BlobOptions};

    fn collect(blob: &Blob) -> Vec<u8> {
        blob.segments().iter().flat_map(|s| s.as_slice().to_vec()).collect()
    }

    #[test]
    fn slice_spanning_segments() {
        let blob = Blob::from_parts(["abc", "def", "ghi"]);
        let view = blob.slice(Some(2), Some(7));
        assert_eq!(collect(&view), b"cdefg");
        assert_eq!(view.segment_count(), 3);
        assert_eq!(view.size(), 5);
        assert!(view.segments()[0].shares_storage_with(&blob.segments()[0]));
    }

    #[test]
    fn slice_inside_single_segment() {
        let blob = Blob::from_parts(["abc", "defgh", "ij"]);
        let view = blob.slice(Some(4), Some(6));
        assert_eq!(collect(&view), b"ef");
        assert_eq!(view.segment_count(), 1);
        assert_eq!(view.segments()[0].offset(), 1);
    }

    #[test]
    fn slice_on_segment_boundaries() {
        let blob = Blob::from_parts(["abc", "def", "ghi"]);
        let view = blob.slice(Some(3), Some(6));
        assert_eq!(collect(&view), b"def");
        assert_eq!(view.segment_count(), 1);
    }

    #[test]
    fn full_range_shares_list_and_drops_type() {
        let blob = Blob::new(["abc", "def"], BlobOptions::with_type("text/plain"));
        let a = blob.slice(None, None);
        let b = blob.slice(Some(0), Some(blob.size() as i64));
        let c = blob.slice(Some(-100), Some(100));
        for view in [&a, &b, &c] {
            assert!(view.shares_segments_with(&blob));
            assert_eq!(view.content_type(), "");
        }
    }

    #[test]
    fn inverted_and_empty_ranges() {
        let blob = Blob::from_parts(["abcdef"]);
        for (s, e) in [(Some(4), Some(2)), (Some(3), Some(3)), (Some(-1), Some(-2)), (Some(10), None)] {
            let view = blob.slice(s, e);
            assert_eq!(view.size(), 0);
            assert_eq!(view.segment_count(), 0);
        }
    }

    #[test]
    fn explicit_type_on_slice() {
        let blob = Blob::new(["test"], BlobOptions::with_type("text/plain"));
        assert_eq!(blob.slice(Some(0), Some(2)).content_type(), "");
        assert_eq!(blob.slice_with_type(Some(0), Some(2), "Custom/Type").content_type(), "Custom/Type");
    }

    #[test]
    fn nested_slices_narrow_the_same_storage() {
        let blob = Blob::from_parts([vec![0u8; 100]]);
        let outer = blob.slice(Some(10), Some(90));
        let inner = outer.slice(Some(10), Some(-10));
        assert_eq!(inner.size(), 60);
        assert_eq!(inner.segments()[0].offset(), 20);
        assert!(inner.segments()[0].shares_storage_with(&blob.segments()[0]));
    }
}
