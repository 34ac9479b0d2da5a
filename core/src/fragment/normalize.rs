use bytes::Bytes;
use log::trace;

use crate::blob::LineEndings;
use crate::fragment::Fragment;
use crate::segment::Segment;
use crate::utils::to_native_line_endings;

/// Output of normalization: ordered segments and their total length.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub segments: Vec<Segment>,
    pub size: usize,
}

impl Normalized {
    fn push(&mut self, segment: Segment) {
        if segment.is_empty() {
            return;
        }
        self.size += segment.len();
        self.segments.push(segment);
    }
}

/// Convert fragments into an ordered, flattened segment list.
///
/// - zero-length fragments of any kind are dropped
/// - nested blobs contribute their own segments in place
/// - input order is preserved
pub fn normalize<I>(fragments: I, endings: LineEndings) -> Normalized
where
    I: IntoIterator<Item = Fragment>,
{
    let mut out = Normalized::default();

    for fragment in fragments {
        match fragment {
            Fragment::Buffer(b) => out.push(Segment::new(b)),
            Fragment::Array(v) => out.push(Segment::new(Bytes::from(v))),
            Fragment::Text(t) => {
                let t = match endings {
                    LineEndings::Transparent => t,
                    LineEndings::Native => to_native_line_endings(&t),
                };
                out.push(Segment::new(Bytes::from(t.into_bytes())));
            }
            Fragment::Blob(blob) => {
                for seg in blob.segments() {
                    out.push(seg.clone());
                }
            }
        }
    }

    trace!(
        "[NORMALIZE] {} segments, {} bytes",
        out.segments.len(),
        out.size
    );
    out
}
