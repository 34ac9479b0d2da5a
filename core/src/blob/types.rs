use std::fmt;
use std::sync::Arc;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blob::BlobCursor;
use crate::fragment::{normalize, Fragment};
use crate::materialize::{BlobStream, Materializer};
use crate::segment::Segment;
use crate::types::Result;
use crate::utils::hex_preview;

/// How newlines inside text fragments are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEndings {
    /// Text is stored byte-for-byte.
    #[default]
    Transparent,
    /// `\r\n`, `\r` and `\n` become the platform newline.
    Native,
}

/// Construction options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobOptions {
    /// Opaque type tag, stored verbatim.
    #[serde(rename = "type")]
    pub content_type: String,
    pub endings: LineEndings,
}

impl BlobOptions {
    pub fn with_type(content_type: impl Into<String>) -> Self {
        Self { content_type: content_type.into(), ..Self::default() }
    }

    pub fn endings(mut self, endings: LineEndings) -> Self {
        self.endings = endings;
        self
    }
}

/// Ordered segments plus cumulative end offsets.
///
/// `ends[i]` is the blob offset one past the last byte of `segments[i]`, so
/// the first segment overlapping a position is found by binary search.
#[derive(Debug, Default)]
pub(crate) struct SegmentList {
    pub(crate) segments: Vec<Segment>,
    pub(crate) ends: Vec<usize>,
}

impl SegmentList {
    pub(crate) fn new(segments: Vec<Segment>) -> Self {
        let mut ends = Vec::with_capacity(segments.len());
        let mut acc = 0usize;
        for seg in &segments {
            acc += seg.len();
            ends.push(acc);
        }
        SegmentList { segments, ends }
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Index of the first segment containing a byte at or after `pos`.
    #[inline]
    pub(crate) fn first_overlapping(&self, pos: usize) -> usize {
        self.ends.partition_point(|&end| end <= pos)
    }

    /// Blob offset of the first byte of segment `index`.
    #[inline]
    pub(crate) fn start_of(&self, index: usize) -> usize {
        if index == 0 { 0 } else { self.ends[index - 1] }
    }
}

/// Immutable aggregation of byte segments with a cached size and type tag.
///
/// Cloning is O(1): clones share the same segment list.
#[derive(Clone)]
pub struct Blob {
    pub(crate) list: Arc<SegmentList>,
    pub(crate) content_type: Arc<str>,
}

impl Blob {
    /// Build a blob from fragments. Normalization runs exactly once.
    pub fn new<I, F>(fragments: I, options: BlobOptions) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment>,
    {
        let normalized = normalize(fragments.into_iter().map(Into::into), options.endings);
        let list = SegmentList::new(normalized.segments);
        debug_assert_eq!(list.size(), normalized.size);

        Blob {
            list: Arc::new(list),
            content_type: Arc::from(options.content_type),
        }
    }

    /// Build a blob with default options.
    pub fn from_parts<I, F>(fragments: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Fragment>,
    {
        Self::new(fragments, BlobOptions::default())
    }

    /// Build a blob from dynamically typed fragments.
    ///
    /// Every value is checked before anything is built; the first unsupported
    /// value aborts construction with `UnsupportedFragmentKind`.
    pub fn from_json_parts<'a, I>(values: I, options: BlobOptions) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let fragments = values
            .into_iter()
            .map(Fragment::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(fragments, options))
    }

    /// Blob with no segments.
    pub fn empty() -> Self {
        Self::from_list(Arc::new(SegmentList::default()), "")
    }

    pub(crate) fn from_list(list: Arc<SegmentList>, content_type: &str) -> Self {
        Blob { list, content_type: Arc::from(content_type) }
    }

    /// Total byte length. O(1).
    #[inline]
    pub fn size(&self) -> usize {
        self.list.size()
    }

    /// Type tag as supplied at construction (empty when none).
    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn segment_count(&self) -> usize {
        self.list.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.list.segments
    }

    /// True when both blobs hold the very same segment list object.
    pub fn shares_segments_with(&self, other: &Blob) -> bool {
        Arc::ptr_eq(&self.list, &other.list)
    }

    /// Synchronous `bytes::Buf` cursor over the blob's segments.
    pub fn cursor(&self) -> BlobCursor {
        BlobCursor::new(self.list.clone())
    }

    /// Copy into one contiguous buffer.
    pub async fn array_buffer(&self) -> Result<Bytes> {
        Materializer::default().to_buffer(self).await
    }

    /// Copy and decode as UTF-8, replacing invalid sequences with U+FFFD.
    pub async fn text(&self) -> Result<String> {
        Materializer::default().to_text(self).await
    }

    /// Fresh single-pass chunk stream.
    pub fn stream(&self) -> BlobStream {
        Materializer::default().to_stream(self)
    }

    /// Produce a concise debug summary of the blob
    pub fn summary(&self) -> String {
        let head = self
            .segments()
            .first()
            .map(|s| hex_preview(s.as_slice()))
            .unwrap_or_default();
        format!(
            "Blob {{ size: {}, type: {:?}, segments: {}, head: {} }}",
            self.size(),
            self.content_type(),
            self.segment_count(),
            head,
        )
    }
}

impl Default for Blob {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
