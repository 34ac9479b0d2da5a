use std::fmt;
use bytes::Bytes;
use serde_json::Value;

use crate::blob::Blob;
use crate::types::BlobError;

/// One construction input.
///
/// The set of kinds is closed: each variant has exactly one normalization
/// case, resolved once when the blob is built.
#[derive(Debug, Clone)]
pub enum Fragment {
    /// Raw byte buffer, already in shared storage.
    Buffer(Bytes),
    /// Binary byte array, moved into shared storage without copying.
    Array(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// Existing blob; its segments are spliced in place.
    Blob(Blob),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Buffer,
    Array,
    Text,
    Blob,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FragmentKind::Buffer => "buffer",
            FragmentKind::Array  => "array",
            FragmentKind::Text   => "text",
            FragmentKind::Blob   => "blob",
        };
        f.write_str(name)
    }
}

impl Fragment {
    pub fn kind(&self) -> FragmentKind {
        match self {
            Fragment::Buffer(_) => FragmentKind::Buffer,
            Fragment::Array(_)  => FragmentKind::Array,
            Fragment::Text(_)   => FragmentKind::Text,
            Fragment::Blob(_)   => FragmentKind::Blob,
        }
    }

    /// Byte length this fragment contributes (text measured as UTF-8).
    pub fn len(&self) -> usize {
        match self {
            Fragment::Buffer(b) => b.len(),
            Fragment::Array(a)  => a.len(),
            Fragment::Text(t)   => t.len(),
            Fragment::Blob(b)   => b.size(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================
// Conversions
// ============================================================

impl From<Bytes> for Fragment {
    fn from(b: Bytes) -> Self {
        Fragment::Buffer(b)
    }
}

impl From<Vec<u8>> for Fragment {
    fn from(v: Vec<u8>) -> Self {
        Fragment::Array(v)
    }
}

impl From<&[u8]> for Fragment {
    fn from(s: &[u8]) -> Self {
        Fragment::Array(s.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Fragment {
    fn from(a: [u8; N]) -> Self {
        Fragment::Array(a.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Fragment {
    fn from(a: &[u8; N]) -> Self {
        Fragment::Array(a.to_vec())
    }
}

impl From<String> for Fragment {
    fn from(s: String) -> Self {
        Fragment::Text(s)
    }
}

impl From<&str> for Fragment {
    fn from(s: &str) -> Self {
        Fragment::Text(s.to_owned())
    }
}

impl From<Blob> for Fragment {
    fn from(b: Blob) -> Self {
        Fragment::Blob(b)
    }
}

impl From<&Blob> for Fragment {
    fn from(b: &Blob) -> Self {
        Fragment::Blob(b.clone())
    }
}

/// Dynamic fragments: a JSON string is text, a JSON array of integers in
/// `0..=255` is a binary array. Everything else is rejected.
impl TryFrom<&Value> for Fragment {
    type Error = BlobError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Fragment::Text(s.clone())),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let byte = item
                        .as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| BlobError::UnsupportedFragmentKind {
                            kind: format!("array element {}", json_kind(item)),
                        })?;
                    out.push(byte);
                }
                Ok(Fragment::Array(out))
            }
            other => Err(BlobError::UnsupportedFragmentKind {
                kind: json_kind(other).to_string(),
            }),
        }
    }
}

impl TryFrom<Value> for Fragment {
    type Error = BlobError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Fragment::Text(s)),
            other => Fragment::try_from(&other),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null      => "null",
        Value::Bool(_)   => "bool",
        Value::Number(n) => if n.is_u64() { "integer out of byte range" } else { "number" },
        Value::String(_) => "string",
        Value::Array(_)  => "array",
        Value::Object(_) => "object",
    }
}
