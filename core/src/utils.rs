use crate::constants::{NATIVE_NEWLINE, PREVIEW_LEN};

/// Resolve a possibly negative index against `size`.
///
/// Negative values count back from the end (`size + value`); the result is
/// clamped to `[0, size]`.
pub fn resolve_index(value: i64, size: usize) -> usize {
    if value < 0 {
        let back = value.unsigned_abs();
        (size as u64).saturating_sub(back) as usize
    } else {
        (value as u64).min(size as u64) as usize
    }
}

/// Resolve an optional `[start, end)` pair into clamped absolute bounds.
pub fn resolve_range(start: Option<i64>, end: Option<i64>, size: usize) -> (usize, usize) {
    let start = start.map_or(0, |s| resolve_index(s, size));
    let end = end.map_or(size, |e| resolve_index(e, size));
    (start, end)
}

/// Short hex preview of the leading bytes, used by summaries.
pub fn hex_preview(data: &[u8]) -> String {
    let n = data.len().min(PREVIEW_LEN);
    let mut out = hex::encode(&data[..n]);
    if data.len() > n {
        out.push_str("..");
    }
    out
}

/// Rewrite every `\r\n`, lone `\r` and lone `\n` as the platform newline.
pub fn to_native_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str(NATIVE_NEWLINE);
            }
            '\n' => out.push_str(NATIVE_NEWLINE),
            other => out.push(other),
        }
    }
    out
}
