//! Byte-safe string transform for chunking.
//!
//! Host entry caps are measured in bytes, so a naive split could cut a
//! multi-byte UTF-8 character in half. Strings are therefore stored in a
//! percent-escaped form where every char is exactly one byte, and windows
//! never split an escape triplet. The transform is reversed only after all
//! chunks have been reassembled on read.

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-escape every non-ASCII byte (and `%` itself) as `%XX`.
/// The result is pure ASCII: one char, one byte.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if b < 0x80 && b != b'%' {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0f) as usize] as char);
        }
    }
    out
}

/// Reverse [escape]. Lenient by design: a `%` not followed by two hex digits
/// is kept literally, and byte sequences that do not decode as UTF-8 decode
/// lossily, so foreign strings never error.
pub(crate) fn unescape(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

/// Lazily segments an escaped (pure-ASCII) string into windows of at most
/// `window` bytes, backing off at a boundary that would split a `%XX`
/// triplet. Produces one chunk at a time; nothing is buffered.
pub(crate) struct SegmentIter<'a> {
    rest: &'a str,
    window: usize,
}

impl<'a> SegmentIter<'a> {
    pub(crate) fn new(escaped: &'a str, window: usize) -> Self {
        // a window smaller than one triplet cannot make progress
        Self {
            rest: escaped,
            window: window.max(3),
        }
    }
}

impl<'a> Iterator for SegmentIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let mut end = self.window.min(self.rest.len());
        if end < self.rest.len() {
            let bytes = self.rest.as_bytes();
            if bytes[end - 1] == b'%' {
                end -= 1;
            } else if end >= 2 && bytes[end - 2] == b'%' {
                end -= 2;
            }
        }
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}
