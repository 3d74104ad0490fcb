//! Best-effort PDF metadata extraction.
//!
//! The extractor is a black box to the rest of the system: it takes raw
//! file bytes and returns a [`DocumentMetadata`], and it **never fails** —
//! malformed or non-PDF input yields empty string fields and a zero page
//! count, so the hash engine always has a canonicalizable input.
//!
//! The implementation is a byte-level scan of the document Info dictionary
//! (`/Title`, `/Author`, `/Subject`, `/Producer` literal strings) plus a
//! count of `/Type /Page` objects. It makes no attempt to resolve object
//! streams or encrypted documents; whatever cannot be read comes back
//! empty, which is exactly what the determinism contract requires.

use crate::models::DocumentMetadata;

/// Upper bound on an extracted string value, in bytes.
const MAX_VALUE_LEN: usize = 1024;

/// Extract document metadata from raw file bytes.
///
/// Never fails: anything unreadable is reported as empty. The result feeds
/// directly into core-hash canonicalization, so the same bytes always
/// produce the same metadata.
pub fn extract_metadata(bytes: &[u8]) -> DocumentMetadata {
    if !bytes.starts_with(b"%PDF-") {
        return DocumentMetadata::default();
    }

    DocumentMetadata {
        title: info_text(bytes, b"/Title"),
        author: info_text(bytes, b"/Author"),
        subject: info_text(bytes, b"/Subject"),
        producer: info_text(bytes, b"/Producer"),
        num_pages: count_page_objects(bytes),
    }
}

/// Find the first occurrence of `needle` in `haystack`.
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Read the literal-string value following an Info dictionary key.
///
/// Handles balanced parentheses and backslash escapes per the PDF string
/// syntax; hex strings and indirect references are out of scope and come
/// back empty.
fn info_text(data: &[u8], key: &[u8]) -> String {
    let Some(pos) = find(data, key) else {
        return String::new();
    };

    let mut i = pos + key.len();
    while i < data.len() && data[i].is_ascii_whitespace() {
        i += 1;
    }
    if data.get(i) != Some(&b'(') {
        return String::new();
    }
    i += 1;

    let mut depth = 1usize;
    let mut out: Vec<u8> = Vec::new();
    while i < data.len() && out.len() < MAX_VALUE_LEN {
        match data[i] {
            b'\\' => {
                let Some(&escaped) = data.get(i + 1) else {
                    break;
                };
                out.push(unescape(escaped));
                i += 2;
            }
            b'(' => {
                depth += 1;
                out.push(b'(');
                i += 1;
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return String::from_utf8_lossy(&out).into_owned();
                }
                out.push(b')');
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    // Unterminated string
    String::new()
}

/// Map a PDF string escape character to its byte value.
fn unescape(c: u8) -> u8 {
    match c {
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        b'b' => 0x08,
        b'f' => 0x0c,
        other => other,
    }
}

/// Count `/Type /Page` objects, excluding the `/Pages` tree nodes.
fn count_page_objects(data: &[u8]) -> u32 {
    let mut count = 0u32;
    let mut offset = 0usize;
    let needle = b"/Type";

    while let Some(pos) = find(&data[offset..], needle) {
        let mut i = offset + pos + needle.len();
        while i < data.len() && data[i].is_ascii_whitespace() {
            i += 1;
        }
        if data[i..].starts_with(b"/Page") {
            // `/Page` must end there; a following name character means
            // `/Pages` or some other name.
            let next = data.get(i + 5);
            if !matches!(next, Some(c) if c.is_ascii_alphanumeric()) {
                count += 1;
            }
        }
        offset += pos + needle.len();
    }

    count
}
