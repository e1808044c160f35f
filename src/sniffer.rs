//! Byte-order-mark sniffing

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::encoding::TextEncoding;
use crate::error::{Result, SplitError};

/// Number of leading bytes inspected
pub const SNIFF_LEN: usize = 4;

/// Classify a byte-order mark at the start of `bytes`
///
/// Patterns are checked in a fixed order, so `FF FE 00 00` reports
/// [`TextEncoding::Unicode`]. Returns `None` when no mark is present.
pub fn detect_bom(bytes: &[u8]) -> Option<TextEncoding> {
    if bytes.starts_with(&[0x2B, 0x2F, 0x76]) {
        return Some(TextEncoding::Utf7);
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Some(TextEncoding::Unicode);
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Some(TextEncoding::BigEndianUnicode);
    }
    if bytes.starts_with(&[0x00, 0x00, 0xFE, 0xFF]) {
        return Some(TextEncoding::Utf32);
    }
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some(TextEncoding::Utf8);
    }
    None
}

/// Guess the encoding of the file at `path` from its first bytes
///
/// Falls back to [`TextEncoding::Default`] when no byte-order mark is found.
/// Open and read failures are returned, never papered over.
pub fn sniff_encoding(path: &Path) -> Result<TextEncoding> {
    let file = File::open(path).map_err(|source| SplitError::OpenRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut head = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64)
        .read_to_end(&mut head)
        .map_err(|source| SplitError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let encoding = detect_bom(&head).unwrap_or(TextEncoding::Default);
    debug!(path = %path.display(), %encoding, "sniffed encoding");
    Ok(encoding)
}
