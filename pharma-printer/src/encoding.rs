//! Windows-1256 encoding utilities for Arabic thermal printers
//!
//! Arabic-capable thermal printers expose the WPC1256 code page, where
//! every character is a single byte. This module provides:
//! - Display widths (one column per character)
//! - Truncating/padding strings to a column width
//! - Converting UTF-8 to Windows-1256 while preserving ESC/POS commands

use encoding_rs::WINDOWS_1256;
use tracing::instrument;

/// Replacement byte for characters the code page cannot represent
const REPLACEMENT: u8 = b'?';

/// Column width of a string on a single-byte code page printer
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to at most `max_width` columns
pub fn truncate_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad a string to exactly `width` columns
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_width(s: &str, width: usize, align_right: bool) -> String {
    let current = text_width(s);
    if current >= width {
        return truncate_width(s, width);
    }
    let spaces = " ".repeat(width - current);
    if align_right {
        format!("{spaces}{s}")
    } else {
        format!("{s}{spaces}")
    }
}

/// Encode text as Windows-1256, one byte per character
///
/// Characters outside the code page become `?`.
pub fn encode_cp1256(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for c in s.chars() {
        let (bytes, _, had_errors) = WINDOWS_1256.encode(c.encode_utf8(&mut buf));
        if had_errors {
            out.push(REPLACEMENT);
        } else {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

/// Convert mixed UTF-8 content (with ESC/POS commands) to Windows-1256
///
/// ASCII bytes (0x00-0x7F) pass through untouched so command sequences
/// survive. Runs of non-ASCII bytes are decoded as UTF-8 and re-encoded.
/// The code page is selected at the start and again after every
/// INIT command (ESC @), which resets it.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn encode_escpos(bytes: &[u8], code_page: u8) -> Vec<u8> {
    let select = [0x1B, 0x74, code_page];
    let mut result = Vec::with_capacity(bytes.len() + select.len());
    result.extend_from_slice(&select);

    let mut pending = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b == 0x1B && bytes.get(i + 1) == Some(&0x40) {
            flush(&mut pending, &mut result);
            result.extend_from_slice(&[0x1B, 0x40]);
            result.extend_from_slice(&select);
            i += 2;
            continue;
        }

        if b < 0x80 {
            flush(&mut pending, &mut result);
            result.push(b);
        } else {
            pending.push(b);
        }
        i += 1;
    }

    flush(&mut pending, &mut result);
    result
}

fn flush(pending: &mut Vec<u8>, result: &mut Vec<u8>) {
    if pending.is_empty() {
        return;
    }
    let text = String::from_utf8_lossy(pending);
    result.extend_from_slice(&encode_cp1256(&text));
    pending.clear();
}
