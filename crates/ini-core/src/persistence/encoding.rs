//! Byte-level text encodings for profile files.
//!
//! Legacy profile files are UTF-16 little-endian with a byte-order mark
//! (BOM).  Hand-edited files are often UTF-8 instead, so reading detects the
//! encoding from the bytes while writing uses whatever the backend is
//! configured with.
//!
//! # Detection order
//!
//! | Leading bytes | Encoding  |
//! |---------------|-----------|
//! | `FF FE`       | UTF-16LE  |
//! | `FE FF`       | UTF-16BE  |
//! | `EF BB BF`    | UTF-8     |
//! | none, even length, contains NUL | UTF-16 (LE, or BE if NULs lead each pair) |
//! | anything else | UTF-8     |
//!
//! Decoding is lossy: invalid sequences become U+FFFD rather than errors.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const BOM_UTF16LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF16BE: &[u8] = &[0xFE, 0xFF];
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Text encoding of a profile file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextEncoding {
    /// UTF-16 little-endian with BOM.  The legacy default.
    #[default]
    Utf16Le,
    /// UTF-16 big-endian with BOM.
    Utf16Be,
    /// UTF-8 without BOM.
    Utf8,
}

/// Returned when an encoding name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown text encoding '{0}' (expected utf16le, utf16be or utf8)")]
pub struct UnknownEncoding(pub String);

impl TextEncoding {
    /// Encodes `text`, prefixed with the BOM for UTF-16 variants.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => text.as_bytes().to_vec(),
            TextEncoding::Utf16Le => {
                let mut out = Vec::with_capacity(BOM_UTF16LE.len() + text.len() * 2);
                out.extend_from_slice(BOM_UTF16LE);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                out
            }
            TextEncoding::Utf16Be => {
                let mut out = Vec::with_capacity(BOM_UTF16BE.len() + text.len() * 2);
                out.extend_from_slice(BOM_UTF16BE);
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
                out
            }
        }
    }

    /// Detects the encoding of `bytes` and decodes them.
    ///
    /// Returns the decoded text (BOM removed) and the detected encoding.
    pub fn decode(bytes: &[u8]) -> (String, TextEncoding) {
        if let Some(body) = bytes.strip_prefix(BOM_UTF16LE) {
            return (decode_utf16(body, u16::from_le_bytes), TextEncoding::Utf16Le);
        }
        if let Some(body) = bytes.strip_prefix(BOM_UTF16BE) {
            return (decode_utf16(body, u16::from_be_bytes), TextEncoding::Utf16Be);
        }
        if let Some(body) = bytes.strip_prefix(BOM_UTF8) {
            return (String::from_utf8_lossy(body).into_owned(), TextEncoding::Utf8);
        }

        match sniff_utf16(bytes) {
            Some(TextEncoding::Utf16Le) => {
                (decode_utf16(bytes, u16::from_le_bytes), TextEncoding::Utf16Le)
            }
            Some(TextEncoding::Utf16Be) => {
                (decode_utf16(bytes, u16::from_be_bytes), TextEncoding::Utf16Be)
            }
            _ => (String::from_utf8_lossy(bytes).into_owned(), TextEncoding::Utf8),
        }
    }

    /// Canonical lower-case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf16Le => "utf16le",
            TextEncoding::Utf16Be => "utf16be",
            TextEncoding::Utf8 => "utf8",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "utf16le" | "utf16" | "unicode" => Ok(TextEncoding::Utf16Le),
            "utf16be" => Ok(TextEncoding::Utf16Be),
            "utf8" => Ok(TextEncoding::Utf8),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

/// Guesses UTF-16 for BOM-less input by looking at where NUL bytes sit.
fn sniff_utf16(bytes: &[u8]) -> Option<TextEncoding> {
    if bytes.is_empty() || bytes.len() % 2 != 0 {
        return None;
    }
    let (mut even_nuls, mut odd_nuls) = (0usize, 0usize);
    for pair in bytes.chunks_exact(2) {
        if pair[0] == 0 {
            even_nuls += 1;
        }
        if pair[1] == 0 {
            odd_nuls += 1;
        }
    }
    match (even_nuls, odd_nuls) {
        (0, 0) => None,
        (e, o) if o >= e => Some(TextEncoding::Utf16Le),
        _ => Some(TextEncoding::Utf16Be),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
