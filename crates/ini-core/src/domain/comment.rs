//! Trailing-comment stripping for stored values.
//!
//! Legacy INI readers hand back the raw text after `=`, comment included.
//! Consumers of this store expect the comment gone, so every value read from
//! an existing entry is passed through [`strip_comment`].
//!
//! # The rule
//!
//! 1. Truncate at the first `;`.
//! 2. Truncate what is left at the first `#`.
//! 3. Trim spaces and tabs (only those two characters) from both ends.
//!
//! The rule has no notion of quoting: `"a;b"` becomes `"a`.

/// The only characters trimmed from names and values.
const BLANKS: [char; 2] = [' ', '\t'];

/// Applies the comment rule to a raw stored value.
///
/// # Examples
///
/// ```rust
/// use ini_core::strip_comment;
///
/// assert_eq!(strip_comment("foo ; bar"), "foo");
/// assert_eq!(strip_comment("foo # bar"), "foo");
/// assert_eq!(strip_comment("  foo  "), "foo");
/// ```
pub fn strip_comment(raw: &str) -> &str {
    let mut s = raw;
    if let Some(idx) = s.find(';') {
        s = &s[..idx];
    }
    if let Some(idx) = s.find('#') {
        s = &s[..idx];
    }
    trim_blanks(s)
}

/// Trims leading and trailing spaces and tabs, leaving other whitespace alone.
pub fn trim_blanks(s: &str) -> &str {
    s.trim_matches(&BLANKS[..])
}
