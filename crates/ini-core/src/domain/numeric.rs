//! Legacy integer and boolean parsing for profile values.
//!
//! Old profile readers convert values with C-style rules: an optional sign,
//! a `0x` prefix for hexadecimal, then as many digits as are present.
//! Anything after the digits is ignored, so `"10 ; ten"` and `"10px"` both
//! read as 10.  The typed getters on [`crate::ConfigStore`] are built on
//! these functions.

use crate::domain::comment::trim_blanks;

/// Parses a value with legacy profile-integer rules.
///
/// Returns `None` when the text contains no leading digits.  Magnitudes that
/// do not fit in an `i64` saturate at the nearest bound.
///
/// # Examples
///
/// ```rust
/// use ini_core::domain::numeric::parse_profile_int;
///
/// assert_eq!(parse_profile_int("42"), Some(42));
/// assert_eq!(parse_profile_int("0x045E"), Some(0x045E));
/// assert_eq!(parse_profile_int("-7 apples"), Some(-7));
/// assert_eq!(parse_profile_int("apples"), None);
/// ```
pub fn parse_profile_int(raw: &str) -> Option<i64> {
    let s = trim_blanks(raw);

    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match s.get(..2) {
        Some("0x") | Some("0X") => (16, &s[2..]),
        _ => (10, s),
    };

    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        // A bare "0x" still read as zero in the legacy reader.
        return if radix == 16 { Some(0) } else { None };
    }

    let magnitude = match u128::from_str_radix(&digits[..end], radix) {
        Ok(m) => m.min(i64::MAX as u128 + 1) as i128,
        // More digits than u128 can hold: saturate.
        Err(_) => i64::MAX as i128 + 1,
    };
    let value = if negative { -magnitude } else { magnitude };
    Some(value.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
}

/// Parses a value as a legacy 32-bit DWORD.
///
/// Values are truncated to their low 32 bits, so `-1` becomes `0xFFFF_FFFF`.
pub fn parse_profile_dword(raw: &str) -> Option<u32> {
    parse_profile_int(raw).map(|v| v as u32)
}

/// Parses a value as a boolean.
///
/// Integers are true iff non-zero.  The words `true`/`yes`/`on` and
/// `false`/`no`/`off` are accepted in any case.  Anything else is `None`.
pub fn parse_profile_bool(raw: &str) -> Option<bool> {
    if let Some(n) = parse_profile_int(raw) {
        return Some(n != 0);
    }
    let word = trim_blanks(raw);
    if ["true", "yes", "on"].iter().any(|w| word.eq_ignore_ascii_case(w)) {
        Some(true)
    } else if ["false", "no", "off"].iter().any(|w| word.eq_ignore_ascii_case(w)) {
        Some(false)
    } else {
        None
    }
}
