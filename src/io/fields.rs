//! Fixed-width field codec
//!
//! Pure, total helpers for encoding and decoding the fields of a 94-character
//! ACH record. Encoding never fails: values that do not fit are truncated and
//! short values are padded. Whether a value is *correct* is a separate,
//! later question answered by the `is_*` predicates and the records'
//! `validate` methods.
//!
//! # Padding rules
//!
//! | Helper | Justification | Pad | Overflow keeps |
//! |---|---|---|---|
//! | [`alpha_field`] | left | spaces | leading characters |
//! | [`numeric_field`] | right | zeros | least-significant digits |
//! | [`string_field`] | right | zeros | least-significant characters |

use chrono::{NaiveDate, NaiveTime};

/// Length of every logical ACH record
pub const RECORD_LENGTH: usize = 94;

/// Records per physical block
pub const BLOCKING_FACTOR: usize = 10;

/// Left-justify `s` in `width` characters, right-padding with spaces.
/// Longer values are truncated.
pub fn alpha_field(s: &str, width: usize) -> String {
    let mut out: String = s.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// Right-justify `n` in `width` digits, left-padding with zeros.
///
/// When the decimal rendering is wider than `width` only the
/// least-significant `width` digits are kept. Trace numbers rely on this to
/// stay bounded.
pub fn numeric_field(n: u64, width: usize) -> String {
    string_field(&n.to_string(), width)
}

/// Same as [`numeric_field`] for values carried as strings (trace numbers,
/// routing numbers). Keeps the least-significant `width` characters.
pub fn string_field(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.chars().skip(len - width).collect()
    } else {
        let mut out = "0".repeat(width - len);
        out.push_str(s);
        out
    }
}

/// `v mod 10^max_digits`; used for the entry hash truncation rule
pub fn least_significant_digits(v: u64, max_digits: u32) -> u64 {
    match 10u64.checked_pow(max_digits) {
        Some(modulus) => v % modulus,
        None => v,
    }
}

/// Render a stored YYMMDD date; empty renders as six spaces
pub fn date_field(s: &str) -> String {
    alpha_field(s.trim(), 6)
}

/// Render a stored HHMM time; empty renders as four spaces
pub fn time_field(s: &str) -> String {
    alpha_field(s.trim(), 4)
}

/// Render a routing number field of ten characters.
///
/// Nine-digit routing numbers are preceded by a space, ten-character values
/// are written as-is and blank values stay blank.
pub fn routing_field(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        alpha_field("", 10)
    } else if s.chars().count() >= 10 {
        string_field(s, 10)
    } else {
        format!(" {}", string_field(s, 9))
    }
}

/// Format a date as YYMMDD
pub fn format_yymmdd(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// Format a time as HHMM
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H%M").to_string()
}

// ----------------------------------------------------------------------------
// Decoding
// ----------------------------------------------------------------------------

/// Slice `[start, end)` out of a record, returning "" for anything that is
/// out of range or not on a character boundary. Never panics.
pub fn slice(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("")
}

/// Decode a numeric field; anything that is not a number decodes as zero
pub fn parse_num<T: std::str::FromStr + Default>(line: &str, start: usize, end: usize) -> T {
    slice(line, start, end).trim().parse().unwrap_or_default()
}

/// Decode an alphanumeric field, dropping the right padding
pub fn parse_alpha(line: &str, start: usize, end: usize) -> String {
    slice(line, start, end).trim_end().to_string()
}

/// Decode a numeric-like string field (routing, trace), trimming both sides
pub fn parse_text(line: &str, start: usize, end: usize) -> String {
    slice(line, start, end).trim().to_string()
}

// ----------------------------------------------------------------------------
// Predicates used by validation
// ----------------------------------------------------------------------------

/// Every character is an ASCII digit. The empty string is numeric.
pub fn is_numeric(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Every character is printable ASCII (space through tilde)
pub fn is_alphanumeric(s: &str) -> bool {
    s.bytes().all(|b| (b' '..=b'~').contains(&b))
}

/// Every character is an uppercase letter or a digit
pub fn is_upper_alphanumeric(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Blank or all zeros
pub fn is_default(s: &str) -> bool {
    s.trim().chars().all(|c| c == '0')
}

/// A valid six-digit YYMMDD date
pub fn is_valid_yymmdd(s: &str) -> bool {
    s.len() == 6 && is_numeric(s) && NaiveDate::parse_from_str(s, "%y%m%d").is_ok()
}

/// A valid four-digit HHMM time
pub fn is_valid_hhmm(s: &str) -> bool {
    s.len() == 4 && is_numeric(s) && NaiveTime::parse_from_str(s, "%H%M").is_ok()
}

/// A valid four-digit MMDD month/day pair
pub fn is_valid_mmdd(s: &str) -> bool {
    if s.len() != 4 || !is_numeric(s) {
        return false;
    }
    let month: u32 = s[..2].parse().unwrap_or(0);
    let day: u32 = s[2..].parse().unwrap_or(0);
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Check digit of an 8-digit routing prefix.
///
/// Weights 3, 7, 1 repeat over the digits; the check digit brings the
/// weighted sum up to the next multiple of ten. Returns None when the
/// prefix is not eight digits.
pub fn check_digit(routing_prefix: &str) -> Option<u8> {
    if routing_prefix.len() != 8 || !is_numeric(routing_prefix) {
        return None;
    }
    const WEIGHTS: [u32; 8] = [3, 7, 1, 3, 7, 1, 3, 7];
    let sum: u32 = routing_prefix
        .bytes()
        .zip(WEIGHTS)
        .map(|(b, w)| u32::from(b - b'0') * w)
        .sum();
    Some(((10 - sum % 10) % 10) as u8)
}
