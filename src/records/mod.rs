//! Record codecs
//!
//! Every 94-character line of an ACH file is one record. Each record variant
//! implements [`RecordCodec`]: a best-effort `parse` that never fails, a
//! `render` that produces exactly 94 characters, and a read-only `validate`
//! that reports the first broken field.
//!
//! Parsing and validation are deliberately separate phases. The reader must
//! be able to keep the structure of a file whose *content* is wrong, so a
//! malformed field decodes into whatever the fixed offsets produce and is
//! reported later by `validate`.
//!
//! # Record types
//!
//! | First byte | Record |
//! |---|---|
//! | `1` | [`FileHeader`] |
//! | `5` | [`BatchHeader`] or [`IatBatchHeader`] |
//! | `6` | [`EntryDetail`], [`IatEntryDetail`] or [`AdvEntryDetail`] |
//! | `7` | [`Addenda`] (see [`addenda`]) |
//! | `8` | [`BatchControl`] or [`AdvBatchControl`] |
//! | `9` | [`FileControl`] or [`AdvFileControl`] |

use crate::types::FieldError;

pub mod addenda;
pub mod adv;
pub mod batch_control;
pub mod batch_header;
pub mod entry_detail;
pub mod file_control;
pub mod file_header;
pub mod iat_batch_header;
pub mod iat_entry_detail;

pub use addenda::{
    Addenda, Addenda02, Addenda05, Addenda98, Addenda99, Addenda99Contested, Addenda99Dishonored,
    IatAddenda,
};
pub use adv::{AdvBatchControl, AdvEntryDetail, AdvFileControl};
pub use batch_control::BatchControl;
pub use batch_header::BatchHeader;
pub use entry_detail::EntryDetail;
pub use file_control::FileControl;
pub use file_header::FileHeader;
pub use iat_batch_header::IatBatchHeader;
pub use iat_entry_detail::IatEntryDetail;

/// Position of the record type character
pub const RECORD_TYPE_POS: usize = 0;

pub const FILE_HEADER_POS: char = '1';
pub const BATCH_HEADER_POS: char = '5';
pub const ENTRY_DETAIL_POS: char = '6';
pub const ADDENDA_POS: char = '7';
pub const BATCH_CONTROL_POS: char = '8';
pub const FILE_CONTROL_POS: char = '9';

/// Fixed-width codec implemented by every record variant
pub trait RecordCodec {
    /// Decode a 94-character line. Never fails; malformed input produces
    /// whatever values the fixed offsets yield.
    fn parse(line: &str) -> Self
    where
        Self: Sized;

    /// Encode the record as exactly 94 characters
    fn render(&self) -> String;

    /// Check every field in declared order, returning the first violation.
    /// Never mutates.
    fn validate(&self) -> Result<(), FieldError>;
}

/// Extra identity accessor carried by every addenda variant
pub trait Addendum: RecordCodec {
    /// The two-character addenda type code (`"02"`, `"05"`, `"99"`, ...)
    fn type_code(&self) -> &'static str;
}

// Shared field checks used by the record validators. Each returns the error
// for the named field so validators read as a flat list of checks.

pub(crate) fn check_numeric(field: &'static str, value: &str) -> Result<(), FieldError> {
    if crate::io::fields::is_numeric(value) {
        Ok(())
    } else {
        Err(FieldError::non_numeric(field, value))
    }
}

pub(crate) fn check_alphanumeric(field: &'static str, value: &str) -> Result<(), FieldError> {
    if crate::io::fields::is_alphanumeric(value) {
        Ok(())
    } else {
        Err(FieldError::non_alphanumeric(field, value))
    }
}

pub(crate) fn check_mandatory(field: &'static str, value: &str) -> Result<(), FieldError> {
    if crate::io::fields::is_default(value) {
        Err(FieldError::mandatory(field, value))
    } else {
        Ok(())
    }
}

/// Mandatory numeric routing-like value of an exact width
pub(crate) fn check_routing(field: &'static str, value: &str, width: usize) -> Result<(), FieldError> {
    check_mandatory(field, value)?;
    check_numeric(field, value)?;
    if value.len() != width {
        return Err(FieldError::invalid(field, value));
    }
    Ok(())
}

/// Numeric trace number of at most 15 digits
pub(crate) fn check_trace_number(field: &'static str, value: &str) -> Result<(), FieldError> {
    check_mandatory(field, value)?;
    check_numeric(field, value)?;
    if value.len() > 15 {
        return Err(FieldError::invalid(field, value));
    }
    Ok(())
}

/// Value fits in a numeric field of `width` digits
pub(crate) fn check_width(field: &'static str, value: u64, width: u32) -> Result<(), FieldError> {
    if value >= 10u64.pow(width) {
        Err(FieldError::invalid(field, value))
    } else {
        Ok(())
    }
}

/// Valid routing check digit for an 8-digit prefix
pub(crate) fn check_routing_check_digit(prefix: &str, digit: &str) -> Result<(), FieldError> {
    match crate::io::fields::check_digit(prefix) {
        Some(expected) if digit == expected.to_string() => Ok(()),
        Some(expected) => Err(FieldError::new(
            "CheckDigit",
            crate::types::FieldErrorKind::CheckDigit { expected },
            digit,
        )),
        None => Err(FieldError::non_numeric("RDFIIdentification", prefix)),
    }
}

pub(crate) fn check_service_class(code: u16) -> Result<(), FieldError> {
    match code {
        200 | 220 | 225 | 280 => Ok(()),
        _ => Err(FieldError::invalid("ServiceClassCode", code)),
    }
}
