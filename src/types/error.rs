//! Error types for the ACH engine
//!
//! This module defines every error that can occur while decoding, validating,
//! encoding, or consolidating ACH files.
//!
//! # Error Categories
//!
//! - **Field errors**: a single record field holds a value outside its allowed
//!   set or format ([`FieldError`])
//! - **Batch errors**: a batch's control record does not reconcile with its
//!   entries, or a batch-level rule is broken ([`BatchError`])
//! - **File errors**: the same reconciliation one level up ([`FileError`])
//! - **Structural errors**: wrong line length, unknown record type, records
//!   outside their container. The reader records these and keeps going.
//! - **Resource errors**: the line ceiling was exceeded. Always fatal.
//! - **Invariant violations**: merge/flatten changed economic totals. Always
//!   fatal and always a defect.

use crate::types::Category;
use std::fmt;
use thiserror::Error;

/// Why a field failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldErrorKind {
    #[error("has non-numeric characters")]
    NonNumeric,

    #[error("has non-alphanumeric characters")]
    NonAlphanumeric,

    #[error("is a mandatory field and has a default value")]
    Mandatory,

    #[error("is not a valid value")]
    InvalidValue,

    #[error("is not a valid YYMMDD date")]
    InvalidDate,

    #[error("is not a valid HHMM time")]
    InvalidTime,

    #[error("has an invalid check digit, expected {expected}")]
    CheckDigit {
        /// Check digit calculated from the routing prefix
        expected: u8,
    },

    #[error("is not a recognised type code")]
    TypeCode,
}

/// A single record field failed validation
///
/// Validation of a record stops at the first failing field; fields are
/// checked in the order they are declared on the record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field_name} {kind}: '{value}'")]
pub struct FieldError {
    /// Name of the offending field (e.g. `TraceNumber`)
    pub field_name: &'static str,
    /// What was wrong with it
    pub kind: FieldErrorKind,
    /// The offending value as it was found
    pub value: String,
}

impl FieldError {
    /// Create a FieldError for any kind
    pub fn new(field_name: &'static str, kind: FieldErrorKind, value: impl ToString) -> Self {
        FieldError {
            field_name,
            kind,
            value: value.to_string(),
        }
    }

    /// Create a NonNumeric error
    pub fn non_numeric(field_name: &'static str, value: impl ToString) -> Self {
        Self::new(field_name, FieldErrorKind::NonNumeric, value)
    }

    /// Create a NonAlphanumeric error
    pub fn non_alphanumeric(field_name: &'static str, value: impl ToString) -> Self {
        Self::new(field_name, FieldErrorKind::NonAlphanumeric, value)
    }

    /// Create a Mandatory error
    pub fn mandatory(field_name: &'static str, value: impl ToString) -> Self {
        Self::new(field_name, FieldErrorKind::Mandatory, value)
    }

    /// Create an InvalidValue error
    pub fn invalid(field_name: &'static str, value: impl ToString) -> Self {
        Self::new(field_name, FieldErrorKind::InvalidValue, value)
    }

    /// Create an InvalidDate error
    pub fn invalid_date(field_name: &'static str, value: impl ToString) -> Self {
        Self::new(field_name, FieldErrorKind::InvalidDate, value)
    }
}

/// Why a batch failed validation or tabulation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchErrorKind {
    #[error("{0}")]
    Field(FieldError),

    #[error("calculated {calculated} does not match control {control}")]
    ControlMismatch { calculated: String, control: String },

    #[error("header value '{header}' does not match control value '{control}'")]
    HeaderMismatch { header: String, control: String },

    #[error("control record is missing")]
    MissingControl,

    #[error("batch must contain at least one entry")]
    NoEntries,

    #[error("trace number {trace_number} is not in ascending order")]
    TraceNumberNotAscending { trace_number: String },

    #[error("trace number {trace_number} appears more than once")]
    DuplicateTraceNumber { trace_number: String },

    #[error("trace number {trace_number} does not start with ODFI {odfi}")]
    TraceNumberOdfi { trace_number: String, odfi: String },

    #[error("addenda record indicator is {indicator} but the entry has {count} addenda")]
    AddendaIndicator { indicator: u8, count: usize },

    #[error("{found} entry does not match batch category {expected}")]
    Category { expected: Category, found: Category },

    #[error("{addenda} is not allowed on a {category} entry")]
    AddendaCategory {
        addenda: &'static str,
        category: Category,
    },

    #[error("service class code {service_class_code} does not allow {direction} entries")]
    ServiceClass {
        service_class_code: u16,
        direction: &'static str,
    },

    #[error("SEC code '{0}' is not supported")]
    UnsupportedSecCode(String),

    #[error("{0}")]
    Rule(String),
}

/// A batch failed validation or tabulation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("batch #{batch_number} ({sec_code}) {field_name}: {kind}")]
pub struct BatchError {
    pub batch_number: u32,
    pub sec_code: String,
    pub field_name: &'static str,
    pub kind: BatchErrorKind,
}

/// Why a file failed validation or tabulation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileErrorKind {
    #[error("{0}")]
    Field(FieldError),

    #[error("calculated {calculated} does not match control {control}")]
    ControlMismatch { calculated: String, control: String },

    #[error("file must contain at least one batch")]
    NoBatches,

    #[error("ADV and non-ADV batches cannot share a file")]
    MixedAdv,

    #[error("control record is missing")]
    MissingControl,

    #[error("batch number {batch_number} is not in ascending order")]
    BatchNumberNotAscending { batch_number: u32 },
}

/// A file failed validation or tabulation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("file {field_name}: {kind}")]
pub struct FileError {
    pub field_name: &'static str,
    pub kind: FileErrorKind,
}

impl FileError {
    pub fn new(field_name: &'static str, kind: FileErrorKind) -> Self {
        FileError { field_name, kind }
    }

    /// Create a ControlMismatch error
    pub fn mismatch(field_name: &'static str, calculated: impl ToString, control: impl ToString) -> Self {
        Self::new(
            field_name,
            FileErrorKind::ControlMismatch {
                calculated: calculated.to_string(),
                control: control.to_string(),
            },
        )
    }
}

impl From<FieldError> for FileError {
    fn from(error: FieldError) -> Self {
        FileError {
            field_name: error.field_name,
            kind: FileErrorKind::Field(error),
        }
    }
}

/// Main error type for the ACH engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AchError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error(transparent)]
    File(#[from] FileError),

    /// Any error raised while reading, tagged with its physical line
    #[error("line {line} ({record}): {source}")]
    Parse {
        line: usize,
        record: &'static str,
        source: Box<AchError>,
    },

    #[error("record length {length} is not 94")]
    RecordLength { length: usize },

    #[error("unknown record type '{0}'")]
    UnknownRecordType(char),

    #[error("{record} {reason}")]
    MisplacedRecord {
        record: &'static str,
        reason: &'static str,
    },

    #[error("file header record is missing")]
    MissingFileHeader,

    #[error("file header record appears more than once")]
    DuplicateFileHeader,

    #[error("file control record appears more than once")]
    DuplicateFileControl,

    #[error("batch #{batch_number} has no batch control record")]
    MissingBatchControl { batch_number: u32 },

    #[error("file control record is missing")]
    MissingFileControl,

    #[error("{addenda} cannot be attached: {reason}")]
    AddendaSlot {
        addenda: &'static str,
        reason: String,
    },

    /// Resource-exhaustion guard; reading stops immediately
    #[error("file exceeds the maximum of {max} lines")]
    TooManyLines { max: usize },

    #[error("I/O error: {message}")]
    Io { message: String },

    /// A consolidation changed economic totals. This is a defect.
    #[error("{operation} changed {field}: before {before}, after {after}")]
    InvariantViolation {
        operation: &'static str,
        field: &'static str,
        before: u64,
        after: u64,
    },
}

// Conversion from io::Error to AchError
impl From<std::io::Error> for AchError {
    fn from(error: std::io::Error) -> Self {
        AchError::Io {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to AchError (used by the describe report)
impl From<csv::Error> for AchError {
    fn from(error: csv::Error) -> Self {
        AchError::Io {
            message: error.to_string(),
        }
    }
}

impl AchError {
    /// Wrap an error with the line it was found on
    pub fn at_line(self, line: usize, record: &'static str) -> Self {
        AchError::Parse {
            line,
            record,
            source: Box::new(self),
        }
    }

    /// Create a MisplacedRecord error
    pub fn misplaced(record: &'static str, reason: &'static str) -> Self {
        AchError::MisplacedRecord { record, reason }
    }

    /// Create an AddendaSlot error
    pub fn addenda_slot(addenda: &'static str, reason: impl Into<String>) -> Self {
        AchError::AddendaSlot {
            addenda,
            reason: reason.into(),
        }
    }

    /// Whether this error stopped reading (as opposed to being recorded)
    pub fn is_fatal(&self) -> bool {
        match self {
            AchError::TooManyLines { .. } | AchError::Io { .. } => true,
            AchError::Parse { source, .. } => source.is_fatal(),
            _ => false,
        }
    }
}

/// Aggregated errors collected while reading a file
///
/// The reader never stops at the first problem; it returns the best-effort
/// [`crate::core::File`] together with this list. A non-empty list means the
/// file must not be treated as NACHA compliant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<AchError>);

impl ErrorList {
    pub fn new() -> Self {
        ErrorList(Vec::new())
    }

    pub fn push(&mut self, error: AchError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AchError> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&AchError> {
        self.0.first()
    }

    /// Whether reading was aborted rather than completed
    pub fn is_fatal(&self) -> bool {
        self.0.iter().any(AchError::is_fatal)
    }

    /// Convert into a Result, Ok when no errors were recorded
    pub fn into_result(self) -> Result<(), ErrorList> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "<nil>"),
            [only] => write!(f, "{}", only),
            [first, rest @ ..] => {
                write!(f, "{}", first)?;
                for e in rest {
                    write!(f, "; {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ErrorList {}

impl IntoIterator for ErrorList {
    type Item = AchError;
    type IntoIter = std::vec::IntoIter<AchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a AchError;
    type IntoIter = std::slice::Iter<'a, AchError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<AchError>> for ErrorList {
    fn from(errors: Vec<AchError>) -> Self {
        ErrorList(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::field(
        AchError::Field(FieldError::non_numeric("TraceNumber", "12AB")),
        "TraceNumber has non-numeric characters: '12AB'"
    )]
    #[case::record_length(AchError::RecordLength { length: 80 }, "record length 80 is not 94")]
    #[case::unknown_record(AchError::UnknownRecordType('3'), "unknown record type '3'")]
    #[case::too_many_lines(AchError::TooManyLines { max: 10 }, "file exceeds the maximum of 10 lines")]
    #[case::batch_mismatch(
        AchError::Batch(BatchError {
            batch_number: 1,
            sec_code: "PPD".to_string(),
            field_name: "EntryHash",
            kind: BatchErrorKind::ControlMismatch {
                calculated: "23138010".to_string(),
                control: "1".to_string(),
            },
        }),
        "batch #1 (PPD) EntryHash: calculated 23138010 does not match control 1"
    )]
    #[case::file_mismatch(
        AchError::File(FileError::mismatch("BatchCount", 2, 1)),
        "file BatchCount: calculated 2 does not match control 1"
    )]
    #[case::invariant(
        AchError::InvariantViolation { operation: "flatten", field: "TotalDebitEntryDollarAmountInFile", before: 100, after: 90 },
        "flatten changed TotalDebitEntryDollarAmountInFile: before 100, after 90"
    )]
    fn test_error_display(#[case] error: AchError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_at_line_wraps_source() {
        let error = AchError::UnknownRecordType('X').at_line(7, "Unknown");
        assert_eq!(error.to_string(), "line 7 (Unknown): unknown record type 'X'");
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_fatal_detection_through_parse_wrapper() {
        let error = AchError::TooManyLines { max: 5 }.at_line(6, "Unknown");
        assert!(error.is_fatal());

        let list = ErrorList::from(vec![AchError::MissingFileControl, error]);
        assert!(list.is_fatal());
    }

    #[test]
    fn test_error_list_display() {
        let mut list = ErrorList::new();
        assert_eq!(list.to_string(), "<nil>");
        assert!(list.clone().into_result().is_ok());

        list.push(AchError::MissingFileHeader);
        list.push(AchError::MissingFileControl);
        assert_eq!(list.len(), 2);
        assert_eq!(
            list.to_string(),
            "file header record is missing; file control record is missing"
        );
        assert!(list.into_result().is_err());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: AchError = io_error.into();
        assert!(matches!(error, AchError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
