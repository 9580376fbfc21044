//! ACH file reader
//!
//! Decodes a stream of 94-character records into a [`File`] and a list of
//! every problem found on the way.
//!
//! # Design
//!
//! The reader is a line-driven state machine. Its state is the file header
//! flag, the file control flag and the batch currently open (domestic or
//! IAT). Structural problems (bad line length, unknown record type, records
//! outside their container) are recorded and reading continues with the next
//! line, because interchange files are sometimes partially corrupt and
//! downstream systems still need what can be recovered.
//!
//! Each record is validated as it is decoded and its first broken field is
//! recorded. A batch is validated as a whole on its control record; if one
//! of its records already failed, only its control totals are reconciled so
//! the same broken field is not reported twice. The file is handled the same
//! way at the end of the stream. File totals are not reconciled when a batch
//! had no control record, a batch failed its own check, or the file control
//! is missing.
//!
//! Only two conditions stop reading: an I/O error and exceeding
//! [`ReaderOptions::max_lines`].
//!
//! ```no_run
//! use rust_ach_engine::io::reader::read_file;
//! use rust_ach_engine::io::ReaderOptions;
//! use std::path::Path;
//!
//! let result = read_file(Path::new("payroll.ach"), &ReaderOptions::default()).unwrap();
//! for error in &result.errors {
//!     eprintln!("{}", error);
//! }
//! println!("{} batches", result.file.batch_count());
//! ```

use crate::core::{Batch, File, IatBatch, ValidateOpts};
use crate::io::fields::RECORD_LENGTH;
use crate::records::batch_header::is_iat_line;
use crate::records::file_control::is_filler_line;
use crate::records::{
    Addenda, AdvBatchControl, AdvEntryDetail, AdvFileControl, BatchControl, BatchHeader,
    EntryDetail, FileControl, FileHeader, IatBatchHeader, IatEntryDetail, RecordCodec,
    ADDENDA_POS, BATCH_CONTROL_POS, BATCH_HEADER_POS, ENTRY_DETAIL_POS, FILE_CONTROL_POS,
    FILE_HEADER_POS,
};
use crate::types::{AchError, ErrorList, FieldError};
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::warn;

/// Default line ceiling: the two file records, two million batch records
/// and a hundred million entry and addenda records
pub const MAX_LINES: usize = 2 + 2_000_000 + 100_000_000;

/// Options controlling how a file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Hard ceiling on physical lines; exceeding it aborts the read
    pub max_lines: usize,
    /// Passed to every batch the reader builds
    pub validate: ValidateOpts,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            max_lines: MAX_LINES,
            validate: ValidateOpts::default(),
        }
    }
}

/// Outcome of reading: the best-effort file and everything wrong with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    pub file: File,
    pub errors: ErrorList,
}

impl ReadResult {
    /// Whether the file was read without a single error
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The file when no error was recorded
    pub fn into_result(self) -> Result<File, ErrorList> {
        self.errors.into_result().map(|()| self.file)
    }
}

/// Reader over any buffered input
#[derive(Debug)]
pub struct Reader<R> {
    input: R,
    options: ReaderOptions,
}

impl<R: BufRead> Reader<R> {
    pub fn new(input: R) -> Self {
        Self::with_options(input, ReaderOptions::default())
    }

    pub fn with_options(input: R, options: ReaderOptions) -> Self {
        Reader { input, options }
    }

    /// Consume the input and decode it
    pub fn read(mut self) -> ReadResult {
        let mut state = ReadState::new(self.options);
        let mut buffer = Vec::with_capacity(RECORD_LENGTH + 2);
        loop {
            buffer.clear();
            match self.input.read_until(b'\n', &mut buffer) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    state.record(AchError::from(e).at_line(state.line_number + 1, "Unknown"));
                    return state.into_result();
                }
            }
            state.line_number += 1;
            if state.line_number > self.options.max_lines {
                state.record(
                    AchError::TooManyLines {
                        max: self.options.max_lines,
                    }
                    .at_line(state.line_number, "Unknown"),
                );
                return state.into_result();
            }
            let line = String::from_utf8_lossy(&buffer);
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }
            state.parse_line(line);
        }
        state.finish()
    }
}

impl Reader<BufReader<std::fs::File>> {
    /// Open a file on disk for reading
    pub fn open(path: &Path, options: ReaderOptions) -> Result<Self, AchError> {
        let file = std::fs::File::open(path).map_err(|e| AchError::Io {
            message: format!("failed to open '{}': {}", path.display(), e),
        })?;
        Ok(Self::with_options(BufReader::new(file), options))
    }
}

/// Read an ACH file from disk. Only failing to open the file is an `Err`;
/// everything found inside it is reported through [`ReadResult::errors`].
pub fn read_file(path: &Path, options: &ReaderOptions) -> Result<ReadResult, AchError> {
    Ok(Reader::open(path, *options)?.read())
}

/// Read ACH content held in memory
pub fn read_str(content: &str) -> ReadResult {
    Reader::new(content.as_bytes()).read()
}

/// Bring a line to exactly 94 characters.
///
/// Short lines are padded with spaces. Long lines lose their excess; if the
/// excess is not all spaces the length is reported.
fn normalize(line: &str) -> (String, Option<AchError>) {
    let length = line.chars().count();
    if length == RECORD_LENGTH {
        return (line.to_string(), None);
    }
    if length < RECORD_LENGTH {
        let mut padded = line.to_string();
        padded.extend(std::iter::repeat(' ').take(RECORD_LENGTH - length));
        return (padded, None);
    }
    let truncated: String = line.chars().take(RECORD_LENGTH).collect();
    if line.chars().skip(RECORD_LENGTH).all(|c| c == ' ') {
        (truncated, None)
    } else {
        (truncated, Some(AchError::RecordLength { length }))
    }
}

/// The batch currently being filled
enum OpenBatch {
    Domestic(Batch),
    Iat(IatBatch),
}

impl OpenBatch {
    fn batch_number(&self) -> u32 {
        match self {
            OpenBatch::Domestic(batch) => batch.batch_number(),
            OpenBatch::Iat(batch) => batch.batch_number(),
        }
    }
}

struct ReadState {
    file: File,
    errors: ErrorList,
    options: ReaderOptions,
    line_number: usize,
    header_seen: bool,
    control_seen: bool,
    batch: Option<OpenBatch>,
    /// Error count when the open batch started
    errors_at_open: usize,
    /// A batch lacked its control record or failed to reconcile with it
    batch_unreconciled: bool,
}

impl ReadState {
    fn new(options: ReaderOptions) -> Self {
        ReadState {
            file: File::default(),
            errors: ErrorList::new(),
            options,
            line_number: 0,
            header_seen: false,
            control_seen: false,
            batch: None,
            errors_at_open: 0,
            batch_unreconciled: false,
        }
    }

    fn record(&mut self, error: AchError) {
        self.errors.push(error);
    }

    fn record_at(&mut self, record: &'static str, error: AchError) {
        let line = self.line_number;
        self.record(error.at_line(line, record));
    }

    fn check(&mut self, record: &'static str, result: Result<(), FieldError>) {
        if let Err(e) = result {
            self.record_at(record, e.into());
        }
    }

    fn parse_line(&mut self, raw: &str) {
        let (line, length_error) = normalize(raw);
        let kind = line.chars().next().unwrap_or(' ');
        if let Some(error) = length_error {
            warn!(line = self.line_number, "record is longer than 94 characters");
            self.record_at("Unknown", error);
        }
        match kind {
            FILE_HEADER_POS => self.parse_file_header(&line),
            BATCH_HEADER_POS => self.parse_batch_header(&line),
            ENTRY_DETAIL_POS => self.parse_entry(&line),
            ADDENDA_POS => self.parse_addenda(&line),
            BATCH_CONTROL_POS => self.parse_batch_control(&line),
            FILE_CONTROL_POS => self.parse_file_control(&line),
            other => self.record_at("Unknown", AchError::UnknownRecordType(other)),
        }
    }

    fn parse_file_header(&mut self, line: &str) {
        if self.header_seen {
            self.record_at("FileHeader", AchError::DuplicateFileHeader);
            return;
        }
        self.header_seen = true;
        let header = FileHeader::parse(line);
        self.check("FileHeader", header.validate());
        self.file.header = header;
    }

    fn parse_batch_header(&mut self, line: &str) {
        if self.batch.is_some() {
            self.record_at(
                "BatchHeader",
                AchError::misplaced("BatchHeader", "arrived inside an open batch"),
            );
            self.close_batch();
        }
        self.errors_at_open = self.errors.len();
        let validate_opts = self.options.validate;
        if is_iat_line(line) {
            let header = IatBatchHeader::parse(line);
            self.check("IATBatchHeader", header.validate());
            let mut batch = IatBatch::new(header);
            batch.validate_opts = validate_opts;
            self.batch = Some(OpenBatch::Iat(batch));
        } else {
            let header = BatchHeader::parse(line);
            self.check("BatchHeader", header.validate());
            let mut batch = Batch::new(header);
            batch.validate_opts = validate_opts;
            self.batch = Some(OpenBatch::Domestic(batch));
        }
    }

    fn parse_entry(&mut self, line: &str) {
        match self.batch.as_mut() {
            None => self.record_at(
                "EntryDetail",
                AchError::misplaced("EntryDetail", "is outside a batch"),
            ),
            Some(OpenBatch::Domestic(batch)) if batch.is_adv() => {
                let entry = AdvEntryDetail::parse(line);
                let result = entry.validate();
                batch.add_adv_entry(entry);
                self.check("ADVEntryDetail", result);
            }
            Some(OpenBatch::Domestic(batch)) => {
                let entry = EntryDetail::parse(line);
                let result = entry.validate();
                batch.add_entry(entry);
                self.check("EntryDetail", result);
            }
            Some(OpenBatch::Iat(batch)) => {
                let entry = IatEntryDetail::parse(line);
                let result = entry.validate();
                batch.add_entry(entry);
                self.check("IATEntryDetail", result);
            }
        }
    }

    fn parse_addenda(&mut self, line: &str) {
        let addenda = match Addenda::parse(line) {
            Ok(addenda) => addenda,
            Err(e) => {
                self.record_at("Addenda", e.into());
                return;
            }
        };
        let record = addenda.name();
        self.check(record, addenda.validate());

        let attached = match self.batch.as_mut() {
            None => Err(AchError::misplaced(record, "is outside a batch")),
            Some(OpenBatch::Domestic(batch)) if batch.is_adv() => {
                Err(AchError::misplaced(record, "follows an ADV entry"))
            }
            Some(OpenBatch::Domestic(batch)) => match batch.entries.last_mut() {
                Some(entry) => entry.attach_addenda(addenda),
                None => Err(AchError::misplaced(record, "has no entry to attach to")),
            },
            Some(OpenBatch::Iat(batch)) => match batch.entries.last_mut() {
                Some(entry) => entry.attach_addenda(addenda),
                None => Err(AchError::misplaced(record, "has no entry to attach to")),
            },
        };
        if let Err(e) = attached {
            self.record_at(record, e);
        }
    }

    fn parse_batch_control(&mut self, line: &str) {
        let Some(open) = self.batch.take() else {
            self.record_at(
                "BatchControl",
                AchError::misplaced("BatchControl", "is outside a batch"),
            );
            return;
        };
        match open {
            OpenBatch::Domestic(mut batch) => {
                if batch.is_adv() {
                    let control = AdvBatchControl::parse(line);
                    self.check("ADVBatchControl", control.validate());
                    batch.adv_control = Some(control);
                } else {
                    let control = BatchControl::parse(line);
                    self.check("BatchControl", control.validate());
                    batch.control = control;
                }
                let clean = self.errors.len() == self.errors_at_open;
                let checked = if clean { batch.validate() } else { batch.reconcile() };
                if let Err(e) = checked {
                    self.batch_unreconciled = true;
                    self.record_at("BatchControl", e.into());
                }
                self.file.add_batch(batch);
            }
            OpenBatch::Iat(mut batch) => {
                let control = BatchControl::parse(line);
                self.check("BatchControl", control.validate());
                batch.control = control;
                let clean = self.errors.len() == self.errors_at_open;
                let checked = if clean { batch.validate() } else { batch.reconcile() };
                if let Err(e) = checked {
                    self.batch_unreconciled = true;
                    self.record_at("BatchControl", e.into());
                }
                self.file.add_iat_batch(batch);
            }
        }
    }

    fn parse_file_control(&mut self, line: &str) {
        if is_filler_line(line) {
            return;
        }
        if self.control_seen {
            self.record_at("FileControl", AchError::DuplicateFileControl);
            return;
        }
        if self.batch.is_some() {
            self.close_batch();
        }
        self.control_seen = true;
        if self.file.is_adv() {
            let control = AdvFileControl::parse(line);
            self.check("ADVFileControl", control.validate());
            self.file.adv_control = Some(control);
        } else {
            let control = FileControl::parse(line);
            self.check("FileControl", control.validate());
            self.file.control = control;
        }
    }

    /// Attach a batch that never saw its control record
    fn close_batch(&mut self) {
        let Some(open) = self.batch.take() else {
            return;
        };
        let batch_number = open.batch_number();
        warn!(batch_number, "attaching batch without a batch control record");
        self.batch_unreconciled = true;
        self.record_at(
            "BatchControl",
            AchError::MissingBatchControl { batch_number },
        );
        match open {
            OpenBatch::Domestic(batch) => self.file.add_batch(batch),
            OpenBatch::Iat(batch) => self.file.add_iat_batch(batch),
        }
    }

    fn finish(mut self) -> ReadResult {
        self.close_batch();
        if !self.header_seen {
            self.record(AchError::MissingFileHeader);
        }
        if !self.control_seen {
            self.record(AchError::MissingFileControl);
        }
        let checked = if self.errors.is_empty() {
            self.file.validate()
        } else if self.header_seen && self.control_seen && !self.batch_unreconciled {
            self.file.reconcile()
        } else {
            Ok(())
        };
        if let Err(e) = checked {
            self.record(e);
        }
        self.into_result()
    }

    fn into_result(self) -> ReadResult {
        ReadResult {
            file: self.file,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file::tests::{interleaved_file, ppd_file};
    use crate::records::file_control::filler_line;
    use crate::types::{BatchErrorKind, FieldErrorKind, FileErrorKind};
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_text(batches: u32, entries: u64) -> Vec<String> {
        ppd_file(batches, entries).lines()
    }

    fn unwrap_parse(error: &AchError) -> (usize, &AchError) {
        match error {
            AchError::Parse { line, source, .. } => (*line, source.as_ref()),
            other => panic!("expected a line-tagged error, got {other:?}"),
        }
    }

    #[test]
    fn test_reads_valid_file() {
        let mut lines = file_text(2, 2);
        lines.push(filler_line());
        let result = read_str(&lines.join("\n"));
        assert!(result.is_ok(), "{}", result.errors);
        assert_eq!(result.file, ppd_file(2, 2));
    }

    #[test]
    fn test_reads_interleaved_iat_batch() {
        let file = interleaved_file();
        let mut lines = file.lines();
        lines.extend(std::iter::repeat_with(filler_line).take(10 - lines.len() % 10));
        let result = read_str(&lines.join("\n"));
        assert!(result.is_ok(), "{}", result.errors);
        assert_eq!(result.file, file);
        assert_eq!(result.file.iat_batches[0].batch_number(), 2);
    }

    #[test]
    fn test_accepts_crlf_and_blank_lines() {
        let lines = file_text(1, 1);
        let content = format!("{}\r\n\r\n", lines.join("\r\n"));
        let result = read_str(&content);
        assert!(result.is_ok(), "{}", result.errors);
    }

    #[test]
    fn test_pads_short_lines() {
        let mut lines = file_text(1, 1);
        // drop the optional reference code
        lines[0].truncate(86);
        let result = read_str(&lines.join("\n"));
        assert!(result.is_ok(), "{}", result.errors);
        assert_eq!(result.file.header.reference_code, "");
        assert_eq!(result.file.header.immediate_origin_name, "My Bank Name");
    }

    #[rstest]
    #[case::trailing_spaces("    ", false)]
    #[case::trailing_garbage("  xx", true)]
    fn test_long_lines(#[case] excess: &str, #[case] reported: bool) {
        let mut lines = file_text(1, 1);
        lines[0].push_str(excess);
        let result = read_str(&lines.join("\n"));
        let length_error = result
            .errors
            .iter()
            .any(|e| matches!(unwrap_parse(e).1, AchError::RecordLength { length: 98 }));
        assert_eq!(length_error, reported);
        assert_eq!(result.file.header, ppd_file(1, 1).header);
    }

    #[test]
    fn test_unknown_record_type_continues() {
        let mut lines = file_text(1, 1);
        lines.insert(1, "3".repeat(94));
        let result = read_str(&lines.join("\n"));
        assert_eq!(result.errors.len(), 1);
        let (line, error) = unwrap_parse(result.errors.first().unwrap());
        assert_eq!(line, 2);
        assert_eq!(*error, AchError::UnknownRecordType('3'));
        assert_eq!(result.file.batches.len(), 1);
    }

    #[test]
    fn test_entry_outside_batch() {
        let mut lines = file_text(1, 1);
        let entry = lines[2].clone();
        lines.insert(1, entry);
        let result = read_str(&lines.join("\n"));
        let (_, error) = unwrap_parse(result.errors.first().unwrap());
        assert!(matches!(
            error,
            AchError::MisplacedRecord {
                record: "EntryDetail",
                ..
            }
        ));
        assert_eq!(result.file.batches[0].entries.len(), 1);
    }

    #[test]
    fn test_batch_header_inside_open_batch() {
        // drop the first batch control
        let mut lines = file_text(2, 1);
        lines.remove(3);
        let result = read_str(&lines.join("\n"));
        assert_eq!(result.file.batches.len(), 2);
        let kinds: Vec<&AchError> = result.errors.iter().map(|e| unwrap_parse(e).1).collect();
        assert!(matches!(kinds[0], AchError::MisplacedRecord { .. }));
        assert!(matches!(
            kinds[1],
            AchError::MissingBatchControl { batch_number: 1 }
        ));
    }

    #[test]
    fn test_open_batch_at_end_is_kept() {
        let mut lines = file_text(1, 2);
        lines.truncate(4);
        let result = read_str(&lines.join("\n"));
        assert_eq!(result.file.batches.len(), 1);
        assert_eq!(result.file.batches[0].entries.len(), 2);
        assert!(result
            .errors
            .iter()
            .any(|e| matches!(unwrap_parse(e).1, AchError::MissingBatchControl { .. })));
        assert!(result
            .errors
            .iter()
            .any(|e| *e == AchError::MissingFileControl));
    }

    #[test]
    fn test_duplicate_file_control() {
        let mut lines = file_text(1, 1);
        let control = lines.last().unwrap().clone();
        lines.push(control);
        let result = read_str(&lines.join("\n"));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            *unwrap_parse(result.errors.first().unwrap()).1,
            AchError::DuplicateFileControl
        );
    }

    #[test]
    fn test_missing_file_header() {
        let lines = file_text(1, 1);
        let result = read_str(&lines[1..].join("\n"));
        assert_eq!(result.errors.iter().collect::<Vec<_>>(), vec![&AchError::MissingFileHeader]);
    }

    #[test]
    fn test_field_error_is_reported_once() {
        let mut lines = file_text(1, 1);
        // corrupt the check digit of the only entry
        lines[2].replace_range(11..12, "0");
        let result = read_str(&lines.join("\n"));
        assert_eq!(result.errors.len(), 1);
        let (line, error) = unwrap_parse(result.errors.first().unwrap());
        assert_eq!(line, 3);
        match error {
            AchError::Field(e) => {
                assert_eq!(e.field_name, "CheckDigit");
                assert_eq!(e.kind, FieldErrorKind::CheckDigit { expected: 4 });
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_control_mismatch_is_reported_beside_field_error() {
        let mut lines = file_text(1, 1);
        lines[2].replace_range(11..12, "0");
        lines[3].replace_range(4..10, "000002");
        let result = read_str(&lines.join("\n"));
        assert_eq!(result.errors.len(), 2, "{}", result.errors);
        let located: Vec<(usize, &AchError)> = result.errors.iter().map(unwrap_parse).collect();
        assert_eq!(located[0].0, 3);
        assert!(matches!(located[0].1, AchError::Field(_)));
        assert_eq!(located[1].0, 4);
        match located[1].1 {
            AchError::Batch(e) => {
                assert_eq!(e.field_name, "EntryAddendaCount");
                assert_eq!(
                    e.kind,
                    BatchErrorKind::ControlMismatch {
                        calculated: "1".to_string(),
                        control: "2".to_string(),
                    }
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_file_totals_reconciled_after_structural_error() {
        let mut lines = file_text(1, 1);
        lines[4].replace_range(31..43, "000000000001");
        lines.insert(1, "3".repeat(94));
        let result = read_str(&lines.join("\n"));
        assert_eq!(result.errors.len(), 2, "{}", result.errors);
        match result.errors.iter().nth(1).unwrap() {
            AchError::File(e) => {
                assert_eq!(e.field_name, "TotalDebitEntryDollarAmountInFile");
                assert!(matches!(e.kind, FileErrorKind::ControlMismatch { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_control_mismatch_is_reported() {
        let mut lines = file_text(1, 1);
        // entry/addenda count of the batch control
        lines[3].replace_range(4..10, "000002");
        let result = read_str(&lines.join("\n"));
        assert_eq!(result.errors.len(), 1);
        match unwrap_parse(result.errors.first().unwrap()).1 {
            AchError::Batch(e) => {
                assert_eq!(e.field_name, "EntryAddendaCount");
                assert!(matches!(e.kind, BatchErrorKind::ControlMismatch { .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_too_many_lines_is_fatal() {
        let lines = file_text(2, 3);
        let options = ReaderOptions {
            max_lines: 5,
            ..ReaderOptions::default()
        };
        let result = Reader::with_options(lines.join("\n").as_bytes(), options).read();
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors.is_fatal());
        assert_eq!(
            *unwrap_parse(result.errors.first().unwrap()).1,
            AchError::TooManyLines { max: 5 }
        );
    }

    #[test]
    fn test_read_file_from_disk() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "{}", file_text(1, 1).join("\n")).unwrap();
        tmp.flush().unwrap();
        let result = read_file(tmp.path(), &ReaderOptions::default()).unwrap();
        assert!(result.is_ok());
        assert_eq!(result.into_result().unwrap().batch_count(), 1);
    }

    #[test]
    fn test_read_file_missing() {
        let err = read_file(Path::new("does-not-exist.ach"), &ReaderOptions::default())
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("does-not-exist.ach"));
    }
}
