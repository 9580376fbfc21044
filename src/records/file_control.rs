//! File control record (type `9`)

use crate::io::fields::{alpha_field, numeric_field, parse_num, RECORD_LENGTH};
use crate::records::{check_width, RecordCodec};
use crate::types::FieldError;
use serde::{Deserialize, Serialize};

/// Whether a `9` line is block padding rather than a file control
pub fn is_filler_line(line: &str) -> bool {
    line.len() == RECORD_LENGTH && line.bytes().all(|b| b == b'9')
}

/// A padding line of 94 nines
pub fn filler_line() -> String {
    "9".repeat(RECORD_LENGTH)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileControl {
    pub batch_count: u32,
    /// Physical blocks of ten lines, padding included
    pub block_count: u32,
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit: u64,
    pub total_credit: u64,
}

impl FileControl {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordCodec for FileControl {
    fn parse(line: &str) -> Self {
        FileControl {
            batch_count: parse_num(line, 1, 7),
            block_count: parse_num(line, 7, 13),
            entry_addenda_count: parse_num(line, 13, 21),
            entry_hash: parse_num(line, 21, 31),
            total_debit: parse_num(line, 31, 43),
            total_credit: parse_num(line, 43, 55),
        }
    }

    fn render(&self) -> String {
        format!(
            "9{}{}{}{}{}{}{}",
            numeric_field(self.batch_count.into(), 6),
            numeric_field(self.block_count.into(), 6),
            numeric_field(self.entry_addenda_count.into(), 8),
            numeric_field(self.entry_hash, 10),
            numeric_field(self.total_debit, 12),
            numeric_field(self.total_credit, 12),
            alpha_field("", 39),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        check_width("BatchCount", self.batch_count.into(), 6)?;
        check_width("BlockCount", self.block_count.into(), 6)?;
        check_width("EntryAddendaCount", self.entry_addenda_count.into(), 8)?;
        check_width("EntryHash", self.entry_hash, 10)?;
        check_width("TotalDebitEntryDollarAmountInFile", self.total_debit, 12)?;
        check_width("TotalCreditEntryDollarAmountInFile", self.total_credit, 12)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "9000001000001000000010023138010000100000000000000000000                                       ";

    #[test]
    fn test_parse_and_render() {
        assert_eq!(SAMPLE.len(), 94);
        let control = FileControl::parse(SAMPLE);
        assert_eq!(control.batch_count, 1);
        assert_eq!(control.block_count, 1);
        assert_eq!(control.entry_addenda_count, 1);
        assert_eq!(control.entry_hash, 23138010);
        assert_eq!(control.total_debit, 100000000);
        assert_eq!(control.total_credit, 0);
        assert_eq!(control.validate(), Ok(()));
        assert_eq!(control.render(), SAMPLE);
    }

    #[test]
    fn test_filler_line() {
        assert!(is_filler_line(&filler_line()));
        assert!(!is_filler_line(SAMPLE));
        assert!(!is_filler_line("999"));
    }
}
