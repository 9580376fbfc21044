//! File header record (type `1`)
//!
//! The first record of every ACH file. Identifies the sending and receiving
//! institutions and declares the physical layout (record size 094, blocking
//! factor 10, format code 1).

use crate::io::fields::{
    alpha_field, date_field, is_upper_alphanumeric, is_valid_hhmm, is_valid_yymmdd, parse_alpha,
    parse_text, routing_field, string_field, time_field,
};
use crate::records::{check_alphanumeric, check_mandatory, check_numeric, RecordCodec};
use crate::types::{FieldError, FieldErrorKind};
use serde::{Deserialize, Serialize};

/// File header record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileHeader {
    /// Always "01"
    pub priority_code: String,
    /// Routing number of the receiving point (9 digits, or 10 characters)
    pub immediate_destination: String,
    /// Routing number or company identifier of the sender
    pub immediate_origin: String,
    /// YYMMDD
    pub file_creation_date: String,
    /// HHMM, optional
    pub file_creation_time: String,
    /// Distinguishes files created on the same date (A-Z, 0-9)
    pub file_id_modifier: String,
    /// Always "094"
    pub record_size: String,
    /// Always "10"
    pub blocking_factor: String,
    /// Always "1"
    pub format_code: String,
    pub immediate_destination_name: String,
    pub immediate_origin_name: String,
    pub reference_code: String,
}

impl Default for FileHeader {
    fn default() -> Self {
        FileHeader {
            priority_code: "01".to_string(),
            immediate_destination: String::new(),
            immediate_origin: String::new(),
            file_creation_date: String::new(),
            file_creation_time: String::new(),
            file_id_modifier: "A".to_string(),
            record_size: "094".to_string(),
            blocking_factor: "10".to_string(),
            format_code: "1".to_string(),
            immediate_destination_name: String::new(),
            immediate_origin_name: String::new(),
            reference_code: String::new(),
        }
    }
}

impl FileHeader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordCodec for FileHeader {
    fn parse(line: &str) -> Self {
        FileHeader {
            priority_code: parse_text(line, 1, 3),
            immediate_destination: parse_text(line, 3, 13),
            immediate_origin: parse_text(line, 13, 23),
            file_creation_date: parse_text(line, 23, 29),
            file_creation_time: parse_text(line, 29, 33),
            file_id_modifier: parse_alpha(line, 33, 34),
            record_size: parse_text(line, 34, 37),
            blocking_factor: parse_text(line, 37, 39),
            format_code: parse_alpha(line, 39, 40),
            immediate_destination_name: parse_alpha(line, 40, 63),
            immediate_origin_name: parse_alpha(line, 63, 86),
            reference_code: parse_alpha(line, 86, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "1{}{}{}{}{}{}{}{}{}{}{}{}",
            string_field(&self.priority_code, 2),
            routing_field(&self.immediate_destination),
            routing_field(&self.immediate_origin),
            date_field(&self.file_creation_date),
            time_field(&self.file_creation_time),
            alpha_field(&self.file_id_modifier, 1),
            string_field(&self.record_size, 3),
            string_field(&self.blocking_factor, 2),
            alpha_field(&self.format_code, 1),
            alpha_field(&self.immediate_destination_name, 23),
            alpha_field(&self.immediate_origin_name, 23),
            alpha_field(&self.reference_code, 8),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        if self.priority_code != "01" {
            return Err(FieldError::invalid("PriorityCode", &self.priority_code));
        }
        check_mandatory("ImmediateDestination", &self.immediate_destination)?;
        check_numeric("ImmediateDestination", &self.immediate_destination)?;
        check_mandatory("ImmediateOrigin", &self.immediate_origin)?;
        check_alphanumeric("ImmediateOrigin", &self.immediate_origin)?;
        if !is_valid_yymmdd(&self.file_creation_date) {
            return Err(FieldError::invalid_date("FileCreationDate", &self.file_creation_date));
        }
        if !self.file_creation_time.is_empty() && !is_valid_hhmm(&self.file_creation_time) {
            return Err(FieldError::new(
                "FileCreationTime",
                FieldErrorKind::InvalidTime,
                &self.file_creation_time,
            ));
        }
        if self.file_id_modifier.len() != 1 || !is_upper_alphanumeric(&self.file_id_modifier) {
            return Err(FieldError::invalid("FileIDModifier", &self.file_id_modifier));
        }
        if self.record_size != "094" {
            return Err(FieldError::invalid("RecordSize", &self.record_size));
        }
        if self.blocking_factor != "10" {
            return Err(FieldError::invalid("BlockingFactor", &self.blocking_factor));
        }
        if self.format_code != "1" {
            return Err(FieldError::invalid("FormatCode", &self.format_code));
        }
        check_alphanumeric("ImmediateDestinationName", &self.immediate_destination_name)?;
        check_alphanumeric("ImmediateOriginName", &self.immediate_origin_name)?;
        check_alphanumeric("ReferenceCode", &self.reference_code)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "101 076401251 0764012511908161055A094101Federal Reserve Bank   My Bank Name           12345678";

    #[test]
    fn test_parse_sample() {
        assert_eq!(SAMPLE.len(), 94);
        let header = FileHeader::parse(SAMPLE);
        assert_eq!(header.priority_code, "01");
        assert_eq!(header.immediate_destination, "076401251");
        assert_eq!(header.immediate_origin, "076401251");
        assert_eq!(header.file_creation_date, "190816");
        assert_eq!(header.file_creation_time, "1055");
        assert_eq!(header.file_id_modifier, "A");
        assert_eq!(header.immediate_destination_name, "Federal Reserve Bank");
        assert_eq!(header.immediate_origin_name, "My Bank Name");
        assert_eq!(header.reference_code, "12345678");
        assert_eq!(header.validate(), Ok(()));
    }

    #[test]
    fn test_render_round_trips() {
        let header = FileHeader::parse(SAMPLE);
        assert_eq!(header.render(), SAMPLE);
    }

    #[test]
    fn test_blank_creation_time_renders_spaces() {
        let mut header = FileHeader::parse(SAMPLE);
        header.file_creation_time.clear();
        let line = header.render();
        assert_eq!(line.len(), 94);
        assert_eq!(&line[29..33], "    ");
        assert_eq!(header.validate(), Ok(()));
    }

    #[test]
    fn test_validate_reports_first_violation() {
        let mut header = FileHeader::parse(SAMPLE);
        header.file_id_modifier = "a".to_string();
        header.record_size = "095".to_string();
        let err = header.validate().unwrap_err();
        assert_eq!(err.field_name, "FileIDModifier");
    }

    #[test]
    fn test_validate_mandatory_destination() {
        let mut header = FileHeader::parse(SAMPLE);
        header.immediate_destination = "000000000".to_string();
        let err = header.validate().unwrap_err();
        assert_eq!(err.field_name, "ImmediateDestination");
        assert_eq!(err.kind, FieldErrorKind::Mandatory);
    }

    #[test]
    fn test_validate_bad_date() {
        let mut header = FileHeader::parse(SAMPLE);
        header.file_creation_date = "191332".to_string();
        let err = header.validate().unwrap_err();
        assert_eq!(err.field_name, "FileCreationDate");
        assert_eq!(err.kind, FieldErrorKind::InvalidDate);
    }
}
