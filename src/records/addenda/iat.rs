//! IAT addenda (type codes 10 through 18)
//!
//! International entries carry a fixed set of mandatory addenda describing
//! the parties and the foreign correspondent banks. They share one physical
//! shape: a type code, an 84-character payload whose inner layout depends
//! on the type code, and the entry detail sequence number.

use crate::io::fields::{alpha_field, numeric_field, parse_alpha, parse_num};
use crate::records::{check_alphanumeric, check_mandatory, check_width, Addendum, RecordCodec};
use crate::types::{FieldError, FieldErrorKind};
use serde::{Deserialize, Serialize};

const TYPE_CODES: [&str; 9] = ["10", "11", "12", "13", "14", "15", "16", "17", "18"];

/// Type codes that every forward IAT entry carries exactly once
pub const MANDATORY_TYPE_CODES: std::ops::RangeInclusive<u8> = 10..=16;

/// At most this many remittance (17) addenda per entry
pub const MAX_REMITTANCE_ADDENDA: usize = 2;

/// At most this many foreign correspondent bank (18) addenda per entry
pub const MAX_CORRESPONDENT_ADDENDA: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IatAddenda {
    pub type_code: u8,
    /// Raw 84-character payload, layout depends on `type_code`
    pub payload: String,
    pub entry_detail_sequence_number: u32,
}

impl IatAddenda {
    pub fn new(type_code: u8, payload: impl Into<String>) -> Self {
        IatAddenda {
            type_code,
            payload: payload.into(),
            entry_detail_sequence_number: 0,
        }
    }
}

impl RecordCodec for IatAddenda {
    fn parse(line: &str) -> Self {
        IatAddenda {
            type_code: parse_num(line, 1, 3),
            payload: parse_alpha(line, 3, 87),
            entry_detail_sequence_number: parse_num(line, 87, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "7{}{}{}",
            numeric_field(self.type_code.into(), 2),
            alpha_field(&self.payload, 84),
            numeric_field(self.entry_detail_sequence_number.into(), 7),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        if !(10..=18).contains(&self.type_code) {
            return Err(FieldError::new("TypeCode", FieldErrorKind::TypeCode, self.type_code));
        }
        check_mandatory("PaymentRelatedInformation", &self.payload)?;
        check_alphanumeric("PaymentRelatedInformation", &self.payload)?;
        check_width(
            "EntryDetailSequenceNumber",
            self.entry_detail_sequence_number.into(),
            7,
        )?;
        Ok(())
    }
}

impl Addendum for IatAddenda {
    fn type_code(&self) -> &'static str {
        match self.type_code {
            10..=18 => TYPE_CODES[usize::from(self.type_code - 10)],
            _ => "",
        }
    }
}
