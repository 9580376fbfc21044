//! Addenda05: free-form payment-related information

use crate::io::fields::{alpha_field, numeric_field, parse_alpha, parse_num};
use crate::records::{check_alphanumeric, check_width, Addendum, RecordCodec};
use crate::types::FieldError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Addenda05 {
    pub payment_related_information: String,
    /// Position of this addenda among the entry's Addenda05 records, from 1
    pub sequence_number: u32,
    /// Last seven digits of the owning entry's trace number
    pub entry_detail_sequence_number: u32,
}

impl Addenda05 {
    pub fn new(payment_related_information: impl Into<String>) -> Self {
        Addenda05 {
            payment_related_information: payment_related_information.into(),
            ..Default::default()
        }
    }
}

impl RecordCodec for Addenda05 {
    fn parse(line: &str) -> Self {
        Addenda05 {
            payment_related_information: parse_alpha(line, 3, 83),
            sequence_number: parse_num(line, 83, 87),
            entry_detail_sequence_number: parse_num(line, 87, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "705{}{}{}",
            alpha_field(&self.payment_related_information, 80),
            numeric_field(self.sequence_number.into(), 4),
            numeric_field(self.entry_detail_sequence_number.into(), 7),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        check_alphanumeric("PaymentRelatedInformation", &self.payment_related_information)?;
        if self.sequence_number == 0 {
            return Err(FieldError::mandatory("SequenceNumber", self.sequence_number));
        }
        check_width("SequenceNumber", self.sequence_number.into(), 4)?;
        check_width(
            "EntryDetailSequenceNumber",
            self.entry_detail_sequence_number.into(),
            7,
        )?;
        Ok(())
    }
}

impl Addendum for Addenda05 {
    fn type_code(&self) -> &'static str {
        "05"
    }
}
