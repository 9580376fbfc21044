//! Batch control record (type `8`, domestic)
//!
//! Carries the totals of the batch it closes. The reader keeps whatever the
//! file declares; the batch compares those values against the totals it
//! computes from its entries.

use crate::io::fields::{alpha_field, numeric_field, parse_alpha, parse_num, parse_text, string_field};
use crate::records::{
    check_alphanumeric, check_routing, check_service_class, check_width, RecordCodec,
};
use crate::types::FieldError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchControl {
    pub service_class_code: u16,
    /// Entries plus addenda records in the batch
    pub entry_addenda_count: u32,
    /// Sum of the RDFI prefixes, truncated to ten digits
    pub entry_hash: u64,
    /// Cents
    pub total_debit: u64,
    /// Cents
    pub total_credit: u64,
    pub company_identification: String,
    pub message_authentication_code: String,
    pub odfi_identification: String,
    pub batch_number: u32,
}

impl BatchControl {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordCodec for BatchControl {
    fn parse(line: &str) -> Self {
        BatchControl {
            service_class_code: parse_num(line, 1, 4),
            entry_addenda_count: parse_num(line, 4, 10),
            entry_hash: parse_num(line, 10, 20),
            total_debit: parse_num(line, 20, 32),
            total_credit: parse_num(line, 32, 44),
            company_identification: parse_alpha(line, 44, 54),
            message_authentication_code: parse_alpha(line, 54, 73),
            odfi_identification: parse_text(line, 79, 87),
            batch_number: parse_num(line, 87, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "8{}{}{}{}{}{}{}{}{}{}",
            numeric_field(self.service_class_code.into(), 3),
            numeric_field(self.entry_addenda_count.into(), 6),
            numeric_field(self.entry_hash, 10),
            numeric_field(self.total_debit, 12),
            numeric_field(self.total_credit, 12),
            alpha_field(&self.company_identification, 10),
            alpha_field(&self.message_authentication_code, 19),
            alpha_field("", 6),
            string_field(&self.odfi_identification, 8),
            numeric_field(self.batch_number.into(), 7),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        check_service_class(self.service_class_code)?;
        check_width("EntryAddendaCount", self.entry_addenda_count.into(), 6)?;
        check_width("EntryHash", self.entry_hash, 10)?;
        check_width("TotalDebitEntryDollarAmount", self.total_debit, 12)?;
        check_width("TotalCreditEntryDollarAmount", self.total_credit, 12)?;
        check_alphanumeric("CompanyIdentification", &self.company_identification)?;
        check_alphanumeric("MessageAuthenticationCode", &self.message_authentication_code)?;
        check_routing("ODFIIdentification", &self.odfi_identification, 8)?;
        if self.batch_number == 0 {
            return Err(FieldError::mandatory("BatchNumber", self.batch_number));
        }
        Ok(())
    }
}
