//! Batch header record (type `5`, domestic)

use crate::io::fields::{
    alpha_field, date_field, is_valid_yymmdd, numeric_field, parse_alpha, parse_num, parse_text,
    slice, string_field,
};
use crate::records::{
    check_alphanumeric, check_mandatory, check_routing, check_service_class, RecordCodec,
};
use crate::types::FieldError;
use serde::{Deserialize, Serialize};

/// Offset of the Standard Entry Class code, also used to spot IAT headers
pub const SEC_CODE_RANGE: (usize, usize) = (50, 53);

/// Standard Entry Class code of international batches
pub const IAT: &str = "IAT";

/// Standard Entry Class code of accounting-advice batches
pub const ADV: &str = "ADV";

/// Whether a raw batch header line starts an IAT batch
pub fn is_iat_line(line: &str) -> bool {
    slice(line, SEC_CODE_RANGE.0, SEC_CODE_RANGE.1) == IAT
}

/// Batch header record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BatchHeader {
    /// 200 mixed, 220 credits only, 225 debits only, 280 ADV
    pub service_class_code: u16,
    pub company_name: String,
    pub company_discretionary_data: String,
    pub company_identification: String,
    /// Selects the business rule-set for the batch (PPD, CCD, WEB, ...)
    pub standard_entry_class_code: String,
    pub company_entry_description: String,
    pub company_descriptive_date: String,
    /// YYMMDD
    pub effective_entry_date: String,
    /// Julian day, inserted by the ACH operator
    pub settlement_date: String,
    pub originator_status_code: u8,
    /// First eight digits of the originating DFI routing number
    pub odfi_identification: String,
    pub batch_number: u32,
}

impl BatchHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// The header with its batch number cleared, used to decide whether two
    /// batches may be combined
    pub fn signature(&self) -> BatchHeader {
        BatchHeader {
            batch_number: 0,
            ..self.clone()
        }
    }

    pub fn is_adv(&self) -> bool {
        self.standard_entry_class_code == ADV
    }
}

impl RecordCodec for BatchHeader {
    fn parse(line: &str) -> Self {
        BatchHeader {
            service_class_code: parse_num(line, 1, 4),
            company_name: parse_alpha(line, 4, 20),
            company_discretionary_data: parse_alpha(line, 20, 40),
            company_identification: parse_alpha(line, 40, 50),
            standard_entry_class_code: parse_alpha(line, 50, 53),
            company_entry_description: parse_alpha(line, 53, 63),
            company_descriptive_date: parse_alpha(line, 63, 69),
            effective_entry_date: parse_text(line, 69, 75),
            settlement_date: parse_alpha(line, 75, 78),
            originator_status_code: parse_num(line, 78, 79),
            odfi_identification: parse_text(line, 79, 87),
            batch_number: parse_num(line, 87, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "5{}{}{}{}{}{}{}{}{}{}{}{}",
            numeric_field(self.service_class_code.into(), 3),
            alpha_field(&self.company_name, 16),
            alpha_field(&self.company_discretionary_data, 20),
            alpha_field(&self.company_identification, 10),
            alpha_field(&self.standard_entry_class_code, 3),
            alpha_field(&self.company_entry_description, 10),
            alpha_field(&self.company_descriptive_date, 6),
            date_field(&self.effective_entry_date),
            alpha_field(&self.settlement_date, 3),
            numeric_field(self.originator_status_code.into(), 1),
            string_field(&self.odfi_identification, 8),
            numeric_field(self.batch_number.into(), 7),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        check_service_class(self.service_class_code)?;
        check_mandatory("CompanyName", &self.company_name)?;
        check_alphanumeric("CompanyName", &self.company_name)?;
        check_alphanumeric("CompanyDiscretionaryData", &self.company_discretionary_data)?;
        check_mandatory("CompanyIdentification", &self.company_identification)?;
        check_alphanumeric("CompanyIdentification", &self.company_identification)?;
        let sec = &self.standard_entry_class_code;
        if sec.len() != 3 || !sec.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(FieldError::invalid("StandardEntryClassCode", sec));
        }
        check_mandatory("CompanyEntryDescription", &self.company_entry_description)?;
        check_alphanumeric("CompanyEntryDescription", &self.company_entry_description)?;
        check_alphanumeric("CompanyDescriptiveDate", &self.company_descriptive_date)?;
        if !is_valid_yymmdd(&self.effective_entry_date) {
            return Err(FieldError::invalid_date(
                "EffectiveEntryDate",
                &self.effective_entry_date,
            ));
        }
        check_alphanumeric("SettlementDate", &self.settlement_date)?;
        if self.originator_status_code > 2 {
            return Err(FieldError::invalid(
                "OriginatorStatusCode",
                self.originator_status_code,
            ));
        }
        check_routing("ODFIIdentification", &self.odfi_identification, 8)?;
        if self.batch_number == 0 {
            return Err(FieldError::mandatory("BatchNumber", self.batch_number));
        }
        Ok(())
    }
}
