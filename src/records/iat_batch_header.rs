//! IAT batch header record (type `5` with SEC code `IAT`)
//!
//! International batches replace the company fields of the domestic header
//! with foreign exchange and currency information.

use crate::io::fields::{
    alpha_field, date_field, is_valid_yymmdd, numeric_field, parse_alpha, parse_num, parse_text,
    string_field,
};
use crate::records::batch_header::IAT;
use crate::records::{
    check_alphanumeric, check_mandatory, check_routing, check_service_class, RecordCodec,
};
use crate::types::FieldError;
use serde::{Deserialize, Serialize};

fn is_upper_alpha(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_uppercase())
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IatBatchHeader {
    pub service_class_code: u16,
    pub iat_indicator: String,
    /// FV fixed-to-variable, VF variable-to-fixed, FF fixed-to-fixed
    pub foreign_exchange_indicator: String,
    /// 1 rate, 2 reference number, 3 blank
    pub foreign_exchange_reference_indicator: u8,
    pub foreign_exchange_reference: String,
    pub iso_destination_country_code: String,
    pub originator_identification: String,
    pub standard_entry_class_code: String,
    pub company_entry_description: String,
    pub iso_originating_currency_code: String,
    pub iso_destination_currency_code: String,
    pub effective_entry_date: String,
    pub settlement_date: String,
    pub originator_status_code: u8,
    pub odfi_identification: String,
    pub batch_number: u32,
}

impl IatBatchHeader {
    pub fn new() -> Self {
        IatBatchHeader {
            standard_entry_class_code: IAT.to_string(),
            ..Default::default()
        }
    }
}

impl RecordCodec for IatBatchHeader {
    fn parse(line: &str) -> Self {
        IatBatchHeader {
            service_class_code: parse_num(line, 1, 4),
            iat_indicator: parse_alpha(line, 4, 20),
            foreign_exchange_indicator: parse_alpha(line, 20, 22),
            foreign_exchange_reference_indicator: parse_num(line, 22, 23),
            foreign_exchange_reference: parse_alpha(line, 23, 38),
            iso_destination_country_code: parse_alpha(line, 38, 40),
            originator_identification: parse_alpha(line, 40, 50),
            standard_entry_class_code: parse_alpha(line, 50, 53),
            company_entry_description: parse_alpha(line, 53, 63),
            iso_originating_currency_code: parse_alpha(line, 63, 66),
            iso_destination_currency_code: parse_alpha(line, 66, 69),
            effective_entry_date: parse_text(line, 69, 75),
            settlement_date: parse_alpha(line, 75, 78),
            originator_status_code: parse_num(line, 78, 79),
            odfi_identification: parse_text(line, 79, 87),
            batch_number: parse_num(line, 87, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "5{}{}{}{}{}{}{}{}{}{}{}{}{}{}{}{}",
            numeric_field(self.service_class_code.into(), 3),
            alpha_field(&self.iat_indicator, 16),
            alpha_field(&self.foreign_exchange_indicator, 2),
            numeric_field(self.foreign_exchange_reference_indicator.into(), 1),
            alpha_field(&self.foreign_exchange_reference, 15),
            alpha_field(&self.iso_destination_country_code, 2),
            alpha_field(&self.originator_identification, 10),
            alpha_field(&self.standard_entry_class_code, 3),
            alpha_field(&self.company_entry_description, 10),
            alpha_field(&self.iso_originating_currency_code, 3),
            alpha_field(&self.iso_destination_currency_code, 3),
            date_field(&self.effective_entry_date),
            alpha_field(&self.settlement_date, 3),
            numeric_field(self.originator_status_code.into(), 1),
            string_field(&self.odfi_identification, 8),
            numeric_field(self.batch_number.into(), 7),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        check_service_class(self.service_class_code)?;
        check_alphanumeric("IATIndicator", &self.iat_indicator)?;
        if !matches!(self.foreign_exchange_indicator.as_str(), "FV" | "VF" | "FF") {
            return Err(FieldError::invalid(
                "ForeignExchangeIndicator",
                &self.foreign_exchange_indicator,
            ));
        }
        if !(1..=3).contains(&self.foreign_exchange_reference_indicator) {
            return Err(FieldError::invalid(
                "ForeignExchangeReferenceIndicator",
                self.foreign_exchange_reference_indicator,
            ));
        }
        check_alphanumeric("ForeignExchangeReference", &self.foreign_exchange_reference)?;
        if !is_upper_alpha(&self.iso_destination_country_code, 2) {
            return Err(FieldError::invalid(
                "ISODestinationCountryCode",
                &self.iso_destination_country_code,
            ));
        }
        check_mandatory("OriginatorIdentification", &self.originator_identification)?;
        check_alphanumeric("OriginatorIdentification", &self.originator_identification)?;
        if self.standard_entry_class_code != IAT {
            return Err(FieldError::invalid(
                "StandardEntryClassCode",
                &self.standard_entry_class_code,
            ));
        }
        check_mandatory("CompanyEntryDescription", &self.company_entry_description)?;
        check_alphanumeric("CompanyEntryDescription", &self.company_entry_description)?;
        if !is_upper_alpha(&self.iso_originating_currency_code, 3) {
            return Err(FieldError::invalid(
                "ISOOriginatingCurrencyCode",
                &self.iso_originating_currency_code,
            ));
        }
        if !is_upper_alpha(&self.iso_destination_currency_code, 3) {
            return Err(FieldError::invalid(
                "ISODestinationCurrencyCode",
                &self.iso_destination_currency_code,
            ));
        }
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
