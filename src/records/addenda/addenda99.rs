//! Addenda99 family: returns, dishonored returns and contested dishonored
//! returns
//!
//! All three share type code `99`. The reason code in columns 4-6 selects
//! the layout; see [`super::Addenda::parse`].

use crate::core::codes::{is_contested_return_code, is_dishonored_return_code, return_code};
use crate::io::fields::{
    alpha_field, date_field, is_numeric, is_valid_yymmdd, parse_alpha, parse_text, string_field,
};
use crate::records::{
    check_alphanumeric, check_routing, check_trace_number, Addendum, RecordCodec,
};
use crate::types::FieldError;
use serde::{Deserialize, Serialize};

/// Optional short numeric field: blank, or digits of exactly `width`
fn check_optional_digits(field: &'static str, value: &str, width: usize) -> Result<(), FieldError> {
    if value.is_empty() {
        return Ok(());
    }
    if !is_numeric(value) {
        return Err(FieldError::non_numeric(field, value));
    }
    if value.len() != width {
        return Err(FieldError::invalid(field, value));
    }
    Ok(())
}

/// Return entry addenda
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Addenda99 {
    /// R-code, see [`crate::core::codes::return_code`]
    pub return_code: String,
    pub original_trace: String,
    /// YYMMDD, only for deceased-beneficiary returns
    pub date_of_death: String,
    pub original_dfi: String,
    pub addenda_information: String,
    pub trace_number: String,
}

impl RecordCodec for Addenda99 {
    fn parse(line: &str) -> Self {
        Addenda99 {
            return_code: parse_alpha(line, 3, 6),
            original_trace: parse_text(line, 6, 21),
            date_of_death: parse_text(line, 21, 27),
            original_dfi: parse_text(line, 27, 35),
            addenda_information: parse_alpha(line, 35, 79),
            trace_number: parse_text(line, 79, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "799{}{}{}{}{}{}",
            alpha_field(&self.return_code, 3),
            string_field(&self.original_trace, 15),
            date_field(&self.date_of_death),
            string_field(&self.original_dfi, 8),
            alpha_field(&self.addenda_information, 44),
            string_field(&self.trace_number, 15),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        if return_code(&self.return_code).is_none() {
            return Err(FieldError::invalid("ReturnCode", &self.return_code));
        }
        check_trace_number("OriginalTrace", &self.original_trace)?;
        if !self.date_of_death.is_empty() && !is_valid_yymmdd(&self.date_of_death) {
            return Err(FieldError::invalid_date("DateOfDeath", &self.date_of_death));
        }
        check_routing("OriginalDFI", &self.original_dfi, 8)?;
        check_alphanumeric("AddendaInformation", &self.addenda_information)?;
        check_trace_number("TraceNumber", &self.trace_number)?;
        Ok(())
    }
}

impl Addendum for Addenda99 {
    fn type_code(&self) -> &'static str {
        "99"
    }
}

/// Dishonored return addenda, sent by the ODFI when it refuses a return
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Addenda99Dishonored {
    pub dishonored_return_reason_code: String,
    pub original_entry_trace_number: String,
    pub original_receiving_dfi_identification: String,
    pub return_trace_number: String,
    /// Julian day
    pub return_settlement_date: String,
    pub return_reason_code: String,
    pub addenda_information: String,
    pub trace_number: String,
}

impl RecordCodec for Addenda99Dishonored {
    fn parse(line: &str) -> Self {
        Addenda99Dishonored {
            dishonored_return_reason_code: parse_alpha(line, 3, 6),
            original_entry_trace_number: parse_text(line, 6, 21),
            original_receiving_dfi_identification: parse_text(line, 27, 35),
            return_trace_number: parse_text(line, 38, 53),
            return_settlement_date: parse_text(line, 53, 56),
            return_reason_code: parse_text(line, 56, 58),
            addenda_information: parse_alpha(line, 58, 79),
            trace_number: parse_text(line, 79, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "799{}{}{}{}{}{}{}{}{}{}",
            alpha_field(&self.dishonored_return_reason_code, 3),
            string_field(&self.original_entry_trace_number, 15),
            alpha_field("", 6),
            string_field(&self.original_receiving_dfi_identification, 8),
            alpha_field("", 3),
            string_field(&self.return_trace_number, 15),
            alpha_field(&self.return_settlement_date, 3),
            alpha_field(&self.return_reason_code, 2),
            alpha_field(&self.addenda_information, 21),
            string_field(&self.trace_number, 15),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        if !is_dishonored_return_code(&self.dishonored_return_reason_code) {
            return Err(FieldError::invalid(
                "DishonoredReturnReasonCode",
                &self.dishonored_return_reason_code,
            ));
        }
        check_trace_number("OriginalEntryTraceNumber", &self.original_entry_trace_number)?;
        check_routing(
            "OriginalReceivingDFIIdentification",
            &self.original_receiving_dfi_identification,
            8,
        )?;
        check_trace_number("ReturnTraceNumber", &self.return_trace_number)?;
        check_optional_digits("ReturnSettlementDate", &self.return_settlement_date, 3)?;
        check_optional_digits("ReturnReasonCode", &self.return_reason_code, 2)?;
        check_alphanumeric("AddendaInformation", &self.addenda_information)?;
        check_trace_number("TraceNumber", &self.trace_number)?;
        Ok(())
    }
}

impl Addendum for Addenda99Dishonored {
    fn type_code(&self) -> &'static str {
        "99"
    }
}

/// Contested dishonored return addenda, sent by the RDFI to dispute a
/// dishonor
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Addenda99Contested {
    pub contested_return_code: String,
    pub original_entry_trace_number: String,
    /// YYMMDD
    pub date_original_entry_returned: String,
    pub original_receiving_dfi_identification: String,
    pub original_settlement_date: String,
    pub return_trace_number: String,
    pub return_settlement_date: String,
    pub return_reason_code: String,
    pub dishonored_return_trace_number: String,
    pub dishonored_return_settlement_date: String,
    pub dishonored_return_reason_code: String,
    pub trace_number: String,
}

impl RecordCodec for Addenda99Contested {
    fn parse(line: &str) -> Self {
        Addenda99Contested {
            contested_return_code: parse_alpha(line, 3, 6),
            original_entry_trace_number: parse_text(line, 6, 21),
            date_original_entry_returned: parse_text(line, 21, 27),
            original_receiving_dfi_identification: parse_text(line, 27, 35),
            original_settlement_date: parse_text(line, 35, 38),
            return_trace_number: parse_text(line, 38, 53),
            return_settlement_date: parse_text(line, 53, 56),
            return_reason_code: parse_text(line, 56, 58),
            dishonored_return_trace_number: parse_text(line, 58, 73),
            dishonored_return_settlement_date: parse_text(line, 73, 76),
            dishonored_return_reason_code: parse_text(line, 76, 78),
            trace_number: parse_text(line, 79, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "799{}{}{}{}{}{}{}{}{}{}{}{}{}",
            alpha_field(&self.contested_return_code, 3),
            string_field(&self.original_entry_trace_number, 15),
            date_field(&self.date_original_entry_returned),
            string_field(&self.original_receiving_dfi_identification, 8),
            alpha_field(&self.original_settlement_date, 3),
            string_field(&self.return_trace_number, 15),
            alpha_field(&self.return_settlement_date, 3),
            alpha_field(&self.return_reason_code, 2),
            string_field(&self.dishonored_return_trace_number, 15),
            alpha_field(&self.dishonored_return_settlement_date, 3),
            alpha_field(&self.dishonored_return_reason_code, 2),
            alpha_field("", 1),
            string_field(&self.trace_number, 15),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        if !is_contested_return_code(&self.contested_return_code) {
            return Err(FieldError::invalid(
                "ContestedReturnCode",
                &self.contested_return_code,
            ));
        }
        check_trace_number("OriginalEntryTraceNumber", &self.original_entry_trace_number)?;
        if !is_valid_yymmdd(&self.date_original_entry_returned) {
            return Err(FieldError::invalid_date(
                "DateOriginalEntryReturned",
                &self.date_original_entry_returned,
            ));
        }
        check_routing(
            "OriginalReceivingDFIIdentification",
            &self.original_receiving_dfi_identification,
            8,
        )?;
        check_optional_digits("OriginalSettlementDate", &self.original_settlement_date, 3)?;
        check_trace_number("ReturnTraceNumber", &self.return_trace_number)?;
        check_optional_digits("ReturnSettlementDate", &self.return_settlement_date, 3)?;
        check_optional_digits("ReturnReasonCode", &self.return_reason_code, 2)?;
        check_trace_number(
            "DishonoredReturnTraceNumber",
            &self.dishonored_return_trace_number,
        )?;
        check_optional_digits(
            "DishonoredReturnSettlementDate",
            &self.dishonored_return_settlement_date,
            3,
        )?;
        check_optional_digits(
            "DishonoredReturnReasonCode",
            &self.dishonored_return_reason_code,
            2,
        )?;
        check_trace_number("TraceNumber", &self.trace_number)?;
        Ok(())
    }
}

impl Addendum for Addenda99Contested {
    fn type_code(&self) -> &'static str {
        "99"
    }
}
