//! Automated accounting advice (ADV) records
//!
//! ADV batches report settlement activity from an ACH operator to a
//! financial institution. Their entries and controls use wider amount
//! fields than the domestic layouts, and an ADV entry's trace key is built
//! from the operator routing number, julian day and sequence number.

use crate::io::fields::{
    alpha_field, numeric_field, parse_alpha, parse_num, parse_text, string_field,
};
use crate::records::{
    check_alphanumeric, check_mandatory, check_routing, check_routing_check_digit, check_width,
    RecordCodec,
};
use crate::types::{transaction_code, FieldError};
use serde::{Deserialize, Serialize};

/// Service class code of every ADV batch
pub const ADV_SERVICE_CLASS: u16 = 280;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdvEntryDetail {
    /// 81-88: odd credits, even debits
    pub transaction_code: u16,
    pub rdfi_identification: String,
    pub check_digit: String,
    pub dfi_account_number: String,
    /// Cents, twelve digits
    pub amount: u64,
    pub advice_routing_number: String,
    pub file_identification: String,
    pub ach_operator_data: String,
    pub individual_name: String,
    pub discretionary_data: String,
    pub addenda_record_indicator: u8,
    pub ach_operator_routing_number: String,
    pub julian_day: u16,
    pub sequence_number: u16,
}

impl AdvEntryDetail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operator routing, julian day and sequence number; orders and
    /// identifies ADV entries the way trace numbers do for other entries
    pub fn trace_number(&self) -> String {
        format!(
            "{}{}{}",
            string_field(&self.ach_operator_routing_number, 8),
            numeric_field(self.julian_day.into(), 3),
            numeric_field(self.sequence_number.into(), 4),
        )
    }

    pub fn is_credit(&self) -> bool {
        transaction_code::is_adv_credit(self.transaction_code)
    }

    pub fn is_debit(&self) -> bool {
        transaction_code::is_adv_debit(self.transaction_code)
    }
}

impl RecordCodec for AdvEntryDetail {
    fn parse(line: &str) -> Self {
        AdvEntryDetail {
            transaction_code: parse_num(line, 1, 3),
            rdfi_identification: parse_text(line, 3, 11),
            check_digit: parse_text(line, 11, 12),
            dfi_account_number: parse_alpha(line, 12, 27),
            amount: parse_num(line, 27, 39),
            advice_routing_number: parse_text(line, 39, 48),
            file_identification: parse_alpha(line, 48, 53),
            ach_operator_data: parse_alpha(line, 53, 54),
            individual_name: parse_alpha(line, 54, 76),
            discretionary_data: parse_alpha(line, 76, 78),
            addenda_record_indicator: parse_num(line, 78, 79),
            ach_operator_routing_number: parse_text(line, 79, 87),
            julian_day: parse_num(line, 87, 90),
            sequence_number: parse_num(line, 90, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "6{}{}{}{}{}{}{}{}{}{}{}{}{}{}",
            numeric_field(self.transaction_code.into(), 2),
            string_field(&self.rdfi_identification, 8),
            alpha_field(&self.check_digit, 1),
            alpha_field(&self.dfi_account_number, 15),
            numeric_field(self.amount, 12),
            string_field(&self.advice_routing_number, 9),
            alpha_field(&self.file_identification, 5),
            alpha_field(&self.ach_operator_data, 1),
            alpha_field(&self.individual_name, 22),
            alpha_field(&self.discretionary_data, 2),
            numeric_field(self.addenda_record_indicator.into(), 1),
            string_field(&self.ach_operator_routing_number, 8),
            numeric_field(self.julian_day.into(), 3),
            numeric_field(self.sequence_number.into(), 4),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        if !transaction_code::is_valid_adv(self.transaction_code) {
            return Err(FieldError::invalid("TransactionCode", self.transaction_code));
        }
        check_routing("RDFIIdentification", &self.rdfi_identification, 8)?;
        check_routing_check_digit(&self.rdfi_identification, &self.check_digit)?;
        check_mandatory("DFIAccountNumber", self.dfi_account_number.trim())?;
        check_alphanumeric("DFIAccountNumber", &self.dfi_account_number)?;
        check_width("Amount", self.amount, 12)?;
        check_routing("AdviceRoutingNumber", &self.advice_routing_number, 9)?;
        check_alphanumeric("FileIdentification", &self.file_identification)?;
        check_alphanumeric("ACHOperatorData", &self.ach_operator_data)?;
        check_mandatory("IndividualName", self.individual_name.trim())?;
        check_alphanumeric("IndividualName", &self.individual_name)?;
        check_alphanumeric("DiscretionaryData", &self.discretionary_data)?;
        if self.addenda_record_indicator > 1 {
            return Err(FieldError::invalid(
                "AddendaRecordIndicator",
                self.addenda_record_indicator,
            ));
        }
        check_routing("ACHOperatorRoutingNumber", &self.ach_operator_routing_number, 8)?;
        if !(1..=366).contains(&self.julian_day) {
            return Err(FieldError::invalid("JulianDay", self.julian_day));
        }
        check_width("SequenceNumber", self.sequence_number.into(), 4)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdvBatchControl {
    pub service_class_code: u16,
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    /// Cents, twenty digits
    pub total_debit: u64,
    /// Cents, twenty digits
    pub total_credit: u64,
    pub ach_operator_data: String,
    pub odfi_identification: String,
    pub batch_number: u32,
}

impl RecordCodec for AdvBatchControl {
    fn parse(line: &str) -> Self {
        AdvBatchControl {
            service_class_code: parse_num(line, 1, 4),
            entry_addenda_count: parse_num(line, 4, 10),
            entry_hash: parse_num(line, 10, 20),
            total_debit: parse_num(line, 20, 40),
            total_credit: parse_num(line, 40, 60),
            ach_operator_data: parse_alpha(line, 60, 79),
            odfi_identification: parse_text(line, 79, 87),
            batch_number: parse_num(line, 87, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "8{}{}{}{}{}{}{}{}",
            numeric_field(self.service_class_code.into(), 3),
            numeric_field(self.entry_addenda_count.into(), 6),
            numeric_field(self.entry_hash, 10),
            numeric_field(self.total_debit, 20),
            numeric_field(self.total_credit, 20),
            alpha_field(&self.ach_operator_data, 19),
            string_field(&self.odfi_identification, 8),
            numeric_field(self.batch_number.into(), 7),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        if self.service_class_code != ADV_SERVICE_CLASS {
            return Err(FieldError::invalid("ServiceClassCode", self.service_class_code));
        }
        check_width("EntryAddendaCount", self.entry_addenda_count.into(), 6)?;
        check_width("EntryHash", self.entry_hash, 10)?;
        check_alphanumeric("ACHOperatorData", &self.ach_operator_data)?;
        check_routing("ODFIIdentification", &self.odfi_identification, 8)?;
        if self.batch_number == 0 {
            return Err(FieldError::mandatory("BatchNumber", self.batch_number));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdvFileControl {
    pub batch_count: u32,
    pub block_count: u32,
    pub entry_addenda_count: u32,
    pub entry_hash: u64,
    pub total_debit: u64,
    pub total_credit: u64,
}

impl RecordCodec for AdvFileControl {
    fn parse(line: &str) -> Self {
        AdvFileControl {
            batch_count: parse_num(line, 1, 7),
            block_count: parse_num(line, 7, 13),
            entry_addenda_count: parse_num(line, 13, 21),
            entry_hash: parse_num(line, 21, 31),
            total_debit: parse_num(line, 31, 51),
            total_credit: parse_num(line, 51, 71),
        }
    }

    fn render(&self) -> String {
        format!(
            "9{}{}{}{}{}{}{}",
            numeric_field(self.batch_count.into(), 6),
            numeric_field(self.block_count.into(), 6),
            numeric_field(self.entry_addenda_count.into(), 8),
            numeric_field(self.entry_hash, 10),
            numeric_field(self.total_debit, 20),
            numeric_field(self.total_credit, 20),
            alpha_field("", 23),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        check_width("BatchCount", self.batch_count.into(), 6)?;
        check_width("BlockCount", self.block_count.into(), 6)?;
        check_width("EntryAddendaCount", self.entry_addenda_count.into(), 8)?;
        check_width("EntryHash", self.entry_hash, 10)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldErrorKind;

    const ENTRY: &str = "681231380104744-5678-99    00000005000012104288211111 Name                    0231380100500001";
    const BATCH_CONTROL: &str = "828000000100231380100000000000000000000000000000000000050000                   231380100000001";
    const FILE_CONTROL: &str = "90000010000010000000100231380100000000000000000000000000000000000050000                       ";

    #[test]
    fn test_entry_parse_and_render() {
        assert_eq!(ENTRY.len(), 94);
        let entry = AdvEntryDetail::parse(ENTRY);
        assert_eq!(entry.transaction_code, 81);
        assert_eq!(entry.rdfi_identification, "23138010");
        assert_eq!(entry.check_digit, "4");
        assert_eq!(entry.dfi_account_number, "744-5678-99");
        assert_eq!(entry.amount, 50000);
        assert_eq!(entry.advice_routing_number, "121042882");
        assert_eq!(entry.file_identification, "11111");
        assert_eq!(entry.individual_name, "Name");
        assert_eq!(entry.ach_operator_routing_number, "23138010");
        assert_eq!(entry.julian_day, 50);
        assert_eq!(entry.sequence_number, 1);
        assert_eq!(entry.trace_number(), "231380100500001");
        assert!(entry.is_credit());
        assert_eq!(entry.validate(), Ok(()));
        assert_eq!(entry.render(), ENTRY);
    }

    #[test]
    fn test_entry_rejects_domestic_transaction_code() {
        let mut entry = AdvEntryDetail::parse(ENTRY);
        entry.transaction_code = 22;
        let err = entry.validate().unwrap_err();
        assert_eq!(err.field_name, "TransactionCode");
        assert_eq!(err.kind, FieldErrorKind::InvalidValue);
    }

    #[test]
    fn test_batch_control_parse_and_render() {
        assert_eq!(BATCH_CONTROL.len(), 94);
        let control = AdvBatchControl::parse(BATCH_CONTROL);
        assert_eq!(control.service_class_code, 280);
        assert_eq!(control.entry_addenda_count, 1);
        assert_eq!(control.entry_hash, 23138010);
        assert_eq!(control.total_debit, 0);
        assert_eq!(control.total_credit, 50000);
        assert_eq!(control.validate(), Ok(()));
        assert_eq!(control.render(), BATCH_CONTROL);
    }

    #[test]
    fn test_file_control_parse_and_render() {
        assert_eq!(FILE_CONTROL.len(), 94);
        let control = AdvFileControl::parse(FILE_CONTROL);
        assert_eq!(control.batch_count, 1);
        assert_eq!(control.total_credit, 50000);
        assert_eq!(control.validate(), Ok(()));
        assert_eq!(control.render(), FILE_CONTROL);
    }
}
