//! Entry detail record (type `6`, domestic)
//!
//! An entry is one credit or debit instruction. It owns the addenda attached
//! to it: at most one per category-specific slot plus any number of
//! payment-related Addenda05 records. Which slots may be filled depends on
//! the entry's [`Category`], and attaching an addenda sets that category.

use crate::io::fields::{
    alpha_field, numeric_field, parse_alpha, parse_num, parse_text, slice, string_field,
};
use crate::records::{
    check_alphanumeric, check_mandatory, check_routing, check_routing_check_digit,
    check_trace_number, check_width, Addenda, Addenda02, Addenda05, Addenda98, Addenda99,
    Addenda99Contested, Addenda99Dishonored, RecordCodec,
};
use crate::types::{transaction_code, AchError, Category, FieldError};
use serde::{Deserialize, Serialize};

/// Entry detail record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntryDetail {
    pub transaction_code: u16,
    /// First eight digits of the receiving DFI routing number
    pub rdfi_identification: String,
    /// Ninth digit of the receiving DFI routing number
    pub check_digit: String,
    pub dfi_account_number: String,
    /// Amount in cents
    pub amount: u64,
    pub identification_number: String,
    pub individual_name: String,
    pub discretionary_data: String,
    /// 1 when at least one addenda follows the entry
    pub addenda_record_indicator: u8,
    /// ODFI routing prefix (8) followed by a sequence number (7)
    pub trace_number: String,

    pub category: Category,
    pub addenda02: Option<Addenda02>,
    pub addenda05: Vec<Addenda05>,
    pub addenda98: Option<Addenda98>,
    pub addenda99: Option<Addenda99>,
    pub addenda99_dishonored: Option<Addenda99Dishonored>,
    pub addenda99_contested: Option<Addenda99Contested>,
}

impl EntryDetail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RDFI identification and check digit from a 9-digit routing number
    pub fn set_rdfi(&mut self, routing_number: &str) {
        self.rdfi_identification = slice(routing_number, 0, 8).to_string();
        self.check_digit = slice(routing_number, 8, 9).to_string();
    }

    /// Build a trace number from an ODFI prefix and a sequence number.
    /// Attached addenda that repeat the trace number get the new one too.
    pub fn set_trace_number(&mut self, odfi_identification: &str, sequence: u64) {
        let trace = format!(
            "{}{}",
            string_field(odfi_identification, 8),
            numeric_field(sequence, 7)
        );
        if let Some(addenda) = self.addenda02.as_mut() {
            addenda.trace_number = trace.clone();
        }
        if let Some(addenda) = self.addenda98.as_mut() {
            addenda.trace_number = trace.clone();
        }
        if let Some(addenda) = self.addenda99.as_mut() {
            addenda.trace_number = trace.clone();
        }
        if let Some(addenda) = self.addenda99_dishonored.as_mut() {
            addenda.trace_number = trace.clone();
        }
        if let Some(addenda) = self.addenda99_contested.as_mut() {
            addenda.trace_number = trace.clone();
        }
        self.trace_number = trace;
    }

    /// The last seven digits of the trace number
    pub fn trace_sequence(&self) -> u64 {
        let trace = string_field(&self.trace_number, 15);
        slice(&trace, 8, 15).parse().unwrap_or(0)
    }

    pub fn is_credit(&self) -> bool {
        transaction_code::is_credit(self.transaction_code)
    }

    pub fn is_debit(&self) -> bool {
        transaction_code::is_debit(self.transaction_code)
    }

    /// Number of addenda records attached
    pub fn addenda_count(&self) -> usize {
        usize::from(self.addenda02.is_some())
            + self.addenda05.len()
            + usize::from(self.addenda98.is_some())
            + usize::from(self.addenda99.is_some())
            + usize::from(self.addenda99_dishonored.is_some())
            + usize::from(self.addenda99_contested.is_some())
    }

    /// Attach a parsed addenda to its slot, updating the entry category.
    ///
    /// Fails when the slot is already taken or the addenda belongs to a
    /// different category than the one the entry already has.
    pub fn attach_addenda(&mut self, addenda: Addenda) -> Result<(), AchError> {
        match addenda {
            Addenda::Addenda02(a) => {
                self.require_forward("Addenda02")?;
                if self.addenda02.is_some() {
                    return Err(AchError::addenda_slot("Addenda02", "entry already has one"));
                }
                self.addenda02 = Some(a);
            }
            Addenda::Addenda05(a) => {
                self.require_forward("Addenda05")?;
                self.addenda05.push(a);
            }
            Addenda::Addenda98(a) => {
                self.claim_category("Addenda98", Category::Noc)?;
                self.addenda98 = Some(a);
            }
            Addenda::Addenda99(a) => {
                self.claim_category("Addenda99", Category::Return)?;
                self.addenda99 = Some(a);
            }
            Addenda::Addenda99Dishonored(a) => {
                self.claim_category("Addenda99Dishonored", Category::DishonoredReturn)?;
                self.addenda99_dishonored = Some(a);
            }
            Addenda::Addenda99Contested(a) => {
                self.claim_category(
                    "Addenda99Contested",
                    Category::DishonoredReturnContested,
                )?;
                self.addenda99_contested = Some(a);
            }
            Addenda::Iat(_) => {
                return Err(AchError::addenda_slot(
                    "IATAddenda",
                    "IAT addenda are only legal inside an IAT batch",
                ))
            }
        }
        Ok(())
    }

    fn require_forward(&self, addenda: &'static str) -> Result<(), AchError> {
        if self.category == Category::Forward {
            Ok(())
        } else {
            Err(AchError::addenda_slot(
                addenda,
                format!("entry is already categorised as {}", self.category),
            ))
        }
    }

    /// A category-specific addenda may only be attached once, and only to an
    /// entry that has no payment-related addenda
    fn claim_category(&mut self, addenda: &'static str, category: Category) -> Result<(), AchError> {
        if self.category != Category::Forward {
            return Err(AchError::addenda_slot(
                addenda,
                format!("entry is already categorised as {}", self.category),
            ));
        }
        if self.addenda02.is_some() || !self.addenda05.is_empty() {
            return Err(AchError::addenda_slot(
                addenda,
                "entry already carries forward addenda",
            ));
        }
        self.category = category;
        Ok(())
    }

    /// Name of the first attached addenda that is illegal for the entry's
    /// category, if any
    pub fn illegal_addenda(&self) -> Option<&'static str> {
        let forward = self.addenda02.is_some() || !self.addenda05.is_empty();
        let slots = [
            ("Addenda02/05", forward, Category::Forward),
            ("Addenda98", self.addenda98.is_some(), Category::Noc),
            ("Addenda99", self.addenda99.is_some(), Category::Return),
            (
                "Addenda99Dishonored",
                self.addenda99_dishonored.is_some(),
                Category::DishonoredReturn,
            ),
            (
                "Addenda99Contested",
                self.addenda99_contested.is_some(),
                Category::DishonoredReturnContested,
            ),
        ];
        slots
            .into_iter()
            .find(|(_, present, category)| *present && *category != self.category)
            .map(|(name, _, _)| name)
    }

    /// Render every attached addenda in file order: 02, each 05 in sequence
    /// order, 98, then the 99 variant
    pub fn addenda_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.addenda_count());
        if let Some(a) = &self.addenda02 {
            lines.push(a.render());
        }
        let mut addenda05: Vec<&Addenda05> = self.addenda05.iter().collect();
        addenda05.sort_by_key(|a| a.sequence_number);
        lines.extend(addenda05.into_iter().map(RecordCodec::render));
        if let Some(a) = &self.addenda98 {
            lines.push(a.render());
        }
        if let Some(a) = &self.addenda99 {
            lines.push(a.render());
        }
        if let Some(a) = &self.addenda99_dishonored {
            lines.push(a.render());
        }
        if let Some(a) = &self.addenda99_contested {
            lines.push(a.render());
        }
        lines
    }

    /// Validate every attached addenda record, first failure wins
    pub fn validate_addenda(&self) -> Result<(), FieldError> {
        if let Some(a) = &self.addenda02 {
            a.validate()?;
        }
        for a in &self.addenda05 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda98 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda99 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda99_dishonored {
            a.validate()?;
        }
        if let Some(a) = &self.addenda99_contested {
            a.validate()?;
        }
        Ok(())
    }
}

impl RecordCodec for EntryDetail {
    fn parse(line: &str) -> Self {
        EntryDetail {
            transaction_code: parse_num(line, 1, 3),
            rdfi_identification: parse_text(line, 3, 11),
            check_digit: parse_text(line, 11, 12),
            dfi_account_number: parse_alpha(line, 12, 29),
            amount: parse_num(line, 29, 39),
            identification_number: parse_alpha(line, 39, 54),
            individual_name: parse_alpha(line, 54, 76),
            discretionary_data: parse_alpha(line, 76, 78),
            addenda_record_indicator: parse_num(line, 78, 79),
            trace_number: parse_text(line, 79, 94),
            ..Default::default()
        }
    }

    fn render(&self) -> String {
        format!(
            "6{}{}{}{}{}{}{}{}{}{}",
            numeric_field(self.transaction_code.into(), 2),
            string_field(&self.rdfi_identification, 8),
            alpha_field(&self.check_digit, 1),
            alpha_field(&self.dfi_account_number, 17),
            numeric_field(self.amount, 10),
            alpha_field(&self.identification_number, 15),
            alpha_field(&self.individual_name, 22),
            alpha_field(&self.discretionary_data, 2),
            numeric_field(self.addenda_record_indicator.into(), 1),
            string_field(&self.trace_number, 15),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        if !transaction_code::is_valid(self.transaction_code) {
            return Err(FieldError::invalid("TransactionCode", self.transaction_code));
        }
        check_routing("RDFIIdentification", &self.rdfi_identification, 8)?;
        check_routing_check_digit(&self.rdfi_identification, &self.check_digit)?;
        check_mandatory("DFIAccountNumber", self.dfi_account_number.trim())?;
        check_alphanumeric("DFIAccountNumber", &self.dfi_account_number)?;
        check_width("Amount", self.amount, 10)?;
        if transaction_code::is_prenote(self.transaction_code) && self.amount != 0 {
            return Err(FieldError::invalid("Amount", self.amount));
        }
        check_alphanumeric("IdentificationNumber", &self.identification_number)?;
        check_alphanumeric("IndividualName", &self.individual_name)?;
        check_alphanumeric("DiscretionaryData", &self.discretionary_data)?;
        if self.addenda_record_indicator > 1 {
            return Err(FieldError::invalid(
                "AddendaRecordIndicator",
                self.addenda_record_indicator,
            ));
        }
        check_trace_number("TraceNumber", &self.trace_number)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldErrorKind;
    use rstest::rstest;

    pub(crate) const SAMPLE: &str = "62723138010412345678         0100000000               Receiver Account Name   0231380100000001";
    const ADDENDA05: &str = "705Payment for invoice 100                                                         00010000001";
    const ADDENDA99: &str = "799R07099912340000015      09101298Authorization revoked                       091012980000066";
    const ADDENDA98: &str = "798C01121042880000001      121042881918171614                                  091012980000088";

    #[test]
    fn test_parse_sample() {
        assert_eq!(SAMPLE.len(), 94);
        let entry = EntryDetail::parse(SAMPLE);
        assert_eq!(entry.transaction_code, 27);
        assert_eq!(entry.rdfi_identification, "23138010");
        assert_eq!(entry.check_digit, "4");
        assert_eq!(entry.dfi_account_number, "12345678");
        assert_eq!(entry.amount, 100000000);
        assert_eq!(entry.individual_name, "Receiver Account Name");
        assert_eq!(entry.addenda_record_indicator, 0);
        assert_eq!(entry.trace_number, "231380100000001");
        assert_eq!(entry.category, Category::Forward);
        assert!(entry.is_debit());
        assert_eq!(entry.trace_sequence(), 1);
        assert_eq!(entry.validate(), Ok(()));
    }

    #[test]
    fn test_render_round_trips() {
        assert_eq!(EntryDetail::parse(SAMPLE).render(), SAMPLE);
    }

    #[test]
    fn test_set_trace_number() {
        let mut entry = EntryDetail::parse(SAMPLE);
        entry.set_trace_number("12104288", 42);
        assert_eq!(entry.trace_number, "121042880000042");
        assert_eq!(entry.trace_sequence(), 42);
    }

    #[test]
    fn test_set_trace_number_updates_addenda() {
        let mut entry = EntryDetail::parse(SAMPLE);
        entry.attach_addenda(Addenda::parse(ADDENDA98).unwrap()).unwrap();
        entry.set_trace_number("23138010", 5);
        assert_eq!(
            entry.addenda98.as_ref().unwrap().trace_number,
            "231380100000005"
        );
    }

    #[test]
    fn test_set_rdfi() {
        let mut entry = EntryDetail::new();
        entry.set_rdfi("121042882");
        assert_eq!(entry.rdfi_identification, "12104288");
        assert_eq!(entry.check_digit, "2");
    }

    #[rstest]
    #[case::bad_transaction_code(|e: &mut EntryDetail| e.transaction_code = 25, "TransactionCode", FieldErrorKind::InvalidValue)]
    #[case::bad_check_digit(|e: &mut EntryDetail| e.check_digit = "9".to_string(), "CheckDigit", FieldErrorKind::CheckDigit { expected: 4 })]
    #[case::missing_account(|e: &mut EntryDetail| e.dfi_account_number = String::new(), "DFIAccountNumber", FieldErrorKind::Mandatory)]
    #[case::prenote_with_amount(|e: &mut EntryDetail| e.transaction_code = 28, "Amount", FieldErrorKind::InvalidValue)]
    #[case::amount_too_wide(|e: &mut EntryDetail| e.amount = 10_000_000_000, "Amount", FieldErrorKind::InvalidValue)]
    #[case::bad_indicator(|e: &mut EntryDetail| e.addenda_record_indicator = 2, "AddendaRecordIndicator", FieldErrorKind::InvalidValue)]
    #[case::bad_trace(|e: &mut EntryDetail| e.trace_number = "23138010000000A".to_string(), "TraceNumber", FieldErrorKind::NonNumeric)]
    fn test_validate_errors(
        #[case] mutate: fn(&mut EntryDetail),
        #[case] field: &str,
        #[case] kind: FieldErrorKind,
    ) {
        let mut entry = EntryDetail::parse(SAMPLE);
        mutate(&mut entry);
        let err = entry.validate().unwrap_err();
        assert_eq!(err.field_name, field);
        assert_eq!(err.kind, kind);
    }

    #[test]
    fn test_attach_addenda05_keeps_forward_category() {
        let mut entry = EntryDetail::parse(SAMPLE);
        entry.attach_addenda(Addenda::parse(ADDENDA05).unwrap()).unwrap();
        entry.attach_addenda(Addenda::parse(ADDENDA05).unwrap()).unwrap();
        assert_eq!(entry.category, Category::Forward);
        assert_eq!(entry.addenda_count(), 2);
        assert_eq!(entry.addenda_lines(), vec![ADDENDA05, ADDENDA05]);
        assert_eq!(entry.illegal_addenda(), None);
    }

    #[test]
    fn test_attach_addenda99_sets_return_category() {
        let mut entry = EntryDetail::parse(SAMPLE);
        entry.attach_addenda(Addenda::parse(ADDENDA99).unwrap()).unwrap();
        assert_eq!(entry.category, Category::Return);
        assert_eq!(entry.addenda_count(), 1);
    }

    #[test]
    fn test_category_slots_are_mutually_exclusive() {
        let mut entry = EntryDetail::parse(SAMPLE);
        entry.attach_addenda(Addenda::parse(ADDENDA99).unwrap()).unwrap();

        let err = entry.attach_addenda(Addenda::parse(ADDENDA98).unwrap()).unwrap_err();
        assert!(matches!(err, AchError::AddendaSlot { addenda: "Addenda98", .. }));

        let err = entry.attach_addenda(Addenda::parse(ADDENDA05).unwrap()).unwrap_err();
        assert!(matches!(err, AchError::AddendaSlot { .. }));
        assert_eq!(entry.category, Category::Return);
    }

    #[test]
    fn test_illegal_addenda_detects_programmatic_mismatch() {
        let mut entry = EntryDetail::parse(SAMPLE);
        entry.addenda98 = Some(Addenda98::parse(ADDENDA98));
        assert_eq!(entry.illegal_addenda(), Some("Addenda98"));
    }
}
