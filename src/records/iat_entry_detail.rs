//! IAT entry detail record (type `6` inside an IAT batch)

use crate::io::fields::{alpha_field, numeric_field, parse_alpha, parse_num, parse_text, string_field};
use crate::records::addenda::iat::{
    MANDATORY_TYPE_CODES, MAX_CORRESPONDENT_ADDENDA, MAX_REMITTANCE_ADDENDA,
};
use crate::records::{
    check_alphanumeric, check_mandatory, check_routing, check_routing_check_digit,
    check_trace_number, check_width, Addenda, Addenda98, Addenda99, IatAddenda, RecordCodec,
};
use crate::types::{transaction_code, AchError, Category, FieldError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IatEntryDetail {
    pub transaction_code: u16,
    pub rdfi_identification: String,
    pub check_digit: String,
    /// Number of addenda records that follow, as declared on the entry
    pub addenda_records: u16,
    /// Cents
    pub amount: u64,
    pub dfi_account_number: String,
    pub ofac_screening_indicator: String,
    pub secondary_ofac_screening_indicator: String,
    pub addenda_record_indicator: u8,
    pub trace_number: String,

    pub category: Category,
    /// IAT addenda 10 through 18, in attach order
    pub addenda: Vec<IatAddenda>,
    pub addenda98: Option<Addenda98>,
    pub addenda99: Option<Addenda99>,
}

impl IatEntryDetail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_credit(&self) -> bool {
        transaction_code::is_credit(self.transaction_code)
    }

    pub fn is_debit(&self) -> bool {
        transaction_code::is_debit(self.transaction_code)
    }

    pub fn addenda_count(&self) -> usize {
        self.addenda.len()
            + usize::from(self.addenda98.is_some())
            + usize::from(self.addenda99.is_some())
    }

    pub fn attach_addenda(&mut self, addenda: Addenda) -> Result<(), AchError> {
        match addenda {
            Addenda::Iat(a) => {
                if self.category != Category::Forward {
                    return Err(AchError::addenda_slot(
                        "IATAddenda",
                        format!("entry is already categorised as {}", self.category),
                    ));
                }
                self.addenda.push(a);
            }
            Addenda::Addenda98(a) => {
                self.claim_category("Addenda98", Category::Noc)?;
                self.addenda98 = Some(a);
            }
            Addenda::Addenda99(a) => {
                self.claim_category("Addenda99", Category::Return)?;
                self.addenda99 = Some(a);
            }
            other => {
                return Err(AchError::addenda_slot(
                    other.name(),
                    "not allowed on an IAT entry",
                ))
            }
        }
        Ok(())
    }

    fn claim_category(&mut self, addenda: &'static str, category: Category) -> Result<(), AchError> {
        if self.category != Category::Forward {
            return Err(AchError::addenda_slot(
                addenda,
                format!("entry is already categorised as {}", self.category),
            ));
        }
        self.category = category;
        Ok(())
    }

    /// Forward entries carry each of addenda 10-16 exactly once, at most two
    /// 17s and at most five 18s. Returns a description of the first problem.
    pub fn check_addenda_set(&self) -> Result<(), String> {
        if self.category != Category::Forward {
            return Ok(());
        }
        let count = |code: u8| self.addenda.iter().filter(|a| a.type_code == code).count();
        for code in MANDATORY_TYPE_CODES {
            match count(code) {
                1 => {}
                0 => return Err(format!("IAT addenda {code} is missing")),
                n => return Err(format!("IAT addenda {code} appears {n} times")),
            }
        }
        if count(17) > MAX_REMITTANCE_ADDENDA {
            return Err(format!(
                "at most {MAX_REMITTANCE_ADDENDA} IAT addenda 17 are allowed"
            ));
        }
        if count(18) > MAX_CORRESPONDENT_ADDENDA {
            return Err(format!(
                "at most {MAX_CORRESPONDENT_ADDENDA} IAT addenda 18 are allowed"
            ));
        }
        Ok(())
    }

    /// Attached addenda rendered in type-code order
    pub fn addenda_lines(&self) -> Vec<String> {
        let mut addenda: Vec<&IatAddenda> = self.addenda.iter().collect();
        addenda.sort_by_key(|a| a.type_code);
        let mut lines: Vec<String> = addenda.into_iter().map(RecordCodec::render).collect();
        if let Some(a) = &self.addenda98 {
            lines.push(a.render());
        }
        if let Some(a) = &self.addenda99 {
            lines.push(a.render());
        }
        lines
    }

    pub fn validate_addenda(&self) -> Result<(), FieldError> {
        for a in &self.addenda {
            a.validate()?;
        }
        if let Some(a) = &self.addenda98 {
            a.validate()?;
        }
        if let Some(a) = &self.addenda99 {
            a.validate()?;
        }
        Ok(())
    }
}

impl RecordCodec for IatEntryDetail {
    fn parse(line: &str) -> Self {
        IatEntryDetail {
            transaction_code: parse_num(line, 1, 3),
            rdfi_identification: parse_text(line, 3, 11),
            check_digit: parse_text(line, 11, 12),
            addenda_records: parse_num(line, 12, 16),
            amount: parse_num(line, 29, 39),
            dfi_account_number: parse_alpha(line, 39, 74),
            ofac_screening_indicator: parse_alpha(line, 76, 77),
            secondary_ofac_screening_indicator: parse_alpha(line, 77, 78),
            addenda_record_indicator: parse_num(line, 78, 79),
            trace_number: parse_text(line, 79, 94),
            ..Default::default()
        }
    }

    fn render(&self) -> String {
        format!(
            "6{}{}{}{}{}{}{}{}{}{}{}{}",
            numeric_field(self.transaction_code.into(), 2),
            string_field(&self.rdfi_identification, 8),
            alpha_field(&self.check_digit, 1),
            numeric_field(self.addenda_records.into(), 4),
            alpha_field("", 13),
            numeric_field(self.amount, 10),
            alpha_field(&self.dfi_account_number, 35),
            alpha_field("", 2),
            alpha_field(&self.ofac_screening_indicator, 1),
            alpha_field(&self.secondary_ofac_screening_indicator, 1),
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
        check_width("AddendaRecords", self.addenda_records.into(), 4)?;
        check_width("Amount", self.amount, 10)?;
        if transaction_code::is_prenote(self.transaction_code) && self.amount != 0 {
            return Err(FieldError::invalid("Amount", self.amount));
        }
        check_mandatory("DFIAccountNumber", self.dfi_account_number.trim())?;
        check_alphanumeric("DFIAccountNumber", &self.dfi_account_number)?;
        check_alphanumeric("OFACScreeningIndicator", &self.ofac_screening_indicator)?;
        check_alphanumeric(
            "SecondaryOFACScreeningIndicator",
            &self.secondary_ofac_screening_indicator,
        )?;
        if self.addenda_record_indicator != 1 {
            return Err(FieldError::invalid(
                "AddendaRecordIndicator",
                self.addenda_record_indicator,
            ));
        }
        check_trace_number("TraceNumber", &self.trace_number)?;
        Ok(())
    }
}
