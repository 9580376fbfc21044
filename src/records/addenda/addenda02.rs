//! Addenda02: point-of-sale terminal information (POS, SHR, MTE)

use crate::io::fields::{alpha_field, is_valid_mmdd, parse_alpha, parse_text, string_field};
use crate::records::{
    check_alphanumeric, check_mandatory, check_trace_number, Addendum, RecordCodec,
};
use crate::types::FieldError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Addenda02 {
    pub reference_information_one: String,
    pub reference_information_two: String,
    pub terminal_identification_code: String,
    pub transaction_serial_number: String,
    /// MMDD
    pub transaction_date: String,
    pub authorization_code_or_expire_date: String,
    pub terminal_location: String,
    pub terminal_city: String,
    pub terminal_state: String,
    /// Trace number of the entry this addenda belongs to
    pub trace_number: String,
}

impl RecordCodec for Addenda02 {
    fn parse(line: &str) -> Self {
        Addenda02 {
            reference_information_one: parse_alpha(line, 3, 10),
            reference_information_two: parse_alpha(line, 10, 13),
            terminal_identification_code: parse_alpha(line, 13, 19),
            transaction_serial_number: parse_alpha(line, 19, 25),
            transaction_date: parse_text(line, 25, 29),
            authorization_code_or_expire_date: parse_alpha(line, 29, 35),
            terminal_location: parse_alpha(line, 35, 62),
            terminal_city: parse_alpha(line, 62, 77),
            terminal_state: parse_alpha(line, 77, 79),
            trace_number: parse_text(line, 79, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "702{}{}{}{}{}{}{}{}{}{}",
            alpha_field(&self.reference_information_one, 7),
            alpha_field(&self.reference_information_two, 3),
            alpha_field(&self.terminal_identification_code, 6),
            alpha_field(&self.transaction_serial_number, 6),
            alpha_field(&self.transaction_date, 4),
            alpha_field(&self.authorization_code_or_expire_date, 6),
            alpha_field(&self.terminal_location, 27),
            alpha_field(&self.terminal_city, 15),
            alpha_field(&self.terminal_state, 2),
            string_field(&self.trace_number, 15),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        check_alphanumeric("ReferenceInformationOne", &self.reference_information_one)?;
        check_alphanumeric("ReferenceInformationTwo", &self.reference_information_two)?;
        check_mandatory("TerminalIdentificationCode", &self.terminal_identification_code)?;
        check_alphanumeric("TerminalIdentificationCode", &self.terminal_identification_code)?;
        check_mandatory("TransactionSerialNumber", &self.transaction_serial_number)?;
        check_alphanumeric("TransactionSerialNumber", &self.transaction_serial_number)?;
        if !is_valid_mmdd(&self.transaction_date) {
            return Err(FieldError::invalid_date("TransactionDate", &self.transaction_date));
        }
        check_alphanumeric(
            "AuthorizationCodeOrExpireDate",
            &self.authorization_code_or_expire_date,
        )?;
        check_mandatory("TerminalLocation", &self.terminal_location)?;
        check_alphanumeric("TerminalLocation", &self.terminal_location)?;
        check_mandatory("TerminalCity", &self.terminal_city)?;
        check_alphanumeric("TerminalCity", &self.terminal_city)?;
        check_mandatory("TerminalState", &self.terminal_state)?;
        check_alphanumeric("TerminalState", &self.terminal_state)?;
        check_trace_number("TraceNumber", &self.trace_number)?;
        Ok(())
    }
}

impl Addendum for Addenda02 {
    fn type_code(&self) -> &'static str {
        "02"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "702          2005093213210614123456Target Store 0049          PHILADELPHIA   PA121042880000123";

    #[test]
    fn test_parse_and_render() {
        assert_eq!(SAMPLE.len(), 94);
        let addenda = Addenda02::parse(SAMPLE);
        assert_eq!(addenda.terminal_identification_code, "200509");
        assert_eq!(addenda.transaction_serial_number, "321321");
        assert_eq!(addenda.transaction_date, "0614");
        assert_eq!(addenda.terminal_location, "Target Store 0049");
        assert_eq!(addenda.terminal_city, "PHILADELPHIA");
        assert_eq!(addenda.terminal_state, "PA");
        assert_eq!(addenda.trace_number, "121042880000123");
        assert_eq!(addenda.validate(), Ok(()));
        assert_eq!(addenda.render(), SAMPLE);
    }

    #[test]
    fn test_validate_transaction_date() {
        let mut addenda = Addenda02::parse(SAMPLE);
        addenda.transaction_date = "1340".to_string();
        assert_eq!(addenda.validate().unwrap_err().field_name, "TransactionDate");
    }

    #[test]
    fn test_validate_terminal_city_mandatory() {
        let mut addenda = Addenda02::parse(SAMPLE);
        addenda.terminal_city.clear();
        assert_eq!(addenda.validate().unwrap_err().field_name, "TerminalCity");
    }
}
