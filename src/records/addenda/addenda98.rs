//! Addenda98: notification of change

use crate::core::codes::change_code;
use crate::io::fields::{alpha_field, parse_alpha, parse_text, string_field};
use crate::records::{
    check_alphanumeric, check_mandatory, check_routing, check_trace_number, Addendum, RecordCodec,
};
use crate::types::FieldError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Addenda98 {
    /// Change code (C01-C14), see [`crate::core::codes::change_code`]
    pub change_code: String,
    pub original_trace: String,
    /// Receiving DFI of the original entry
    pub original_dfi: String,
    /// The corrected value, laid out as the change code prescribes
    pub corrected_data: String,
    pub trace_number: String,
}

impl RecordCodec for Addenda98 {
    fn parse(line: &str) -> Self {
        Addenda98 {
            change_code: parse_alpha(line, 3, 6),
            original_trace: parse_text(line, 6, 21),
            original_dfi: parse_text(line, 27, 35),
            corrected_data: parse_alpha(line, 35, 64),
            trace_number: parse_text(line, 79, 94),
        }
    }

    fn render(&self) -> String {
        format!(
            "798{}{}{}{}{}{}{}",
            alpha_field(&self.change_code, 3),
            string_field(&self.original_trace, 15),
            alpha_field("", 6),
            string_field(&self.original_dfi, 8),
            alpha_field(&self.corrected_data, 29),
            alpha_field("", 15),
            string_field(&self.trace_number, 15),
        )
    }

    fn validate(&self) -> Result<(), FieldError> {
        if change_code(&self.change_code).is_none() {
            return Err(FieldError::invalid("ChangeCode", &self.change_code));
        }
        check_trace_number("OriginalTrace", &self.original_trace)?;
        check_routing("OriginalDFI", &self.original_dfi, 8)?;
        check_mandatory("CorrectedData", self.corrected_data.trim())?;
        check_alphanumeric("CorrectedData", &self.corrected_data)?;
        check_trace_number("TraceNumber", &self.trace_number)?;
        Ok(())
    }
}

impl Addendum for Addenda98 {
    fn type_code(&self) -> &'static str {
        "98"
    }
}
