//! Addenda records (type `7`) and the addenda registry
//!
//! An addenda line carries its two-character type code at offset 1. The
//! registry ([`Addenda::parse`]) reads that code and hands the line to the
//! matching variant:
//!
//! | Type code | Variant |
//! |---|---|
//! | `02` | [`Addenda02`] point-of-sale terminal information |
//! | `05` | [`Addenda05`] payment-related information |
//! | `98` | [`Addenda98`] notification of change |
//! | `99` | [`Addenda99`], [`Addenda99Dishonored`] or [`Addenda99Contested`] |
//! | `10`-`18` | [`IatAddenda`], legal only inside an IAT batch |
//!
//! Type code `99` is the one place where dispatch depends on content rather
//! than on the tag: the three-character reason code decides the layout.

mod addenda02;
mod addenda05;
mod addenda98;
mod addenda99;
pub mod iat;

pub use addenda02::Addenda02;
pub use addenda05::Addenda05;
pub use addenda98::Addenda98;
pub use addenda99::{Addenda99, Addenda99Contested, Addenda99Dishonored};
pub use iat::IatAddenda;

use crate::core::codes::{is_contested_return_code, is_dishonored_return_code};
use crate::io::fields::slice;
use crate::records::{Addendum, RecordCodec};
use crate::types::{FieldError, FieldErrorKind};
use serde::{Deserialize, Serialize};

/// Offset of the addenda type code
pub const TYPE_CODE_RANGE: (usize, usize) = (1, 3);

/// Offset of the return reason code inside a `99` addenda
pub const RETURN_CODE_RANGE: (usize, usize) = (3, 6);

/// Any addenda record, tagged by variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Addenda {
    Addenda02(Addenda02),
    Addenda05(Addenda05),
    Addenda98(Addenda98),
    Addenda99(Addenda99),
    Addenda99Dishonored(Addenda99Dishonored),
    Addenda99Contested(Addenda99Contested),
    Iat(IatAddenda),
}

impl Addenda {
    /// Dispatch a raw addenda line to its variant.
    ///
    /// Fails only when the type code is not one the registry knows; the
    /// chosen variant's own parse never fails.
    pub fn parse(line: &str) -> Result<Addenda, FieldError> {
        let type_code = slice(line, TYPE_CODE_RANGE.0, TYPE_CODE_RANGE.1);
        let addenda = match type_code {
            "02" => Addenda::Addenda02(Addenda02::parse(line)),
            "05" => Addenda::Addenda05(Addenda05::parse(line)),
            "98" => Addenda::Addenda98(Addenda98::parse(line)),
            "99" => {
                // Ordered value checks on the reason code: dishonored first,
                // then contested, anything else is a plain return.
                let reason = slice(line, RETURN_CODE_RANGE.0, RETURN_CODE_RANGE.1);
                if is_dishonored_return_code(reason) {
                    Addenda::Addenda99Dishonored(Addenda99Dishonored::parse(line))
                } else if is_contested_return_code(reason) {
                    Addenda::Addenda99Contested(Addenda99Contested::parse(line))
                } else {
                    Addenda::Addenda99(Addenda99::parse(line))
                }
            }
            "10" | "11" | "12" | "13" | "14" | "15" | "16" | "17" | "18" => {
                Addenda::Iat(IatAddenda::parse(line))
            }
            other => return Err(FieldError::new("TypeCode", FieldErrorKind::TypeCode, other)),
        };
        Ok(addenda)
    }

    fn inner(&self) -> &dyn Addendum {
        match self {
            Addenda::Addenda02(a) => a,
            Addenda::Addenda05(a) => a,
            Addenda::Addenda98(a) => a,
            Addenda::Addenda99(a) => a,
            Addenda::Addenda99Dishonored(a) => a,
            Addenda::Addenda99Contested(a) => a,
            Addenda::Iat(a) => a,
        }
    }

    pub fn type_code(&self) -> &'static str {
        self.inner().type_code()
    }

    /// Record name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Addenda::Addenda02(_) => "Addenda02",
            Addenda::Addenda05(_) => "Addenda05",
            Addenda::Addenda98(_) => "Addenda98",
            Addenda::Addenda99(_) => "Addenda99",
            Addenda::Addenda99Dishonored(_) => "Addenda99Dishonored",
            Addenda::Addenda99Contested(_) => "Addenda99Contested",
            Addenda::Iat(_) => "IATAddenda",
        }
    }

    pub fn render(&self) -> String {
        self.inner().render()
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        self.inner().validate()
    }
}
