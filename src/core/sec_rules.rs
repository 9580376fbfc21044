//! Standard Entry Class rule-sets
//!
//! Each SEC code constrains what a batch may contain: which directions are
//! allowed, whether point-of-sale terminal addenda are required, how many
//! payment-related addenda an entry may carry. Batches look their rule-set
//! up by the header's SEC code through [`sec_rules`] and delegate the
//! subtype-specific part of `create` and `validate` to it.
//!
//! # Design
//!
//! The rule-sets are table driven: one [`StandardRules`] row per code, held
//! in a registry that is built once and shared read-only. Anything that
//! needs behaviour beyond the table can implement [`SecRules`] directly.

use crate::core::batch::Batch;
use crate::records::batch_header::ADV;
use crate::types::{BatchError, BatchErrorKind, Category};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Subtype-specific batch behaviour keyed by SEC code
pub trait SecRules: Send + Sync {
    /// The SEC code this rule-set applies to
    fn code(&self) -> &'static str;

    /// Check the batch against the rule-set; never mutates
    fn validate(&self, batch: &Batch) -> Result<(), BatchError>;

    /// Fill in rule-set specific derived fields during tabulation
    fn create(&self, _batch: &mut Batch) -> Result<(), BatchError> {
        Ok(())
    }
}

/// Transaction directions a rule-set allows on forward entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directions {
    Any,
    DebitsOnly,
    CreditsOnly,
}

/// Whether forward entries carry point-of-sale Addenda02
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalAddenda {
    Forbidden,
    Required,
}

/// One row of the rule table
#[derive(Debug, Clone, Copy)]
pub struct StandardRules {
    pub code: &'static str,
    pub directions: Directions,
    pub terminal_addenda: TerminalAddenda,
    /// Most Addenda05 records one forward entry may carry
    pub max_addenda05: usize,
    /// Every entry must be a notification of change
    pub noc_only: bool,
}

const fn rules(
    code: &'static str,
    directions: Directions,
    terminal_addenda: TerminalAddenda,
    max_addenda05: usize,
) -> StandardRules {
    StandardRules {
        code,
        directions,
        terminal_addenda,
        max_addenda05,
        noc_only: false,
    }
}

use Directions::{Any, CreditsOnly, DebitsOnly};
use TerminalAddenda::{Forbidden, Required};

#[rustfmt::skip]
const STANDARD_RULES: &[StandardRules] = &[
    rules("ACK", CreditsOnly, Forbidden, 1),
    rules("ADV", Any, Forbidden, 0),
    rules("ARC", DebitsOnly, Forbidden, 0),
    rules("ATX", CreditsOnly, Forbidden, 9999),
    rules("BOC", DebitsOnly, Forbidden, 0),
    rules("CCD", Any, Forbidden, 1),
    rules("CIE", CreditsOnly, Forbidden, 1),
    StandardRules { code: "COR", directions: Any, terminal_addenda: Forbidden, max_addenda05: 0, noc_only: true },
    rules("CTX", Any, Forbidden, 9999),
    rules("DNE", CreditsOnly, Forbidden, 1),
    rules("ENR", Any, Forbidden, 9999),
    rules("MTE", Any, Required, 0),
    rules("POP", DebitsOnly, Forbidden, 0),
    rules("POS", Any, Required, 0),
    rules("PPD", Any, Forbidden, 1),
    rules("RCK", DebitsOnly, Forbidden, 0),
    rules("SHR", Any, Required, 0),
    rules("TEL", DebitsOnly, Forbidden, 0),
    rules("TRC", DebitsOnly, Forbidden, 0),
    rules("TRX", Any, Forbidden, 9999),
    rules("WEB", Any, Forbidden, 1),
    rules("XCK", DebitsOnly, Forbidden, 0),
];

static SEC_RULES: Lazy<HashMap<&'static str, Box<dyn SecRules>>> = Lazy::new(|| {
    STANDARD_RULES
        .iter()
        .map(|rules| (rules.code, Box::new(*rules) as Box<dyn SecRules>))
        .collect()
});

/// Look up the rule-set for a SEC code
pub fn sec_rules(code: &str) -> Option<&'static dyn SecRules> {
    SEC_RULES.get(code).map(|rules| rules.as_ref())
}

/// Every SEC code with a registered rule-set, sorted
pub fn supported_sec_codes() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = SEC_RULES.keys().copied().collect();
    codes.sort_unstable();
    codes
}

impl SecRules for StandardRules {
    fn code(&self) -> &'static str {
        self.code
    }

    fn validate(&self, batch: &Batch) -> Result<(), BatchError> {
        if self.code == ADV {
            return if batch.entries.is_empty() {
                Ok(())
            } else {
                Err(batch.error(
                    "TransactionCode",
                    BatchErrorKind::Rule("ADV batches carry only ADV entries".to_string()),
                ))
            };
        }
        if !batch.adv_entries.is_empty() {
            return Err(batch.error(
                "TransactionCode",
                BatchErrorKind::Rule(format!("{} batches cannot carry ADV entries", self.code)),
            ));
        }

        for entry in &batch.entries {
            if self.noc_only {
                if entry.category != Category::Noc {
                    return Err(batch.error(
                        "Category",
                        BatchErrorKind::Category {
                            expected: Category::Noc,
                            found: entry.category,
                        },
                    ));
                }
                continue;
            }
            if entry.category != Category::Forward {
                continue;
            }
            match self.directions {
                DebitsOnly if entry.is_credit() => {
                    return Err(batch.error(
                        "TransactionCode",
                        BatchErrorKind::Rule(format!(
                            "{} batches allow debits only, found transaction code {}",
                            self.code, entry.transaction_code
                        )),
                    ));
                }
                CreditsOnly if entry.is_debit() => {
                    return Err(batch.error(
                        "TransactionCode",
                        BatchErrorKind::Rule(format!(
                            "{} batches allow credits only, found transaction code {}",
                            self.code, entry.transaction_code
                        )),
                    ));
                }
                _ => {}
            }
            match self.terminal_addenda {
                Required if entry.addenda02.is_none() => {
                    return Err(batch.error(
                        "Addenda02",
                        BatchErrorKind::Rule(format!(
                            "{} entry {} requires Addenda02",
                            self.code, entry.trace_number
                        )),
                    ));
                }
                Forbidden if entry.addenda02.is_some() => {
                    return Err(batch.error(
                        "Addenda02",
                        BatchErrorKind::Rule(format!("{} entries do not allow Addenda02", self.code)),
                    ));
                }
                _ => {}
            }
            if entry.addenda05.len() > self.max_addenda05 {
                return Err(batch.error(
                    "Addenda05",
                    BatchErrorKind::Rule(format!(
                        "{} entries allow at most {} Addenda05, entry {} has {}",
                        self.code,
                        self.max_addenda05,
                        entry.trace_number,
                        entry.addenda05.len()
                    )),
                ));
            }
        }
        Ok(())
    }

    fn create(&self, batch: &mut Batch) -> Result<(), BatchError> {
        // Terminal addenda carry the trace number of their entry
        if self.terminal_addenda == Required {
            for entry in &mut batch.entries {
                let trace = entry.trace_number.clone();
                if let Some(addenda) = entry.addenda02.as_mut() {
                    if addenda.trace_number.is_empty() {
                        addenda.trace_number = trace;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_standard_codes() {
        let codes = supported_sec_codes();
        assert_eq!(codes.len(), STANDARD_RULES.len());
        for code in ["PPD", "CCD", "WEB", "TEL", "COR", "CTX", "POS", "ADV"] {
            assert_eq!(sec_rules(code).map(|r| r.code()), Some(code));
        }
        assert!(sec_rules("IAT").is_none());
        assert!(sec_rules("XYZ").is_none());
    }
}
