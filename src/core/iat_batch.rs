//! International (IAT) batches
//!
//! Structurally parallel to [`crate::core::Batch`]: one IAT header, IAT
//! entries with their 10-18 addenda, and a regular batch control record.

use crate::core::batch::ValidateOpts;
use crate::core::tabulation::{Direction, Totals};
use crate::io::fields::{is_default, string_field};
use crate::records::{BatchControl, IatBatchHeader, IatEntryDetail, RecordCodec};
use crate::types::{BatchError, BatchErrorKind, Category, FieldError};
use std::collections::HashSet;

const IAT: &str = "IAT";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IatBatch {
    pub header: IatBatchHeader,
    pub entries: Vec<IatEntryDetail>,
    pub control: BatchControl,
    pub validate_opts: ValidateOpts,
}

impl IatBatch {
    pub fn new(header: IatBatchHeader) -> Self {
        IatBatch {
            header,
            ..Default::default()
        }
    }

    pub fn add_entry(&mut self, entry: IatEntryDetail) {
        self.entries.push(entry);
    }

    pub fn batch_number(&self) -> u32 {
        self.header.batch_number
    }

    pub fn set_batch_number(&mut self, batch_number: u32) {
        self.header.batch_number = batch_number;
        self.control.batch_number = batch_number;
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn line_count(&self) -> usize {
        let addenda: usize = self.entries.iter().map(IatEntryDetail::addenda_count).sum();
        2 + self.entries.len() + addenda
    }

    pub fn trace_numbers(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.trace_number.clone()).collect()
    }

    pub fn calculate_totals(&self) -> Totals {
        let mut totals = Totals::new();
        for entry in &self.entries {
            totals.add_entry(
                &entry.rdfi_identification,
                entry.addenda_count(),
                entry.amount,
                Direction::of(entry.is_credit(), entry.is_debit()),
            );
        }
        totals
    }

    pub fn control_totals(&self) -> Totals {
        Totals {
            entry_addenda_count: self.control.entry_addenda_count,
            entry_hash: self.control.entry_hash,
            total_debit: self.control.total_debit,
            total_credit: self.control.total_credit,
        }
    }

    pub fn error(&self, field_name: &'static str, kind: BatchErrorKind) -> BatchError {
        BatchError {
            batch_number: self.header.batch_number,
            sec_code: IAT.to_string(),
            field_name,
            kind,
        }
    }

    fn field_error(&self, error: FieldError) -> BatchError {
        self.error(error.field_name, BatchErrorKind::Field(error))
    }

    /// Tabulate the control record, fill in trace numbers, addenda counts
    /// and addenda sequence numbers, then validate
    pub fn create(&mut self) -> Result<(), BatchError> {
        if self.entries.is_empty() {
            return Err(self.error("EntryCount", BatchErrorKind::NoEntries));
        }
        let odfi = self.header.odfi_identification.clone();
        for (position, entry) in self.entries.iter_mut().enumerate() {
            if is_default(&entry.trace_number) {
                entry.trace_number = format!(
                    "{}{}",
                    string_field(&odfi, 8),
                    crate::io::fields::numeric_field(position as u64 + 1, 7)
                );
                if let Some(addenda) = entry.addenda98.as_mut() {
                    addenda.trace_number = entry.trace_number.clone();
                }
                if let Some(addenda) = entry.addenda99.as_mut() {
                    addenda.trace_number = entry.trace_number.clone();
                }
            }
            let sequence: u32 = string_field(&entry.trace_number, 7).parse().unwrap_or(0);
            for addenda in &mut entry.addenda {
                addenda.entry_detail_sequence_number = sequence;
            }
            entry.addenda_records = u16::try_from(entry.addenda_count()).unwrap_or(u16::MAX);
        }

        let totals = self.calculate_totals();
        self.control = BatchControl {
            service_class_code: self.header.service_class_code,
            entry_addenda_count: totals.entry_addenda_count,
            entry_hash: totals.entry_hash,
            total_debit: totals.total_debit,
            total_credit: totals.total_credit,
            company_identification: self.header.originator_identification.clone(),
            message_authentication_code: self.control.message_authentication_code.clone(),
            odfi_identification: odfi,
            batch_number: self.header.batch_number,
        };
        self.validate()
    }

    /// Compare the control totals with the entries, nothing else
    pub fn reconcile(&self) -> Result<(), BatchError> {
        let calculated = self.calculate_totals();
        let control = self.control_totals();
        let total_checks = [
            (
                "EntryAddendaCount",
                u64::from(calculated.entry_addenda_count),
                u64::from(control.entry_addenda_count),
            ),
            ("EntryHash", calculated.entry_hash, control.entry_hash),
            ("TotalDebitEntryDollarAmount", calculated.total_debit, control.total_debit),
            ("TotalCreditEntryDollarAmount", calculated.total_credit, control.total_credit),
        ];
        for (field, calculated, control) in total_checks {
            if calculated != control {
                return Err(self.error(
                    field,
                    BatchErrorKind::ControlMismatch {
                        calculated: calculated.to_string(),
                        control: control.to_string(),
                    },
                ));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), BatchError> {
        self.header.validate().map_err(|e| self.field_error(e))?;
        if self.entries.is_empty() {
            return Err(self.error("EntryCount", BatchErrorKind::NoEntries));
        }
        for entry in &self.entries {
            entry.validate().map_err(|e| self.field_error(e))?;
            entry.validate_addenda().map_err(|e| self.field_error(e))?;
        }
        self.control.validate().map_err(|e| self.field_error(e))?;

        let header_checks = [
            (
                "ServiceClassCode",
                self.header.service_class_code.to_string(),
                self.control.service_class_code.to_string(),
            ),
            (
                "CompanyIdentification",
                self.header.originator_identification.clone(),
                self.control.company_identification.clone(),
            ),
            (
                "ODFIIdentification",
                self.header.odfi_identification.clone(),
                self.control.odfi_identification.clone(),
            ),
            (
                "BatchNumber",
                self.header.batch_number.to_string(),
                self.control.batch_number.to_string(),
            ),
        ];
        for (field, header, control) in header_checks {
            if header != control {
                return Err(self.error(field, BatchErrorKind::HeaderMismatch { header, control }));
            }
        }

        self.reconcile()?;

        let mut seen = HashSet::new();
        let mut previous = 0u64;
        for entry in &self.entries {
            let trace = entry.trace_number.clone();
            if !seen.insert(trace.clone()) {
                return Err(self.error(
                    "TraceNumber",
                    BatchErrorKind::DuplicateTraceNumber { trace_number: trace },
                ));
            }
            let value: u64 = trace.parse().unwrap_or(0);
            if value < previous {
                return Err(self.error(
                    "TraceNumber",
                    BatchErrorKind::TraceNumberNotAscending { trace_number: trace },
                ));
            }
            previous = value;
        }

        let expected = self.entries.first().map(|e| e.category).unwrap_or_default();
        for entry in &self.entries {
            let count = entry.addenda_count();
            if count == 0 && !self.validate_opts.allow_missing_addenda {
                return Err(self.error(
                    "AddendaRecordIndicator",
                    BatchErrorKind::AddendaIndicator {
                        indicator: entry.addenda_record_indicator,
                        count,
                    },
                ));
            }
            if usize::from(entry.addenda_records) != count {
                return Err(self.error(
                    "AddendaRecords",
                    BatchErrorKind::ControlMismatch {
                        calculated: count.to_string(),
                        control: entry.addenda_records.to_string(),
                    },
                ));
            }
            if entry.category != expected {
                return Err(self.error(
                    "Category",
                    BatchErrorKind::Category {
                        expected,
                        found: entry.category,
                    },
                ));
            }
            if count > 0 {
                entry
                    .check_addenda_set()
                    .map_err(|reason| self.error("Addenda", BatchErrorKind::Rule(reason)))?;
            }
            if entry.category == Category::Forward {
                let direction = match self.header.service_class_code {
                    220 if entry.is_debit() => "debit",
                    225 if entry.is_credit() => "credit",
                    _ => continue,
                };
                return Err(self.error(
                    "ServiceClassCode",
                    BatchErrorKind::ServiceClass {
                        service_class_code: self.header.service_class_code,
                        direction,
                    },
                ));
            }
        }
        Ok(())
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.line_count());
        lines.push(self.header.render());
        for entry in &self.entries {
            lines.push(entry.render());
            lines.extend(entry.addenda_lines());
        }
        lines.push(self.control.render());
        lines
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::records::{Addenda, IatAddenda};

    pub(crate) const HEADER: &str = "5220                FF3               US123456789 IATTRADEPAYMTCADUSD190816   1231380100000001";
    pub(crate) const ENTRY: &str = "6221210428820007             0000100000123456789                              1231380100000001";

    pub(crate) fn iat_batch() -> IatBatch {
        let mut entry = IatEntryDetail::parse(ENTRY);
        for code in 10..=16 {
            entry
                .attach_addenda(Addenda::Iat(IatAddenda::new(code, format!("addenda {code}"))))
                .unwrap();
        }
        let mut batch = IatBatch::new(IatBatchHeader::parse(HEADER));
        batch.add_entry(entry);
        batch
    }

    #[test]
    fn test_create_and_render() {
        let mut batch = iat_batch();
        batch.create().unwrap();
        assert_eq!(batch.control.entry_addenda_count, 8);
        assert_eq!(batch.control.entry_hash, 12104288);
        assert_eq!(batch.control.total_credit, 100000);
        assert_eq!(batch.control.company_identification, "123456789");
        assert_eq!(batch.entries[0].addenda[0].entry_detail_sequence_number, 1);
        let lines = batch.lines();
        assert_eq!(lines.len(), batch.line_count());
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[1], ENTRY);
    }

    #[test]
    fn test_missing_mandatory_addenda() {
        let mut batch = iat_batch();
        batch.entries[0].addenda.pop();
        let err = batch.create().unwrap_err();
        assert_eq!(err.field_name, "Addenda");
        assert_eq!(err.sec_code, "IAT");
    }

    #[test]
    fn test_control_mismatch() {
        let mut batch = iat_batch();
        batch.create().unwrap();
        batch.control.total_credit += 1;
        let err = batch.validate().unwrap_err();
        assert_eq!(err.field_name, "TotalCreditEntryDollarAmount");
    }

    #[test]
    fn test_company_identification_mismatch() {
        let mut batch = iat_batch();
        batch.create().unwrap();
        batch.control.company_identification = "987654321".to_string();
        let err = batch.validate().unwrap_err();
        assert_eq!(err.field_name, "CompanyIdentification");
        assert_eq!(
            err.kind,
            BatchErrorKind::HeaderMismatch {
                header: "123456789".to_string(),
                control: "987654321".to_string(),
            }
        );
    }
}
