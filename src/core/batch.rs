//! Domestic and ADV batches
//!
//! A batch is one header, its entries (each owning its addenda) and one
//! control record. [`Batch::create`] derives the control record from the
//! entries; [`Batch::validate`] checks that header, entries and control agree
//! and never mutates.
//!
//! # Check order
//!
//! `validate` reports the first failure in this order: header fields,
//! entries and their addenda, control fields, header/control equality,
//! recomputed totals against the control, trace numbers, addenda
//! indicators, entry categories, service class direction, then the SEC
//! rule-set.

use crate::core::sec_rules::sec_rules;
use crate::core::tabulation::{Direction, Totals};
use crate::records::adv::ADV_SERVICE_CLASS;
use crate::records::{
    AdvBatchControl, AdvEntryDetail, BatchControl, BatchHeader, EntryDetail, RecordCodec,
};
use crate::types::{BatchError, BatchErrorKind, Category, FieldError};
use std::collections::HashSet;

/// Validation switches shared by batches and the reader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOpts {
    /// Accept entries whose addenda record indicator is 1 but that carry no
    /// addenda. Attached addenda with an indicator of 0 are always rejected.
    pub allow_missing_addenda: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub header: BatchHeader,
    pub entries: Vec<EntryDetail>,
    /// Entries of an ADV batch; empty otherwise
    pub adv_entries: Vec<AdvEntryDetail>,
    pub control: BatchControl,
    /// Control record of an ADV batch; `None` otherwise
    pub adv_control: Option<AdvBatchControl>,
    pub validate_opts: ValidateOpts,
}

impl Batch {
    pub fn new(header: BatchHeader) -> Self {
        Batch {
            header,
            ..Default::default()
        }
    }

    pub fn add_entry(&mut self, entry: EntryDetail) {
        self.entries.push(entry);
    }

    pub fn add_adv_entry(&mut self, entry: AdvEntryDetail) {
        self.adv_entries.push(entry);
    }

    pub fn sec_code(&self) -> &str {
        &self.header.standard_entry_class_code
    }

    pub fn batch_number(&self) -> u32 {
        self.header.batch_number
    }

    pub fn set_batch_number(&mut self, batch_number: u32) {
        self.header.batch_number = batch_number;
        self.control.batch_number = batch_number;
        if let Some(control) = self.adv_control.as_mut() {
            control.batch_number = batch_number;
        }
    }

    pub fn is_adv(&self) -> bool {
        self.header.is_adv()
    }

    /// Number of entry records, domestic or ADV
    pub fn entry_count(&self) -> usize {
        self.entries.len() + self.adv_entries.len()
    }

    /// Category shared by the batch's entries
    pub fn category(&self) -> Category {
        self.entries
            .first()
            .map(|entry| entry.category)
            .unwrap_or_default()
    }

    /// Logical lines the batch renders to: header, entries, addenda, control
    pub fn line_count(&self) -> usize {
        let addenda: usize = self.entries.iter().map(EntryDetail::addenda_count).sum();
        2 + self.entry_count() + addenda
    }

    /// Trace numbers of every entry, in entry order
    pub fn trace_numbers(&self) -> Vec<String> {
        if self.is_adv() {
            self.adv_entries.iter().map(AdvEntryDetail::trace_number).collect()
        } else {
            self.entries.iter().map(|e| e.trace_number.clone()).collect()
        }
    }

    /// Whether any trace number of `other` already appears in this batch
    pub fn has_trace_overlap(&self, other: &Batch) -> bool {
        let ours: HashSet<String> = self.trace_numbers().into_iter().collect();
        other.trace_numbers().iter().any(|trace| ours.contains(trace))
    }

    /// Move the entries of `other` into this batch and restore ascending
    /// trace number order. The control record is stale until `create`.
    pub fn merge_entries(&mut self, other: Batch) {
        self.entries.extend(other.entries);
        self.entries
            .sort_by_cached_key(|e| e.trace_number.parse::<u64>().unwrap_or(0));
        self.adv_entries.extend(other.adv_entries);
        self.adv_entries.sort_by_cached_key(AdvEntryDetail::trace_number);
    }

    /// Totals recomputed from the entries
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
        for entry in &self.adv_entries {
            totals.add_entry(
                &entry.rdfi_identification,
                0,
                entry.amount,
                Direction::of(entry.is_credit(), entry.is_debit()),
            );
        }
        totals
    }

    /// Totals as declared by the control record
    pub fn control_totals(&self) -> Totals {
        match &self.adv_control {
            Some(control) if self.is_adv() => Totals {
                entry_addenda_count: control.entry_addenda_count,
                entry_hash: control.entry_hash,
                total_debit: control.total_debit,
                total_credit: control.total_credit,
            },
            _ => Totals {
                entry_addenda_count: self.control.entry_addenda_count,
                entry_hash: self.control.entry_hash,
                total_debit: self.control.total_debit,
                total_credit: self.control.total_credit,
            },
        }
    }

    /// Build a batch error tagged with this batch's number and SEC code
    pub fn error(&self, field_name: &'static str, kind: BatchErrorKind) -> BatchError {
        BatchError {
            batch_number: self.header.batch_number,
            sec_code: self.header.standard_entry_class_code.clone(),
            field_name,
            kind,
        }
    }

    fn field_error(&self, error: FieldError) -> BatchError {
        self.error(error.field_name, BatchErrorKind::Field(error))
    }

    /// Tabulate the control record from the entries, then validate.
    ///
    /// Missing trace numbers are filled in from the ODFI identification and
    /// the entry position, Addenda05 records are numbered and stamped with
    /// their entry's sequence number. Calling `create` twice yields the same
    /// control record.
    pub fn create(&mut self) -> Result<(), BatchError> {
        if self.entry_count() == 0 {
            return Err(self.error("EntryCount", BatchErrorKind::NoEntries));
        }

        let odfi = self.header.odfi_identification.clone();
        for (position, entry) in self.entries.iter_mut().enumerate() {
            if crate::io::fields::is_default(&entry.trace_number) {
                entry.set_trace_number(&odfi, position as u64 + 1);
            }
            let entry_sequence = entry.trace_sequence() as u32;
            for (sequence, addenda) in entry.addenda05.iter_mut().enumerate() {
                addenda.sequence_number = sequence as u32 + 1;
                addenda.entry_detail_sequence_number = entry_sequence;
            }
        }

        let totals = self.calculate_totals();
        if self.is_adv() {
            let ach_operator_data = self
                .adv_control
                .as_ref()
                .map(|control| control.ach_operator_data.clone())
                .unwrap_or_default();
            self.adv_control = Some(AdvBatchControl {
                service_class_code: self.header.service_class_code,
                entry_addenda_count: totals.entry_addenda_count,
                entry_hash: totals.entry_hash,
                total_debit: totals.total_debit,
                total_credit: totals.total_credit,
                ach_operator_data,
                odfi_identification: odfi,
                batch_number: self.header.batch_number,
            });
        } else {
            self.control = BatchControl {
                service_class_code: self.header.service_class_code,
                entry_addenda_count: totals.entry_addenda_count,
                entry_hash: totals.entry_hash,
                total_debit: totals.total_debit,
                total_credit: totals.total_credit,
                company_identification: self.header.company_identification.clone(),
                message_authentication_code: self.control.message_authentication_code.clone(),
                odfi_identification: odfi,
                batch_number: self.header.batch_number,
            };
        }

        if let Some(rules) = sec_rules(self.sec_code()) {
            rules.create(self)?;
        }
        self.validate()
    }

    /// Check the batch, returning the first failure
    pub fn validate(&self) -> Result<(), BatchError> {
        self.header.validate().map_err(|e| self.field_error(e))?;
        if self.entry_count() == 0 {
            return Err(self.error("EntryCount", BatchErrorKind::NoEntries));
        }
        for entry in &self.entries {
            entry.validate().map_err(|e| self.field_error(e))?;
            entry.validate_addenda().map_err(|e| self.field_error(e))?;
        }
        for entry in &self.adv_entries {
            entry.validate().map_err(|e| self.field_error(e))?;
        }

        self.validate_control()?;
        self.reconcile()?;
        self.validate_trace_numbers()?;
        self.validate_addenda_indicators()?;
        self.validate_categories()?;
        self.validate_service_class()?;

        let rules = sec_rules(self.sec_code()).ok_or_else(|| {
            self.error(
                "StandardEntryClassCode",
                BatchErrorKind::UnsupportedSecCode(self.sec_code().to_string()),
            )
        })?;
        rules.validate(self)
    }

    fn validate_control(&self) -> Result<(), BatchError> {
        let mismatch = |field: &'static str, header: String, control: String| {
            self.error(field, BatchErrorKind::HeaderMismatch { header, control })
        };

        let (service_class_code, odfi, batch_number) = if self.is_adv() {
            let control = self
                .adv_control
                .as_ref()
                .ok_or_else(|| self.error("ADVBatchControl", BatchErrorKind::MissingControl))?;
            control.validate().map_err(|e| self.field_error(e))?;
            if self.header.service_class_code != ADV_SERVICE_CLASS {
                return Err(self.error(
                    "ServiceClassCode",
                    BatchErrorKind::ServiceClass {
                        service_class_code: self.header.service_class_code,
                        direction: "ADV",
                    },
                ));
            }
            (
                control.service_class_code,
                &control.odfi_identification,
                control.batch_number,
            )
        } else {
            self.control.validate().map_err(|e| self.field_error(e))?;
            if self.header.company_identification != self.control.company_identification {
                return Err(mismatch(
                    "CompanyIdentification",
                    self.header.company_identification.clone(),
                    self.control.company_identification.clone(),
                ));
            }
            (
                self.control.service_class_code,
                &self.control.odfi_identification,
                self.control.batch_number,
            )
        };

        if self.header.service_class_code != service_class_code {
            return Err(mismatch(
                "ServiceClassCode",
                self.header.service_class_code.to_string(),
                service_class_code.to_string(),
            ));
        }
        if &self.header.odfi_identification != odfi {
            return Err(mismatch(
                "ODFIIdentification",
                self.header.odfi_identification.clone(),
                odfi.clone(),
            ));
        }
        if self.header.batch_number != batch_number {
            return Err(mismatch(
                "BatchNumber",
                self.header.batch_number.to_string(),
                batch_number.to_string(),
            ));
        }
        Ok(())
    }

    /// Compare the control totals with the entries, nothing else. The
    /// reader uses this for batches that already have a recorded error.
    pub fn reconcile(&self) -> Result<(), BatchError> {
        let calculated = self.calculate_totals();
        let control = self.control_totals();
        let checks = [
            (
                "EntryAddendaCount",
                u64::from(calculated.entry_addenda_count),
                u64::from(control.entry_addenda_count),
            ),
            ("EntryHash", calculated.entry_hash, control.entry_hash),
            (
                "TotalDebitEntryDollarAmount",
                calculated.total_debit,
                control.total_debit,
            ),
            (
                "TotalCreditEntryDollarAmount",
                calculated.total_credit,
                control.total_credit,
            ),
        ];
        for (field, calculated, control) in checks {
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

    /// Trace numbers ascend, are unique, and (outside ADV) start with the
    /// ODFI identification
    fn validate_trace_numbers(&self) -> Result<(), BatchError> {
        let mut seen = HashSet::new();
        let mut previous: Option<u64> = None;
        for trace in self.trace_numbers() {
            if !seen.insert(trace.clone()) {
                return Err(self.error(
                    "TraceNumber",
                    BatchErrorKind::DuplicateTraceNumber { trace_number: trace },
                ));
            }
            let value: u64 = trace.parse().unwrap_or(0);
            if previous.is_some_and(|p| value < p) {
                return Err(self.error(
                    "TraceNumber",
                    BatchErrorKind::TraceNumberNotAscending { trace_number: trace },
                ));
            }
            previous = Some(value);
            if !self.is_adv() {
                let odfi = &self.header.odfi_identification;
                if !crate::io::fields::string_field(&trace, 15).starts_with(odfi.as_str()) {
                    return Err(self.error(
                        "TraceNumber",
                        BatchErrorKind::TraceNumberOdfi {
                            trace_number: trace,
                            odfi: odfi.clone(),
                        },
                    ));
                }
            }
        }
        Ok(())
    }

    fn validate_addenda_indicators(&self) -> Result<(), BatchError> {
        for entry in &self.entries {
            let count = entry.addenda_count();
            let indicator = entry.addenda_record_indicator;
            let broken = match indicator {
                0 => count > 0,
                _ => count == 0 && !self.validate_opts.allow_missing_addenda,
            };
            if broken {
                return Err(self.error(
                    "AddendaRecordIndicator",
                    BatchErrorKind::AddendaIndicator { indicator, count },
                ));
            }
        }
        for entry in &self.adv_entries {
            if entry.addenda_record_indicator != 0 && !self.validate_opts.allow_missing_addenda {
                return Err(self.error(
                    "AddendaRecordIndicator",
                    BatchErrorKind::AddendaIndicator {
                        indicator: entry.addenda_record_indicator,
                        count: 0,
                    },
                ));
            }
        }
        Ok(())
    }

    fn validate_categories(&self) -> Result<(), BatchError> {
        let expected = self.category();
        for entry in &self.entries {
            if entry.category != expected {
                return Err(self.error(
                    "Category",
                    BatchErrorKind::Category {
                        expected,
                        found: entry.category,
                    },
                ));
            }
            if let Some(addenda) = entry.illegal_addenda() {
                return Err(self.error(
                    "Addenda",
                    BatchErrorKind::AddendaCategory {
                        addenda,
                        category: entry.category,
                    },
                ));
            }
        }
        Ok(())
    }

    /// 220 batches carry credits only and 225 batches debits only. Returns
    /// reverse the direction of the original entry, so only forward entries
    /// are checked.
    fn validate_service_class(&self) -> Result<(), BatchError> {
        let code = self.header.service_class_code;
        for entry in self.entries.iter().filter(|e| e.category == Category::Forward) {
            let direction = match code {
                220 if entry.is_debit() => "debit",
                225 if entry.is_credit() => "credit",
                _ => continue,
            };
            return Err(self.error(
                "ServiceClassCode",
                BatchErrorKind::ServiceClass {
                    service_class_code: code,
                    direction,
                },
            ));
        }
        Ok(())
    }

    /// Rendered lines: header, each entry followed by its addenda, control
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.line_count());
        lines.push(self.header.render());
        for entry in &self.entries {
            lines.push(entry.render());
            lines.extend(entry.addenda_lines());
        }
        for entry in &self.adv_entries {
            lines.push(entry.render());
        }
        match &self.adv_control {
            Some(control) if self.is_adv() => lines.push(control.render()),
            _ => lines.push(self.control.render()),
        }
        lines
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::records::{Addenda, Addenda05};
    use rstest::rstest;

    pub(crate) const HEADER: &str = "5225Name on Account                     231380104 PPDREG.SALARY      190816   1231380100000001";
    pub(crate) const ENTRY: &str = "62723138010412345678         0100000000               Receiver Account Name   0231380100000001";
    const ADV_HEADER: &str = "5280Name on Account                     231380104 ADVREG.SALARY      190816   1231380100000001";
    const ADV_ENTRY: &str = "681231380104744-5678-99    00000005000012104288211111 Name                    0231380100500001";
    const RETURN_ADDENDA: &str = "799R07099912340000015      09101298Authorization revoked                       091012980000066";

    /// A PPD debit batch with `count` entries numbered from 1
    pub(crate) fn ppd_batch(count: u64) -> Batch {
        let mut batch = Batch::new(BatchHeader::parse(HEADER));
        for sequence in 1..=count {
            let mut entry = EntryDetail::parse(ENTRY);
            entry.set_trace_number("23138010", sequence);
            batch.add_entry(entry);
        }
        batch
    }

    #[test]
    fn test_create_tabulates_control() {
        let mut batch = ppd_batch(2);
        batch.create().unwrap();
        assert_eq!(batch.control.entry_addenda_count, 2);
        assert_eq!(batch.control.entry_hash, 2 * 23138010);
        assert_eq!(batch.control.total_debit, 200000000);
        assert_eq!(batch.control.total_credit, 0);
        assert_eq!(batch.control.company_identification, "231380104");
        assert_eq!(batch.control.batch_number, 1);
        assert_eq!(batch.line_count(), 4);
    }

    #[test]
    fn test_create_is_idempotent() {
        let mut batch = ppd_batch(3);
        batch.create().unwrap();
        let first = batch.control.clone();
        batch.create().unwrap();
        assert_eq!(batch.control, first);
    }

    #[test]
    fn test_create_fills_trace_and_addenda_sequence() {
        let mut batch = Batch::new(BatchHeader::parse(HEADER));
        let mut entry = EntryDetail::parse(ENTRY);
        entry.trace_number.clear();
        entry.addenda_record_indicator = 1;
        entry.attach_addenda(Addenda::Addenda05(Addenda05::new("first"))).unwrap();
        entry.attach_addenda(Addenda::Addenda05(Addenda05::new("second"))).unwrap();
        batch.add_entry(entry);

        // PPD allows one Addenda05 per entry
        let err = batch.create().unwrap_err();
        assert_eq!(err.field_name, "Addenda05");

        let entry = &batch.entries[0];
        assert_eq!(entry.trace_number, "231380100000001");
        assert_eq!(entry.addenda05[1].sequence_number, 2);
        assert_eq!(entry.addenda05[1].entry_detail_sequence_number, 1);
        assert_eq!(batch.control.entry_addenda_count, 3);
    }

    #[test]
    fn test_create_without_entries() {
        let mut batch = Batch::new(BatchHeader::parse(HEADER));
        let err = batch.create().unwrap_err();
        assert_eq!(err.kind, BatchErrorKind::NoEntries);
    }

    #[test]
    fn test_validate_reports_control_mismatch() {
        let mut batch = ppd_batch(1);
        batch.create().unwrap();
        batch.control.total_debit = 1;
        let err = batch.validate().unwrap_err();
        assert_eq!(err.field_name, "TotalDebitEntryDollarAmount");
        assert_eq!(
            err.kind,
            BatchErrorKind::ControlMismatch {
                calculated: "100000000".to_string(),
                control: "1".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "batch #1 (PPD) TotalDebitEntryDollarAmount: calculated 100000000 does not match control 1"
        );
    }

    #[test]
    fn test_validate_header_control_mismatch() {
        let mut batch = ppd_batch(1);
        batch.create().unwrap();
        batch.control.company_identification = "999999999".to_string();
        let err = batch.validate().unwrap_err();
        assert_eq!(err.field_name, "CompanyIdentification");
        assert!(matches!(err.kind, BatchErrorKind::HeaderMismatch { .. }));
    }

    #[rstest]
    #[case::duplicate(vec![1, 1], "DuplicateTraceNumber")]
    #[case::descending(vec![2, 1], "TraceNumberNotAscending")]
    fn test_validate_trace_numbers(#[case] sequences: Vec<u64>, #[case] expected: &str) {
        let mut batch = Batch::new(BatchHeader::parse(HEADER));
        for sequence in sequences {
            let mut entry = EntryDetail::parse(ENTRY);
            entry.set_trace_number("23138010", sequence);
            batch.add_entry(entry);
        }
        let err = batch.create().unwrap_err();
        assert_eq!(err.field_name, "TraceNumber");
        assert!(format!("{:?}", err.kind).starts_with(expected));
    }

    #[test]
    fn test_validate_trace_number_odfi_prefix() {
        let mut batch = Batch::new(BatchHeader::parse(HEADER));
        let mut entry = EntryDetail::parse(ENTRY);
        entry.set_trace_number("12104288", 1);
        batch.add_entry(entry);
        let err = batch.create().unwrap_err();
        assert!(matches!(err.kind, BatchErrorKind::TraceNumberOdfi { .. }));
    }

    #[rstest]
    #[case::strict(false, true)]
    #[case::lenient(true, false)]
    fn test_indicator_without_addenda(#[case] allow_missing: bool, #[case] fails: bool) {
        let mut batch = ppd_batch(1);
        batch.entries[0].addenda_record_indicator = 1;
        batch.validate_opts.allow_missing_addenda = allow_missing;
        assert_eq!(batch.create().is_err(), fails);
    }

    #[test]
    fn test_addenda_without_indicator_always_fails() {
        let mut batch = ppd_batch(1);
        batch.validate_opts.allow_missing_addenda = true;
        batch.entries[0]
            .attach_addenda(Addenda::Addenda05(Addenda05::new("info")))
            .unwrap();
        let err = batch.create().unwrap_err();
        assert_eq!(
            err.kind,
            BatchErrorKind::AddendaIndicator {
                indicator: 0,
                count: 1
            }
        );
    }

    #[test]
    fn test_service_class_rejects_credit_in_debit_batch() {
        let mut batch = ppd_batch(1);
        batch.entries[0].transaction_code = 22;
        let err = batch.create().unwrap_err();
        assert_eq!(
            err.kind,
            BatchErrorKind::ServiceClass {
                service_class_code: 225,
                direction: "credit"
            }
        );
    }

    #[test]
    fn test_unsupported_sec_code() {
        let mut batch = ppd_batch(1);
        batch.header.standard_entry_class_code = "XYZ".to_string();
        let err = batch.create().unwrap_err();
        assert_eq!(err.kind, BatchErrorKind::UnsupportedSecCode("XYZ".to_string()));
    }

    #[test]
    fn test_trace_overlap() {
        let a = ppd_batch(2);
        let b = ppd_batch(1);
        let mut c = ppd_batch(1);
        c.entries[0].set_trace_number("23138010", 9);
        assert!(a.has_trace_overlap(&b));
        assert!(!a.has_trace_overlap(&c));
    }

    #[test]
    fn test_merge_entries_sorts_by_trace() {
        let mut a = ppd_batch(0);
        for sequence in [5, 1] {
            let mut entry = EntryDetail::parse(ENTRY);
            entry.set_trace_number("23138010", sequence);
            a.add_entry(entry);
        }
        let mut b = ppd_batch(0);
        let mut entry = EntryDetail::parse(ENTRY);
        entry.set_trace_number("23138010", 3);
        b.add_entry(entry);

        a.merge_entries(b);
        let sequences: Vec<u64> = a.entries.iter().map(EntryDetail::trace_sequence).collect();
        assert_eq!(sequences, vec![1, 3, 5]);
        a.create().unwrap();
        assert_eq!(a.control.entry_addenda_count, 3);
    }

    #[test]
    fn test_adv_batch() {
        let mut batch = Batch::new(BatchHeader::parse(ADV_HEADER));
        batch.add_adv_entry(AdvEntryDetail::parse(ADV_ENTRY));
        batch.create().unwrap();
        let control = batch.adv_control.as_ref().unwrap();
        assert_eq!(control.total_credit, 50000);
        assert_eq!(control.entry_hash, 23138010);
        assert_eq!(batch.trace_numbers(), vec!["231380100500001".to_string()]);
        let lines = batch.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("8280"));
    }

    #[test]
    fn test_lines_render_entries_and_addenda() {
        let mut batch = ppd_batch(1);
        batch.entries[0].addenda_record_indicator = 1;
        batch.entries[0]
            .attach_addenda(Addenda::Addenda05(Addenda05::new("info")))
            .unwrap();
        batch.create().unwrap();
        let lines = batch.lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with('5'));
        assert!(lines[1].starts_with('6'));
        assert!(lines[2].starts_with("705"));
        assert!(lines[3].starts_with('8'));
        assert!(lines.iter().all(|l| l.len() == 94));
    }

    #[test]
    fn test_create_fills_trace_number_into_addenda() {
        let mut entry = EntryDetail::parse(ENTRY);
        entry.trace_number = String::new();
        entry.addenda_record_indicator = 1;
        entry
            .attach_addenda(Addenda::parse(RETURN_ADDENDA).unwrap())
            .unwrap();
        let mut batch = Batch::new(BatchHeader::parse(HEADER));
        batch.add_entry(entry);
        batch.create().unwrap();

        let entry = &batch.entries[0];
        assert_eq!(entry.trace_number, "231380100000001");
        assert_eq!(
            entry.addenda99.as_ref().unwrap().trace_number,
            "231380100000001"
        );
    }
}
