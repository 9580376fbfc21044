//! The top-level ACH file aggregate
//!
//! A [`File`] owns its header, domestic (or ADV) batches, IAT batches and the
//! file control record. Tabulation mirrors [`Batch`] one level up: the file
//! control declares the batch count, block count and the sums of the batch
//! controls.

use crate::core::batch::Batch;
use crate::core::iat_batch::IatBatch;
use crate::core::tabulation::{block_count, Totals};
use crate::records::{AdvFileControl, FileControl, FileHeader, RecordCodec};
use crate::types::{AchError, FileError, FileErrorKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    pub header: FileHeader,
    pub batches: Vec<Batch>,
    pub iat_batches: Vec<IatBatch>,
    pub control: FileControl,
    /// Control record of an ADV file; `None` otherwise
    pub adv_control: Option<AdvFileControl>,
}

impl File {
    pub fn new(header: FileHeader) -> Self {
        File {
            header,
            ..Default::default()
        }
    }

    pub fn add_batch(&mut self, batch: Batch) {
        self.batches.push(batch);
    }

    pub fn add_iat_batch(&mut self, batch: IatBatch) {
        self.iat_batches.push(batch);
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len() + self.iat_batches.len()
    }

    /// Whether the file holds ADV batches
    pub fn is_adv(&self) -> bool {
        self.batches.iter().any(Batch::is_adv)
    }

    fn is_mixed_adv(&self) -> bool {
        self.is_adv()
            && (!self.iat_batches.is_empty() || self.batches.iter().any(|b| !b.is_adv()))
    }

    /// Logical records, block padding excluded
    pub fn line_count(&self) -> usize {
        let batches: usize = self.batches.iter().map(Batch::line_count).sum();
        let iat: usize = self.iat_batches.iter().map(IatBatch::line_count).sum();
        2 + batches + iat
    }

    /// Totals summed from the batch control records
    pub fn calculate_totals(&self) -> Totals {
        let mut totals = Totals::new();
        for batch in &self.batches {
            totals.absorb(&batch.control_totals());
        }
        for batch in &self.iat_batches {
            totals.absorb(&batch.control_totals());
        }
        totals
    }

    /// Totals declared by the file control record
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

    /// Tabulate the file control record from the batch controls, then
    /// validate. Batches are expected to be tabulated already.
    pub fn create(&mut self) -> Result<(), AchError> {
        if self.batch_count() == 0 {
            return Err(FileError::new("BatchCount", FileErrorKind::NoBatches).into());
        }
        if self.is_mixed_adv() {
            return Err(FileError::new("StandardEntryClassCode", FileErrorKind::MixedAdv).into());
        }

        let totals = self.calculate_totals();
        let batch_count = self.batch_count() as u32;
        let blocks = block_count(self.line_count()) as u32;
        if self.is_adv() {
            self.adv_control = Some(AdvFileControl {
                batch_count,
                block_count: blocks,
                entry_addenda_count: totals.entry_addenda_count,
                entry_hash: totals.entry_hash,
                total_debit: totals.total_debit,
                total_credit: totals.total_credit,
            });
        } else {
            self.adv_control = None;
            self.control = FileControl {
                batch_count,
                block_count: blocks,
                entry_addenda_count: totals.entry_addenda_count,
                entry_hash: totals.entry_hash,
                total_debit: totals.total_debit,
                total_credit: totals.total_credit,
            };
        }
        self.validate()
    }

    /// Check the header, every batch, batch numbering and the control totals.
    /// Returns the first failure and never mutates.
    pub fn validate(&self) -> Result<(), AchError> {
        if self.batch_count() == 0 {
            return Err(FileError::new("BatchCount", FileErrorKind::NoBatches).into());
        }
        if self.is_mixed_adv() {
            return Err(FileError::new("StandardEntryClassCode", FileErrorKind::MixedAdv).into());
        }
        self.header.validate().map_err(FileError::from)?;
        for batch in &self.batches {
            batch.validate()?;
        }
        for batch in &self.iat_batches {
            batch.validate()?;
        }

        check_batch_numbers(self.batches.iter().map(Batch::batch_number))?;
        check_batch_numbers(self.iat_batches.iter().map(IatBatch::batch_number))?;
        let mut numbers: Vec<u32> = self
            .batches
            .iter()
            .map(Batch::batch_number)
            .chain(self.iat_batches.iter().map(IatBatch::batch_number))
            .collect();
        numbers.sort_unstable();
        check_batch_numbers(numbers.into_iter())?;

        match &self.adv_control {
            Some(control) if self.is_adv() => control.validate().map_err(FileError::from)?,
            None if self.is_adv() => {
                return Err(FileError::new("ADVFileControl", FileErrorKind::MissingControl).into())
            }
            _ => self.control.validate().map_err(FileError::from)?,
        }
        self.reconcile()
    }

    /// Compare the file control with the batch controls: batch count, block
    /// count, entry/addenda count, entry hash and dollar totals
    pub fn reconcile(&self) -> Result<(), AchError> {
        let (batch_count, blocks) = match &self.adv_control {
            Some(control) if self.is_adv() => (control.batch_count, control.block_count),
            _ => (self.control.batch_count, self.control.block_count),
        };

        let calculated = self.calculate_totals();
        let control = self.control_totals();
        let checks = [
            ("BatchCount", self.batch_count() as u64, u64::from(batch_count)),
            (
                "BlockCount",
                block_count(self.line_count()) as u64,
                u64::from(blocks),
            ),
            (
                "EntryAddendaCount",
                u64::from(calculated.entry_addenda_count),
                u64::from(control.entry_addenda_count),
            ),
            ("EntryHash", calculated.entry_hash, control.entry_hash),
            (
                "TotalDebitEntryDollarAmountInFile",
                calculated.total_debit,
                control.total_debit,
            ),
            (
                "TotalCreditEntryDollarAmountInFile",
                calculated.total_credit,
                control.total_credit,
            ),
        ];
        for (field, calculated, control) in checks {
            if calculated != control {
                return Err(FileError::mismatch(field, calculated, control).into());
            }
        }
        Ok(())
    }

    /// Renumber every batch from 1 in file order
    pub fn renumber_batches(&mut self) {
        let mut number = 1;
        for batch in &mut self.batches {
            batch.set_batch_number(number);
            number += 1;
        }
        for batch in &mut self.iat_batches {
            batch.set_batch_number(number);
            number += 1;
        }
    }

    /// Rendered logical lines, block padding excluded
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.line_count());
        lines.push(self.header.render());
        // domestic and IAT batches interleave by batch number
        let mut domestic = self.batches.iter().peekable();
        let mut iat = self.iat_batches.iter().peekable();
        loop {
            let iat_first = match (domestic.peek(), iat.peek()) {
                (Some(d), Some(i)) => i.batch_number() < d.batch_number(),
                (None, Some(_)) => true,
                (Some(_), None) => false,
                (None, None) => break,
            };
            if iat_first {
                lines.extend(iat.next().map(IatBatch::lines).unwrap_or_default());
            } else {
                lines.extend(domestic.next().map(Batch::lines).unwrap_or_default());
            }
        }
        match &self.adv_control {
            Some(control) if self.is_adv() => lines.push(control.render()),
            _ => lines.push(self.control.render()),
        }
        lines
    }
}

/// Batch numbers must strictly ascend; duplicates fail too
fn check_batch_numbers(numbers: impl Iterator<Item = u32>) -> Result<(), AchError> {
    let mut previous = 0u32;
    for batch_number in numbers {
        if batch_number <= previous {
            return Err(FileError::new(
                "BatchNumber",
                FileErrorKind::BatchNumberNotAscending { batch_number },
            )
            .into());
        }
        previous = batch_number;
    }
    Ok(())
}
