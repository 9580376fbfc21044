//! Collapsing the batches of one file
//!
//! Batches sharing a header (batch number aside) are combined as long as no
//! trace number collides. Bigger batches absorb smaller ones first so the
//! result holds as few batches as possible. The entry and addenda count and
//! the debit and credit totals must survive unchanged; the entry hash may not,
//! since hashes of combined batches are re-truncated.

use crate::core::batch::Batch;
use crate::core::file::File;
use crate::core::tabulation::Totals;
use crate::types::AchError;
use std::cmp::Reverse;
use tracing::debug;

fn check_preserved(field: &'static str, before: u64, after: u64) -> Result<(), AchError> {
    if before == after {
        Ok(())
    } else {
        Err(AchError::InvariantViolation {
            operation: "flatten",
            field,
            before,
            after,
        })
    }
}

fn check_totals(before: &Totals, after: &Totals) -> Result<(), AchError> {
    check_preserved(
        "EntryAddendaCount",
        before.entry_addenda_count.into(),
        after.entry_addenda_count.into(),
    )?;
    check_preserved(
        "TotalDebitEntryDollarAmountInFile",
        before.total_debit,
        after.total_debit,
    )?;
    check_preserved(
        "TotalCreditEntryDollarAmountInFile",
        before.total_credit,
        after.total_credit,
    )
}

/// Combine compatible batches of `file` into as few batches as possible.
///
/// The input is tabulated first, so a file whose controls are stale is still
/// accepted. IAT batches are carried over untouched. Each combined batch takes
/// the smallest batch number of its sources.
///
/// # Errors
///
/// Returns the tabulation or validation failure of the input or output, or
/// [`AchError::InvariantViolation`] when the result does not carry the same
/// entry count and dollar totals as the input.
pub fn flatten_batches(mut file: File) -> Result<File, AchError> {
    for batch in &mut file.batches {
        batch.create()?;
    }
    for batch in &mut file.iat_batches {
        batch.create()?;
    }
    file.create()?;
    let before = file.control_totals();
    let inputs = file.batches.len();

    let mut batches = std::mem::take(&mut file.batches);
    batches.sort_by_key(|batch| Reverse(batch.entry_count()));

    let mut flattened: Vec<Batch> = Vec::with_capacity(batches.len());
    for batch in batches {
        let signature = batch.header.signature();
        let target = flattened.iter_mut().find(|candidate| {
            candidate.header.signature() == signature && !candidate.has_trace_overlap(&batch)
        });
        match target {
            Some(target) => {
                let number = target.batch_number().min(batch.batch_number());
                target.merge_entries(batch);
                target.set_batch_number(number);
            }
            None => flattened.push(batch),
        }
    }
    flattened.sort_by_key(Batch::batch_number);
    for batch in &mut flattened {
        batch.create()?;
    }

    debug!(inputs, outputs = flattened.len(), "flattened batches");
    file.batches = flattened;
    file.create()?;
    check_totals(&before, &file.control_totals())?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::tests::{ppd_batch, ENTRY};
    use crate::core::file::tests::{ppd_file, HEADER};
    use crate::records::{EntryDetail, FileHeader, RecordCodec};

    fn batch_with_traces(sequences: &[u64]) -> Batch {
        let mut batch = ppd_batch(0);
        for &sequence in sequences {
            let mut entry = EntryDetail::parse(ENTRY);
            entry.set_trace_number("23138010", sequence);
            batch.add_entry(entry);
        }
        batch
    }

    fn file_with(batches: Vec<Batch>) -> File {
        let mut file = File::new(FileHeader::parse(HEADER));
        for (number, mut batch) in batches.into_iter().enumerate() {
            batch.set_batch_number(number as u32 + 1);
            file.add_batch(batch);
        }
        file
    }

    #[test]
    fn test_combines_same_header_batches() {
        let file = file_with(vec![
            batch_with_traces(&[1, 2]),
            batch_with_traces(&[3]),
            batch_with_traces(&[4, 5, 6]),
        ]);
        let flat = flatten_batches(file).unwrap();
        assert_eq!(flat.batches.len(), 1);
        let batch = &flat.batches[0];
        assert_eq!(batch.batch_number(), 1);
        assert_eq!(batch.entries.len(), 6);
        let sequences: Vec<u64> = batch.entries.iter().map(EntryDetail::trace_sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(flat.control.batch_count, 1);
        assert_eq!(flat.control.entry_addenda_count, 6);
    }

    #[test]
    fn test_keeps_batches_with_colliding_traces() {
        let flat = flatten_batches(ppd_file(3, 2)).unwrap();
        assert_eq!(flat.batches.len(), 3);
        assert_eq!(flat.control.entry_addenda_count, 6);
    }

    #[test]
    fn test_keeps_batches_with_different_headers() {
        let mut other = batch_with_traces(&[5]);
        other.header.company_entry_description = "BONUS".to_string();
        let file = file_with(vec![batch_with_traces(&[1]), other, batch_with_traces(&[2])]);

        let flat = flatten_batches(file).unwrap();
        assert_eq!(flat.batches.len(), 2);
        let numbers: Vec<u32> = flat.batches.iter().map(Batch::batch_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(flat.batches[0].entries.len(), 2);
    }

    #[test]
    fn test_largest_batch_absorbs_first() {
        // batch 2 is largest, so 1 collides with it but 3 merges into it
        let file = file_with(vec![
            batch_with_traces(&[1]),
            batch_with_traces(&[1, 2, 3]),
            batch_with_traces(&[4]),
        ]);
        let flat = flatten_batches(file).unwrap();
        assert_eq!(flat.batches.len(), 2);
        assert_eq!(flat.batches[0].batch_number(), 1);
        assert_eq!(flat.batches[0].entries.len(), 1);
        assert_eq!(flat.batches[1].batch_number(), 2);
        assert_eq!(flat.batches[1].entries.len(), 4);
    }

    #[test]
    fn test_totals_survive() {
        let file = ppd_file(2, 2);
        let before = file.control_totals();
        let flat = flatten_batches(file).unwrap();
        let after = flat.control_totals();
        assert_eq!(before.total_debit, after.total_debit);
        assert_eq!(before.entry_addenda_count, after.entry_addenda_count);
    }

    #[test]
    fn test_check_totals_reports_violation() {
        let before = Totals {
            entry_addenda_count: 2,
            entry_hash: 0,
            total_debit: 10,
            total_credit: 0,
        };
        let after = Totals {
            total_debit: 9,
            ..before
        };
        let err = check_totals(&before, &after).unwrap_err();
        assert!(matches!(
            err,
            AchError::InvariantViolation {
                field: "TotalDebitEntryDollarAmountInFile",
                before: 10,
                after: 9,
                ..
            }
        ));
    }
}
