//! CSV batch summary
//!
//! Flattens a [`File`] into one row per batch for the `describe` command.
//! Dollar amounts are converted from cents with `rust_decimal` so they print
//! with exactly two decimal places.

use crate::core::{Batch, File, IatBatch};
use crate::types::AchError;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// One CSV row describing a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub batch_number: u32,
    pub sec_code: String,
    pub company_name: String,
    pub entries: usize,
    pub addenda: usize,
    pub debit: Decimal,
    pub credit: Decimal,
}

/// Cents as a dollar amount with two decimal places
pub fn dollars(cents: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(cents), 2)
}

impl BatchSummary {
    fn from_batch(batch: &Batch) -> Self {
        let totals = batch.control_totals();
        BatchSummary {
            batch_number: batch.batch_number(),
            sec_code: batch.sec_code().to_string(),
            company_name: batch.header.company_name.clone(),
            entries: batch.entry_count(),
            addenda: batch.entries.iter().map(|e| e.addenda_count()).sum(),
            debit: dollars(totals.total_debit),
            credit: dollars(totals.total_credit),
        }
    }

    fn from_iat_batch(batch: &IatBatch) -> Self {
        let totals = batch.control_totals();
        BatchSummary {
            batch_number: batch.batch_number(),
            sec_code: batch.header.standard_entry_class_code.clone(),
            company_name: batch.header.originator_identification.clone(),
            entries: batch.entry_count(),
            addenda: batch.entries.iter().map(|e| e.addenda_count()).sum(),
            debit: dollars(totals.total_debit),
            credit: dollars(totals.total_credit),
        }
    }
}

/// One summary per batch, domestic batches first
pub fn summarize(file: &File) -> Vec<BatchSummary> {
    file.batches
        .iter()
        .map(BatchSummary::from_batch)
        .chain(file.iat_batches.iter().map(BatchSummary::from_iat_batch))
        .collect()
}

/// Write the summaries as CSV with a header row
pub fn write_summary_csv(summaries: &[BatchSummary], output: &mut dyn Write) -> Result<(), AchError> {
    let mut writer = csv::Writer::from_writer(output);
    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;
    Ok(())
}
