//! Merging many ACH files into as few files as possible
//!
//! # Algorithm
//!
//! Input files are grouped by an output key: the file header with its
//! volatile fields (creation date, creation time, file ID modifier) cleared,
//! plus whether the file is ADV. Every input batch is then placed into an
//! open output file of the same key:
//!
//! 1. A batch whose header (batch number aside) matches an existing output
//!    batch is merged into it, unless a trace number would collide. On a
//!    collision that output is skipped and the next output with the same key
//!    is tried, so trace numbers stay unique without dropping entries.
//! 2. Otherwise the batch is appended to the output file.
//! 3. The output is re-tabulated and checked against the ceilings in
//!    [`MergeConditions`]. When a ceiling is exceeded the change is undone,
//!    the output is closed and the batch goes to a fresh output. A single
//!    batch holding a single entry is accepted even over the ceiling; a
//!    larger batch that alone exceeds it is split across files.
//!
//! Batch numbers are renumbered from 1 in every output. Any tabulation or
//! validation failure aborts the whole merge.

use crate::core::batch::Batch;
use crate::core::file::File;
use crate::core::iat_batch::IatBatch;
use crate::records::FileHeader;
use crate::types::AchError;
use tracing::debug;

/// Ceilings applied to every merged output file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeConditions {
    /// Most logical lines per output file, block padding excluded
    pub max_lines: Option<usize>,
    /// Most cents per output file, debits plus credits
    pub max_dollar_amount: Option<u64>,
}

impl MergeConditions {
    /// Whether a file of `lines` lines carrying `dollars` cents is over a
    /// ceiling
    pub fn exceeded_by(&self, lines: usize, dollars: u64) -> bool {
        self.max_lines.is_some_and(|max| lines > max)
            || self.max_dollar_amount.is_some_and(|max| dollars > max)
    }

    fn exceeded(&self, file: &File) -> bool {
        self.exceeded_by(file.line_count(), file.calculate_totals().dollar_amount())
    }
}

/// Header fields two files must share to be merged
type OutputKey = (FileHeader, bool);

fn output_key(file: &File) -> OutputKey {
    let header = FileHeader {
        file_creation_date: String::new(),
        file_creation_time: String::new(),
        file_id_modifier: String::new(),
        ..file.header.clone()
    };
    (header, file.is_adv())
}

/// A single batch with a single entry cannot be reduced any further
fn is_irreducible(file: &File) -> bool {
    let entries: usize = file.batches.iter().map(Batch::entry_count).sum::<usize>()
        + file.iat_batches.iter().map(IatBatch::entry_count).sum::<usize>();
    file.batch_count() == 1 && entries == 1
}

/// Where an incoming batch lands in a candidate output
enum Slot {
    /// Merge into the existing batch at this position
    Merge(usize),
    /// Append as a new batch
    Append,
}

/// Find where `batch` can go in `file`; `None` when every batch with the
/// same header already holds one of its trace numbers
fn find_slot(file: &File, batch: &Batch) -> Option<Slot> {
    let signature = batch.header.signature();
    let mut same_header = false;
    for (position, candidate) in file.batches.iter().enumerate() {
        if candidate.header.signature() != signature {
            continue;
        }
        if !candidate.has_trace_overlap(batch) {
            return Some(Slot::Merge(position));
        }
        same_header = true;
    }
    if same_header {
        None
    } else {
        Some(Slot::Append)
    }
}

/// Renumber the batches, re-tabulate one of them, then the file
fn retabulate(file: &mut File, position: usize) -> Result<(), AchError> {
    file.renumber_batches();
    file.batches[position].create()?;
    file.create()
}

fn retabulate_iat(file: &mut File, position: usize) -> Result<(), AchError> {
    file.renumber_batches();
    file.iat_batches[position].create()?;
    file.create()
}

struct Output {
    file: File,
    key: OutputKey,
    open: bool,
}

struct Merger {
    outputs: Vec<Output>,
    conditions: MergeConditions,
}

impl Merger {
    fn open_output(&mut self, key: &OutputKey, header: &FileHeader) -> usize {
        debug!(outputs = self.outputs.len() + 1, "starting new output file");
        self.outputs.push(Output {
            file: File::new(header.clone()),
            key: key.clone(),
            open: true,
        });
        self.outputs.len() - 1
    }

    fn place_batch(&mut self, key: &OutputKey, header: &FileHeader, batch: Batch) -> Result<(), AchError> {
        for index in 0..self.outputs.len() {
            let output = &self.outputs[index];
            if !output.open || output.key != *key {
                continue;
            }
            match find_slot(&output.file, &batch) {
                Some(slot) => return self.insert(index, slot, key, batch),
                None => {
                    debug!(
                        batch_number = batch.batch_number(),
                        "trace number collision, trying next output"
                    );
                }
            }
        }
        let index = self.open_output(key, header);
        self.fill_fresh(index, key, batch)
    }

    fn insert(&mut self, index: usize, slot: Slot, key: &OutputKey, batch: Batch) -> Result<(), AchError> {
        let conditions = self.conditions;
        let output = &mut self.outputs[index];
        let (position, saved) = match slot {
            Slot::Merge(position) => {
                let saved = output.file.batches[position].clone();
                output.file.batches[position].merge_entries(batch.clone());
                debug!(position, "merged batch into existing output batch");
                (position, Some(saved))
            }
            Slot::Append => {
                output.file.add_batch(batch.clone());
                (output.file.batches.len() - 1, None)
            }
        };
        retabulate(&mut output.file, position)?;
        if !conditions.exceeded(&output.file) || is_irreducible(&output.file) {
            return Ok(());
        }

        match saved {
            Some(saved) => output.file.batches[position] = saved,
            None => {
                output.file.batches.pop();
            }
        }
        output.file.renumber_batches();
        output.file.create()?;
        output.open = false;
        debug!(
            lines = output.file.line_count(),
            "ceiling reached, closing output file"
        );

        let header = output.file.header.clone();
        let fresh = self.open_output(key, &header);
        self.fill_fresh(fresh, key, batch)
    }

    /// Place a batch into an empty output, splitting it when it alone is
    /// over a ceiling
    fn fill_fresh(&mut self, index: usize, key: &OutputKey, batch: Batch) -> Result<(), AchError> {
        let file = &mut self.outputs[index].file;
        file.add_batch(batch);
        retabulate(file, 0)?;
        if !self.conditions.exceeded(file) || is_irreducible(file) {
            return Ok(());
        }
        let batch = file.batches.pop().unwrap_or_default();
        self.split(index, key, batch)
    }

    /// Spread the entries of one batch over as many outputs as the ceilings
    /// require. Every part keeps the batch header.
    fn split(&mut self, index: usize, key: &OutputKey, batch: Batch) -> Result<(), AchError> {
        debug!(
            batch_number = batch.batch_number(),
            entries = batch.entry_count(),
            "splitting batch across output files"
        );
        let empty = Batch {
            entries: Vec::new(),
            adv_entries: Vec::new(),
            ..batch.clone()
        };
        // file header and control, batch header and control
        const FRAME_LINES: usize = 4;

        let mut parts = Vec::new();
        let mut part = empty.clone();
        let (mut lines, mut dollars) = (FRAME_LINES, 0u64);
        for entry in batch.entries {
            let entry_lines = 1 + entry.addenda_count();
            if part.entry_count() > 0
                && self.conditions.exceeded_by(lines + entry_lines, dollars + entry.amount)
            {
                parts.push(std::mem::replace(&mut part, empty.clone()));
                (lines, dollars) = (FRAME_LINES, 0);
            }
            lines += entry_lines;
            dollars += entry.amount;
            part.add_entry(entry);
        }
        for entry in batch.adv_entries {
            if part.entry_count() > 0
                && self.conditions.exceeded_by(lines + 1, dollars + entry.amount)
            {
                parts.push(std::mem::replace(&mut part, empty.clone()));
                (lines, dollars) = (FRAME_LINES, 0);
            }
            lines += 1;
            dollars += entry.amount;
            part.add_adv_entry(entry);
        }
        parts.push(part);

        let header = self.outputs[index].file.header.clone();
        let mut current = index;
        for (number, part) in parts.into_iter().enumerate() {
            if number > 0 {
                self.outputs[current].open = false;
                current = self.open_output(key, &header);
            }
            let file = &mut self.outputs[current].file;
            file.add_batch(part);
            retabulate(file, 0)?;
        }
        Ok(())
    }

    /// IAT batches are never merged into one another, only appended
    fn place_iat_batch(&mut self, key: &OutputKey, header: &FileHeader, batch: IatBatch) -> Result<(), AchError> {
        let conditions = self.conditions;
        let Some(index) = self.outputs.iter().position(|o| o.open && o.key == *key) else {
            let index = self.open_output(key, header);
            return self.fill_fresh_iat(index, key, batch);
        };
        let output = &mut self.outputs[index];
        output.file.add_iat_batch(batch);
        let position = output.file.iat_batches.len() - 1;
        retabulate_iat(&mut output.file, position)?;
        if !conditions.exceeded(&output.file) || is_irreducible(&output.file) {
            return Ok(());
        }

        let batch = output.file.iat_batches.pop().unwrap_or_default();
        output.file.renumber_batches();
        output.file.create()?;
        output.open = false;
        debug!(
            lines = output.file.line_count(),
            "ceiling reached, closing output file"
        );
        let header = output.file.header.clone();
        let fresh = self.open_output(key, &header);
        self.fill_fresh_iat(fresh, key, batch)
    }

    fn fill_fresh_iat(&mut self, index: usize, key: &OutputKey, batch: IatBatch) -> Result<(), AchError> {
        let file = &mut self.outputs[index].file;
        file.add_iat_batch(batch);
        retabulate_iat(file, 0)?;
        if !self.conditions.exceeded(file) || is_irreducible(file) {
            return Ok(());
        }
        let batch = file.iat_batches.pop().unwrap_or_default();
        self.split_iat(index, key, batch)
    }

    /// [`Merger::split`] for IAT batches
    fn split_iat(&mut self, index: usize, key: &OutputKey, batch: IatBatch) -> Result<(), AchError> {
        debug!(
            batch_number = batch.batch_number(),
            entries = batch.entry_count(),
            "splitting IAT batch across output files"
        );
        let empty = IatBatch {
            entries: Vec::new(),
            ..batch.clone()
        };
        const FRAME_LINES: usize = 4;

        let mut parts = Vec::new();
        let mut part = empty.clone();
        let (mut lines, mut dollars) = (FRAME_LINES, 0u64);
        for entry in batch.entries {
            let entry_lines = 1 + entry.addenda_count();
            if part.entry_count() > 0
                && self.conditions.exceeded_by(lines + entry_lines, dollars + entry.amount)
            {
                parts.push(std::mem::replace(&mut part, empty.clone()));
                (lines, dollars) = (FRAME_LINES, 0);
            }
            lines += entry_lines;
            dollars += entry.amount;
            part.add_entry(entry);
        }
        parts.push(part);

        let header = self.outputs[index].file.header.clone();
        let mut current = index;
        for (number, part) in parts.into_iter().enumerate() {
            if number > 0 {
                self.outputs[current].open = false;
                current = self.open_output(key, &header);
            }
            let file = &mut self.outputs[current].file;
            file.add_iat_batch(part);
            retabulate_iat(file, 0)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<File>, AchError> {
        let mut files = Vec::with_capacity(self.outputs.len());
        for output in self.outputs {
            let mut file = output.file;
            file.renumber_batches();
            file.create()?;
            files.push(file);
        }
        Ok(files)
    }
}

/// Merge `files` into the fewest files that respect `conditions`.
///
/// # Arguments
///
/// * `files` - Input files; their batches should already be tabulated
/// * `conditions` - Line and dollar ceilings for each output file
///
/// # Returns
///
/// * `Ok(Vec<File>)` - Output files in creation order, each tabulated and
///   validated
/// * `Err(AchError)` - The first tabulation or validation failure; no
///   partial output is returned
pub fn merge_files(files: Vec<File>, conditions: &MergeConditions) -> Result<Vec<File>, AchError> {
    let mut merger = Merger {
        outputs: Vec::new(),
        conditions: *conditions,
    };
    let inputs = files.len();
    for file in files {
        let key = output_key(&file);
        let header = file.header.clone();
        for batch in file.batches {
            merger.place_batch(&key, &header, batch)?;
        }
        for batch in file.iat_batches {
            merger.place_iat_batch(&key, &header, batch)?;
        }
    }
    let outputs = merger.finish()?;
    debug!(inputs, outputs = outputs.len(), "merge complete");
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::tests::ppd_batch;
    use crate::core::file::tests::{ppd_file, HEADER};
    use crate::core::iat_batch::tests::iat_batch;
    use crate::records::RecordCodec;
    use std::collections::HashSet;

    fn file_with(batches: Vec<Batch>) -> File {
        let mut file = File::new(FileHeader::parse(HEADER));
        for (number, mut batch) in batches.into_iter().enumerate() {
            batch.header.batch_number = number as u32 + 1;
            batch.create().unwrap();
            file.add_batch(batch);
        }
        file.create().unwrap();
        file
    }

    /// A batch whose header differs from `ppd_batch` by company name
    fn named_batch(name: &str, entries: u64) -> Batch {
        let mut batch = ppd_batch(entries);
        batch.header.company_name = name.to_string();
        batch
    }

    fn entry_count(files: &[File]) -> usize {
        files
            .iter()
            .flat_map(|f| f.batches.iter())
            .map(Batch::entry_count)
            .sum()
    }

    #[test]
    fn test_disjoint_headers_stay_separate() {
        let a = ppd_file(1, 1);
        let mut b = file_with(vec![
            named_batch("One", 1),
            named_batch("Two", 1),
            named_batch("Three", 1),
        ]);
        b.header.immediate_origin = "121042882".to_string();
        b.create().unwrap();

        let merged = merge_files(vec![a, b], &MergeConditions::default()).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].batches.len(), 1);
        assert_eq!(merged[1].batches.len(), 3);
    }

    #[test]
    fn test_same_header_merges_into_one_file() {
        let a = ppd_file(1, 1);
        let mut b = file_with(vec![
            named_batch("One", 1),
            named_batch("Two", 1),
            named_batch("Three", 1),
        ]);
        b.header.file_id_modifier = "B".to_string();
        b.header.file_creation_time = "1200".to_string();

        let merged = merge_files(vec![a, b], &MergeConditions::default()).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].batches.len(), 4);
        let numbers: Vec<u32> = merged[0].batches.iter().map(Batch::batch_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_same_batch_header_merges_entries() {
        let a = ppd_file(1, 2);
        let mut batch = ppd_batch(0);
        for sequence in [3, 4] {
            let mut entry = crate::records::EntryDetail::parse(crate::core::batch::tests::ENTRY);
            entry.set_trace_number("23138010", sequence);
            batch.add_entry(entry);
        }
        let b = file_with(vec![batch]);

        let merged = merge_files(vec![a, b], &MergeConditions::default()).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].batches.len(), 1);
        assert_eq!(merged[0].batches[0].entries.len(), 4);
        assert_eq!(merged[0].control.entry_addenda_count, 4);
    }

    #[test]
    fn test_trace_collision_creates_sibling_file() {
        let a = ppd_file(1, 2);
        let b = ppd_file(1, 2);

        let merged = merge_files(vec![a, b], &MergeConditions::default()).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(entry_count(&merged), 4);
        for file in &merged {
            for batch in &file.batches {
                let traces: HashSet<String> = batch.trace_numbers().into_iter().collect();
                assert_eq!(traces.len(), batch.entry_count());
            }
        }
    }

    #[test]
    fn test_line_ceiling_is_respected() {
        let inputs: Vec<File> = (0..4)
            .map(|n| file_with(vec![named_batch(&format!("Company {n}"), 3)]))
            .collect();
        let conditions = MergeConditions {
            max_lines: Some(12),
            max_dollar_amount: None,
        };
        let merged = merge_files(inputs, &conditions).unwrap();
        // each batch is 5 lines, a file frame is 2: two batches per file
        assert_eq!(merged.len(), 2);
        assert_eq!(entry_count(&merged), 12);
        assert!(merged.iter().all(|f| f.line_count() <= 12));
    }

    #[test]
    fn test_oversized_iat_batch_is_split() {
        let mut batch = iat_batch();
        let mut second = batch.entries[0].clone();
        second.trace_number = "231380100000002".to_string();
        batch.add_entry(second);
        batch.header.batch_number = 1;
        batch.create().unwrap();
        let mut input = File::new(FileHeader::parse(HEADER));
        input.add_iat_batch(batch);
        input.create().unwrap();
        assert_eq!(input.line_count(), 20);

        let conditions = MergeConditions {
            max_lines: Some(12),
            max_dollar_amount: None,
        };
        let merged = merge_files(vec![input], &conditions).unwrap();
        // one entry with seven addenda plus a four line frame fills a file
        assert_eq!(merged.len(), 2);
        for file in &merged {
            assert_eq!(file.line_count(), 12);
            assert_eq!(file.iat_batches.len(), 1);
            assert_eq!(file.iat_batches[0].entry_count(), 1);
        }
        assert_eq!(merged[1].iat_batches[0].entries[0].trace_number, "231380100000002");
    }

    #[test]
    fn test_oversized_batch_is_split() {
        let input = ppd_file(1, 10);
        let conditions = MergeConditions {
            max_lines: Some(8),
            max_dollar_amount: None,
        };
        let merged = merge_files(vec![input], &conditions).unwrap();
        // four lines of frame leave room for four entries per file
        assert_eq!(merged.len(), 3);
        assert_eq!(entry_count(&merged), 10);
        assert!(merged.iter().all(|f| f.line_count() <= 8));
    }

    #[test]
    fn test_dollar_ceiling_allows_irreducible_unit() {
        let input = ppd_file(1, 2);
        let conditions = MergeConditions {
            max_lines: None,
            max_dollar_amount: Some(1),
        };
        let merged = merge_files(vec![input], &conditions).unwrap();
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|f| f.batches[0].entries.len() == 1));
    }

    #[test]
    fn test_invalid_input_aborts_merge() {
        let mut a = ppd_file(1, 1);
        a.batches[0].entries[0].check_digit = "0".to_string();
        assert!(merge_files(vec![a], &MergeConditions::default()).is_err());
    }
}
