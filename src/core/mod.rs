//! Core business logic module
//!
//! This module contains the ACH object graph and the operations over it:
//! - `batch` / `iat_batch` - Batch aggregates, tabulation and validation
//! - `file` - The file aggregate and its control record
//! - `tabulation` - Entry hash, dollar totals and block count arithmetic
//! - `sec_rules` - Per Standard Entry Class rule-sets
//! - `codes` - Return and change code reference tables
//! - `merge` - Combining many files under line and dollar ceilings
//! - `flatten` - Collapsing compatible batches within one file

pub mod batch;
pub mod codes;
pub mod file;
pub mod flatten;
pub mod iat_batch;
pub mod merge;
pub mod sec_rules;
pub mod tabulation;

pub use batch::{Batch, ValidateOpts};
pub use file::File;
pub use flatten::flatten_batches;
pub use iat_batch::IatBatch;
pub use merge::{merge_files, MergeConditions};
pub use tabulation::Totals;
