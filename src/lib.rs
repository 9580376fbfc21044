//! Rust ACH Engine Library
//! # Overview
//!
//! This library reads, validates, writes, merges and flattens NACHA ACH
//! files: the fixed-width, 94-character-record format used for US
//! interbank payments.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Error taxonomy and shared enums (entry category, transaction codes)
//! - [`records`] - One codec per record type: parse, render and validate
//! - [`core`] - The object graph and operations on it:
//!   - [`core::batch`] / [`core::iat_batch`] - Batch tabulation and validation
//!   - [`core::file`] - The file aggregate and its control record
//!   - [`core::merge`] - Merging many files under line and dollar ceilings
//!   - [`core::flatten`] - Collapsing compatible batches within a file
//! - [`io`] - Reader, writer and the CSV batch summary
//! - [`strategy`] - Sync and async strategies for loading many files
//! - [`cli`] - CLI arguments parsing
//!
//! # File Layout
//!
//! ```text
//! 1 File header
//!   5 Batch header
//!     6 Entry detail
//!       7 Addenda (0..n)
//!   8 Batch control
//! 9 File control
//! 9999...9 padding to a multiple of 10 lines
//! ```
//!
//! # Error Policy
//!
//! Reading never stops at the first problem: the reader returns the
//! best-effort [`core::File`] together with an [`types::ErrorList`]. Creating,
//! merging and flattening return the first error instead, since a graph that
//! fails tabulation cannot be trusted.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod records;
pub mod strategy;
pub mod types;

pub use core::{flatten_batches, merge_files, Batch, File, IatBatch, MergeConditions};
pub use io::{read_file, read_str, to_bytes, ReadResult, Reader, ReaderOptions, Writer, WriterOptions};
pub use types::{AchError, BatchError, ErrorList, FieldError, FileError};
