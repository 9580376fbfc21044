//! I/O module
//!
//! Handles the NACHA fixed-width text format.
//!
//! # Components
//!
//! - `csv_format` - CSV batch summary used by `achtool describe`
//! - `fields` - Fixed-width field encoding, decoding and predicates
//! - `reader` - Line-driven reader returning a best-effort file plus errors
//! - `writer` - Writer with block padding and optional validation bypass

pub mod csv_format;
pub mod fields;
pub mod reader;
pub mod writer;

pub use csv_format::{summarize, write_summary_csv, BatchSummary};
pub use reader::{read_file, read_str, ReadResult, Reader, ReaderOptions};
pub use writer::{to_bytes, Writer, WriterOptions};
