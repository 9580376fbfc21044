//! Types module
//!
//! Contains shared types used throughout the crate:
//! - `category`: the entry category (forward, return, NOC, dishonored)
//! - `transaction_code`: transaction code classification
//! - `error`: error types for the ACH engine

pub mod category;
pub mod error;
pub mod transaction_code;

pub use category::Category;
pub use error::{
    AchError, BatchError, BatchErrorKind, ErrorList, FieldError, FieldErrorKind, FileError,
    FileErrorKind,
};
