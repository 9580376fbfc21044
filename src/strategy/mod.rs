//! Loading strategy module for reading many ACH files
//!
//! The merge command reads every input before merging. This module defines
//! the Strategy pattern for that loading step so a sequential or a concurrent
//! implementation can be selected at runtime. Both produce the same files in
//! the same order; only the scheduling differs.

use crate::cli::StrategyType;
use crate::io::{ReadResult, ReaderOptions};
use crate::types::AchError;
use std::path::PathBuf;

pub mod r#async;
pub mod sync;

pub use self::r#async::{load_files, AsyncLoadStrategy, LoadConfig};
pub use sync::SyncLoadStrategy;

/// One input file and the outcome of reading it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub result: ReadResult,
}

/// Loading strategy trait
///
/// Implementations read every path with the given reader options and return
/// the results in input order.
pub trait LoadStrategy: Send + Sync {
    /// Read every file in `paths`
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<LoadedFile>)` - One entry per path, in the order given.
    ///   Problems inside a file are in its [`ReadResult::errors`].
    /// * `Err(AchError)` - A file could not be opened or read at all
    fn load(&self, paths: &[PathBuf]) -> Result<Vec<LoadedFile>, AchError>;
}

/// Create a loading strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - Sync or Async
/// * `config` - Concurrency settings for the async strategy (ignored for sync)
/// * `options` - Reader options applied to every file
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<LoadConfig>,
    options: ReaderOptions,
) -> Box<dyn LoadStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncLoadStrategy::new(options)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncLoadStrategy::new(config, options))
        }
    }
}
