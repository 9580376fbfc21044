//! Asynchronous loading strategy
//!
//! Reads input files concurrently on a tokio multi-threaded runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncLoadStrategy
//!     ├── LoadConfig (max_concurrent_files)
//!     ├── tokio::fs::read (file contents)
//!     └── spawn_blocking (Reader, one File per task)
//! ```
//!
//! Every task owns the file it builds; nothing is shared between tasks. The
//! stream is `buffered`, so at most `max_concurrent_files` files are in
//! flight and results come back in input order.

use crate::io::{Reader, ReaderOptions};
use crate::strategy::{LoadStrategy, LoadedFile};
use crate::types::AchError;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadConfig {
    pub max_concurrent_files: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: num_cpus::get(),
        }
    }
}

impl LoadConfig {
    pub fn new(max_concurrent_files: usize) -> Self {
        let default = Self::default();

        let max_concurrent_files = if max_concurrent_files == 0 {
            warn!(
                requested = max_concurrent_files,
                default = default.max_concurrent_files,
                "invalid max_concurrent_files, using default"
            );
            default.max_concurrent_files
        } else {
            max_concurrent_files
        };

        Self {
            max_concurrent_files,
        }
    }
}

async fn load_one(path: PathBuf, options: ReaderOptions) -> Result<LoadedFile, AchError> {
    let bytes = tokio::fs::read(&path).await.map_err(|e| AchError::Io {
        message: format!("failed to open '{}': {}", path.display(), e),
    })?;
    let result = tokio::task::spawn_blocking(move || {
        Reader::with_options(bytes.as_slice(), options).read()
    })
    .await
    .map_err(|e| AchError::Io {
        message: format!("reader task for '{}' failed: {}", path.display(), e),
    })?;
    info!(path = %path.display(), errors = result.errors.len(), "read file");
    Ok(LoadedFile { path, result })
}

/// Read `paths` with at most `max_concurrent_files` reads in flight.
/// Results keep the order of `paths`; the first failure aborts the load.
pub async fn load_files(
    paths: Vec<PathBuf>,
    max_concurrent_files: usize,
    options: ReaderOptions,
) -> Result<Vec<LoadedFile>, AchError> {
    stream::iter(paths)
        .map(|path| load_one(path, options))
        .buffered(max_concurrent_files.max(1))
        .try_collect()
        .await
}

#[derive(Debug, Clone)]
pub struct AsyncLoadStrategy {
    config: LoadConfig,
    options: ReaderOptions,
}

impl AsyncLoadStrategy {
    pub fn new(config: LoadConfig, options: ReaderOptions) -> Self {
        Self { config, options }
    }
}

impl LoadStrategy for AsyncLoadStrategy {
    fn load(&self, paths: &[PathBuf]) -> Result<Vec<LoadedFile>, AchError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_files)
            .build()
            .map_err(|e| AchError::Io {
                message: format!("failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(load_files(
            paths.to_vec(),
            self.config.max_concurrent_files,
            self.options,
        ))
    }
}
