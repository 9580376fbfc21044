//! Synchronous loading strategy
//!
//! Reads the input files one after the other on the calling thread.

use crate::io::reader::read_file;
use crate::io::ReaderOptions;
use crate::strategy::{LoadStrategy, LoadedFile};
use crate::types::AchError;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncLoadStrategy {
    options: ReaderOptions,
}

impl SyncLoadStrategy {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }
}

impl LoadStrategy for SyncLoadStrategy {
    fn load(&self, paths: &[PathBuf]) -> Result<Vec<LoadedFile>, AchError> {
        let mut loaded = Vec::with_capacity(paths.len());
        for path in paths {
            let result = read_file(path, &self.options)?;
            info!(path = %path.display(), errors = result.errors.len(), "read file");
            loaded.push(LoadedFile {
                path: path.clone(),
                result,
            });
        }
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file::tests::ppd_file;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_ach(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_strategy_loads_in_order() {
        let first = create_temp_ach(&ppd_file(1, 1).lines().join("\n"));
        let second = create_temp_ach(&ppd_file(2, 1).lines().join("\n"));
        let paths = vec![first.path().to_path_buf(), second.path().to_path_buf()];

        let loaded = SyncLoadStrategy::default().load(&paths).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].path, paths[0]);
        assert_eq!(loaded[0].result.file.batch_count(), 1);
        assert_eq!(loaded[1].result.file.batch_count(), 2);
        assert!(loaded.iter().all(|l| l.result.is_ok()));
    }

    #[test]
    fn test_sync_strategy_keeps_read_errors() {
        let file = create_temp_ach("not an ach file\n");
        let loaded = SyncLoadStrategy::default()
            .load(&[file.path().to_path_buf()])
            .unwrap();
        assert!(!loaded[0].result.is_ok());
    }

    #[test]
    fn test_sync_strategy_fails_on_missing_file() {
        let result = SyncLoadStrategy::default().load(&[PathBuf::from("nonexistent.ach")]);
        assert!(result.is_err());
    }
}
