//! Data directory resolution.
//!
//! Handles finding interaction logs across environments:
//! - Custom: `--data-dir`
//! - Environment: `$RECBENCH_DATA_DIR`
//! - Development: the crate's bundled `data/` directory

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Environment variable for a custom data directory
pub const DATA_DIR_ENV: &str = "RECBENCH_DATA_DIR";

/// Default test log file name
pub const DEFAULT_TEST_FILE: &str = "test.tsv";

/// Default training log file name
pub const DEFAULT_TRAIN_FILE: &str = "train.tsv";

/// Bundled sample data shipped with the crate.
fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Finds the directory holding `required_file`.
///
/// Search order:
/// 1. `custom_dir` (used as given; an error if the file is missing there)
/// 2. `$RECBENCH_DATA_DIR` environment variable
/// 3. Bundled `data/` directory next to this crate's manifest
pub fn find_data_dir(custom_dir: Option<&Path>, required_file: &str) -> Result<PathBuf> {
    // 1. Explicit flag
    if let Some(dir) = custom_dir {
        if dir.join(required_file).exists() {
            return Ok(dir.to_path_buf());
        }
        return Err(anyhow!(
            "{} not found in --data-dir {}",
            required_file,
            dir.display()
        ));
    }

    // 2. Environment variable
    let from_env = std::env::var(DATA_DIR_ENV).ok().map(PathBuf::from);
    if let Some(ref dir) = from_env {
        if dir.join(required_file).exists() {
            return Ok(dir.clone());
        }
    }

    // 3. Bundled sample data
    let bundled = bundled_data_dir();
    if bundled.join(required_file).exists() {
        return Ok(bundled);
    }

    Err(anyhow!(
        "Interaction log {} not found.\n\
         Searched locations:\n\
         - ${} environment variable{}\n\
         - {}",
        required_file,
        DATA_DIR_ENV,
        from_env
            .map(|dir| format!(" ({})", dir.display()))
            .unwrap_or_default(),
        bundled.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_custom_dir_wins() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test.tsv"), "u1\ti1\t1\n").unwrap();

        let found = find_data_dir(Some(dir.path()), "test.tsv").unwrap();
        assert_eq!(found, dir.path());
    }

    #[test]
    fn test_custom_dir_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = find_data_dir(Some(dir.path()), "test.tsv").unwrap_err();
        assert!(err.to_string().contains("--data-dir"));
    }

    #[test]
    fn test_bundled_sample_data() {
        let found = find_data_dir(None, DEFAULT_TEST_FILE);
        if std::env::var(DATA_DIR_ENV).is_err() {
            assert_eq!(found.unwrap(), bundled_data_dir());
        }
    }
}
