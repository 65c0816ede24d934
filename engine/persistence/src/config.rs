//! Configuration for the persistence layer

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a file-backed player store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the primary store file
    pub store_path: PathBuf,

    /// Backup behaviour
    pub backup: BackupConfig,
}

/// Backup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Directory for backup files; defaults to the store file's parent
    pub dir: Option<PathBuf>,

    /// Maximum number of timestamped backups to keep
    pub max_backups: usize,

    /// Timestamped sibling files when true, a single fixed `.backup` file
    /// when false
    pub timestamped: bool,
}

impl StoreConfig {
    /// Create a configuration with default backup behaviour
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self { store_path: store_path.into(), backup: BackupConfig::default() }
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.store_path.as_os_str().is_empty() {
            return Err("store_path must not be empty".to_string());
        }
        if self.backup.max_backups == 0 {
            return Err("max_backups must be at least 1".to_string());
        }
        Ok(())
    }

    /// Directory backups are written to
    pub fn backup_dir(&self) -> PathBuf {
        self.backup.dir.clone().unwrap_or_else(|| {
            self.store_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self { dir: None, max_backups: 10, timestamped: true }
    }
}
