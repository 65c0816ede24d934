//! Backup management for the canonical store file
//!
//! Every save copies the current store to a sibling backup before the
//! primary file is touched, so a failed write never leaves the only copy
//! corrupted. Timestamped mode keeps a bounded history; fixed mode keeps a
//! single `.backup` sibling that each run overwrites.

use crate::config::StoreConfig;
use crate::error::{PersistenceError, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::path::PathBuf;
use tracing::{info, warn};

/// Colon-free ISO-8601-like stamp embedded in backup filenames.
/// Millisecond precision keeps rapid consecutive runs from colliding.
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3f";

/// Suffix for timestamped backup files
const BACKUP_SUFFIX: &str = ".backup.json";

/// A backup file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    /// File path
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,

    /// When the backup was taken
    pub created_at: DateTime<Utc>,
}

/// Backup manager for one store file
pub struct BackupManager {
    config: StoreConfig,
}

impl BackupManager {
    /// Create a new backup manager
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate().map_err(PersistenceError::config)?;
        Ok(Self { config })
    }

    /// Copy the current store file aside. This must succeed before any
    /// mutation of the primary file; a missing store is `NotFound`, any
    /// copy failure is `BackupFailed`.
    pub async fn create_backup(&self) -> Result<BackupInfo> {
        let store_path = &self.config.store_path;
        if tokio::fs::metadata(store_path).await.is_err() {
            return Err(PersistenceError::not_found(format!(
                "store file {store_path:?} does not exist"
            )));
        }

        let created_at = Utc::now();
        let backup_path = self.backup_path_for(created_at);
        let backup_dir = self.config.backup_dir();
        tokio::fs::create_dir_all(&backup_dir).await.map_err(|err| {
            PersistenceError::backup_failed(format!(
                "could not create backup directory {backup_dir:?}: {err}"
            ))
        })?;

        tokio::fs::copy(store_path, &backup_path).await.map_err(|err| {
            PersistenceError::backup_failed(format!("copy to {backup_path:?} failed: {err}"))
        })?;

        let size = tokio::fs::metadata(&backup_path).await?.len();
        info!("backed up {:?} to {:?} ({} bytes)", store_path, backup_path, size);

        Ok(BackupInfo { path: backup_path, size, created_at })
    }

    /// All backups of this store, oldest first
    pub async fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        let backup_dir = self.config.backup_dir();
        if tokio::fs::metadata(&backup_dir).await.is_err() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        let mut entries = tokio::fs::read_dir(&backup_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let created_at = if self.config.backup.timestamped {
                match self.parse_backup_timestamp(file_name) {
                    Some(ts) => ts,
                    None => continue,
                }
            } else if file_name == self.fixed_backup_name() {
                let modified = entry.metadata().await?.modified()?;
                DateTime::<Utc>::from(modified)
            } else {
                continue;
            };

            let size = entry.metadata().await?.len();
            backups.push(BackupInfo { path, size, created_at });
        }

        backups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.path.cmp(&b.path)));
        Ok(backups)
    }

    /// Newest backup, if any exist
    pub async fn latest_backup(&self) -> Result<Option<BackupInfo>> {
        Ok(self.list_backups().await?.pop())
    }

    /// Delete the oldest timestamped backups beyond the retention limit.
    /// Fixed-suffix mode keeps a single file and never cleans up.
    pub async fn cleanup_old_backups(&self) -> Result<()> {
        if !self.config.backup.timestamped {
            return Ok(());
        }

        let backups = self.list_backups().await?;
        let max_backups = self.config.backup.max_backups;
        if backups.len() <= max_backups {
            return Ok(());
        }

        let excess = backups.len() - max_backups;
        for backup in backups.iter().take(excess) {
            match tokio::fs::remove_file(&backup.path).await {
                Ok(()) => info!("removed old backup {:?}", backup.path),
                Err(err) => warn!("could not remove old backup {:?}: {}", backup.path, err),
            }
        }

        Ok(())
    }

    fn store_file_name(&self) -> String {
        self.config
            .store_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string())
    }

    fn store_stem(&self) -> String {
        self.config
            .store_path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string())
    }

    fn fixed_backup_name(&self) -> String {
        format!("{}.backup", self.store_file_name())
    }

    fn backup_path_for(&self, created_at: DateTime<Utc>) -> PathBuf {
        let name = if self.config.backup.timestamped {
            format!(
                "{}_{}{}",
                self.store_stem(),
                created_at.format(TIMESTAMP_FORMAT),
                BACKUP_SUFFIX
            )
        } else {
            self.fixed_backup_name()
        };
        self.config.backup_dir().join(name)
    }

    fn parse_backup_timestamp(&self, file_name: &str) -> Option<DateTime<Utc>> {
        let prefix = format!("{}_", self.store_stem());
        let stamp = file_name.strip_prefix(&prefix)?.strip_suffix(BACKUP_SUFFIX)?;
        let naive = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
        Some(Utc.from_utc_datetime(&naive))
    }
}
