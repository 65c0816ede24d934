//! Store repository trait and implementations

use crate::backup::{BackupInfo, BackupManager};
use crate::config::StoreConfig;
use crate::error::{PersistenceError, Result};
use player_store::{ParseStats, PlayerStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// What a save did
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    /// Backup written before the store was overwritten; `None` only when
    /// there was no previous version to preserve
    pub backup: Option<BackupInfo>,

    /// Bytes written to the primary file
    pub bytes_written: u64,
}

/// Abstract access to a canonical player store
#[async_trait::async_trait]
pub trait StoreRepository: Send + Sync {
    /// Load the store, skipping malformed rows
    async fn load(&self) -> Result<(PlayerStore, ParseStats)>;

    /// Persist the store. A backup of the previous contents is taken
    /// first; if that fails, the primary file is left untouched.
    async fn save(&self, store: &PlayerStore) -> Result<SaveOutcome>;

    /// Path identifying the store (diagnostic label for in-memory)
    fn store_path(&self) -> &Path;
}

/// Local file-based store repository
pub struct LocalStoreRepository {
    config: StoreConfig,
    backups: BackupManager,
}

impl LocalStoreRepository {
    /// Create a new local repository
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate().map_err(PersistenceError::config)?;
        let backups = BackupManager::new(config.clone())?;
        Ok(Self { config, backups })
    }

    /// Backup manager for this store
    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }
}

#[async_trait::async_trait]
impl StoreRepository for LocalStoreRepository {
    async fn load(&self) -> Result<(PlayerStore, ParseStats)> {
        let json = tokio::fs::read_to_string(&self.config.store_path).await?;
        let (store, stats) = PlayerStore::from_json_str(&json)?;
        info!(
            "loaded {} record(s) from {:?} ({} skipped)",
            stats.loaded, self.config.store_path, stats.skipped
        );
        Ok((store, stats))
    }

    async fn save(&self, store: &PlayerStore) -> Result<SaveOutcome> {
        // backup precedes mutation; a first-ever save has nothing to copy
        let store_exists = tokio::fs::metadata(&self.config.store_path).await.is_ok();
        let backup = if store_exists {
            Some(self.backups.create_backup().await?)
        } else {
            info!("no existing store at {:?}, nothing to back up", self.config.store_path);
            None
        };

        let json = store.to_json_string_pretty().map_err(PersistenceError::Store)?;
        tokio::fs::write(&self.config.store_path, &json).await?;
        info!("wrote {} bytes to {:?}", json.len(), self.config.store_path);

        if backup.is_some() {
            self.backups.cleanup_old_backups().await?;
        }

        Ok(SaveOutcome { backup, bytes_written: json.len() as u64 })
    }

    fn store_path(&self) -> &Path {
        &self.config.store_path
    }
}

/// In-memory store repository (for testing and composition).
///
/// Contents are held as serialized JSON so loads exercise the same lenient
/// parse path a file-backed store does.
pub struct InMemoryStoreRepository {
    label: PathBuf,
    contents: Arc<Mutex<Option<String>>>,
    backups: Arc<Mutex<Vec<String>>>,
}

impl InMemoryStoreRepository {
    /// Create an empty in-memory repository
    pub fn new() -> Self {
        Self {
            label: PathBuf::from("<memory>"),
            contents: Arc::new(Mutex::new(None)),
            backups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create an in-memory repository seeded with a store document
    pub fn with_contents(json: impl Into<String>) -> Self {
        Self {
            label: PathBuf::from("<memory>"),
            contents: Arc::new(Mutex::new(Some(json.into()))),
            backups: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Current serialized contents
    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }

    /// Number of backups taken so far
    pub async fn backup_count(&self) -> usize {
        self.backups.lock().await.len()
    }

    /// Contents preserved by the most recent save
    pub async fn latest_backup_contents(&self) -> Option<String> {
        self.backups.lock().await.last().cloned()
    }
}

impl Default for InMemoryStoreRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl StoreRepository for InMemoryStoreRepository {
    async fn load(&self) -> Result<(PlayerStore, ParseStats)> {
        let contents = self.contents.lock().await;
        let json = contents
            .as_ref()
            .ok_or_else(|| PersistenceError::not_found("in-memory store is empty"))?;
        Ok(PlayerStore::from_json_str(json)?)
    }

    async fn save(&self, store: &PlayerStore) -> Result<SaveOutcome> {
        let json = store.to_json_string_pretty().map_err(PersistenceError::Store)?;
        let bytes_written = json.len() as u64;

        let mut contents = self.contents.lock().await;
        if let Some(previous) = contents.take() {
            self.backups.lock().await.push(previous);
        }
        *contents = Some(json);

        Ok(SaveOutcome { backup: None, bytes_written })
    }

    fn store_path(&self) -> &Path {
        &self.label
    }
}
