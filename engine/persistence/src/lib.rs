//! # Persistence Layer
//!
//! File persistence for the canonical player store with one hard rule:
//! **a backup precedes every mutation**. The primary store file is never
//! overwritten until a copy of its current contents has landed on disk.
//!
//! ## Architecture
//!
//! - **StoreRepository**: abstract trait over store access
//! - **LocalStoreRepository**: file-backed implementation (backup, write,
//!   retention cleanup)
//! - **InMemoryStoreRepository**: test/composition implementation
//! - **BackupManager**: timestamped or fixed-suffix sibling backups
//!
//! ## Usage
//!
//! ```rust
//! use persistence::{create_local_repository, StoreRepository};
//! use player_store::PlayerStore;
//! use tempfile::TempDir;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let temp_dir = TempDir::new()?;
//!     let repo = create_local_repository(temp_dir.path().join("player_data.json"))?;
//!
//!     repo.save(&PlayerStore::List(Vec::new())).await?;
//!     let (store, stats) = repo.load().await?;
//!     assert_eq!(stats.loaded, store.len());
//!
//!     Ok(())
//! }
//! ```

pub mod backup;
pub mod config;
pub mod error;
pub mod local;
pub mod repository;

pub use backup::{BackupInfo, BackupManager};
pub use config::{BackupConfig, StoreConfig};
pub use error::{PersistenceError, Result};
pub use local::{create_local_repository, create_local_repository_with_config};
pub use repository::{InMemoryStoreRepository, LocalStoreRepository, SaveOutcome, StoreRepository};
