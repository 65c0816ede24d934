//! Local file-based repository constructors

use crate::config::StoreConfig;
use crate::error::Result;
use crate::repository::LocalStoreRepository;
use std::path::PathBuf;

/// Create a local repository with default backup behaviour
pub fn create_local_repository(store_path: impl Into<PathBuf>) -> Result<LocalStoreRepository> {
    LocalStoreRepository::new(StoreConfig::new(store_path))
}

/// Create a local repository with custom configuration
pub fn create_local_repository_with_config(config: StoreConfig) -> Result<LocalStoreRepository> {
    LocalStoreRepository::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::StoreRepository;
    use player_store::PlayerStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store_path = dir.path().join("player_data.json");
        std::fs::write(&store_path, r#"[{"name": "Tom De Koning", "price": 900000}]"#).unwrap();

        let repo = create_local_repository(&store_path).unwrap();
        let (store, stats) = repo.load().await.unwrap();
        assert_eq!(stats.loaded, 1);

        repo.save(&store).await.unwrap();
        let (reloaded, _) = repo.load().await.unwrap();
        assert_eq!(reloaded, store);
    }

    #[tokio::test]
    async fn test_backup_precedes_write() {
        let dir = TempDir::new().unwrap();
        let store_path = dir.path().join("user_team.json");
        std::fs::write(&store_path, r#"[{"name": "Tom De Koning", "price": 900000}]"#).unwrap();
        let pre_run = std::fs::read_to_string(&store_path).unwrap();

        let repo = create_local_repository(&store_path).unwrap();
        let (mut store, _) = repo.load().await.unwrap();
        store.records_mut()[0].price = Some(940_000);

        let outcome = repo.save(&store).await.unwrap();
        let backup = outcome.backup.expect("an existing store must be backed up");

        // the backup holds the pre-run bytes, the store the merged result
        assert_eq!(std::fs::read_to_string(&backup.path).unwrap(), pre_run);
        assert!(std::fs::read_to_string(&store_path).unwrap().contains("940000"));
    }

    #[tokio::test]
    async fn test_first_save_has_nothing_to_back_up() {
        let dir = TempDir::new().unwrap();
        let store_path = dir.path().join("player_data.json");

        let repo = create_local_repository(&store_path).unwrap();
        let outcome = repo.save(&PlayerStore::List(Vec::new())).await.unwrap();

        assert!(outcome.backup.is_none());
        assert!(store_path.exists());
    }

    #[tokio::test]
    async fn test_repeated_saves_stay_within_retention() {
        let dir = TempDir::new().unwrap();
        let store_path = dir.path().join("user_team.json");
        let mut config = StoreConfig::new(&store_path);
        config.backup.max_backups = 2;

        let repo = create_local_repository_with_config(config).unwrap();
        for round in 0..5u64 {
            let mut record = player_store::PlayerRecord::named("Sam Davidson");
            record.price = Some(500_000 + round);
            repo.save(&PlayerStore::List(vec![record])).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let backups = repo.backups().list_backups().await.unwrap();
        assert_eq!(backups.len(), 2);
    }
}
