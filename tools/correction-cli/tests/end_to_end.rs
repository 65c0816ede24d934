//! End-to-end correction run against a real store file

use persistence::{create_local_repository, StoreRepository};
use reconciler::{apply_corrections, parse_corrections, AliasTable};
use tempfile::TempDir;

#[tokio::test]
async fn alias_correction_lands_with_backup() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("user_team.json");
    std::fs::write(
        &store_path,
        r#"[{"name": "Tom De Koning", "price": 900000, "breakeven": 90}]"#,
    )
    .unwrap();
    let pre_run = std::fs::read_to_string(&store_path).unwrap();

    let repo = create_local_repository(&store_path).unwrap();
    let (mut store, stats) = repo.load().await.unwrap();
    assert_eq!(stats.loaded, 1);
    assert_eq!(stats.skipped, 0);

    let mut aliases = AliasTable::new();
    aliases.insert("Tom de konning", "Tom De Koning");
    let rejected = aliases.validate(&store.distinct_names());
    assert!(rejected.is_empty());

    let (corrections, skipped) =
        parse_corrections(r#"[{"name": "Tom de konning", "price": 940000, "breakeven": 94}]"#)
            .unwrap();
    assert_eq!(skipped, 0);

    let report = apply_corrections(&mut store, &corrections, &aliases);
    assert_eq!(report.matched.len(), 1);
    assert_eq!(report.matched[0].canonical, "Tom De Koning");

    let outcome = repo.save(&store).await.unwrap();
    let backup = outcome.backup.expect("existing store must be backed up");

    // the backup preserves the pre-run contents
    assert_eq!(std::fs::read_to_string(&backup.path).unwrap(), pre_run);

    // the store holds the merged result, name untouched, both spellings set
    let updated: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    let entry = &updated[0];
    assert_eq!(entry["name"], "Tom De Koning");
    assert_eq!(entry["price"], 940000);
    assert_eq!(entry["breakeven"], 94);
    assert_eq!(entry["breakEven"], 94);
}

#[tokio::test]
async fn unmatched_and_ambiguous_never_mutate_the_store() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("user_team.json");
    std::fs::write(
        &store_path,
        r#"[{"name": "John Smith", "price": 1000}, {"name": "Jack Smith", "price": 2000}]"#,
    )
    .unwrap();

    let repo = create_local_repository(&store_path).unwrap();
    let (mut store, _) = repo.load().await.unwrap();
    let before = store.clone();

    let (corrections, _) = parse_corrections(
        r#"[{"name": "Smith", "price": 9999}, {"name": "Marty McFly", "price": 8888}]"#,
    )
    .unwrap();

    let report = apply_corrections(&mut store, &corrections, &AliasTable::new());
    assert!(report.matched.is_empty());
    assert_eq!(report.ambiguous.len(), 1);
    assert_eq!(report.unmatched.len(), 1);
    assert_eq!(store, before);
}
