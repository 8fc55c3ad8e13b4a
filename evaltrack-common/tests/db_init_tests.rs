//! Tests for on-disk database initialization and teardown

use evaltrack_common::db::init::{close_database, init_database};
use evaltrack_common::scoring;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("evaltrack.db");
    assert!(!db_path.exists());

    let pool = init_database(&db_path).await;
    assert!(pool.is_ok(), "Database initialization failed: {:?}", pool.err());
    assert!(db_path.exists(), "Database file was not created");

    close_database(pool.unwrap()).await;
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("evaltrack.db");

    let pool = init_database(&db_path).await.unwrap();
    let ana = scoring::create_candidate(&pool, "Ana").await.unwrap();
    close_database(pool).await;

    let pool = init_database(&db_path).await.unwrap();
    let overview = scoring::overview(&pool).await.unwrap();
    assert_eq!(overview.candidates.len(), 1);
    assert_eq!(overview.candidates[0].id, ana.id);
    assert_eq!(overview.final_scores.len(), 1);
    close_database(pool).await;
}

#[tokio::test]
async fn test_foreign_keys_enabled_on_every_connection() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("evaltrack.db")).await.unwrap();

    // Hold one connection so the next query has to open another
    let _held = pool.acquire().await.unwrap();
    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(enabled, 1);
}
