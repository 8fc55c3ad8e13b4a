//! Candidate persistence
//!
//! Functions take any SQLite executor so they run on the pool or inside a
//! transaction (`&mut *tx`).

use crate::db::models::{parse_stored_id, Candidate, ScoreTable};
use crate::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqliteExecutor};
use uuid::Uuid;

fn candidate_from_row(row: &SqliteRow) -> Result<Candidate> {
    let id: String = row.try_get("id")?;
    Ok(Candidate {
        id: parse_stored_id(&id)?,
        name: row.try_get("nome")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Insert the candidate together with its four zeroed score rows
///
/// Run inside a transaction so the five rows land together.
pub async fn insert_candidate(conn: &mut SqliteConnection, candidate: &Candidate) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO avaliados (id, nome, created_at, updated_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(candidate.id.to_string())
    .bind(&candidate.name)
    .bind(candidate.created_at)
    .bind(candidate.updated_at)
    .execute(&mut *conn)
    .await?;

    for table in ScoreTable::ALL {
        let sql = format!(
            "INSERT INTO {} (avaliado_id, nota, updated_at) VALUES (?, 0, ?)",
            table.table_name()
        );
        sqlx::query(&sql)
            .bind(candidate.id.to_string())
            .bind(candidate.created_at)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Load candidate by id
pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Candidate>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query("SELECT id, nome, created_at, updated_at FROM avaliados WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(candidate_from_row).transpose()
}

/// Load candidate by its unique name
pub async fn find_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Candidate>>
where
    E: SqliteExecutor<'e>,
{
    let row = sqlx::query("SELECT id, nome, created_at, updated_at FROM avaliados WHERE nome = ?")
        .bind(name)
        .fetch_optional(executor)
        .await?;

    row.as_ref().map(candidate_from_row).transpose()
}

/// All candidates ordered by name
pub async fn list_candidates<'e, E>(executor: E) -> Result<Vec<Candidate>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("SELECT id, nome, created_at, updated_at FROM avaliados ORDER BY nome ASC")
        .fetch_all(executor)
        .await?;

    rows.iter().map(candidate_from_row).collect()
}

/// Set a new name; returns false when no candidate has this id
pub async fn update_name<'e, E>(
    executor: E,
    id: Uuid,
    new_name: &str,
    updated_at: DateTime<Utc>,
) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("UPDATE avaliados SET nome = ?, updated_at = ? WHERE id = ?")
        .bind(new_name)
        .bind(updated_at)
        .bind(id.to_string())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete the candidate row; score tables follow through `ON DELETE CASCADE`
pub async fn delete_candidate<'e, E>(executor: E, id: Uuid) -> Result<bool>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM avaliados WHERE id = ?")
        .bind(id.to_string())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::init_memory_database;

    #[tokio::test]
    async fn insert_creates_all_score_rows() {
        let pool = init_memory_database().await.unwrap();
        let candidate = Candidate::new("Ana".to_string());

        let mut tx = pool.begin().await.unwrap();
        insert_candidate(&mut tx, &candidate).await.unwrap();
        tx.commit().await.unwrap();

        for table in ScoreTable::ALL {
            let sql = format!(
                "SELECT nota FROM {} WHERE avaliado_id = ?",
                table.table_name()
            );
            let score: f64 = sqlx::query_scalar(&sql)
                .bind(candidate.id.to_string())
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(score, 0.0, "table {}", table.table_name());
        }

        let loaded = find_by_name(&pool, "Ana").await.unwrap().unwrap();
        assert_eq!(loaded.id, candidate.id);
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected_by_the_store() {
        let pool = init_memory_database().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        insert_candidate(&mut conn, &Candidate::new("Ana".to_string()))
            .await
            .unwrap();
        let second = insert_candidate(&mut conn, &Candidate::new("Ana".to_string())).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn list_is_sorted_by_name() {
        let pool = init_memory_database().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        for name in ["Carla", "Ana", "Bruno"] {
            insert_candidate(&mut conn, &Candidate::new(name.to_string()))
                .await
                .unwrap();
        }
        drop(conn);

        let names: Vec<String> = list_candidates(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Bruno", "Carla"]);
    }

    #[tokio::test]
    async fn delete_cascades_to_score_tables() {
        let pool = init_memory_database().await.unwrap();
        let candidate = Candidate::new("Ana".to_string());
        let mut conn = pool.acquire().await.unwrap();
        insert_candidate(&mut conn, &candidate).await.unwrap();
        drop(conn);

        assert!(delete_candidate(&pool, candidate.id).await.unwrap());
        assert!(!delete_candidate(&pool, candidate.id).await.unwrap());

        for table in ScoreTable::ALL {
            let sql = format!("SELECT COUNT(*) FROM {}", table.table_name());
            let count: i64 = sqlx::query_scalar(&sql).fetch_one(&pool).await.unwrap();
            assert_eq!(count, 0, "table {}", table.table_name());
        }
    }
}
