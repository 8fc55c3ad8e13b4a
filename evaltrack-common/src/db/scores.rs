//! Raw score and derived score persistence

use crate::db::models::{parse_stored_id, RawScore, ScoreEntry, ScoreTable};
use crate::Result;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqliteExecutor};
use uuid::Uuid;

fn raw_score_from_row(row: &SqliteRow) -> Result<RawScore> {
    let id: String = row.try_get("id")?;
    Ok(RawScore {
        id: parse_stored_id(&id)?,
        evaluator: row.try_get("avaliador")?,
        candidate_name: row.try_get("avaliado")?,
        score: row.try_get("nota")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Append raw scores; call inside a transaction for all-or-nothing semantics
pub async fn insert_raw_scores(conn: &mut SqliteConnection, scores: &[RawScore]) -> Result<()> {
    for score in scores {
        sqlx::query(
            r#"
            INSERT INTO notas_avaliadores (id, avaliador, avaliado, nota, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(score.id.to_string())
        .bind(&score.evaluator)
        .bind(&score.candidate_name)
        .bind(score.score)
        .bind(score.created_at)
        .bind(score.updated_at)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Score values recorded for one candidate name
pub async fn scores_for_candidate<'e, E>(executor: E, candidate_name: &str) -> Result<Vec<f64>>
where
    E: SqliteExecutor<'e>,
{
    let scores = sqlx::query_scalar("SELECT nota FROM notas_avaliadores WHERE avaliado = ?")
        .bind(candidate_name)
        .fetch_all(executor)
        .await?;

    Ok(scores)
}

/// All raw scores ordered by candidate name, then submission time
pub async fn list_raw_scores<'e, E>(executor: E) -> Result<Vec<RawScore>>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        r#"
        SELECT id, avaliador, avaliado, nota, created_at, updated_at
        FROM notas_avaliadores
        ORDER BY avaliado ASC, created_at ASC
        "#,
    )
    .fetch_all(executor)
    .await?;

    rows.iter().map(raw_score_from_row).collect()
}

/// Point raw scores at a renamed candidate; returns rows touched
pub async fn rename_candidate_references<'e, E>(
    executor: E,
    old_name: &str,
    new_name: &str,
    updated_at: DateTime<Utc>,
) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE notas_avaliadores SET avaliado = ?, updated_at = ? WHERE avaliado = ?",
    )
    .bind(new_name)
    .bind(updated_at)
    .bind(old_name)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Remove every raw score for a candidate name; returns rows deleted
pub async fn delete_for_candidate<'e, E>(executor: E, candidate_name: &str) -> Result<u64>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM notas_avaliadores WHERE avaliado = ?")
        .bind(candidate_name)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Current value in one score table; `None` when the row is missing
pub async fn read_score<'e, E>(executor: E, table: ScoreTable, candidate_id: Uuid) -> Result<Option<f64>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        "SELECT nota FROM {} WHERE avaliado_id = ?",
        table.table_name()
    );

    let score = sqlx::query_scalar(&sql)
        .bind(candidate_id.to_string())
        .fetch_optional(executor)
        .await?;

    Ok(score)
}

/// Overwrite one score table value, recreating the row if it went missing
pub async fn write_score<'e, E>(
    executor: E,
    table: ScoreTable,
    candidate_id: Uuid,
    score: f64,
) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        r#"
        INSERT INTO {} (avaliado_id, nota, updated_at) VALUES (?, ?, ?)
        ON CONFLICT(avaliado_id) DO UPDATE SET
            nota = excluded.nota,
            updated_at = excluded.updated_at
        "#,
        table.table_name()
    );

    sqlx::query(&sql)
        .bind(candidate_id.to_string())
        .bind(score)
        .bind(Utc::now())
        .execute(executor)
        .await?;

    Ok(())
}

/// One score table joined with candidate names, ordered by name
pub async fn list_scores<'e, E>(executor: E, table: ScoreTable) -> Result<Vec<ScoreEntry>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!(
        r#"
        SELECT a.id AS id, a.nome AS nome, t.nota AS nota
        FROM {} t
        JOIN avaliados a ON a.id = t.avaliado_id
        ORDER BY a.nome ASC
        "#,
        table.table_name()
    );

    let rows = sqlx::query(&sql).fetch_all(executor).await?;

    rows.iter()
        .map(|row| {
            let id: String = row.try_get("id")?;
            Ok(ScoreEntry {
                id: parse_stored_id(&id)?,
                name: row.try_get("nome")?,
                score: row.try_get("nota")?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::candidates::insert_candidate;
    use crate::db::init::init_memory_database;
    use crate::db::models::Candidate;

    #[tokio::test]
    async fn raw_scores_round_trip_through_the_store() {
        let pool = init_memory_database().await.unwrap();
        let batch = vec![
            RawScore::new("Bruno".into(), "Ana".into(), 8.0),
            RawScore::new("Carla".into(), "Ana".into(), 6.0),
            RawScore::new("Carla".into(), "Davi".into(), 9.0),
        ];

        let mut tx = pool.begin().await.unwrap();
        insert_raw_scores(&mut tx, &batch).await.unwrap();
        tx.commit().await.unwrap();

        let mut ana = scores_for_candidate(&pool, "Ana").await.unwrap();
        ana.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(ana, vec![6.0, 8.0]);

        let all = list_raw_scores(&pool).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].candidate_name, "Davi");
    }

    #[tokio::test]
    async fn out_of_range_scores_violate_the_check_constraint() {
        let pool = init_memory_database().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        let result =
            insert_raw_scores(&mut tx, &[RawScore::new("Bruno".into(), "Ana".into(), 10.5)]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn failed_batch_rolls_back_entirely() {
        let pool = init_memory_database().await.unwrap();
        let batch = vec![
            RawScore::new("Bruno".into(), "Ana".into(), 7.0),
            RawScore::new("Bruno".into(), "Davi".into(), -1.0),
        ];

        {
            let mut tx = pool.begin().await.unwrap();
            assert!(insert_raw_scores(&mut tx, &batch).await.is_err());
        }

        assert!(list_raw_scores(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rename_and_delete_by_candidate_name() {
        let pool = init_memory_database().await.unwrap();
        let mut tx = pool.begin().await.unwrap();
        insert_raw_scores(
            &mut tx,
            &[
                RawScore::new("Bruno".into(), "Ana".into(), 7.0),
                RawScore::new("Carla".into(), "Ana".into(), 5.0),
                RawScore::new("Carla".into(), "Davi".into(), 5.0),
            ],
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();

        let renamed = rename_candidate_references(&pool, "Ana", "Ana Lima", Utc::now())
            .await
            .unwrap();
        assert_eq!(renamed, 2);
        assert!(scores_for_candidate(&pool, "Ana").await.unwrap().is_empty());

        assert_eq!(delete_for_candidate(&pool, "Ana Lima").await.unwrap(), 2);
        assert_eq!(list_raw_scores(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn write_score_overwrites_and_list_joins_names() {
        let pool = init_memory_database().await.unwrap();
        let candidate = Candidate::new("Ana".to_string());
        let mut conn = pool.acquire().await.unwrap();
        insert_candidate(&mut conn, &candidate).await.unwrap();
        drop(conn);

        write_score(&pool, ScoreTable::Letter, candidate.id, 9.25)
            .await
            .unwrap();

        assert_eq!(
            read_score(&pool, ScoreTable::Letter, candidate.id).await.unwrap(),
            Some(9.25)
        );
        assert_eq!(
            read_score(&pool, ScoreTable::Letter, Uuid::new_v4()).await.unwrap(),
            None
        );

        let entries = list_scores(&pool, ScoreTable::Letter).await.unwrap();
        assert_eq!(
            entries,
            vec![ScoreEntry {
                id: candidate.id,
                name: "Ana".to_string(),
                score: 9.25,
            }]
        );
    }
}
