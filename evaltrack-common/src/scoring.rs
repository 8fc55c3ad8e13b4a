//! Score aggregation
//!
//! Keeps the derived tables consistent with their inputs:
//! - interview average = mean of every raw score for the candidate
//! - final average = mean of interview, letter and historical scores
//!
//! Both are rounded to 2 decimals. Recomputes run after the triggering write
//! commits and take no locks; concurrent edits resolve as last-write-wins.

use crate::db::models::{Candidate, Overview, RawScore, RubricKind, ScoreTable};
use crate::db::{candidates, scores};
use crate::{Error, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lowest accepted score
pub const MIN_SCORE: f64 = 0.0;
/// Highest accepted score
pub const MAX_SCORE: f64 = 10.0;

/// One item of an evaluator submission
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationItem {
    pub candidate_name: String,
    pub score: f64,
}

/// Outcome of [`record_evaluations`]
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    /// Raw score rows appended
    pub appended: usize,
    /// Distinct candidates whose averages were recomputed, in submission order
    pub candidates: Vec<String>,
}

/// Round to 2 decimals, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Reject NaN, infinities and anything outside [0, 10]
pub fn validate_score(score: f64) -> Result<()> {
    if score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Nota inválida ({}). Insira um valor entre 0 e 10.",
            score
        )))
    }
}

fn required_name(name: &str, message: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(Error::Validation(message.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Append an evaluator's scores and refresh the affected averages
///
/// Everything is validated before the first write. The append is one
/// transaction; each distinct candidate is then recomputed once.
pub async fn record_evaluations(
    pool: &SqlitePool,
    evaluator_name: &str,
    items: &[EvaluationItem],
) -> Result<EvaluationSummary> {
    let evaluator = required_name(evaluator_name, "Dados inválidos: nome do avaliador é obrigatório.")?;
    if items.is_empty() {
        return Err(Error::Validation(
            "Dados inválidos: nenhuma avaliação enviada.".to_string(),
        ));
    }

    let mut rows = Vec::with_capacity(items.len());
    let mut touched: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    for item in items {
        let candidate_name =
            required_name(&item.candidate_name, "Dados inválidos: nome do avaliado é obrigatório.")?;
        validate_score(item.score)?;

        if seen.insert(candidate_name.clone()) {
            touched.push(candidate_name.clone());
        }

        rows.push(RawScore::new(evaluator.clone(), candidate_name, item.score));
    }

    // Candidates must still exist when the append commits
    let mut tx = pool.begin().await?;
    for name in &touched {
        if candidates::find_by_name(&mut *tx, name).await?.is_none() {
            warn!(candidate = %name, "Evaluation for unknown candidate rejected");
            return Err(Error::Validation(format!(
                "Avaliado desconhecido: '{}'.",
                name
            )));
        }
    }
    scores::insert_raw_scores(&mut tx, &rows).await?;
    tx.commit().await?;

    info!(
        evaluator = %evaluator,
        items = rows.len(),
        "Saved evaluations, recomputing interview averages for {:?}",
        touched
    );

    for name in &touched {
        recompute_interview(pool, name).await?;
    }

    Ok(EvaluationSummary {
        appended: rows.len(),
        candidates: touched,
    })
}

/// Overwrite one rubric score and refresh the final average
///
/// Returns the new final average.
pub async fn set_rubric_score(
    pool: &SqlitePool,
    candidate_id: Uuid,
    kind: RubricKind,
    score: f64,
) -> Result<f64> {
    validate_score(score)?;
    require_candidate(pool, candidate_id).await?;

    info!(%candidate_id, rubric = %kind, score, "Updating rubric score");
    scores::write_score(pool, kind.table(), candidate_id, score).await?;

    recompute_final(pool, candidate_id).await
}

/// Recompute and store the final average from the three rubric scores
///
/// Missing rubric rows count as 0.
pub async fn recompute_final(pool: &SqlitePool, candidate_id: Uuid) -> Result<f64> {
    require_candidate(pool, candidate_id).await?;

    let mut rubric_scores = Vec::with_capacity(RubricKind::ALL.len());
    for kind in RubricKind::ALL {
        let score = scores::read_score(pool, kind.table(), candidate_id)
            .await?
            .unwrap_or(0.0);
        rubric_scores.push(score);
    }

    let average = round2(mean(&rubric_scores).unwrap_or(0.0));
    scores::write_score(pool, ScoreTable::Final, candidate_id, average).await?;

    info!(%candidate_id, scores = ?rubric_scores, average, "Recomputed final average");
    Ok(average)
}

/// Recompute the interview average from raw scores, then the final average
///
/// No-op (returns `None`) when the candidate is unknown or has no raw scores.
pub async fn recompute_interview(pool: &SqlitePool, candidate_name: &str) -> Result<Option<f64>> {
    let Some(candidate) = candidates::find_by_name(pool, candidate_name).await? else {
        warn!(candidate = %candidate_name, "Interview recompute skipped: candidate not found");
        return Ok(None);
    };

    let raw = scores::scores_for_candidate(pool, candidate_name).await?;
    let Some(average) = mean(&raw).map(round2) else {
        debug!(candidate = %candidate_name, "No raw scores yet");
        return Ok(None);
    };

    info!(candidate = %candidate_name, count = raw.len(), average, "Recomputed interview average");
    scores::write_score(pool, ScoreTable::Interview, candidate.id, average).await?;
    recompute_final(pool, candidate.id).await?;

    Ok(Some(average))
}

/// Create a candidate with zeroed score rows
pub async fn create_candidate(pool: &SqlitePool, name: &str) -> Result<Candidate> {
    let name = required_name(name, "O nome é obrigatório.")?;
    if candidates::find_by_name(pool, &name).await?.is_some() {
        return Err(Error::Validation(format!(
            "Já existe um avaliado chamado '{}'.",
            name
        )));
    }

    let candidate = Candidate::new(name);
    let mut tx = pool.begin().await?;
    candidates::insert_candidate(&mut tx, &candidate).await?;
    tx.commit().await?;

    info!(id = %candidate.id, name = %candidate.name, "Created candidate");
    Ok(candidate)
}

/// Rename a candidate and repoint its raw scores at the new name
pub async fn rename_candidate(pool: &SqlitePool, id: Uuid, new_name: &str) -> Result<Candidate> {
    let new_name = required_name(new_name, "O nome é obrigatório.")?;

    let mut tx = pool.begin().await?;
    let Some(mut candidate) = candidates::find_by_id(&mut *tx, id).await? else {
        return Err(not_found(id));
    };

    if candidate.name == new_name {
        return Ok(candidate);
    }

    if candidates::find_by_name(&mut *tx, &new_name).await?.is_some() {
        return Err(Error::Validation(format!(
            "Já existe um avaliado chamado '{}'.",
            new_name
        )));
    }

    let now = Utc::now();
    candidates::update_name(&mut *tx, id, &new_name, now).await?;
    let moved = scores::rename_candidate_references(&mut *tx, &candidate.name, &new_name, now).await?;
    tx.commit().await?;

    info!(%id, old = %candidate.name, new = %new_name, raw_scores = moved, "Renamed candidate");
    candidate.name = new_name;
    candidate.updated_at = now;
    Ok(candidate)
}

/// Delete a candidate with every row that references it
///
/// Returns false when the id was unknown.
pub async fn delete_candidate(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;
    let Some(candidate) = candidates::find_by_id(&mut *tx, id).await? else {
        debug!(%id, "Delete requested for unknown candidate");
        return Ok(false);
    };

    let raw_deleted = scores::delete_for_candidate(&mut *tx, &candidate.name).await?;
    candidates::delete_candidate(&mut *tx, id).await?;
    tx.commit().await?;

    info!(%id, name = %candidate.name, raw_scores = raw_deleted, "Deleted candidate");
    Ok(true)
}

/// Snapshot of every table, sorted for display
pub async fn overview(pool: &SqlitePool) -> Result<Overview> {
    let overview = Overview {
        candidates: candidates::list_candidates(pool).await?,
        raw_scores: scores::list_raw_scores(pool).await?,
        interview: scores::list_scores(pool, ScoreTable::Interview).await?,
        letter: scores::list_scores(pool, ScoreTable::Letter).await?,
        historical: scores::list_scores(pool, ScoreTable::Historical).await?,
        final_scores: scores::list_scores(pool, ScoreTable::Final).await?,
    };

    debug!(
        candidates = overview.candidates.len(),
        raw_scores = overview.raw_scores.len(),
        "Built overview"
    );
    Ok(overview)
}

async fn require_candidate(pool: &SqlitePool, id: Uuid) -> Result<Candidate> {
    candidates::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Avaliado não encontrado: {}", id))
}
