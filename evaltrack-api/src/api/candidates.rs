//! Candidate management (admin)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use evaltrack_common::db::models::Candidate;
use evaltrack_common::scoring;
use serde::Deserialize;
use tracing::debug;

use super::{parse_candidate_id, ApiJson, MessageResponse};
use crate::error::{ApiResult, OrInternal};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CandidateRequest {
    #[serde(default)]
    pub nome: Option<String>,
}

/// POST /admin/avaliados
pub async fn create_candidate(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CandidateRequest>,
) -> ApiResult<(StatusCode, Json<Candidate>)> {
    let name = request.nome.unwrap_or_default();
    let candidate = scoring::create_candidate(&state.db, &name)
        .await
        .or_internal("Erro ao criar avaliado")?;

    Ok((StatusCode::CREATED, Json(candidate)))
}

/// PUT /admin/avaliados/:id
pub async fn rename_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<CandidateRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_candidate_id(&id)?;
    let name = request.nome.unwrap_or_default();

    scoring::rename_candidate(&state.db, id, &name)
        .await
        .or_internal("Erro ao atualizar nome.")?;

    Ok(Json(MessageResponse::new("Nome atualizado com sucesso.")))
}

/// DELETE /admin/avaliados/:id
///
/// Succeeds for unknown and malformed ids too; the end state is the same.
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    match parse_candidate_id(&id) {
        Ok(id) => {
            scoring::delete_candidate(&state.db, id)
                .await
                .or_internal("Erro ao remover avaliado.")?;
        }
        Err(_) => debug!(id = %id, "Delete of malformed id, nothing to remove"),
    }

    Ok(Json(MessageResponse::new(
        "Avaliado e todas as suas notas foram removidos.",
    )))
}
