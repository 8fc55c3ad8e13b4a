//! Rubric score edits (admin)

use axum::{extract::State, Json};
use evaltrack_common::db::models::RubricKind;
use evaltrack_common::scoring;
use serde::Deserialize;

use super::{parse_candidate_id, ApiJson, MessageResponse};
use crate::error::{ApiError, ApiResult, OrInternal};
use crate::AppState;

/// Body of `PUT /admin/nota`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricScoreRequest {
    #[serde(default)]
    pub avaliado_id: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub nota: Option<f64>,
}

/// PUT /admin/nota
///
/// Overwrites one rubric score and recomputes the final average.
pub async fn set_rubric_score(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RubricScoreRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let (Some(raw_id), Some(tipo), Some(nota)) = (request.avaliado_id, request.tipo, request.nota)
    else {
        return Err(ApiError::BadRequest {
            message: "Dados incompletos.".to_string(),
            detail: None,
        });
    };

    let kind: RubricKind = tipo.parse()?;
    let id = parse_candidate_id(&raw_id)?;

    scoring::set_rubric_score(&state.db, id, kind, nota)
        .await
        .or_internal("Erro ao salvar nota.")?;

    Ok(Json(MessageResponse::new("Nota salva com sucesso.")))
}
