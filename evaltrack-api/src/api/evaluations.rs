//! Evaluator submissions and the combined data view

use axum::{extract::State, Json};
use evaltrack_common::db::models::Overview;
use evaltrack_common::scoring::{self, EvaluationItem};
use evaltrack_common::Error;
use serde::Deserialize;

use super::{ApiJson, MessageResponse};
use crate::error::{ApiError, ApiResult, OrInternal};
use crate::AppState;

/// Body of `POST /avaliar`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    #[serde(default)]
    pub nome_avaliador: Option<String>,
    #[serde(default)]
    pub avaliacoes: Option<Vec<EvaluationItemRequest>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationItemRequest {
    #[serde(default)]
    pub nome_avaliado: Option<String>,
    #[serde(default)]
    pub nota: Option<f64>,
}

impl EvaluationItemRequest {
    fn into_item(self) -> ApiResult<EvaluationItem> {
        let score = self.nota.ok_or_else(|| {
            ApiError::Common(Error::Validation(
                "Dados inválidos: nota ausente.".to_string(),
            ))
        })?;

        Ok(EvaluationItem {
            candidate_name: self.nome_avaliado.unwrap_or_default(),
            score,
        })
    }
}

/// POST /avaliar
///
/// Appends the evaluator's scores and recomputes the affected averages.
pub async fn submit_evaluations(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<EvaluationRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let evaluator = request.nome_avaliador.unwrap_or_default();
    let items = request
        .avaliacoes
        .unwrap_or_default()
        .into_iter()
        .map(EvaluationItemRequest::into_item)
        .collect::<ApiResult<Vec<_>>>()?;

    scoring::record_evaluations(&state.db, &evaluator, &items)
        .await
        .or_internal("Erro ao salvar avaliação")?;

    Ok(Json(MessageResponse::new("Avaliação enviada com sucesso!")))
}

/// GET /dados-gerais
///
/// Candidates, raw scores and the four score tables, each sorted by name.
pub async fn get_overview(State(state): State<AppState>) -> ApiResult<Json<Overview>> {
    let overview = scoring::overview(&state.db)
        .await
        .or_internal("Erro ao buscar dados")?;

    Ok(Json(overview))
}
