//! HTTP API handlers for evaltrack-api

pub mod auth;
pub mod candidates;
pub mod evaluations;
pub mod health;
pub mod json;
pub mod rubrics;

use evaltrack_common::Error;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

pub use auth::{admin_login, require_admin};
pub use candidates::{create_candidate, delete_candidate, rename_candidate};
pub use evaluations::{get_overview, submit_evaluations};
pub use health::health_routes;
pub use json::ApiJson;
pub use rubrics::set_rubric_score;

/// `{ "message": ... }` success body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A malformed id cannot name a candidate, so it is reported as not found
pub(crate) fn parse_candidate_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::Common(Error::NotFound(format!("id inválido '{}'", raw))))
}
