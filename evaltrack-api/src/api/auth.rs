//! Admin password check
//!
//! A single shared password. Only its SHA-256 digest is kept in memory and
//! presented passwords are compared digest to digest. When no password is
//! configured every admin route is open and login always succeeds.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Header carrying the admin password on `/admin/*` requests
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// SHA-256 digest of a password
pub fn password_digest(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

fn password_matches(expected: &[u8; 32], provided: Option<&str>) -> bool {
    provided.is_some_and(|password| password_digest(password) == *expected)
}

/// Admin middleware, applied to `/admin/*` routes only
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some(expected) = state.admin_password_hash.as_ref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok());

    if password_matches(expected, provided) {
        Ok(next.run(request).await)
    } else {
        warn!(
            method = %request.method(),
            uri = %request.uri(),
            "Admin request without a valid password"
        );
        Err(ApiError::Unauthorized(
            "Senha de administrador inválida.".to_string(),
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub senha: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub ok: bool,
}

/// POST /admin-login
///
/// Body: `{ "senha": "..." }`. The body is optional while the check is disabled.
pub async fn admin_login(
    State(state): State<AppState>,
    body: Option<Json<LoginRequest>>,
) -> ApiResult<Json<LoginResponse>> {
    let Some(expected) = state.admin_password_hash.as_ref() else {
        info!("Admin login accepted (admin password not configured)");
        return Ok(Json(LoginResponse { ok: true }));
    };

    let provided = body.and_then(|Json(req)| req.senha);
    if password_matches(expected, provided.as_deref()) {
        info!("Admin login accepted");
        Ok(Json(LoginResponse { ok: true }))
    } else {
        warn!("Admin login rejected");
        Err(ApiError::Unauthorized(
            "Senha de administrador inválida.".to_string(),
        ))
    }
}
