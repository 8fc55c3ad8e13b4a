//! evaltrack-api library - HTTP service for evaluation tracking
//!
//! Evaluators submit scores for candidates; admins manage candidates and
//! rubric scores. Averages are kept current by `evaltrack_common::scoring`.

use axum::Router;
use sqlx::SqlitePool;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// SHA-256 of the admin password; `None` disables the admin check
    pub admin_password_hash: Option<[u8; 32]>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, admin_password: Option<String>) -> Self {
        Self {
            db,
            admin_password_hash: admin_password.as_deref().map(api::auth::password_digest),
        }
    }
}

/// Build application router
///
/// `/admin/*` routes sit behind the admin password layer. When `static_dir`
/// is given, unmatched paths are served from it.
pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    use axum::middleware;
    use axum::routing::{get, post, put};

    let admin = Router::new()
        .route("/admin/avaliados", post(api::create_candidate))
        .route(
            "/admin/avaliados/:id",
            put(api::rename_candidate).delete(api::delete_candidate),
        )
        .route("/admin/nota", put(api::set_rubric_score))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_admin,
        ));

    let public = Router::new()
        .route("/avaliar", post(api::submit_evaluations))
        .route("/dados-gerais", get(api::get_overview))
        .route("/admin-login", post(api::admin_login))
        .merge(api::health_routes());

    let mut router = Router::new().merge(admin).merge(public).with_state(state);

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
