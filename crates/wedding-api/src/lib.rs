pub mod assets;
pub mod confirmations;
pub mod error;
pub mod wishes;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use wedding_db::Database;
use wedding_types::api::{ApiInfo, ErrorBody};

use crate::assets::Frontend;
use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

impl AppStateInner {
    pub fn new(db: Database) -> AppState {
        Arc::new(Self { db })
    }
}

/// Runs a store call on the blocking pool. The connection is only held for
/// the duration of `f`.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> wedding_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || f(&state.db)).await?;
    Ok(result?)
}

/// All API routes plus the front-end. Both `/api/wishes` and `/api/wishes/`
/// are accepted (likewise for confirmations).
pub fn router(state: AppState, frontend: &Frontend) -> Router {
    let api = Router::new()
        .route("/api", get(api_info))
        .route(
            "/api/wishes/",
            get(wishes::list_wishes).post(wishes::create_wish),
        )
        .route(
            "/api/wishes",
            get(wishes::list_wishes).post(wishes::create_wish),
        )
        .route("/api/wishes/{id}", get(wishes::get_wish))
        .route(
            "/api/confirmations/",
            get(confirmations::list_confirmations).post(confirmations::create_confirmation),
        )
        .route(
            "/api/confirmations",
            get(confirmations::list_confirmations).post(confirmations::create_confirmation),
        )
        .route("/api/confirmations/{id}", get(confirmations::get_confirmation))
        .with_state(state);

    api.merge(frontend.routes()).fallback(not_found)
}

async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "Welcome to the Wedding API!",
    })
}

pub(crate) async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            detail: "Not Found".to_string(),
        }),
    )
}
