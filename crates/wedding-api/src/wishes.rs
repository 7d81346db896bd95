use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use tracing::info;

use wedding_types::api::{ListParams, WishCreate};
use wedding_types::models::Wish;

use crate::error::ApiError;
use crate::{AppState, with_db};

pub async fn create_wish(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<WishCreate>, ApiError>,
) -> Result<Json<Wish>, ApiError> {
    req.validate()?;

    let wish = with_db(&state, move |db| db.create_wish(&req.name, &req.wish_text)).await?;

    info!(id = wish.id, "Wish created");
    Ok(Json(wish))
}

pub async fn list_wishes(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, ApiError>,
) -> Result<Json<Vec<Wish>>, ApiError> {
    let wishes = with_db(&state, move |db| db.list_wishes(params.skip, params.limit)).await?;
    Ok(Json(wishes))
}

pub async fn get_wish(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Wish>, ApiError> {
    with_db(&state, move |db| db.get_wish(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Wish"))
}
