use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use tracing::info;

use wedding_types::api::{ConfirmationCreate, ListParams};
use wedding_types::models::Confirmation;

use crate::error::ApiError;
use crate::{AppState, with_db};

pub async fn create_confirmation(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<ConfirmationCreate>, ApiError>,
) -> Result<Json<Confirmation>, ApiError> {
    req.validate()?;

    let confirmation = with_db(&state, move |db| {
        db.create_confirmation(
            &req.name,
            req.attending,
            req.guests_count,
            req.message.as_deref(),
        )
    })
    .await?;

    info!(
        id = confirmation.id,
        attending = confirmation.attending,
        guests = confirmation.guests_count,
        "Confirmation received"
    );
    Ok(Json(confirmation))
}

/// Open to anyone, like every other route here. There is no admin login on
/// this site.
pub async fn list_confirmations(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, ApiError>,
) -> Result<Json<Vec<Confirmation>>, ApiError> {
    let confirmations =
        with_db(&state, move |db| db.list_confirmations(params.skip, params.limit)).await?;
    Ok(Json(confirmations))
}

pub async fn get_confirmation(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<Json<Confirmation>, ApiError> {
    with_db(&state, move |db| db.get_confirmation(id))
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Confirmation"))
}
