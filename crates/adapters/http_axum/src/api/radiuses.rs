//! JSON REST handlers for a profile's radius pricing table.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use zonefare_app::ports::{AreaGeometry, ProfileRepository};
use zonefare_app::services::profile_service::DisplayRadiusEntry;
use zonefare_domain::radius::RadiusEntry;

use super::parse_profile_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for a pricing edit. Radii must match the displayed table.
#[derive(Deserialize)]
pub struct UpdateRadiusesRequest {
    pub radiuses: Vec<RadiusEntry>,
}

/// Possible responses from the radius table endpoints.
pub enum TableResponse {
    Ok(Json<Vec<DisplayRadiusEntry>>),
}

impl IntoResponse for TableResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/profiles/{id}/radiuses`
pub async fn get<R, G>(
    State(state): State<AppState<R, G>>,
    Path(id): Path<String>,
) -> Result<TableResponse, ApiError>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    let id = parse_profile_id(&id)?;
    let table = state
        .profile_service
        .display_radius_table(id, &state.formatter)
        .await?;
    Ok(TableResponse::Ok(Json(table)))
}

/// `PUT /api/profiles/{id}/radiuses`
///
/// Responds with the display table after the edit.
pub async fn update<R, G>(
    State(state): State<AppState<R, G>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateRadiusesRequest>,
) -> Result<TableResponse, ApiError>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    let id = parse_profile_id(&id)?;
    state
        .profile_service
        .update_pricing(id, req.radiuses)
        .await?;
    let table = state
        .profile_service
        .display_radius_table(id, &state.formatter)
        .await?;
    Ok(TableResponse::Ok(Json(table)))
}
