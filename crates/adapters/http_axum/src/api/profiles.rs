//! JSON REST handlers for delivery profiles.

use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use zonefare_app::ports::{AreaGeometry, ProfileRepository};
use zonefare_domain::charge_style::ChargeStyle;
use zonefare_domain::error::ZonefareError;
use zonefare_domain::geometry::{DeliveryArea, Location, Position};
use zonefare_domain::profile::DeliveryProfile;

use super::parse_profile_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for creating a profile.
#[derive(Deserialize)]
pub struct CreateProfileRequest {
    pub name: String,
    #[serde(default)]
    pub charge_style: Option<String>,
    #[serde(default)]
    pub location: Option<LocationRequest>,
}

/// Request body for replacing the delivery area: `GeoJSON`-style rings of
/// `[longitude, latitude]` pairs, outer ring first.
#[derive(Deserialize)]
pub struct UpdateAreaRequest {
    pub coordinates: Vec<Vec<Position>>,
}

/// Request body for moving the reference location.
#[derive(Deserialize)]
pub struct LocationRequest {
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationRequest {
    fn into_location(self) -> Result<Location, ZonefareError> {
        Ok(Location::new(self.latitude, self.longitude)?)
    }
}

/// Request body for switching the charge style.
#[derive(Deserialize)]
pub struct UpdateChargeStyleRequest {
    pub charge_style: String,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<DeliveryProfile>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from endpoints returning a single profile.
pub enum ProfileResponse {
    Ok(Json<DeliveryProfile>),
}

impl IntoResponse for ProfileResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<DeliveryProfile>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/profiles`
pub async fn list<R, G>(State(state): State<AppState<R, G>>) -> Result<ListResponse, ApiError>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    let profiles = state.profile_service.list_profiles().await?;
    Ok(ListResponse::Ok(Json(profiles)))
}

/// `GET /api/profiles/{id}`
pub async fn get<R, G>(
    State(state): State<AppState<R, G>>,
    Path(id): Path<String>,
) -> Result<ProfileResponse, ApiError>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    let id = parse_profile_id(&id)?;
    let profile = state.profile_service.get_profile(id).await?;
    Ok(ProfileResponse::Ok(Json(profile)))
}

/// `POST /api/profiles`
///
/// Profiles start without an area, so their radius table starts empty.
pub async fn create<R, G>(
    State(state): State<AppState<R, G>>,
    Json(req): Json<CreateProfileRequest>,
) -> Result<CreateResponse, ApiError>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    let mut builder = DeliveryProfile::builder().name(req.name);
    if let Some(code) = req.charge_style {
        let style = ChargeStyle::from_str(&code).map_err(ZonefareError::from)?;
        builder = builder.charge_style(style);
    }
    if let Some(location) = req.location {
        builder = builder.location(location.into_location()?);
    }

    let profile = builder.build()?;
    let created = state.profile_service.create_profile(profile).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `DELETE /api/profiles/{id}`
pub async fn delete<R, G>(
    State(state): State<AppState<R, G>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    let id = parse_profile_id(&id)?;
    state.profile_service.delete_profile(id).await?;
    Ok(DeleteResponse::NoContent)
}

/// `PUT /api/profiles/{id}/area`
pub async fn update_area<R, G>(
    State(state): State<AppState<R, G>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAreaRequest>,
) -> Result<ProfileResponse, ApiError>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    let id = parse_profile_id(&id)?;
    let area = DeliveryArea::from_rings(req.coordinates).map_err(ZonefareError::from)?;
    let profile = state.profile_service.update_area(id, area).await?;
    Ok(ProfileResponse::Ok(Json(profile)))
}

/// `PUT /api/profiles/{id}/location`
pub async fn update_location<R, G>(
    State(state): State<AppState<R, G>>,
    Path(id): Path<String>,
    Json(req): Json<LocationRequest>,
) -> Result<ProfileResponse, ApiError>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    let id = parse_profile_id(&id)?;
    let location = req.into_location()?;
    let profile = state.profile_service.update_location(id, location).await?;
    Ok(ProfileResponse::Ok(Json(profile)))
}

/// `PUT /api/profiles/{id}/charge-style`
pub async fn update_charge_style<R, G>(
    State(state): State<AppState<R, G>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateChargeStyleRequest>,
) -> Result<ProfileResponse, ApiError>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    let id = parse_profile_id(&id)?;
    let style = ChargeStyle::from_str(&req.charge_style).map_err(ZonefareError::from)?;
    let profile = state.profile_service.update_charge_style(id, style).await?;
    Ok(ProfileResponse::Ok(Json(profile)))
}
