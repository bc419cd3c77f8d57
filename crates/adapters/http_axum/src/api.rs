//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod charge_styles;
#[allow(clippy::missing_errors_doc)]
pub mod profiles;
#[allow(clippy::missing_errors_doc)]
pub mod radiuses;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, put};

use zonefare_app::ports::{AreaGeometry, ProfileRepository};
use zonefare_domain::error::{ValidationError, ZonefareError};
use zonefare_domain::id::ProfileId;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<R, G>() -> Router<AppState<R, G>>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    Router::new()
        .route("/charge-styles", get(charge_styles::list))
        .route(
            "/profiles",
            get(profiles::list::<R, G>).post(profiles::create::<R, G>),
        )
        .route(
            "/profiles/{id}",
            get(profiles::get::<R, G>).delete(profiles::delete::<R, G>),
        )
        .route("/profiles/{id}/area", put(profiles::update_area::<R, G>))
        .route(
            "/profiles/{id}/location",
            put(profiles::update_location::<R, G>),
        )
        .route(
            "/profiles/{id}/charge-style",
            put(profiles::update_charge_style::<R, G>),
        )
        .route(
            "/profiles/{id}/radiuses",
            get(radiuses::get::<R, G>).put(radiuses::update::<R, G>),
        )
}

/// Parse a path segment into a [`ProfileId`].
fn parse_profile_id(raw: &str) -> Result<ProfileId, ApiError> {
    ProfileId::from_str(raw)
        .map_err(|_| ZonefareError::from(ValidationError::InvalidId(raw.to_string())).into())
}
