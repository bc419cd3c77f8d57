//! Charge-style catalogue.

use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use zonefare_domain::charge_style::ChargeStyle;

/// One selectable charge style.
#[derive(Debug, Serialize)]
pub struct ChargeStyleView {
    pub code: &'static str,
    pub label: &'static str,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<ChargeStyleView>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/charge-styles`
pub async fn list() -> ListResponse {
    let styles = ChargeStyle::ALL
        .into_iter()
        .map(|style| ChargeStyleView {
            code: style.code(),
            label: style.label(),
        })
        .collect();
    ListResponse::Ok(Json(styles))
}
