//! Shared application state for axum handlers.

use std::sync::Arc;

use zonefare_app::ports::{AreaGeometry, ProfileRepository};
use zonefare_app::services::profile_service::ProfileService;

use crate::format::PlainAmountFormatter;

/// Application state shared across all axum handlers.
///
/// Generic over the repository and geometry backend to avoid dynamic
/// dispatch. `Clone` is implemented manually so the underlying types do not
/// need to be `Clone`, only the `Arc` is cloned.
pub struct AppState<R, G> {
    /// Delivery profile use-cases.
    pub profile_service: Arc<ProfileService<R, G>>,
    /// Formatter for the display radius table.
    pub formatter: PlainAmountFormatter,
}

impl<R, G> Clone for AppState<R, G> {
    fn clone(&self) -> Self {
        Self {
            profile_service: Arc::clone(&self.profile_service),
            formatter: self.formatter,
        }
    }
}

impl<R, G> AppState<R, G>
where
    R: ProfileRepository + Send + Sync + 'static,
    G: AreaGeometry + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(profile_service: ProfileService<R, G>) -> Self {
        Self::from_arc(Arc::new(profile_service))
    }

    /// Create a new application state from a pre-wrapped service, for when
    /// the service is shared outside the HTTP layer too.
    pub fn from_arc(profile_service: Arc<ProfileService<R, G>>) -> Self {
        Self {
            profile_service,
            formatter: PlainAmountFormatter,
        }
    }
}
