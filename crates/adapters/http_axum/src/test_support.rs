//! In-memory port implementations for handler tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use zonefare_app::ports::{AreaGeometry, ProfileRepository};
use zonefare_app::services::profile_service::ProfileService;
use zonefare_domain::error::{ConflictError, NotFoundError, ZonefareError};
use zonefare_domain::geometry::{DeliveryArea, Location};
use zonefare_domain::id::ProfileId;
use zonefare_domain::profile::DeliveryProfile;

use crate::state::AppState;

#[derive(Default)]
pub struct MemoryRepo {
    profiles: Mutex<HashMap<ProfileId, DeliveryProfile>>,
}

impl ProfileRepository for MemoryRepo {
    fn create(
        &self,
        profile: DeliveryProfile,
    ) -> impl Future<Output = Result<DeliveryProfile, ZonefareError>> + Send {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id, profile.clone());
        async move { Ok(profile) }
    }

    fn get_by_id(
        &self,
        id: ProfileId,
    ) -> impl Future<Output = Result<Option<DeliveryProfile>, ZonefareError>> + Send {
        let found = self.profiles.lock().unwrap().get(&id).cloned();
        async move { Ok(found) }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<DeliveryProfile>, ZonefareError>> + Send {
        let all: Vec<_> = self.profiles.lock().unwrap().values().cloned().collect();
        async move { Ok(all) }
    }

    fn save(
        &self,
        profile: DeliveryProfile,
    ) -> impl Future<Output = Result<DeliveryProfile, ZonefareError>> + Send {
        let mut profiles = self.profiles.lock().unwrap();
        let result = match profiles.get(&profile.id) {
            None => Err(NotFoundError {
                entity: "Profile",
                id: profile.id.to_string(),
            }
            .into()),
            Some(stored) if stored.version != profile.version => Err(ConflictError {
                id: profile.id.to_string(),
                expected_version: profile.version,
            }
            .into()),
            Some(_) => {
                let mut saved = profile;
                saved.version += 1;
                profiles.insert(saved.id, saved.clone());
                Ok(saved)
            }
        };
        async move { result }
    }

    fn delete(&self, id: ProfileId) -> impl Future<Output = Result<(), ZonefareError>> + Send {
        self.profiles.lock().unwrap().remove(&id);
        async move { Ok(()) }
    }
}

/// Reports the same distance for every area.
pub struct FixedGeometry(pub f64);

impl AreaGeometry for FixedGeometry {
    fn max_boundary_distance(
        &self,
        _location: &Location,
        _area: &DeliveryArea,
    ) -> impl Future<Output = Result<f64, ZonefareError>> + Send {
        let meters = self.0;
        async move { Ok(meters) }
    }
}

pub fn state(meters: f64) -> AppState<MemoryRepo, FixedGeometry> {
    AppState::new(ProfileService::new(
        MemoryRepo::default(),
        FixedGeometry(meters),
    ))
}
