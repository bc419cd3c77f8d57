//! Storage port: repository trait for delivery profiles.

use std::future::Future;

use zonefare_domain::error::ZonefareError;
use zonefare_domain::id::ProfileId;
use zonefare_domain::profile::DeliveryProfile;

/// Repository for persisting and querying [`DeliveryProfile`]s.
///
/// Area and radius table are always written together, in one statement, so a
/// reader never sees a table that was reconciled against a different area.
pub trait ProfileRepository {
    /// Insert a new profile.
    fn create(
        &self,
        profile: DeliveryProfile,
    ) -> impl Future<Output = Result<DeliveryProfile, ZonefareError>> + Send;

    /// Get a profile by its unique identifier.
    fn get_by_id(
        &self,
        id: ProfileId,
    ) -> impl Future<Output = Result<Option<DeliveryProfile>, ZonefareError>> + Send;

    /// Get all profiles.
    fn get_all(&self) -> impl Future<Output = Result<Vec<DeliveryProfile>, ZonefareError>> + Send;

    /// Persist `profile` if the stored version still equals `profile.version`.
    ///
    /// Returns the profile with its version bumped. Fails with
    /// [`ZonefareError::Conflict`] when another writer got there first, and
    /// with [`ZonefareError::NotFound`] when the profile no longer exists.
    fn save(
        &self,
        profile: DeliveryProfile,
    ) -> impl Future<Output = Result<DeliveryProfile, ZonefareError>> + Send;

    /// Delete a profile by its unique identifier.
    fn delete(&self, id: ProfileId) -> impl Future<Output = Result<(), ZonefareError>> + Send;
}
