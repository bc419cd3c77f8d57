//! Profile service: use-cases for delivery profiles and their radius tables.
//!
//! Every edit is a read-modify-write: load the profile, compute the new max
//! radius, reconcile, then save with the version that was loaded. A
//! concurrent writer makes the save fail with
//! [`ZonefareError::Conflict`]; nothing here retries, the caller reloads and
//! starts over.

use serde::Serialize;

use zonefare_domain::charge_style::ChargeStyle;
use zonefare_domain::error::{GeometryError, NotFoundError, ZonefareError};
use zonefare_domain::geometry::{DeliveryArea, Location};
use zonefare_domain::id::ProfileId;
use zonefare_domain::profile::DeliveryProfile;
use zonefare_domain::radius::RadiusEntry;
use zonefare_domain::reconcile::max_radius_for_distance;

use crate::ports::{AmountFormatter, AreaGeometry, ProfileRepository};

/// A band as presented to an operator, with formatted amounts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRadiusEntry {
    #[serde(flatten)]
    pub entry: RadiusEntry,
    pub formatted_paid: String,
    pub formatted_charged: String,
}

/// Application service for delivery profiles.
pub struct ProfileService<R, G> {
    repo: R,
    geometry: G,
}

impl<R: ProfileRepository, G: AreaGeometry> ProfileService<R, G> {
    /// Create a new service backed by the given repository and geometry backend.
    pub fn new(repo: R, geometry: G) -> Self {
        Self { repo, geometry }
    }

    /// Create a new profile after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ZonefareError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, profile), fields(profile_name = %profile.name))]
    pub async fn create_profile(
        &self,
        profile: DeliveryProfile,
    ) -> Result<DeliveryProfile, ZonefareError> {
        profile.validate()?;
        self.repo.create(profile).await
    }

    /// Look up a profile by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`ZonefareError::NotFound`] when no profile with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_profile(&self, id: ProfileId) -> Result<DeliveryProfile, ZonefareError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Profile",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all profiles.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_profiles(&self) -> Result<Vec<DeliveryProfile>, ZonefareError> {
        self.repo.get_all().await
    }

    /// Delete a profile by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_profile(&self, id: ProfileId) -> Result<(), ZonefareError> {
        self.repo.delete(id).await
    }

    /// Band count for `area` seen from `location`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::MissingLocation`] when `location` is `None`,
    /// and propagates geometry backend failures.
    pub async fn max_radius(
        &self,
        location: Option<&Location>,
        area: &DeliveryArea,
    ) -> Result<i32, ZonefareError> {
        let location = location.ok_or(GeometryError::MissingLocation)?;
        let meters = self.geometry.max_boundary_distance(location, area).await?;
        Ok(max_radius_for_distance(meters)?)
    }

    /// Set a new area on an already loaded profile and reconcile its radius
    /// table. Nothing is persisted; the result is ready for
    /// [`ProfileRepository::save`].
    ///
    /// # Errors
    ///
    /// Returns [`ZonefareError::Geometry`] when the profile has no location,
    /// and propagates reconciliation failures.
    pub async fn prepare_area_update(
        &self,
        mut profile: DeliveryProfile,
        area: DeliveryArea,
    ) -> Result<DeliveryProfile, ZonefareError> {
        let max_radius = self.max_radius(profile.location(), &area).await?;
        let previous = profile.stored_radius_table().band_count();
        profile.set_area(area, max_radius)?;

        let current = profile.stored_radius_table().band_count();
        match current.cmp(&previous) {
            std::cmp::Ordering::Less => {
                tracing::debug!(previous, current, "area shrank, truncated radius table");
            }
            std::cmp::Ordering::Greater => {
                tracing::debug!(previous, current, "area grew, padded radius table");
            }
            std::cmp::Ordering::Equal => {}
        }
        Ok(profile)
    }

    /// Replace a profile's delivery area, reconcile and persist.
    ///
    /// # Errors
    ///
    /// Returns [`ZonefareError::NotFound`], [`ZonefareError::Geometry`],
    /// [`ZonefareError::DataCorruption`], or [`ZonefareError::Conflict`] when
    /// another writer saved the profile in between.
    #[tracing::instrument(skip(self, area))]
    pub async fn update_area(
        &self,
        id: ProfileId,
        area: DeliveryArea,
    ) -> Result<DeliveryProfile, ZonefareError> {
        let profile = self.get_profile(id).await?;
        let profile = self.prepare_area_update(profile, area).await?;
        let saved = self.save(profile).await?;
        tracing::info!(
            bands = saved.stored_radius_table().band_count(),
            "delivery area updated"
        );
        Ok(saved)
    }

    /// Move a profile's reference location, reconcile when an area exists,
    /// and persist.
    ///
    /// # Errors
    ///
    /// See [`update_area`](Self::update_area).
    #[tracing::instrument(skip(self))]
    pub async fn update_location(
        &self,
        id: ProfileId,
        location: Location,
    ) -> Result<DeliveryProfile, ZonefareError> {
        let mut profile = self.get_profile(id).await?;
        let max_radius = match profile.area() {
            Some(area) => self.max_radius(Some(&location), area).await?,
            None => 0,
        };
        profile.set_location(location, max_radius)?;
        self.save(profile).await
    }

    /// Switch a profile's charge style, re-fitting its table, and persist.
    ///
    /// # Errors
    ///
    /// See [`update_area`](Self::update_area).
    #[tracing::instrument(skip(self))]
    pub async fn update_charge_style(
        &self,
        id: ProfileId,
        style: ChargeStyle,
    ) -> Result<DeliveryProfile, ZonefareError> {
        let mut profile = self.get_profile(id).await?;
        let max_radius = match profile.area() {
            Some(area) => self.max_radius(profile.location(), area).await?,
            None => 0,
        };
        profile.set_charge_style(style, max_radius)?;
        self.save(profile).await
    }

    /// Overwrite band pricing and persist.
    ///
    /// # Errors
    ///
    /// Returns [`ZonefareError::Validation`] when the submitted bands do not
    /// match the current ones, plus the failures of
    /// [`update_area`](Self::update_area).
    #[tracing::instrument(skip(self, entries), fields(bands = entries.len()))]
    pub async fn update_pricing(
        &self,
        id: ProfileId,
        entries: Vec<RadiusEntry>,
    ) -> Result<DeliveryProfile, ZonefareError> {
        let mut profile = self.get_profile(id).await?;
        profile.set_pricing(entries)?;
        self.save(profile).await
    }

    /// The display view of a profile's radius table, with amounts formatted
    /// by `formatter`.
    ///
    /// # Errors
    ///
    /// Returns [`ZonefareError::NotFound`] or a storage error.
    pub async fn display_radius_table<F: AmountFormatter>(
        &self,
        id: ProfileId,
        formatter: &F,
    ) -> Result<Vec<DisplayRadiusEntry>, ZonefareError> {
        let profile = self.get_profile(id).await?;
        Ok(profile
            .display_radius_table()
            .into_iter()
            .map(|entry| DisplayRadiusEntry {
                formatted_paid: formatter.format_amount(entry.paid),
                formatted_charged: formatter.format_amount(entry.charged),
                entry,
            })
            .collect())
    }

    async fn save(&self, profile: DeliveryProfile) -> Result<DeliveryProfile, ZonefareError> {
        let version = profile.version;
        self.repo.save(profile).await.inspect_err(|err| {
            if matches!(err, ZonefareError::Conflict(_)) {
                tracing::warn!(version, "concurrent profile update, caller must retry");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SphericalGeometry;
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;
    use zonefare_domain::error::{ConflictError, ValidationError};
    use zonefare_domain::radius::RadiusTable;

    struct InMemoryProfileRepo {
        store: Mutex<HashMap<ProfileId, DeliveryProfile>>,
    }

    impl Default for InMemoryProfileRepo {
        fn default() -> Self {
            Self {
                store: Mutex::new(HashMap::new()),
            }
        }
    }

    impl ProfileRepository for InMemoryProfileRepo {
        fn create(
            &self,
            profile: DeliveryProfile,
        ) -> impl Future<Output = Result<DeliveryProfile, ZonefareError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.insert(profile.id, profile.clone());
            async { Ok(profile) }
        }

        fn get_by_id(
            &self,
            id: ProfileId,
        ) -> impl Future<Output = Result<Option<DeliveryProfile>, ZonefareError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.get(&id).cloned();
            async { Ok(result) }
        }

        fn get_all(
            &self,
        ) -> impl Future<Output = Result<Vec<DeliveryProfile>, ZonefareError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<DeliveryProfile> = store.values().cloned().collect();
            async { Ok(result) }
        }

        fn save(
            &self,
            mut profile: DeliveryProfile,
        ) -> impl Future<Output = Result<DeliveryProfile, ZonefareError>> + Send {
            let mut store = self.store.lock().unwrap();
            let result = match store.get(&profile.id) {
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
                    profile.version += 1;
                    store.insert(profile.id, profile.clone());
                    Ok(profile)
                }
            };
            async { result }
        }

        fn delete(&self, id: ProfileId) -> impl Future<Output = Result<(), ZonefareError>> + Send {
            let mut store = self.store.lock().unwrap();
            store.remove(&id);
            async { Ok(()) }
        }
    }

    struct FixedGeometry(f64);

    impl AreaGeometry for FixedGeometry {
        async fn max_boundary_distance(
            &self,
            _location: &Location,
            _area: &DeliveryArea,
        ) -> Result<f64, ZonefareError> {
            Ok(self.0)
        }
    }

    struct Cents;

    impl AmountFormatter for Cents {
        fn format_amount(&self, amount: f64) -> String {
            format!("${amount:.2}")
        }
    }

    fn make_service(meters: f64) -> ProfileService<InMemoryProfileRepo, FixedGeometry> {
        ProfileService::new(InMemoryProfileRepo::default(), FixedGeometry(meters))
    }

    fn area() -> DeliveryArea {
        DeliveryArea::from_rings(vec![vec![[0.0, 0.0], [0.05, 0.0], [0.05, 0.05], [0.0, 0.05]]])
            .unwrap()
    }

    fn valid_profile(style: ChargeStyle) -> DeliveryProfile {
        DeliveryProfile::builder()
            .name("Mercado Bom Preço")
            .charge_style(style)
            .location(Location::new(0.0, 0.0).unwrap())
            .build()
            .unwrap()
    }

    fn priced(radius: Option<i32>, paid: f64) -> RadiusEntry {
        RadiusEntry {
            radius,
            time: 20.0,
            paid,
            charged: paid + 2.0,
        }
    }

    fn paid_of(profile: &DeliveryProfile) -> Vec<f64> {
        profile
            .stored_radius_table()
            .entries()
            .iter()
            .map(|e| e.paid)
            .collect()
    }

    #[tokio::test]
    async fn should_create_profile_when_valid() {
        let svc = make_service(0.0);
        let profile = valid_profile(ChargeStyle::Line);
        let id = profile.id;

        svc.create_profile(profile).await.unwrap();

        let fetched = svc.get_profile(id).await.unwrap();
        assert_eq!(fetched.name, "Mercado Bom Preço");
    }

    #[tokio::test]
    async fn should_reject_create_when_name_is_empty() {
        let svc = make_service(0.0);
        let mut profile = valid_profile(ChargeStyle::Line);
        profile.name = String::new();

        let result = svc.create_profile(profile).await;
        assert!(matches!(
            result,
            Err(ZonefareError::Validation(ValidationError::EmptyName))
        ));
    }

    #[tokio::test]
    async fn should_return_not_found_when_profile_missing() {
        let svc = make_service(0.0);
        let result = svc.get_profile(ProfileId::new()).await;
        assert!(matches!(result, Err(ZonefareError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_and_delete_profiles() {
        let svc = make_service(0.0);
        let profile = valid_profile(ChargeStyle::Open);
        let id = profile.id;
        svc.create_profile(profile).await.unwrap();
        svc.create_profile(valid_profile(ChargeStyle::Daily))
            .await
            .unwrap();
        assert_eq!(svc.list_profiles().await.unwrap().len(), 2);

        svc.delete_profile(id).await.unwrap();
        assert_eq!(svc.list_profiles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_round_distance_up_to_whole_kilometers() {
        let svc = make_service(2_400.0);
        let location = Location::new(0.0, 0.0).unwrap();
        assert_eq!(svc.max_radius(Some(&location), &area()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn should_fail_max_radius_without_location() {
        let svc = make_service(2_400.0);
        let result = svc.max_radius(None, &area()).await;
        assert!(matches!(
            result,
            Err(ZonefareError::Geometry(GeometryError::MissingLocation))
        ));
    }

    #[tokio::test]
    async fn should_initialise_table_on_first_area() {
        let svc = make_service(3_000.0);
        let profile = svc
            .create_profile(valid_profile(ChargeStyle::Open))
            .await
            .unwrap();

        let updated = svc.update_area(profile.id, area()).await.unwrap();

        assert_eq!(
            updated.stored_radius_table(),
            &RadiusTable::mock(3, ChargeStyle::Open)
        );
        assert_eq!(updated.version, 1);
    }

    #[tokio::test]
    async fn should_keep_pricing_when_area_shrinks() {
        let svc = make_service(5_000.0);
        let profile = svc
            .create_profile(valid_profile(ChargeStyle::Daily))
            .await
            .unwrap();
        svc.update_area(profile.id, area()).await.unwrap();
        svc.update_pricing(
            profile.id,
            (1..=5).map(|r| priced(Some(r), f64::from(r) * 10.0)).collect(),
        )
        .await
        .unwrap();

        let smaller = make_service(3_000.0);
        let loaded = svc.get_profile(profile.id).await.unwrap();
        let prepared = smaller.prepare_area_update(loaded, area()).await.unwrap();

        assert_eq!(paid_of(&prepared), vec![10.0, 20.0, 30.0]);
    }

    #[tokio::test]
    async fn should_carry_route_tail_when_area_grows() {
        let svc = make_service(2_000.0);
        let profile = svc
            .create_profile(valid_profile(ChargeStyle::Route))
            .await
            .unwrap();
        svc.update_area(profile.id, area()).await.unwrap();
        let priced_profile = svc
            .update_pricing(
                profile.id,
                vec![priced(Some(1), 10.0), priced(Some(2), 20.0), priced(None, 99.0)],
            )
            .await
            .unwrap();

        let bigger = make_service(4_000.0);
        let prepared = bigger
            .prepare_area_update(priced_profile, area())
            .await
            .unwrap();

        assert_eq!(paid_of(&prepared), vec![10.0, 20.0, 0.0, 0.0, 99.0]);
        assert!(prepared.stored_radius_table().trailing_open_tail().is_some());
    }

    #[tokio::test]
    async fn should_report_conflict_when_saved_with_stale_version() {
        let svc = make_service(2_000.0);
        let profile = svc
            .create_profile(valid_profile(ChargeStyle::Open))
            .await
            .unwrap();
        let stale = svc.get_profile(profile.id).await.unwrap();

        svc.update_area(profile.id, area()).await.unwrap();

        let prepared = svc.prepare_area_update(stale, area()).await.unwrap();
        let result = svc.save(prepared).await;
        assert!(matches!(result, Err(ZonefareError::Conflict(_))));
    }

    #[tokio::test]
    async fn should_reject_area_without_location() {
        let svc = make_service(2_000.0);
        let profile = svc
            .create_profile(
                DeliveryProfile::builder()
                    .name("No address yet")
                    .build()
                    .unwrap(),
            )
            .await
            .unwrap();

        let result = svc.update_area(profile.id, area()).await;
        assert!(matches!(result, Err(ZonefareError::Geometry(_))));
        let unchanged = svc.get_profile(profile.id).await.unwrap();
        assert!(unchanged.area().is_none());
    }

    #[tokio::test]
    async fn should_refit_table_when_style_changes() {
        let svc = make_service(2_000.0);
        let profile = svc
            .create_profile(valid_profile(ChargeStyle::Open))
            .await
            .unwrap();
        svc.update_area(profile.id, area()).await.unwrap();

        let route = svc
            .update_charge_style(profile.id, ChargeStyle::Route)
            .await
            .unwrap();
        assert_eq!(route.stored_radius_table().len(), 3);

        let line = svc
            .update_charge_style(profile.id, ChargeStyle::Line)
            .await
            .unwrap();
        assert_eq!(line.stored_radius_table().len(), 2);
    }

    #[tokio::test]
    async fn should_set_location_before_any_area() {
        let svc = make_service(2_000.0);
        let profile = svc
            .create_profile(DeliveryProfile::builder().name("x").build().unwrap())
            .await
            .unwrap();

        let moved = svc
            .update_location(profile.id, Location::new(1.0, 2.0).unwrap())
            .await
            .unwrap();
        assert!(moved.location().is_some());
        assert!(moved.stored_radius_table().is_empty());
    }

    #[tokio::test]
    async fn should_format_display_table_and_hide_line_tail() {
        let svc = make_service(2_000.0);
        let profile = svc
            .create_profile(valid_profile(ChargeStyle::Line))
            .await
            .unwrap();
        svc.update_area(profile.id, area()).await.unwrap();
        svc.update_pricing(profile.id, vec![priced(Some(1), 5.0), priced(Some(2), 7.5)])
            .await
            .unwrap();

        let shown = svc.display_radius_table(profile.id, &Cents).await.unwrap();

        assert_eq!(shown.len(), 2);
        assert!(shown.iter().all(|e| e.entry.radius.is_some()));
        assert_eq!(shown[1].formatted_paid, "$7.50");
        assert_eq!(shown[1].formatted_charged, "$9.50");
    }

    #[test]
    fn should_flatten_display_entry_when_serialized() {
        let entry = DisplayRadiusEntry {
            entry: priced(None, 1.0),
            formatted_paid: "$1.00".to_string(),
            formatted_charged: "$3.00".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["radius"], serde_json::Value::Null);
        assert_eq!(json["formatted_charged"], "$3.00");
    }

    #[tokio::test]
    async fn should_use_spherical_backend_end_to_end() {
        let svc = ProfileService::new(InMemoryProfileRepo::default(), SphericalGeometry::new());
        let profile = svc
            .create_profile(valid_profile(ChargeStyle::Package))
            .await
            .unwrap();

        // Farthest corner of the 0.05° square is ~7.9 km from the origin.
        let updated = svc.update_area(profile.id, area()).await.unwrap();
        assert_eq!(updated.stored_radius_table().band_count(), 8);
    }
}
