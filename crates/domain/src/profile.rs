//! Delivery profile: a merchant's delivery area, reference location,
//! charge style, and radius pricing table.
//!
//! The area and the radius table only change together: every mutator that
//! can move the area's edge takes the freshly computed max radius and
//! reconciles the table before anything is assigned, so a failed call
//! leaves the profile untouched.

use serde::{Deserialize, Serialize};

use crate::charge_style::ChargeStyle;
use crate::error::{ValidationError, ZonefareError};
use crate::geometry::{DeliveryArea, Location};
use crate::id::ProfileId;
use crate::radius::{RadiusEntry, RadiusTable};
use crate::reconcile::reconcile;
use crate::time::{Timestamp, now};

/// A merchant's delivery configuration.
///
/// A [`ChargeStyle::Line`] profile never holds a null-radius entry, so no
/// view of it, serialized ones included, can show one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileRecord")]
pub struct DeliveryProfile {
    pub id: ProfileId,
    pub name: String,
    charge_style: ChargeStyle,
    location: Option<Location>,
    area: Option<DeliveryArea>,
    radius_table: RadiusTable,
    /// Optimistic concurrency token, bumped by every successful save.
    pub version: i64,
    pub updated_at: Timestamp,
}

/// Serialized shape of a [`DeliveryProfile`], rebuilt through the builder
/// so deserialized profiles get the same checks as constructed ones.
#[derive(Deserialize)]
struct ProfileRecord {
    id: ProfileId,
    name: String,
    #[serde(default)]
    charge_style: ChargeStyle,
    #[serde(default)]
    location: Option<Location>,
    #[serde(default)]
    area: Option<DeliveryArea>,
    #[serde(default)]
    radius_table: RadiusTable,
    #[serde(default)]
    version: i64,
    updated_at: Option<Timestamp>,
}

impl TryFrom<ProfileRecord> for DeliveryProfile {
    type Error = ZonefareError;

    fn try_from(record: ProfileRecord) -> Result<Self, Self::Error> {
        DeliveryProfileBuilder {
            id: Some(record.id),
            name: Some(record.name),
            charge_style: record.charge_style,
            location: record.location,
            area: record.area,
            radius_table: record.radius_table,
            version: record.version,
            updated_at: record.updated_at,
        }
        .build()
    }
}

impl DeliveryProfile {
    /// Create a builder for constructing a [`DeliveryProfile`].
    #[must_use]
    pub fn builder() -> DeliveryProfileBuilder {
        DeliveryProfileBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ZonefareError::Validation`] when `name` is empty, and
    /// [`ZonefareError::DataCorruption`] when the stored table is broken.
    pub fn validate(&self) -> Result<(), ZonefareError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        self.radius_table.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn charge_style(&self) -> ChargeStyle {
        self.charge_style
    }

    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    #[must_use]
    pub fn area(&self) -> Option<&DeliveryArea> {
        self.area.as_ref()
    }

    /// The table exactly as persisted. Callers presenting bands to a user
    /// want [`display_radius_table`](Self::display_radius_table).
    #[must_use]
    pub fn stored_radius_table(&self) -> &RadiusTable {
        &self.radius_table
    }

    /// Bands as they should be shown and edited.
    ///
    /// - No area, or nothing stored yet: empty.
    /// - [`ChargeStyle::Line`]: open-tail entries are removed.
    /// - [`ChargeStyle::Route`]: a zero-priced open tail is appended when the
    ///   table does not already end with one.
    #[must_use]
    pub fn display_radius_table(&self) -> Vec<RadiusEntry> {
        if self.area.is_none() || self.radius_table.is_empty() {
            return Vec::new();
        }

        let mut entries: Vec<RadiusEntry> = self
            .radius_table
            .entries()
            .iter()
            .filter(|entry| !(self.charge_style.hides_open_tail() && entry.is_open_tail()))
            .copied()
            .collect();

        if self.charge_style.has_open_tail() && !entries.last().is_some_and(RadiusEntry::is_open_tail)
        {
            entries.push(RadiusEntry::open_tail());
        }

        entries
    }

    /// Replace the delivery area.
    ///
    /// `max_radius` must be the band count derived from `area` and the
    /// current location. On success the table has been reconciled against it.
    ///
    /// # Errors
    ///
    /// Propagates reconciliation failures; the profile is left unchanged.
    pub fn set_area(&mut self, area: DeliveryArea, max_radius: i32) -> Result<(), ZonefareError> {
        let table = reconcile(&self.radius_table, self.charge_style, max_radius)?;
        self.area = Some(area);
        self.radius_table = table;
        self.touch();
        Ok(())
    }

    /// Replace the reference location.
    ///
    /// `max_radius` must be derived from `location` and the current area; it
    /// is ignored while no area is set.
    ///
    /// # Errors
    ///
    /// Propagates reconciliation failures; the profile is left unchanged.
    pub fn set_location(&mut self, location: Location, max_radius: i32) -> Result<(), ZonefareError> {
        if self.area.is_some() {
            self.radius_table = reconcile(&self.radius_table, self.charge_style, max_radius)?;
        }
        self.location = Some(location);
        self.touch();
        Ok(())
    }

    /// Switch charge style, re-fitting the table so the open-tail rule of
    /// the new style holds. `max_radius` is ignored while no area is set.
    ///
    /// # Errors
    ///
    /// Propagates reconciliation failures; the profile is left unchanged.
    pub fn set_charge_style(
        &mut self,
        style: ChargeStyle,
        max_radius: i32,
    ) -> Result<(), ZonefareError> {
        if self.area.is_some() {
            self.radius_table = reconcile(&self.radius_table, style, max_radius)?;
        }
        self.charge_style = style;
        self.drop_hidden_open_tail();
        self.touch();
        Ok(())
    }

    /// Overwrite band pricing.
    ///
    /// `entries` must name exactly the bands of
    /// [`display_radius_table`](Self::display_radius_table), in any order;
    /// only `time`, `paid` and `charged` are taken from them.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::RadiusMismatch`] when the band sets differ
    /// and [`ValidationError::InvalidAmount`] for negative or non-finite
    /// numbers.
    pub fn set_pricing(&mut self, entries: Vec<RadiusEntry>) -> Result<(), ZonefareError> {
        if let Some(bad) = entries.iter().find(|entry| {
            ![entry.time, entry.paid, entry.charged]
                .iter()
                .all(|value| value.is_finite() && *value >= 0.0)
        }) {
            return Err(ValidationError::InvalidAmount {
                radius: bad
                    .radius
                    .map_or_else(|| "open tail".to_string(), |r| r.to_string()),
            }
            .into());
        }

        let submitted = RadiusTable::from_entries(entries);
        let current = RadiusTable::from_entries(self.display_radius_table());

        let same_bands = submitted.len() == current.len()
            && submitted
                .entries()
                .iter()
                .zip(current.entries())
                .all(|(new, old)| new.radius == old.radius);
        if !same_bands {
            return Err(ValidationError::RadiusMismatch.into());
        }

        let priced = current
            .into_entries()
            .into_iter()
            .zip(submitted.entries())
            .map(|(old, new)| old.priced_as(new))
            .collect();
        self.radius_table = RadiusTable::from_entries(priced);
        self.touch();
        Ok(())
    }

    fn drop_hidden_open_tail(&mut self) {
        if self.charge_style.hides_open_tail() {
            self.radius_table = std::mem::take(&mut self.radius_table).without_open_tail();
        }
    }

    fn touch(&mut self) {
        self.updated_at = now();
    }
}

/// Step-by-step builder for [`DeliveryProfile`].
///
/// `area` and `radius_table` are taken as-is, for rehydrating persisted
/// profiles; use the profile's mutators to change them afterwards.
#[derive(Debug, Default)]
pub struct DeliveryProfileBuilder {
    id: Option<ProfileId>,
    name: Option<String>,
    charge_style: ChargeStyle,
    location: Option<Location>,
    area: Option<DeliveryArea>,
    radius_table: RadiusTable,
    version: i64,
    updated_at: Option<Timestamp>,
}

impl DeliveryProfileBuilder {
    #[must_use]
    pub fn id(mut self, id: ProfileId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn charge_style(mut self, charge_style: ChargeStyle) -> Self {
        self.charge_style = charge_style;
        self
    }

    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn area(mut self, area: DeliveryArea) -> Self {
        self.area = Some(area);
        self
    }

    #[must_use]
    pub fn radius_table(mut self, radius_table: RadiusTable) -> Self {
        self.radius_table = radius_table;
        self
    }

    #[must_use]
    pub fn version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn updated_at(mut self, updated_at: Timestamp) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Consume the builder, validate, and return a [`DeliveryProfile`].
    ///
    /// # Errors
    ///
    /// Returns [`ZonefareError::Validation`] if `name` is missing or empty,
    /// or [`ZonefareError::DataCorruption`] if `radius_table` is broken.
    /// Null-radius entries of a [`ChargeStyle::Line`] table are dropped once
    /// the table has passed its checks.
    pub fn build(self) -> Result<DeliveryProfile, ZonefareError> {
        let mut profile = DeliveryProfile {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            charge_style: self.charge_style,
            location: self.location,
            area: self.area,
            radius_table: self.radius_table,
            version: self.version,
            updated_at: self.updated_at.unwrap_or_else(now),
        };
        profile.validate()?;
        profile.drop_hidden_open_tail();
        Ok(profile)
    }
}
