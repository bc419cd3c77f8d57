//! Radius table: per-kilometer pricing bands around a merchant.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::charge_style::ChargeStyle;
use crate::error::DataCorruptionError;

/// One pricing band.
///
/// `radius` is the band's outer edge in whole kilometers. `None` marks the
/// open-ended tail ("beyond the last band"), only meaningful for
/// [`ChargeStyle::Route`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusEntry {
    #[serde(default, alias = "rad")]
    pub radius: Option<i32>,
    /// Delivery time estimate entered by the operator.
    #[serde(default)]
    pub time: f64,
    /// Amount owed to the courier.
    #[serde(default)]
    pub paid: f64,
    /// Amount charged to the customer.
    #[serde(default)]
    pub charged: f64,
}

impl RadiusEntry {
    /// A zero-priced band ending at `radius` kilometers.
    #[must_use]
    pub fn band(radius: i32) -> Self {
        Self {
            radius: Some(radius),
            time: 0.0,
            paid: 0.0,
            charged: 0.0,
        }
    }

    /// A zero-priced open-ended tail.
    #[must_use]
    pub fn open_tail() -> Self {
        Self {
            radius: None,
            time: 0.0,
            paid: 0.0,
            charged: 0.0,
        }
    }

    #[must_use]
    pub fn is_open_tail(&self) -> bool {
        self.radius.is_none()
    }

    /// Copy of `self` priced like `other`, radius untouched.
    #[must_use]
    pub fn priced_as(self, other: &Self) -> Self {
        Self {
            radius: self.radius,
            time: other.time,
            paid: other.paid,
            charged: other.charged,
        }
    }
}

/// Zero-priced bands `1..=max_radius`. Empty when `max_radius < 1`.
pub fn mock_bands(max_radius: i32) -> impl Iterator<Item = RadiusEntry> {
    (1..=max_radius).map(RadiusEntry::band)
}

/// Ordered pricing bands: ascending radius, open tail last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RadiusTable(Vec<RadiusEntry>);

impl RadiusTable {
    /// Build a table from entries in any order, sorting them canonically.
    #[must_use]
    pub fn from_entries(mut entries: Vec<RadiusEntry>) -> Self {
        entries.sort_by_key(|entry| (entry.radius.is_none(), entry.radius));
        Self(entries)
    }

    /// Freshly initialised table: zero-priced bands `1..=max_radius`, plus a
    /// zero-priced open tail for styles that have one.
    #[must_use]
    pub fn mock(max_radius: i32, style: ChargeStyle) -> Self {
        let tail = style.has_open_tail().then(RadiusEntry::open_tail);
        Self(mock_bands(max_radius).chain(tail).collect())
    }

    #[must_use]
    pub fn entries(&self) -> &[RadiusEntry] {
        &self.0
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<RadiusEntry> {
        self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The open tail, when it is the table's last entry.
    #[must_use]
    pub fn trailing_open_tail(&self) -> Option<&RadiusEntry> {
        self.0.last().filter(|entry| entry.is_open_tail())
    }

    /// The same table with every open tail removed.
    #[must_use]
    pub fn without_open_tail(self) -> Self {
        Self(self.0.into_iter().filter(|entry| !entry.is_open_tail()).collect())
    }

    /// Number of finite bands.
    #[must_use]
    pub fn band_count(&self) -> usize {
        self.0.iter().filter(|entry| !entry.is_open_tail()).count()
    }

    /// Finite bands keyed by radius, after checking table integrity.
    ///
    /// # Errors
    ///
    /// Returns [`DataCorruptionError`] when a radius is non-positive or
    /// repeated, when there is more than one open tail, or when the finite
    /// radii are not exactly `1..=n`.
    pub fn finite_bands(&self) -> Result<BTreeMap<i32, RadiusEntry>, DataCorruptionError> {
        let mut bands = BTreeMap::new();
        let mut open_tails = 0_usize;

        for entry in &self.0 {
            let Some(radius) = entry.radius else {
                open_tails += 1;
                if open_tails > 1 {
                    return Err(DataCorruptionError::DuplicateSentinel);
                }
                continue;
            };
            if radius < 1 {
                return Err(DataCorruptionError::NonPositiveRadius(radius));
            }
            match bands.entry(radius) {
                Entry::Occupied(_) => return Err(DataCorruptionError::DuplicateRadius(radius)),
                Entry::Vacant(slot) => {
                    slot.insert(*entry);
                }
            }
        }

        for (expected, &found) in (1..).zip(bands.keys()) {
            if expected != found {
                return Err(DataCorruptionError::Gap { expected, found });
            }
        }

        Ok(bands)
    }

    /// Check table integrity without extracting anything.
    ///
    /// # Errors
    ///
    /// See [`finite_bands`](Self::finite_bands).
    pub fn validate(&self) -> Result<(), DataCorruptionError> {
        self.finite_bands().map(|_| ())
    }
}
