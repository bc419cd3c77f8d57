//! Radius reconciliation: fitting an existing pricing table to a new
//! delivery area.
//!
//! When the merchant redraws their area, the number of one-kilometer bands
//! changes. Bands that still exist keep whatever the operator priced them
//! at; bands past the new edge are dropped; new bands are zero-priced.

use std::collections::BTreeMap;

use crate::charge_style::ChargeStyle;
use crate::error::{ContractViolation, ZonefareError};
use crate::radius::{RadiusEntry, RadiusTable, mock_bands};

/// Convert a distance in meters to a band count, rounding up to the next
/// whole kilometer.
///
/// # Errors
///
/// Returns [`ContractViolation::UnrepresentableDistance`] when `meters` is
/// negative, not finite, or too large for a band number.
pub fn max_radius_for_distance(meters: f64) -> Result<i32, ContractViolation> {
    if !meters.is_finite() || meters < 0.0 {
        return Err(ContractViolation::UnrepresentableDistance(meters.to_string()));
    }
    let kilometers = (meters / 1000.0).ceil();
    if kilometers > f64::from(i32::MAX) {
        return Err(ContractViolation::UnrepresentableDistance(meters.to_string()));
    }
    #[allow(clippy::cast_possible_truncation)]
    let radius = kilometers as i32;
    Ok(radius)
}

/// Union of two keyed collections, keeping `left`'s value wherever both
/// sides hold the same key.
fn merge_prefer_left<K: Ord, V>(
    left: BTreeMap<K, V>,
    right: impl IntoIterator<Item = (K, V)>,
) -> BTreeMap<K, V> {
    let mut merged = left;
    for (key, value) in right {
        merged.entry(key).or_insert(value);
    }
    merged
}

/// Fit `prior` to `new_max_radius` bands under `style`.
///
/// - An empty `prior` yields a fresh zero-priced table.
/// - Otherwise the finite bands are truncated (area shrank) or zero-filled
///   (area grew) to exactly `new_max_radius` entries, keeping prior pricing
///   for every band that survives.
/// - [`ChargeStyle::Route`] tables end with an open tail, carried over from
///   `prior` when `prior` ended with one. Every other style drops it.
///
/// `prior` is never modified; the result is in canonical order.
///
/// # Errors
///
/// Returns [`ZonefareError::ContractViolation`] when `new_max_radius` is
/// negative, and [`ZonefareError::DataCorruption`] when `prior` has
/// duplicate, non-positive, or non-contiguous radii.
pub fn reconcile(
    prior: &RadiusTable,
    style: ChargeStyle,
    new_max_radius: i32,
) -> Result<RadiusTable, ZonefareError> {
    if new_max_radius < 0 {
        return Err(ContractViolation::NegativeMaxRadius(new_max_radius).into());
    }

    if prior.is_empty() {
        return Ok(RadiusTable::mock(new_max_radius, style));
    }

    let active = prior.finite_bands()?;
    let wanted = usize::try_from(new_max_radius).unwrap_or_default();

    let mut entries: Vec<RadiusEntry> = if active.len() > wanted {
        active.into_values().take(wanted).collect()
    } else {
        let mock = (1..=new_max_radius).zip(mock_bands(new_max_radius));
        merge_prefer_left(active, mock).into_values().collect()
    };

    if style.has_open_tail() {
        let tail = prior
            .trailing_open_tail()
            .copied()
            .unwrap_or_else(RadiusEntry::open_tail);
        entries.push(tail);
    }

    Ok(RadiusTable::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataCorruptionError;

    fn band(radius: i32, paid: f64) -> RadiusEntry {
        RadiusEntry {
            radius: Some(radius),
            time: f64::from(radius) * 5.0,
            paid,
            charged: paid + 1.0,
        }
    }

    fn tail(paid: f64) -> RadiusEntry {
        RadiusEntry {
            radius: None,
            time: 45.0,
            paid,
            charged: paid + 1.0,
        }
    }

    fn table(paid: &[f64]) -> RadiusTable {
        RadiusTable::from_entries(
            (1..)
                .zip(paid)
                .map(|(radius, &paid)| band(radius, paid))
                .collect(),
        )
    }

    fn paid_of(table: &RadiusTable) -> Vec<f64> {
        table
            .entries()
            .iter()
            .filter(|e| !e.is_open_tail())
            .map(|e| e.paid)
            .collect()
    }

    fn finite_radii(table: &RadiusTable) -> Vec<i32> {
        table.entries().iter().filter_map(|e| e.radius).collect()
    }

    #[test]
    fn should_round_distance_up_to_next_kilometer() {
        assert_eq!(max_radius_for_distance(0.0), Ok(0));
        assert_eq!(max_radius_for_distance(1.0), Ok(1));
        assert_eq!(max_radius_for_distance(1000.0), Ok(1));
        assert_eq!(max_radius_for_distance(1000.1), Ok(2));
        assert_eq!(max_radius_for_distance(7_250.0), Ok(8));
    }

    #[test]
    fn should_reject_unrepresentable_distance() {
        assert!(max_radius_for_distance(-5_000.0).is_err());
        assert!(max_radius_for_distance(f64::NEG_INFINITY).is_err());
        assert!(max_radius_for_distance(f64::NAN).is_err());
        assert!(max_radius_for_distance(f64::INFINITY).is_err());
    }

    #[test]
    fn should_reject_negative_distance_under_one_kilometer() {
        assert_eq!(
            max_radius_for_distance(-1.0),
            Err(ContractViolation::UnrepresentableDistance("-1".to_string()))
        );
        assert!(max_radius_for_distance(-999.9).is_err());
        assert!(max_radius_for_distance(-0.001).is_err());
    }

    #[test]
    fn should_reject_distance_beyond_band_range() {
        assert!(max_radius_for_distance(f64::MAX).is_err());
    }

    #[test]
    fn should_build_zero_bands_when_prior_empty() {
        let result = reconcile(&RadiusTable::default(), ChargeStyle::Open, 3).unwrap();
        assert_eq!(result, RadiusTable::mock(3, ChargeStyle::Open));
        assert_eq!(finite_radii(&result), vec![1, 2, 3]);
        assert!(result.entries().iter().all(|e| !e.is_open_tail()));
    }

    #[test]
    fn should_add_zero_tail_when_prior_empty_and_route() {
        let result = reconcile(&RadiusTable::default(), ChargeStyle::Route, 2).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.trailing_open_tail(), Some(&RadiusEntry::open_tail()));
    }

    #[test]
    fn should_keep_prefix_pricing_when_area_shrinks() {
        let prior = table(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let result = reconcile(&prior, ChargeStyle::Daily, 3).unwrap();
        assert_eq!(finite_radii(&result), vec![1, 2, 3]);
        assert_eq!(paid_of(&result), vec![10.0, 20.0, 30.0]);
        assert_eq!(result.entries(), &prior.entries()[..3]);
    }

    #[test]
    fn should_zero_fill_new_bands_when_area_grows() {
        let prior = table(&[10.0, 20.0]);
        let result = reconcile(&prior, ChargeStyle::Package, 4).unwrap();
        assert_eq!(finite_radii(&result), vec![1, 2, 3, 4]);
        assert_eq!(&result.entries()[..2], prior.entries());
        assert_eq!(result.entries()[2], RadiusEntry::band(3));
        assert_eq!(result.entries()[3], RadiusEntry::band(4));
    }

    #[test]
    fn should_carry_route_tail_when_area_grows() {
        let mut entries = table(&[10.0, 20.0]).into_entries();
        entries.push(tail(99.0));
        let prior = RadiusTable::from_entries(entries);

        let result = reconcile(&prior, ChargeStyle::Route, 4).unwrap();

        assert_eq!(paid_of(&result), vec![10.0, 20.0, 0.0, 0.0]);
        assert_eq!(result.trailing_open_tail(), Some(&tail(99.0)));
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn should_add_zero_tail_when_route_prior_has_none() {
        let prior = table(&[10.0, 20.0]);
        let result = reconcile(&prior, ChargeStyle::Route, 2).unwrap();
        assert_eq!(result.trailing_open_tail(), Some(&RadiusEntry::open_tail()));
        assert_eq!(paid_of(&result), vec![10.0, 20.0]);
    }

    #[test]
    fn should_drop_tail_for_non_route_styles() {
        let mut entries = table(&[10.0]).into_entries();
        entries.push(tail(99.0));
        let prior = RadiusTable::from_entries(entries);

        for style in [
            ChargeStyle::Line,
            ChargeStyle::Open,
            ChargeStyle::Daily,
            ChargeStyle::Package,
        ] {
            let result = reconcile(&prior, style, 2).unwrap();
            assert!(result.trailing_open_tail().is_none(), "{style}");
            assert_eq!(finite_radii(&result), vec![1, 2]);
        }
    }

    #[test]
    fn should_empty_table_when_max_radius_zero() {
        let prior = table(&[10.0, 20.0]);
        let result = reconcile(&prior, ChargeStyle::Line, 0).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn should_keep_only_tail_when_max_radius_zero_and_route() {
        let mut entries = table(&[10.0, 20.0]).into_entries();
        entries.push(tail(7.0));
        let prior = RadiusTable::from_entries(entries);

        let result = reconcile(&prior, ChargeStyle::Route, 0).unwrap();
        assert_eq!(result.into_entries(), vec![tail(7.0)]);

        let fresh = reconcile(&RadiusTable::default(), ChargeStyle::Route, 0).unwrap();
        assert_eq!(fresh.into_entries(), vec![RadiusEntry::open_tail()]);
    }

    #[test]
    fn should_not_touch_prior_table() {
        let prior = table(&[10.0, 20.0, 30.0]);
        let snapshot = prior.clone();
        reconcile(&prior, ChargeStyle::Route, 1).unwrap();
        assert_eq!(prior, snapshot);
    }

    #[test]
    fn should_reject_negative_max_radius() {
        let result = reconcile(&table(&[1.0]), ChargeStyle::Line, -1);
        assert!(matches!(
            result,
            Err(ZonefareError::ContractViolation(
                ContractViolation::NegativeMaxRadius(-1)
            ))
        ));
    }

    #[test]
    fn should_surface_duplicate_radius_in_prior() {
        let prior = RadiusTable::from_entries(vec![band(1, 1.0), band(1, 2.0)]);
        let result = reconcile(&prior, ChargeStyle::Open, 3);
        assert!(matches!(
            result,
            Err(ZonefareError::DataCorruption(
                DataCorruptionError::DuplicateRadius(1)
            ))
        ));
    }

    #[test]
    fn should_surface_negative_radius_in_prior() {
        let prior = RadiusTable::from_entries(vec![band(-1, 1.0), band(1, 2.0)]);
        let result = reconcile(&prior, ChargeStyle::Open, 3);
        assert!(matches!(result, Err(ZonefareError::DataCorruption(_))));
    }

    #[test]
    fn should_be_idempotent_for_every_style_and_radius() {
        let mut with_tail = table(&[10.0, 20.0, 30.0]).into_entries();
        with_tail.push(tail(5.0));
        let priors = [
            RadiusTable::default(),
            table(&[10.0, 20.0, 30.0]),
            RadiusTable::from_entries(with_tail),
            RadiusTable::from_entries(vec![tail(3.0)]),
        ];

        for prior in &priors {
            for style in ChargeStyle::ALL {
                for radius in 0..6 {
                    let once = reconcile(prior, style, radius).unwrap();
                    let twice = reconcile(&once, style, radius).unwrap();
                    assert_eq!(once, twice, "{style} r={radius} prior={prior:?}");
                }
            }
        }
    }

    #[test]
    fn should_produce_contiguous_bands_and_tail_only_for_route() {
        let prior = table(&[1.0, 2.0, 3.0, 4.0]);
        for style in ChargeStyle::ALL {
            for radius in 0..8 {
                let result = reconcile(&prior, style, radius).unwrap();
                let radii = finite_radii(&result);
                assert_eq!(radii, (1..=radius).collect::<Vec<_>>());
                let tails = result.entries().iter().filter(|e| e.is_open_tail()).count();
                if style == ChargeStyle::Route {
                    assert_eq!(tails, 1);
                    assert!(result.entries().last().unwrap().is_open_tail());
                } else {
                    assert_eq!(tails, 0);
                }
            }
        }
    }
}
