//! Charge style: how a merchant bills a delivery.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Pricing model for a merchant's deliveries.
///
/// Only [`Line`](Self::Line) and [`Route`](Self::Route) change how the radius
/// table is reconciled or read; the last-mile styles behave like plain
/// distance bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeStyle {
    /// Straight-line distance from the merchant.
    #[default]
    Line,
    /// Route distance; the table carries an open-ended tail band.
    Route,
    Open,
    Daily,
    Package,
}

impl ChargeStyle {
    /// Every style, in catalogue order.
    pub const ALL: [Self; 5] = [
        Self::Line,
        Self::Route,
        Self::Open,
        Self::Daily,
        Self::Package,
    ];

    /// Stable upper-case code used in storage and on the wire.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Line => "LINE",
            Self::Route => "ROUTE",
            Self::Open => "OPEN",
            Self::Daily => "DAILY",
            Self::Package => "PACKAGE",
        }
    }

    /// Label shown to operators in the catalogue.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Line => "Linha reta",
            Self::Route => "Rota",
            Self::Open => "Livre (Last mile)",
            Self::Daily => "Diária (Last mile)",
            Self::Package => "Pacote (Last mile)",
        }
    }

    /// Whether the radius table ends with an open-ended (null radius) band.
    #[must_use]
    pub fn has_open_tail(self) -> bool {
        matches!(self, Self::Route)
    }

    /// Whether null-radius bands are hidden whenever the table is read.
    #[must_use]
    pub fn hides_open_tail(self) -> bool {
        matches!(self, Self::Line)
    }
}

impl std::fmt::Display for ChargeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ChargeStyle {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownChargeStyle(s.to_string()))
    }
}
