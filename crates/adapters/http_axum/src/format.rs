//! Amount formatting for the display radius table.

use zonefare_app::ports::AmountFormatter;

/// Renders amounts with two decimals and no currency symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainAmountFormatter;

impl AmountFormatter for PlainAmountFormatter {
    fn format_amount(&self, amount: f64) -> String {
        format!("{amount:.2}")
    }
}
