//! Display formatting port for money amounts.

/// Turns a raw amount into the string shown next to it.
///
/// Currency and locale rules live in the implementation.
pub trait AmountFormatter {
    fn format_amount(&self, amount: f64) -> String;
}
