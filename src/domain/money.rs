use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Money is represented as an exact base-10 decimal to avoid floating-point drift.
pub type Amount = Decimal;

/// Number of fractional digits money is settled to.
pub const CENT_SCALE: u32 = 2;

/// Round to cents, half away from zero (1.005 -> 1.01).
pub fn round_to_cents(amount: Amount) -> Amount {
    round_half_up(amount, CENT_SCALE)
}

pub fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with at least two decimals. Digits below a cent are
/// kept, so the text always matches the stored value.
/// Example: 50 -> "50.00", -12.345 -> "-12.345", 1.500 -> "1.50"
pub fn format_amount(amount: Amount) -> String {
    let mut shown = amount.normalize();
    if shown.scale() < CENT_SCALE {
        shown.rescale(CENT_SCALE);
    }
    shown.to_string()
}

/// Parse a decimal string into an amount.
/// Example: "50.00" -> 50.00, "12.5" -> 12.5, "100" -> 100
///
/// The sign is preserved; whether a non-positive amount is acceptable is
/// decided by the operation that receives it.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Missing);
    }
    Decimal::from_str(input).map_err(|_| ParseAmountError::InvalidFormat(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("amount is missing")]
    Missing,

    #[error("invalid money format: '{0}'")]
    InvalidFormat(String),
}
