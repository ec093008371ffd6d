//! Conversion between major currency units and integer minor units.
//! All amounts past the checkout boundary are integer cents; the conversion
//! happens exactly once, here.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("amount {0} is not representable in minor units")]
    OutOfRange(Decimal),
}

/// Converts a major-unit amount to minor units (cents), rounding half away
/// from zero.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    let cents = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(MoneyError::OutOfRange(amount))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    cents.to_i64().ok_or(MoneyError::OutOfRange(amount))
}
