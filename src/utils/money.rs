use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Decimal places held by the `DECIMAL(18, 4)` rate and amount columns.
pub const STORED_SCALE: u32 = 4;

/// Largest value a `DECIMAL(18, 4)` column holds.
pub const MAX_STORED: Decimal = dec!(99999999999999.9999);

/// Rounds a computed amount to the precision it is stored with, so the value
/// handed to the store is exactly the value read back.
pub fn stored(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(STORED_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether `value` fits a stored column without rounding or overflow.
pub fn fits_column(value: Decimal) -> bool {
    value.normalize().scale() <= STORED_SCALE && value.abs() <= MAX_STORED
}

/// Rounds to cents for presentation.
pub fn display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
