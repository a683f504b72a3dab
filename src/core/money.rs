use rust_decimal::Decimal;

use crate::core::{AppError, Result};

/// All document-level amounts are held at minor-unit precision (two decimals).
/// Line amounts stay exact (quantity × unit price, no rounding) so that
/// subtotals are always the exact sum of their lines.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Round an amount to minor-unit precision (banker's rounding, like the
/// underlying decimal library).
pub fn round_minor(amount: Decimal) -> Decimal {
    amount.round_dp(MINOR_UNIT_SCALE)
}

/// Validate that an amount carries no more precision than minor units allow.
pub fn validate_minor_unit(label: &str, amount: Decimal) -> Result<()> {
    if amount.normalize().scale() > MINOR_UNIT_SCALE {
        return Err(AppError::validation(format!(
            "{} must have at most {} decimal places, got {}",
            label, MINOR_UNIT_SCALE, amount
        )));
    }
    Ok(())
}

/// Validate that an amount is not negative.
pub fn validate_non_negative(label: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} cannot be negative, got {}",
            label, amount
        )));
    }
    Ok(())
}

/// Validate a percentage field: 0 to 100 inclusive, at most 4 decimal places.
pub fn validate_percent(label: &str, percent: Decimal) -> Result<()> {
    if percent < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} cannot be negative, got {}",
            label, percent
        )));
    }
    if percent > Decimal::from(100) {
        return Err(AppError::validation(format!(
            "{} cannot exceed 100, got {}",
            label, percent
        )));
    }
    if percent.normalize().scale() > 4 {
        return Err(AppError::validation(format!(
            "{} cannot have more than 4 decimal places, got {}",
            label, percent
        )));
    }
    Ok(())
}
