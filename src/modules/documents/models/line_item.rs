// A line item is one row of a quotation, sales order or invoice: quantity ×
// unit price of a described good or service. The amount column is always
// derived; it is never independently editable and is recomputed in step with
// any quantity or price change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::validate_minor_unit;
use crate::core::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier for the line
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    /// Foreign key to the owning document
    #[serde(skip_deserializing)]
    pub document_id: Option<String>,

    /// Description of the product or service
    pub description: String,

    /// Quantity; fractional values allowed, must be positive
    pub quantity: Decimal,

    /// Price per unit at minor-unit precision
    pub unit_price: Decimal,

    /// Derived: quantity × unit_price, exact (no line-level rounding)
    #[serde(skip_deserializing)]
    pub amount: Decimal,

    /// Presentation order within the document; not significant to totals
    #[serde(skip_deserializing)]
    pub position: i32,
}

impl LineItem {
    /// Create a new line item with validation.
    ///
    /// Invalid numeric input is rejected with a typed validation error rather
    /// than silently coerced to zero.
    pub fn new(
        description: String,
        quantity: Decimal,
        unit_price: Decimal,
        position: i32,
    ) -> Result<Self> {
        Self::validate_description(&description)?;
        Self::validate_quantity(quantity)?;
        Self::validate_unit_price(unit_price)?;

        let mut line = Self {
            id: None,
            document_id: None,
            description,
            quantity,
            unit_price,
            amount: Decimal::ZERO,
            position,
        };
        line.recalculate();

        Ok(line)
    }

    /// Recompute the derived amount from the current quantity and unit price.
    /// The product is kept exact; rounding happens only at document level.
    pub fn recalculate(&mut self) {
        self.amount = self.quantity * self.unit_price;
    }

    fn validate_description(description: &str) -> Result<()> {
        if description.trim().is_empty() {
            return Err(AppError::validation("Line item description cannot be empty"));
        }

        if description.len() > 255 {
            return Err(AppError::validation(
                "Line item description cannot exceed 255 characters",
            ));
        }

        Ok(())
    }

    fn validate_quantity(quantity: Decimal) -> Result<()> {
        if quantity <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Quantity must be positive, got: {}",
                quantity
            )));
        }

        if quantity.normalize().scale() > 3 {
            return Err(AppError::validation(format!(
                "Quantity cannot have more than 3 decimal places, got: {}",
                quantity
            )));
        }

        Ok(())
    }

    fn validate_unit_price(unit_price: Decimal) -> Result<()> {
        if unit_price < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Unit price must be non-negative, got: {}",
                unit_price
            )));
        }

        validate_minor_unit("unit price", unit_price)
    }
}
