use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::{round_minor, validate_minor_unit, validate_non_negative, validate_percent};
use crate::core::{AppError, Result};

/// Document-level tax specification.
///
/// The two tax models the editor screens used to hold in separate field sets
/// are unified into one tagged representation; total computation dispatches
/// on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaxSpec {
    /// CGST/SGST percentages applied to the document subtotal
    /// (quotation and sales-order forms).
    Percentage {
        cgst_percent: Decimal,
        sgst_percent: Decimal,
    },
    /// Directly entered amount, independent of subtotal (invoice template).
    Flat { amount: Decimal },
}

/// Tax portion of a total recomputation. For the flat model the CGST/SGST
/// halves are zero and `tax_amount` is the entered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxAmounts {
    pub cgst_amount: Decimal,
    pub sgst_amount: Decimal,
    pub tax_amount: Decimal,
}

impl TaxSpec {
    pub fn validate(&self) -> Result<()> {
        match self {
            TaxSpec::Percentage {
                cgst_percent,
                sgst_percent,
            } => {
                validate_percent("cgst_percent", *cgst_percent)?;
                validate_percent("sgst_percent", *sgst_percent)?;
            }
            TaxSpec::Flat { amount } => {
                validate_non_negative("tax amount", *amount)?;
                validate_minor_unit("tax amount", *amount)?;
            }
        }
        Ok(())
    }

    /// Compute the tax owed on a subtotal. Percentage halves are rounded to
    /// minor units individually so the persisted split matches the displayed
    /// CGST/SGST rows exactly.
    pub fn tax_on(&self, subtotal: Decimal) -> TaxAmounts {
        match self {
            TaxSpec::Percentage {
                cgst_percent,
                sgst_percent,
            } => {
                let hundred = Decimal::from(100);
                let cgst_amount = round_minor(subtotal * *cgst_percent / hundred);
                let sgst_amount = round_minor(subtotal * *sgst_percent / hundred);
                TaxAmounts {
                    cgst_amount,
                    sgst_amount,
                    tax_amount: cgst_amount + sgst_amount,
                }
            }
            TaxSpec::Flat { amount } => TaxAmounts {
                cgst_amount: Decimal::ZERO,
                sgst_amount: Decimal::ZERO,
                tax_amount: *amount,
            },
        }
    }

    /// Discriminator value for the tax_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            TaxSpec::Percentage { .. } => "percentage",
            TaxSpec::Flat { .. } => "flat",
        }
    }

    /// Rebuild a TaxSpec from its persisted columns.
    pub fn from_columns(
        tax_type: &str,
        cgst_percent: Option<Decimal>,
        sgst_percent: Option<Decimal>,
        flat_tax_amount: Option<Decimal>,
    ) -> Result<Self> {
        match tax_type {
            "percentage" => Ok(TaxSpec::Percentage {
                cgst_percent: cgst_percent.ok_or_else(|| {
                    AppError::internal("Percentage tax row missing cgst_percent")
                })?,
                sgst_percent: sgst_percent.ok_or_else(|| {
                    AppError::internal("Percentage tax row missing sgst_percent")
                })?,
            }),
            "flat" => Ok(TaxSpec::Flat {
                amount: flat_tax_amount
                    .ok_or_else(|| AppError::internal("Flat tax row missing amount"))?,
            }),
            other => Err(AppError::internal(format!(
                "Unknown tax_type in database: {}",
                other
            ))),
        }
    }
}
