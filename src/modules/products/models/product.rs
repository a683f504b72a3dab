use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::money::{validate_minor_unit, validate_non_negative};
use crate::core::{AppError, Result};

/// Price-book entry. Products seed line-item prices when the user picks one
/// in the editor; saved documents keep their own snapshot, so editing a
/// product price never rewrites existing documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub unit_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(owner_id: String, request: ProductPayload) -> Result<Self> {
        validate_name(&request.name)?;
        validate_price(request.unit_price)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            name: request.name,
            description: request.description,
            sku: request.sku,
            unit_price: request.unit_price,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, request: ProductPayload) -> Result<()> {
        validate_name(&request.name)?;
        validate_price(request.unit_price)?;

        self.name = request.name;
        self.description = request.description;
        self.sku = request.sku;
        self.unit_price = request.unit_price;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Product name cannot be empty"));
    }
    if name.len() > 255 {
        return Err(AppError::validation(
            "Product name cannot exceed 255 characters",
        ));
    }
    Ok(())
}

fn validate_price(unit_price: Decimal) -> Result<()> {
    validate_non_negative("unit price", unit_price)?;
    validate_minor_unit("unit price", unit_price)
}

/// Shared create/update payload
#[derive(Debug, Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub unit_price: Decimal,
}
