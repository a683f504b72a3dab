use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// GST registration number printed on tax documents
    pub gstin: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(owner_id: String, request: CustomerPayload) -> Result<Self> {
        validate_name(&request.name)?;
        validate_gstin(request.gstin.as_deref())?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            name: request.name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            gstin: request.gstin,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, request: CustomerPayload) -> Result<()> {
        validate_name(&request.name)?;
        validate_gstin(request.gstin.as_deref())?;

        self.name = request.name;
        self.email = request.email;
        self.phone = request.phone;
        self.address = request.address;
        self.gstin = request.gstin;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Customer name cannot be empty"));
    }
    if name.len() > 255 {
        return Err(AppError::validation(
            "Customer name cannot exceed 255 characters",
        ));
    }
    Ok(())
}

fn validate_gstin(gstin: Option<&str>) -> Result<()> {
    if let Some(gstin) = gstin {
        // GSTIN is a fixed 15-character identifier
        if gstin.len() != 15 {
            return Err(AppError::validation("GSTIN must be 15 characters"));
        }
    }
    Ok(())
}

/// Shared create/update payload
#[derive(Debug, Deserialize)]
pub struct CustomerPayload {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
}
