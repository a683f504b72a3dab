use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Lost,
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadStatus::New => write!(f, "new"),
            LeadStatus::Contacted => write!(f, "contacted"),
            LeadStatus::Qualified => write!(f, "qualified"),
            LeadStatus::Lost => write!(f, "lost"),
        }
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "qualified" => Ok(LeadStatus::Qualified),
            "lost" => Ok(LeadStatus::Lost),
            _ => Err(format!("Invalid lead status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn new(owner_id: String, request: LeadPayload) -> Result<Self> {
        validate_name(&request.name)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            name: request.name,
            company: request.company,
            email: request.email,
            phone: request.phone,
            status: request.status.unwrap_or_default(),
            notes: request.notes,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, request: LeadPayload) -> Result<()> {
        validate_name(&request.name)?;

        self.name = request.name;
        self.company = request.company;
        self.email = request.email;
        self.phone = request.phone;
        if let Some(status) = request.status {
            self.status = status;
        }
        self.notes = request.notes;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Lead name cannot be empty"));
    }
    if name.len() > 255 {
        return Err(AppError::validation("Lead name cannot exceed 255 characters"));
    }
    Ok(())
}

/// Shared create/update payload
#[derive(Debug, Deserialize)]
pub struct LeadPayload {
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<LeadStatus>,
    pub notes: Option<String>,
}
