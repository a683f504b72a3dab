use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::money::{validate_minor_unit, validate_non_negative};
use crate::core::{AppError, Result};

/// Pipeline stage. A closed set: a transition request naming anything else
/// is rejected before any state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    Enquiry,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl DealStage {
    /// All stages in pipeline order, for aggregation and display.
    pub const ALL: [DealStage; 5] = [
        DealStage::Enquiry,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::ClosedWon,
        DealStage::ClosedLost,
    ];

    /// Whether the deal still counts toward the open pipeline value.
    pub fn is_open(&self) -> bool {
        !matches!(self, DealStage::ClosedWon | DealStage::ClosedLost)
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealStage::Enquiry => write!(f, "enquiry"),
            DealStage::Proposal => write!(f, "proposal"),
            DealStage::Negotiation => write!(f, "negotiation"),
            DealStage::ClosedWon => write!(f, "closed_won"),
            DealStage::ClosedLost => write!(f, "closed_lost"),
        }
    }
}

impl std::str::FromStr for DealStage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "enquiry" => Ok(DealStage::Enquiry),
            "proposal" => Ok(DealStage::Proposal),
            "negotiation" => Ok(DealStage::Negotiation),
            "closed_won" => Ok(DealStage::ClosedWon),
            "closed_lost" => Ok(DealStage::ClosedLost),
            _ => Err(format!("Unknown deal stage: {}", s)),
        }
    }
}

/// A deal in the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub customer_id: Option<String>,
    pub value: Decimal,
    pub stage: DealStage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    pub fn new(
        owner_id: String,
        title: String,
        customer_id: Option<String>,
        value: Decimal,
        stage: DealStage,
    ) -> Result<Self> {
        Self::validate_title(&title)?;
        validate_non_negative("deal value", value)?;
        validate_minor_unit("deal value", value)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            title,
            customer_id,
            value,
            stage,
            created_at: now,
            updated_at: now,
        })
    }

    fn validate_title(title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(AppError::validation("Deal title cannot be empty"));
        }
        if title.len() > 255 {
            return Err(AppError::validation("Deal title cannot exceed 255 characters"));
        }
        Ok(())
    }
}

// DTOs

#[derive(Debug, Deserialize)]
pub struct CreateDealRequest {
    pub title: String,
    pub customer_id: Option<String>,
    #[serde(default)]
    pub value: Decimal,
    pub stage: Option<DealStage>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDealRequest {
    pub title: String,
    pub customer_id: Option<String>,
    pub value: Decimal,
}

/// Stage carried as a raw string so an unrecognized identifier becomes a
/// typed validation error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct MoveStageRequest {
    pub stage: String,
}

#[derive(Debug, Serialize)]
pub struct DealResponse {
    pub id: String,
    pub title: String,
    pub customer_id: Option<String>,
    pub value: String,
    pub stage: DealStage,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Deal> for DealResponse {
    fn from(deal: Deal) -> Self {
        DealResponse {
            id: deal.id,
            title: deal.title,
            customer_id: deal.customer_id,
            value: deal.value.to_string(),
            stage: deal.stage,
            created_at: deal.created_at.to_rfc3339(),
            updated_at: deal.updated_at.to_rfc3339(),
        }
    }
}
