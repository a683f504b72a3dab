use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::deals::models::{
    CreateDealRequest, Deal, DealResponse, DealStage, UpdateDealRequest,
};
use crate::modules::deals::repositories::DealRepository;

/// Deal pipeline business logic.
pub struct DealService {
    deal_repo: Arc<dyn DealRepository>,
}

impl DealService {
    pub fn new(deal_repo: Arc<dyn DealRepository>) -> Self {
        Self { deal_repo }
    }

    pub async fn create_deal(
        &self,
        request: CreateDealRequest,
        owner_id: &str,
    ) -> Result<DealResponse> {
        let deal = Deal::new(
            owner_id.to_string(),
            request.title,
            request.customer_id,
            request.value,
            request.stage.unwrap_or(DealStage::Enquiry),
        )?;

        let created = self.deal_repo.create(&deal).await?;
        info!(deal_id = %created.id, stage = %created.stage, "Deal created");

        Ok(created.into())
    }

    pub async fn get_deal(&self, id: &str, owner_id: &str) -> Result<DealResponse> {
        let deal = self
            .deal_repo
            .find_by_id(id, owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("Deal not found"))?;

        Ok(deal.into())
    }

    pub async fn list_deals(
        &self,
        owner_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DealResponse>> {
        let deals = self.deal_repo.list(owner_id, limit, offset).await?;
        Ok(deals.into_iter().map(Into::into).collect())
    }

    pub async fn update_deal(
        &self,
        id: &str,
        request: UpdateDealRequest,
        owner_id: &str,
    ) -> Result<DealResponse> {
        let mut deal = self
            .deal_repo
            .find_by_id(id, owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("Deal not found"))?;

        // Re-run the constructor validation against the new values
        let validated = Deal::new(
            deal.owner_id.clone(),
            request.title,
            request.customer_id,
            request.value,
            deal.stage,
        )?;

        deal.title = validated.title;
        deal.customer_id = validated.customer_id;
        deal.value = validated.value;
        deal.updated_at = Utc::now();

        let updated = self.deal_repo.update(&deal).await?;
        Ok(updated.into())
    }

    /// Move a deal to another pipeline stage.
    ///
    /// - An unrecognized target identifier is rejected; the deal is untouched.
    /// - Moving onto the current stage is a no-op and issues no write.
    /// - Otherwise the change is persisted first and the updated deal is
    ///   returned; the caller only ever observes confirmed state.
    pub async fn move_stage(
        &self,
        id: &str,
        target: &str,
        owner_id: &str,
    ) -> Result<DealResponse> {
        let target_stage =
            DealStage::from_str(target).map_err(AppError::Validation)?;

        let mut deal = self
            .deal_repo
            .find_by_id(id, owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("Deal not found"))?;

        if deal.stage == target_stage {
            // Dropping a card onto its own column: nothing to persist
            return Ok(deal.into());
        }

        self.deal_repo
            .update_stage(id, owner_id, target_stage)
            .await?;

        info!(
            deal_id = %id,
            from = %deal.stage,
            to = %target_stage,
            "Deal stage moved"
        );

        deal.stage = target_stage;
        deal.updated_at = Utc::now();
        Ok(deal.into())
    }

    pub async fn delete_deal(&self, id: &str, owner_id: &str) -> Result<()> {
        self.deal_repo.delete(id, owner_id).await?;
        info!(deal_id = %id, "Deal deleted");
        Ok(())
    }
}
