// Deal CRUD behavior against an in-memory repository.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use dealdesk::core::{AppError, Result};
use dealdesk::modules::deals::models::{CreateDealRequest, Deal, DealStage, UpdateDealRequest};
use dealdesk::modules::deals::repositories::DealRepository;
use dealdesk::modules::deals::services::DealService;

#[derive(Default)]
struct InMemoryDealRepository {
    deals: Mutex<HashMap<String, Deal>>,
}

#[async_trait]
impl DealRepository for InMemoryDealRepository {
    async fn create(&self, deal: &Deal) -> Result<Deal> {
        self.deals
            .lock()
            .unwrap()
            .insert(deal.id.clone(), deal.clone());
        Ok(deal.clone())
    }

    async fn find_by_id(&self, id: &str, owner_id: &str) -> Result<Option<Deal>> {
        Ok(self
            .deals
            .lock()
            .unwrap()
            .get(id)
            .filter(|deal| deal.owner_id == owner_id)
            .cloned())
    }

    async fn list(&self, owner_id: &str, _limit: i64, _offset: i64) -> Result<Vec<Deal>> {
        Ok(self
            .deals
            .lock()
            .unwrap()
            .values()
            .filter(|deal| deal.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn update(&self, deal: &Deal) -> Result<Deal> {
        self.deals
            .lock()
            .unwrap()
            .insert(deal.id.clone(), deal.clone());
        Ok(deal.clone())
    }

    async fn update_stage(&self, id: &str, _owner_id: &str, stage: DealStage) -> Result<()> {
        if let Some(deal) = self.deals.lock().unwrap().get_mut(id) {
            deal.stage = stage;
        }
        Ok(())
    }

    async fn delete(&self, id: &str, owner_id: &str) -> Result<()> {
        let mut deals = self.deals.lock().unwrap();
        match deals.get(id) {
            Some(deal) if deal.owner_id == owner_id => {
                deals.remove(id);
                Ok(())
            }
            _ => Err(AppError::not_found("Deal not found")),
        }
    }
}

fn service() -> DealService {
    DealService::new(Arc::new(InMemoryDealRepository::default()))
}

fn create_request(title: &str, value: Decimal) -> CreateDealRequest {
    CreateDealRequest {
        title: title.to_string(),
        customer_id: None,
        value,
        stage: None,
    }
}

#[tokio::test]
async fn create_defaults_to_enquiry_stage() {
    let svc = service();

    let response = svc
        .create_deal(create_request("Office fit-out", dec!(25000)), "owner-1")
        .await
        .unwrap();

    assert_eq!(response.stage, DealStage::Enquiry);
    assert_eq!(response.value, "25000");
}

#[tokio::test]
async fn create_honors_explicit_stage() {
    let svc = service();

    let mut request = create_request("Warehouse upgrade", dec!(80000));
    request.stage = Some(DealStage::Negotiation);

    let response = svc.create_deal(request, "owner-1").await.unwrap();

    assert_eq!(response.stage, DealStage::Negotiation);
}

#[tokio::test]
async fn create_rejects_negative_value() {
    let svc = service();

    let result = svc
        .create_deal(create_request("Bad deal", dec!(-100)), "owner-1")
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn create_rejects_blank_title() {
    let svc = service();

    let result = svc
        .create_deal(create_request("   ", Decimal::ZERO), "owner-1")
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn update_preserves_stage() {
    let svc = service();

    let created = svc
        .create_deal(create_request("Office fit-out", dec!(25000)), "owner-1")
        .await
        .unwrap();
    svc.move_stage(&created.id, "proposal", "owner-1")
        .await
        .unwrap();

    let updated = svc
        .update_deal(
            &created.id,
            UpdateDealRequest {
                title: "Office fit-out, phase 2".to_string(),
                customer_id: None,
                value: dec!(32000),
            },
            "owner-1",
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Office fit-out, phase 2");
    assert_eq!(updated.value, "32000");
    assert_eq!(updated.stage, DealStage::Proposal);
}

#[tokio::test]
async fn update_validates_new_values() {
    let svc = service();

    let created = svc
        .create_deal(create_request("Office fit-out", dec!(25000)), "owner-1")
        .await
        .unwrap();

    let result = svc
        .update_deal(
            &created.id,
            UpdateDealRequest {
                title: "".to_string(),
                customer_id: None,
                value: dec!(25000),
            },
            "owner-1",
        )
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn list_is_scoped_to_owner() {
    let svc = service();

    svc.create_deal(create_request("Deal A", dec!(100)), "owner-1")
        .await
        .unwrap();
    svc.create_deal(create_request("Deal B", dec!(200)), "owner-2")
        .await
        .unwrap();

    let deals = svc.list_deals("owner-1", 50, 0).await.unwrap();

    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0].title, "Deal A");
}

#[tokio::test]
async fn delete_removes_only_own_deal() {
    let svc = service();

    let created = svc
        .create_deal(create_request("Deal A", dec!(100)), "owner-1")
        .await
        .unwrap();

    assert!(svc.delete_deal(&created.id, "owner-2").await.is_err());
    assert!(svc.delete_deal(&created.id, "owner-1").await.is_ok());
    assert!(svc.get_deal(&created.id, "owner-1").await.is_err());
}
