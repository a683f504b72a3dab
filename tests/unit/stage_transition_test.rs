// Stage transition semantics, exercised against an in-memory repository.
//
// Three behaviors matter: an unknown target stage is rejected without
// touching the deal, moving onto the current stage issues no write, and a
// real move is persisted before the caller sees the new stage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use dealdesk::core::Result;
use dealdesk::modules::deals::models::{Deal, DealStage};
use dealdesk::modules::deals::repositories::DealRepository;
use dealdesk::modules::deals::services::DealService;

#[derive(Default)]
struct InMemoryDealRepository {
    deals: Mutex<HashMap<String, Deal>>,
    stage_writes: AtomicUsize,
}

impl InMemoryDealRepository {
    fn seed(&self, deal: Deal) {
        self.deals.lock().unwrap().insert(deal.id.clone(), deal);
    }

    fn stage_of(&self, id: &str) -> DealStage {
        self.deals.lock().unwrap()[id].stage
    }

    fn stage_write_count(&self) -> usize {
        self.stage_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DealRepository for InMemoryDealRepository {
    async fn create(&self, deal: &Deal) -> Result<Deal> {
        self.seed(deal.clone());
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
        self.seed(deal.clone());
        Ok(deal.clone())
    }

    async fn update_stage(&self, id: &str, _owner_id: &str, stage: DealStage) -> Result<()> {
        self.stage_writes.fetch_add(1, Ordering::SeqCst);
        if let Some(deal) = self.deals.lock().unwrap().get_mut(id) {
            deal.stage = stage;
        }
        Ok(())
    }

    async fn delete(&self, id: &str, _owner_id: &str) -> Result<()> {
        self.deals.lock().unwrap().remove(id);
        Ok(())
    }
}

fn deal(stage: DealStage) -> Deal {
    Deal::new(
        "owner-1".to_string(),
        "Office fit-out".to_string(),
        None,
        Decimal::from(25_000),
        stage,
    )
    .unwrap()
}

fn service(repo: Arc<InMemoryDealRepository>) -> DealService {
    DealService::new(repo)
}

#[tokio::test]
async fn unknown_stage_is_rejected_and_deal_untouched() {
    let repo = Arc::new(InMemoryDealRepository::default());
    let d = deal(DealStage::Enquiry);
    let id = d.id.clone();
    repo.seed(d);

    let svc = service(repo.clone());
    let result = svc.move_stage(&id, "archived", "owner-1").await;

    assert!(result.is_err());
    assert_eq!(repo.stage_of(&id), DealStage::Enquiry);
    assert_eq!(repo.stage_write_count(), 0);
}

#[tokio::test]
async fn same_stage_move_issues_no_write() {
    let repo = Arc::new(InMemoryDealRepository::default());
    let d = deal(DealStage::Proposal);
    let id = d.id.clone();
    repo.seed(d);

    let svc = service(repo.clone());
    let response = svc.move_stage(&id, "proposal", "owner-1").await.unwrap();

    assert_eq!(response.stage, DealStage::Proposal);
    assert_eq!(repo.stage_write_count(), 0);
}

#[tokio::test]
async fn valid_move_persists_before_returning() {
    let repo = Arc::new(InMemoryDealRepository::default());
    let d = deal(DealStage::Proposal);
    let id = d.id.clone();
    repo.seed(d);

    let svc = service(repo.clone());
    let response = svc.move_stage(&id, "negotiation", "owner-1").await.unwrap();

    assert_eq!(response.stage, DealStage::Negotiation);
    assert_eq!(repo.stage_of(&id), DealStage::Negotiation);
    assert_eq!(repo.stage_write_count(), 1);
}

#[tokio::test]
async fn move_on_missing_deal_is_not_found() {
    let repo = Arc::new(InMemoryDealRepository::default());
    let svc = service(repo.clone());

    let result = svc.move_stage("nope", "proposal", "owner-1").await;

    assert!(result.is_err());
    assert_eq!(repo.stage_write_count(), 0);
}

#[tokio::test]
async fn move_is_scoped_to_owner() {
    let repo = Arc::new(InMemoryDealRepository::default());
    let d = deal(DealStage::Enquiry);
    let id = d.id.clone();
    repo.seed(d);

    let svc = service(repo.clone());
    let result = svc.move_stage(&id, "proposal", "owner-2").await;

    assert!(result.is_err());
    assert_eq!(repo.stage_of(&id), DealStage::Enquiry);
}

#[tokio::test]
async fn closed_stages_are_reachable_and_reopenable() {
    let repo = Arc::new(InMemoryDealRepository::default());
    let d = deal(DealStage::Negotiation);
    let id = d.id.clone();
    repo.seed(d);

    let svc = service(repo.clone());
    svc.move_stage(&id, "closed_won", "owner-1").await.unwrap();
    assert_eq!(repo.stage_of(&id), DealStage::ClosedWon);

    // No one-way door: a closed deal may move back into the pipeline
    svc.move_stage(&id, "enquiry", "owner-1").await.unwrap();
    assert_eq!(repo.stage_of(&id), DealStage::Enquiry);
    assert_eq!(repo.stage_write_count(), 2);
}
