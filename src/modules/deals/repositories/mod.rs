mod deal_repository;

pub use deal_repository::{DealRepository, MySqlDealRepository};
