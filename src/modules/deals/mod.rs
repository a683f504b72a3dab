// Deal pipeline: kanban stage transitions over a closed stage set.

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Deal, DealStage};
pub use repositories::{DealRepository, MySqlDealRepository};
pub use services::DealService;
