mod deal_service;

pub use deal_service::DealService;
