pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{Lead, LeadStatus};
pub use repositories::LeadRepository;
