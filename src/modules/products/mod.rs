pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::Product;
pub use repositories::ProductRepository;
