//! DealDesk Sales Operations Library
//!
//! This library provides the core functionality for the DealDesk sales and
//! invoicing system.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::customers;
pub use modules::deals;
pub use modules::documents;
pub use modules::leads;
pub use modules::products;
pub use modules::reports;
