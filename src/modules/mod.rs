pub mod customers;
pub mod deals;
pub mod documents;
pub mod leads;
pub mod products;
pub mod reports;
