mod lead_repository;

pub use lead_repository::LeadRepository;
