mod lead;

pub use lead::{Lead, LeadPayload, LeadStatus};
