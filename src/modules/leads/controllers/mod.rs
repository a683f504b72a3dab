pub mod lead_controller;

pub use lead_controller::configure;
