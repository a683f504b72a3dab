pub mod deal_controller;

pub use deal_controller::configure;
