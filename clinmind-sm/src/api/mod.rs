//! HTTP API handlers

mod analyze;
mod health;
mod measurements;

pub use analyze::analyze_image;
pub use health::{health_check, health_routes};
pub use measurements::{create_measurement, delete_measurement, list_measurements};
