pub mod configurations;
pub mod errors;
pub mod features;
pub mod startup;
pub mod telemetry;
