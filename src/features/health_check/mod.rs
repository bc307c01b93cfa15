pub mod domain;
pub mod models;
pub mod probe;

pub use probe::{check, HealthProbe, Probe};
