use serde::Deserialize;

/// Body served by the status endpoint alongside its status code.
#[derive(Deserialize, Debug)]
pub struct HealthReport {
    pub healthy: bool,
    pub details: Option<String>,
}
