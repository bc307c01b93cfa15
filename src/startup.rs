use crate::{
    configurations::Settings,
    errors::{ProbeError, SettingsError},
    features::health_check::{domain::ProbeTarget, HealthProbe, Probe},
};

pub struct Application<P = HealthProbe> {
    probe: P,
    target: ProbeTarget,
}

impl Application {
    pub fn build(config: Settings) -> Result<Self, SettingsError> {
        let target = config.probe.target()?;
        let probe = HealthProbe::new(config.probe.expected_status, config.probe.timeout())?;

        Ok(Self { probe, target })
    }
}

impl<P: Probe> Application<P> {
    pub fn with_probe(probe: P, target: ProbeTarget) -> Self {
        Self { probe, target }
    }

    pub fn target(&self) -> &ProbeTarget {
        &self.target
    }

    pub async fn run(&self) -> Result<(), ProbeError> {
        self.probe.check(&self.target).await
    }

    /// Runs the check once and maps its outcome onto a process exit status.
    pub async fn run_to_exit_code(&self) -> u8 {
        match self.run().await {
            Ok(()) => 0,
            Err(e) => {
                tracing::error!(error = ?e, "Health check failed.");
                exit_code_for(&e)
            }
        }
    }
}

pub const EXIT_UNHEALTHY: u8 = 1;
pub const EXIT_MISCONFIGURED: u8 = 2;

pub fn exit_code_for(e: &ProbeError) -> u8 {
    match e {
        ProbeError::InvalidTarget { .. }
        | ProbeError::InvalidTimeout
        | ProbeError::InvalidStatus(_)
        | ProbeError::ClientError(_) => EXIT_MISCONFIGURED,
        ProbeError::ConnectionError { .. } | ProbeError::UnexpectedStatus { .. } => {
            EXIT_UNHEALTHY
        }
    }
}
