use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    errors::{ProbeError, SettingsError},
    features::health_check::domain::ProbeTarget,
};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub probe: ProbeSettings,
}

#[derive(Deserialize, Clone, Debug, Validate)]
pub struct ProbeSettings {
    pub scheme: String,
    #[validate(length(min = 1), custom(function = "parse_host"))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(custom(function = "parse_path"))]
    pub path: String,
    #[validate(range(min = 100, max = 599))]
    pub expected_status: u16,
    #[validate(range(min = 1))]
    pub timeout_milliseconds: u64,
}

fn parse_host(v: &str) -> Result<(), ValidationError> {
    // anything here would move the rest of the URL out of the authority
    if v.chars().any(|c| c.is_whitespace() || "/?#@\\".contains(c)) {
        return Err(ValidationError::new("invalid_host")
            .with_message(std::borrow::Cow::Borrowed("Host must be a bare host name or address")));
    }

    Ok(())
}

fn parse_path(v: &str) -> Result<(), ValidationError> {
    if !v.starts_with('/') {
        return Err(ValidationError::new("invalid_path")
            .with_message(std::borrow::Cow::Borrowed("Path must start with `/`")));
    }

    Ok(())
}

impl ProbeSettings {
    pub fn target(&self) -> Result<ProbeTarget, SettingsError> {
        self.validate()?;

        let invalid = |reason: &str| ProbeError::InvalidTarget {
            url: format!("{}://{}:{}{}", self.scheme, self.host, self.port, self.path),
            reason: reason.to_string(),
        };

        let mut url = Url::parse(&format!("{}://placeholder", self.scheme))
            .map_err(|e| invalid(&e.to_string()))?;
        url.set_host(Some(&self.host))
            .map_err(|e| invalid(&e.to_string()))?;
        url.set_port(Some(self.port))
            .map_err(|_| invalid("port cannot be set"))?;
        url.set_path(&self.path);

        Ok(ProbeTarget::parse(url.as_str())?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!("{} is not a valid environment.", other)),
        }
    }
}

pub fn get_config() -> Result<Settings, SettingsError> {
    let base_dir = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let config_dir = base_dir.join("configurations");

    let env: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or("local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    let env_file = format!("{}.yaml", env.as_str());

    let config = config::Config::builder()
        .set_default("probe.scheme", "http")?
        .set_default("probe.host", "127.0.0.1")?
        .set_default("probe.port", 8080)?
        .set_default("probe.path", "/api/status/health")?
        .set_default("probe.expected_status", 200)?
        .set_default("probe.timeout_milliseconds", 5000)?
        .add_source(config::File::from(config_dir.join("base.yaml")).required(false))
        .add_source(config::File::from(config_dir.join(env_file)).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings: Settings = config.try_deserialize()?;
    settings.probe.validate()?;

    Ok(settings)
}
