use std::fmt;

use reqwest::StatusCode;
use validator::ValidationErrors;

#[derive(thiserror::Error)]
pub enum ProbeError {
    #[error("Invalid probe target `{url}`: {reason}")]
    InvalidTarget { url: String, reason: String },
    #[error("Probe timeout must be positive.")]
    InvalidTimeout,
    #[error("{0} is not a valid HTTP status code.")]
    InvalidStatus(u16),
    #[error("Failed to build the HTTP client.")]
    ClientError(#[source] reqwest::Error),
    #[error("Failed to reach {target} ({kind}).")]
    ConnectionError {
        target: String,
        kind: ConnectionKind,
        #[source]
        source: reqwest::Error,
    },
    #[error("Unexpected status {actual}, expected {expected}{}", details_suffix(.details))]
    UnexpectedStatus {
        actual: StatusCode,
        expected: StatusCode,
        details: Option<String>,
    },
}

fn details_suffix(details: &Option<String>) -> String {
    match details {
        Some(d) => format!(": {}", d),
        None => String::new(),
    }
}

impl fmt::Debug for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    Timeout,
    Connect,
    Request,
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ConnectionKind::Timeout => "timed out",
            ConnectionKind::Connect => "connection failed",
            ConnectionKind::Request => "request failed",
        };
        write!(f, "{}", kind)
    }
}

impl From<&reqwest::Error> for ConnectionKind {
    fn from(e: &reqwest::Error) -> Self {
        // a connect timeout reports both, timeout wins
        if e.is_timeout() {
            ConnectionKind::Timeout
        } else if e.is_connect() {
            ConnectionKind::Connect
        } else {
            ConnectionKind::Request
        }
    }
}

impl ProbeError {
    pub fn connection(target: &str, source: reqwest::Error) -> Self {
        ProbeError::ConnectionError {
            target: target.to_string(),
            kind: ConnectionKind::from(&source),
            source,
        }
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, ProbeError::ConnectionError { .. })
    }
}

#[derive(thiserror::Error)]
pub enum SettingsError {
    #[error("{0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("{0}")]
    ValidationError(#[from] ValidationErrors),
    #[error("{0}")]
    TargetError(#[from] ProbeError),
}

impl fmt::Debug for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        error_chain_fmt(self, f)
    }
}

fn error_chain_fmt(e: &impl std::error::Error, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
