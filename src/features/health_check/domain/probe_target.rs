use std::fmt;

use reqwest::Url;

use crate::errors::ProbeError;

/// Health endpoint a probe is sent to. Only `http` and `https` URLs with a host are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget(Url);

impl ProbeTarget {
    pub fn parse(s: &str) -> Result<Self, ProbeError> {
        let invalid = |reason: String| ProbeError::InvalidTarget {
            url: s.to_string(),
            reason,
        };

        let url = Url::parse(s.trim()).map_err(|e| invalid(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".into()));
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl TryFrom<&str> for ProbeTarget {
    type Error = ProbeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ProbeTarget {
    type Error = ProbeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl AsRef<str> for ProbeTarget {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
