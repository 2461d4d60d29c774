//! Admin API endpoint assembly from a URL or hostname/port/protocol parts

use log::warn;

use crate::error::{ProxyError, Result};

/// Scheme used to reach the admin API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    /// Port implied by the scheme
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl std::str::FromStr for Protocol {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "http" | "HTTP" => Ok(Protocol::Http),
            "https" | "HTTPS" => Ok(Protocol::Https),
            other => Err(ProxyError::Config(format!(
                "protocol must be one of [http, https, HTTP, HTTPS], got '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Http => write!(f, "http"),
            Protocol::Https => write!(f, "https"),
        }
    }
}

/// Base URL of the proxy admin API, without trailing slash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    url: String,
}

impl ApiEndpoint {
    /// Build from a full URL. URLs without a scheme default to http.
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(ProxyError::Config("Unable to form a URL: empty value".into()));
        }

        let lower = url.to_ascii_lowercase();
        let url = if lower.starts_with("https://") || lower.starts_with("http://") {
            url.to_string()
        } else {
            warn!(
                "URL does not contain a protocol. Using default {}",
                Protocol::default()
            );
            format!("{}://{}", Protocol::default(), url)
        };

        Ok(Self { url })
    }

    /// Build from hostname, optional port and optional protocol.
    ///
    /// The port is omitted from the URL when it is the scheme's default.
    pub fn from_parts(hostname: &str, port: Option<u16>, protocol: Option<&str>) -> Result<Self> {
        if hostname.is_empty() {
            return Err(ProxyError::Config(
                "Unable to form a URL: no hostname".into(),
            ));
        }
        let protocol: Protocol = match protocol {
            Some(p) => p.parse()?,
            None => Protocol::default(),
        };
        let port = port.unwrap_or_else(|| protocol.default_port());

        let url = if port == protocol.default_port() {
            format!("{}://{}", protocol, hostname)
        } else {
            format!("{}://{}:{}", protocol, hostname, port)
        };
        Ok(Self { url })
    }

    /// Base URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Join an API path onto the base URL
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.url, path)
        } else {
            format!("{}/{}", self.url, path)
        }
    }
}

impl std::fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
