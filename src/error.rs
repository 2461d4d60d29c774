use std::fmt;

use serde_json::Value;

/// Custom error type for proxy API and rotation operations
#[derive(Debug)]
pub enum ProxyError {
    /// HTTP request failed before a response was received
    Http(reqwest::Error),
    /// 401 returned by the admin API
    Unauthorized { status: u16, details: Value },
    /// 403 returned by the admin API
    Forbidden { status: u16, details: Value },
    /// 404 returned by the admin API
    NotFound { status: u16, details: Value },
    /// 409 returned by the admin API
    Conflict { status: u16, details: Value },
    /// Any other non-success status returned by the admin API
    Api { status: u16, details: Value },
    /// Secret (or the requested version/stage of it) does not exist
    SecretNotFound(String),
    /// A secret version with the given request token already exists
    SecretVersionExists(String),
    /// Any other secret store failure
    SecretStore(String),
    /// JWT could not be decoded into usable claims
    Token(String),
    /// Admin credentials could not be resolved from the secret payload
    Credentials(String),
    /// JSON parsing error
    Json(String),
    /// YAML parsing error
    Yaml(String),
    /// Configuration error
    Config(String),
    /// Rotation step name is not one of the four known steps
    InvalidStep(String),
    /// The token function failed or answered without a token
    TokenFunction(String),
}

impl ProxyError {
    /// Map a non-success HTTP status and its body to the matching error variant
    pub fn from_status(status: u16, details: Value) -> Self {
        match status {
            401 => ProxyError::Unauthorized { status, details },
            403 => ProxyError::Forbidden { status, details },
            404 => ProxyError::NotFound { status, details },
            409 => ProxyError::Conflict { status, details },
            _ => ProxyError::Api { status, details },
        }
    }

    /// HTTP status carried by API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ProxyError::Unauthorized { status, .. }
            | ProxyError::Forbidden { status, .. }
            | ProxyError::NotFound { status, .. }
            | ProxyError::Conflict { status, .. }
            | ProxyError::Api { status, .. } => Some(*status),
            ProxyError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response body carried by API errors
    pub fn details(&self) -> Option<&Value> {
        match self {
            ProxyError::Unauthorized { details, .. }
            | ProxyError::Forbidden { details, .. }
            | ProxyError::NotFound { details, .. }
            | ProxyError::Conflict { details, .. }
            | ProxyError::Api { details, .. } => Some(details),
            _ => None,
        }
    }
}

/// Prefer the API's own `detail` message, fall back to a generic one
fn detail_or<'a>(details: &'a Value, fallback: &'a str) -> &'a str {
    details
        .get("detail")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::Http(e) => write!(f, "HTTP request failed: {}", e),
            ProxyError::Unauthorized { status, details } => write!(
                f,
                "{} (status {})",
                detail_or(details, "Access unauthorized"),
                status
            ),
            ProxyError::Forbidden { status, details } => {
                write!(f, "{} (status {})", detail_or(details, "Forbidden"), status)
            }
            ProxyError::NotFound { status, details } => write!(
                f,
                "{} (status {})",
                detail_or(details, "Resource not found"),
                status
            ),
            ProxyError::Conflict { status, details } => write!(
                f,
                "{} (status {})",
                detail_or(details, "Resources conflict"),
                status
            ),
            ProxyError::Api { status, details } => write!(
                f,
                "API error (status {}): {}",
                status,
                detail_or(details, "Something was wrong with the client request")
            ),
            ProxyError::SecretNotFound(msg) => write!(f, "Secret not found: {}", msg),
            ProxyError::SecretVersionExists(msg) => {
                write!(f, "Secret version already exists: {}", msg)
            }
            ProxyError::SecretStore(msg) => write!(f, "Secret store error: {}", msg),
            ProxyError::Token(msg) => write!(f, "Token error: {}", msg),
            ProxyError::Credentials(msg) => write!(f, "{}", msg),
            ProxyError::Json(msg) => write!(f, "JSON error: {}", msg),
            ProxyError::Yaml(msg) => write!(f, "YAML error: {}", msg),
            ProxyError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ProxyError::InvalidStep(step) => write!(f, "Invalid step parameter: {}", step),
            ProxyError::TokenFunction(msg) => write!(f, "Token function error: {}", msg),
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Http(err)
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        ProxyError::Json(err.to_string())
    }
}

impl From<serde_yml::Error> for ProxyError {
    fn from(err: serde_yml::Error) -> Self {
        ProxyError::Yaml(err.to_string())
    }
}

impl From<std::io::Error> for ProxyError {
    fn from(err: std::io::Error) -> Self {
        ProxyError::Config(err.to_string())
    }
}

/// Result type alias for proxy operations
pub type Result<T> = std::result::Result<T, ProxyError>;
