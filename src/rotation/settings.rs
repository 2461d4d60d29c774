use crate::config::{api, rotation};
use crate::proxy::ApiEndpoint;

/// Inputs of a rotation run
///
/// Tokens come from the proxy at `endpoint`, or from `token_function_arn`
/// when one is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSettings {
    pub endpoint: Option<ApiEndpoint>,
    pub token_function_arn: Option<String>,
    pub admin_secret_id: String,
    pub admin_secret_role: Option<String>,
    pub token_lifetime_secs: u64,
    pub api_version: String,
    pub ignore_ssl_errors: bool,
}

impl RotationSettings {
    pub fn new(endpoint: impl Into<Option<ApiEndpoint>>, admin_secret_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token_function_arn: None,
            admin_secret_id: admin_secret_id.into(),
            admin_secret_role: None,
            token_lifetime_secs: rotation::DEFAULT_TOKEN_LIFETIME_SECS,
            api_version: api::DEFAULT_VERSION.to_string(),
            ignore_ssl_errors: false,
        }
    }

    pub fn with_token_function(mut self, function_arn: Option<String>) -> Self {
        self.token_function_arn = function_arn.filter(|f| !f.is_empty());
        self
    }

    pub fn with_admin_secret_role(mut self, role_arn: Option<String>) -> Self {
        self.admin_secret_role = role_arn.filter(|r| !r.is_empty());
        self
    }

    pub fn with_token_lifetime(mut self, seconds: u64) -> Self {
        self.token_lifetime_secs = seconds;
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_ignore_ssl_errors(mut self, ignore: bool) -> Self {
        self.ignore_ssl_errors = ignore;
        self
    }
}
