/// Configuration constants for the proxy admin API
pub mod api {
    /// Token issuance endpoints
    pub const ADMIN_AUTH: &str = "admin/auth";

    /// Tenants (multitenancy) endpoints
    pub const MULTITENANCY: &str = "admin/multitenancy";

    /// Virtual clusters endpoints
    pub const VCLUSTERS: &str = "admin/vclusters";

    /// API version used when none is configured
    pub const DEFAULT_VERSION: &str = "v1";

    /// Status codes treated as success
    pub const SUCCESS_CODES: &[u16] = &[200, 201, 202, 204];

    /// Connect timeout (seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Request timeout (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Secret rotation constants
pub mod rotation {
    /// Stage of the live secret version
    pub const STAGE_CURRENT: &str = "AWSCURRENT";

    /// Stage of the version being rotated in
    pub const STAGE_PENDING: &str = "AWSPENDING";

    /// Stage given to the version that lost AWSCURRENT
    pub const STAGE_PREVIOUS: &str = "AWSPREVIOUS";

    /// Field holding the principal in structured records
    pub const USERNAME_FIELD: &str = "SASL_USERNAME";

    /// Field holding the JWT in structured records
    pub const PASSWORD_FIELD: &str = "SASL_PASSWORD";

    /// Lifetime of tokens minted during rotation (seconds)
    pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3660;

    /// Session name used when assuming the admin secret role
    pub const ROLE_SESSION_NAME: &str = "cdkproxy-rotation";
}

/// Environment variable names
pub mod env {
    pub const API_ENDPOINT: &str = "CDK_API_ENDPOINT";
    pub const API_USERNAME: &str = "CDK_API_USERNAME";
    pub const API_PASSWORD: &str = "CDK_API_PASSWORD";
    pub const API_VERSION: &str = "CDK_API_VERSION";
    pub const ADMIN_SECRET_ARN: &str = "CDK_API_SECRET_ARN";
    pub const ADMIN_SECRET_ROLE_ARN: &str = "CDK_API_SECRET_ARN_ROLE";
    pub const TOKEN_LIFETIME: &str = "NEW_TOKEN_LIFETIME_IN_SECONDS";
    pub const TOKEN_FUNCTION: &str = "GW_ROTATION_MANAGER_FUNCTION_ARN";
}

/// Default values for CLI
pub mod defaults {
    /// Default log level
    pub const LOG_LEVEL: &str = "warn";

    /// Tenant token lifetime when none is requested (seconds)
    pub const TENANT_TOKEN_LIFETIME_SECS: u64 = 900;

    /// vCluster token lifetime when none is requested (seconds)
    pub const VCLUSTER_TOKEN_LIFETIME_SECS: u64 = 86400;

    /// Lifetime of tokens created from the command line (seconds)
    pub const CLI_TOKEN_LIFETIME_SECS: u64 = 86400;

    /// Event source meaning standard input
    pub const STDIN: &str = "-";
}
