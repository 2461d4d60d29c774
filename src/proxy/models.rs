//! Admin API payloads

use serde::{Deserialize, Serialize};

/// Body of token creation requests
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    #[serde(rename = "lifeTimeSeconds")]
    pub life_time_seconds: u64,
}

/// Token returned by the admin API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    pub token: String,
}
