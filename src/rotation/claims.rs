//! Proxy JWT claims, read without signature verification

use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};

use crate::error::{ProxyError, Result};

/// Claims the proxy embeds in the tokens it issues
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenClaims {
    #[serde(default)]
    pub vcluster: Option<String>,
    #[serde(default)]
    pub tenant: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Who a token was issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenIdentity {
    Tenant { name: String },
    VirtualCluster { name: String, username: String },
}

impl TokenIdentity {
    /// Tenant or vCluster name
    pub fn name(&self) -> &str {
        match self {
            TokenIdentity::Tenant { name } => name,
            TokenIdentity::VirtualCluster { name, .. } => name,
        }
    }
}

impl std::fmt::Display for TokenIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenIdentity::Tenant { name } => write!(f, "tenant {}", name),
            TokenIdentity::VirtualCluster { name, username } => {
                write!(f, "vcluster {} - {}", name, username)
            }
        }
    }
}

impl TokenClaims {
    /// Identity the token represents. vCluster claims win over tenant claims.
    pub fn identity(&self) -> Result<TokenIdentity> {
        if let Some(vcluster) = &self.vcluster {
            return Ok(TokenIdentity::VirtualCluster {
                name: vcluster.clone(),
                username: self.username.clone().unwrap_or_else(|| vcluster.clone()),
            });
        }
        if let Some(tenant) = &self.tenant {
            return Ok(TokenIdentity::Tenant {
                name: tenant.clone(),
            });
        }
        Err(ProxyError::Token(
            "token has neither a vcluster nor a tenant claim".to_string(),
        ))
    }

    /// Expiry as a UTC timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

/// Decode a JWT's claims. The header must be well formed; the signature is
/// not checked.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    jsonwebtoken::dangerous::insecure_decode::<TokenClaims>(token.trim())
        .map(|data| data.claims)
        .map_err(|e| {
            error!("Jwt token decode error: {}", e);
            ProxyError::Token(e.to_string())
        })
}

/// Build an HS256 token carrying `claims`
#[cfg(test)]
pub(crate) fn test_token(claims: serde_json::Value) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"gateway-secret")).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_tenant_token() {
        let token = test_token(json!({"tenant": "tenantA", "exp": 1700000000}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.tenant.as_deref(), Some("tenantA"));
        assert_eq!(
            claims.identity().unwrap(),
            TokenIdentity::Tenant {
                name: "tenantA".into()
            }
        );
        assert_eq!(
            claims.expires_at().unwrap().to_rfc3339(),
            "2023-11-14T22:13:20+00:00"
        );
    }

    #[test]
    fn test_decode_vcluster_token() {
        let token = test_token(json!({"vcluster": "vc1", "username": "app", "exp": 1}));
        let identity = decode_claims(&token).unwrap().identity().unwrap();
        assert_eq!(
            identity,
            TokenIdentity::VirtualCluster {
                name: "vc1".into(),
                username: "app".into()
            }
        );
        assert_eq!(identity.name(), "vc1");
        assert_eq!(identity.to_string(), "vcluster vc1 - app");
    }

    #[test]
    fn test_vcluster_username_defaults_to_vcluster() {
        let token = test_token(json!({"vcluster": "vc1"}));
        let identity = decode_claims(&token).unwrap().identity().unwrap();
        assert_eq!(
            identity,
            TokenIdentity::VirtualCluster {
                name: "vc1".into(),
                username: "vc1".into()
            }
        );
    }

    #[test]
    fn test_token_without_identity() {
        let token = test_token(json!({"sub": "someone"}));
        let err = decode_claims(&token).unwrap().identity().unwrap_err();
        assert!(matches!(err, ProxyError::Token(_)));
    }

    #[test]
    fn test_decode_rejects_non_jwt() {
        assert!(matches!(
            decode_claims("old-token"),
            Err(ProxyError::Token(_))
        ));
        assert!(matches!(
            decode_claims("a.%%%.c"),
            Err(ProxyError::Token(_))
        ));
    }

    #[test]
    fn test_decode_rejects_malformed_header() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;

        let payload = URL_SAFE_NO_PAD.encode(r#"{"tenant":"tenantA"}"#);
        let token = format!("not-a-header.{}.x", payload);
        assert!(matches!(decode_claims(&token), Err(ProxyError::Token(_))));
    }

    #[test]
    fn test_decode_ignores_signature_and_expiry() {
        let token = test_token(json!({"tenant": "t", "exp": 1}));
        let (unsigned, _) = token.rsplit_once('.').unwrap();
        let forged = format!("{}.c2lnbmF0dXJl", unsigned);
        let claims = decode_claims(&forged).unwrap();
        assert_eq!(claims.tenant.as_deref(), Some("t"));
        assert_eq!(claims.exp, Some(1));
    }
}
