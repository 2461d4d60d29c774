//! Admin credentials for the proxy API, resolved from a secret

use log::{debug, error, info};
use serde::Deserialize;
use serde_json::Value;

use crate::config::env;
use crate::error::{ProxyError, Result};
use crate::secrets::SecretStore;

/// Basic-auth identity used against the admin API
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Whether the admin secret must be read through an assumed role.
/// Plain secret names never use the role.
pub fn needs_assumed_role(secret_id: &str, role_arn: Option<&str>) -> bool {
    role_arn.is_some_and(|r| !r.is_empty()) && secret_id.starts_with("arn:aws")
}

/// Reads the admin credentials secret and picks the admin identity out of it
pub struct AdminCredentialResolver<'a> {
    store: &'a dyn SecretStore,
}

impl<'a> AdminCredentialResolver<'a> {
    pub fn new(store: &'a dyn SecretStore) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, secret_id: &str) -> Result<AdminCredentials> {
        if secret_id.is_empty() {
            return Err(ProxyError::Config(format!(
                "{} must be set.",
                env::ADMIN_SECRET_ARN
            )));
        }

        let value = self
            .store
            .get_secret_value(secret_id, None, None)
            .await
            .map_err(|e| {
                error!("Failed to retrieve the SecretString for {}: {}", secret_id, e);
                e
            })?;

        let credentials = parse_admin_credentials(&value.secret_string, secret_id)?;
        info!("Successfully retrieved proxy admin credentials");
        Ok(credentials)
    }
}

/// Decode an admin secret payload (YAML, then JSON, then plain string) and
/// return the admin entry.
///
/// A list yields its first entry with a truthy `admin` key. A single mapping
/// is accepted when flagged `admin` or when it carries username and password.
pub fn parse_admin_credentials(payload: &str, secret_id: &str) -> Result<AdminCredentials> {
    let decoded = decode_payload(payload);

    let entry = match &decoded {
        Value::Array(entries) => entries.iter().find(|entry| is_admin(entry)),
        Value::Object(fields) => {
            let standalone = fields.contains_key("username") && fields.contains_key("password");
            (is_admin(&decoded) || standalone).then_some(&decoded)
        }
        _ => {
            return Err(ProxyError::Credentials(format!(
                "The secret format of {} is not valid. Expected a list or a mapping",
                secret_id
            )))
        }
    };

    let entry = entry.ok_or_else(|| {
        ProxyError::Credentials(format!("No admin user found in {}", secret_id))
    })?;

    serde_json::from_value(entry.clone()).map_err(|e| {
        ProxyError::Credentials(format!(
            "Admin entry in {} has no usable username/password: {}",
            secret_id, e
        ))
    })
}

fn decode_payload(payload: &str) -> Value {
    match serde_yml::from_str::<Value>(payload) {
        Ok(value) => value,
        Err(e) => {
            debug!("Secret string is not YAML formatted: {}", e);
            serde_json::from_str::<Value>(payload).unwrap_or_else(|e| {
                debug!("Secret string is not JSON formatted: {}", e);
                Value::String(payload.to_string())
            })
        }
    }
}

fn is_admin(entry: &Value) -> bool {
    entry.get("admin").is_some_and(is_truthy)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::InMemorySecretStore;

    const ARN: &str = "arn:aws:secretsmanager:eu-west-1:123456789012:secret:gw-admin";

    #[test]
    fn test_array_returns_admin_entry() {
        let payload = r#"[
            {"username": "reader", "password": "r"},
            {"username": "admin", "password": "pw", "admin": true}
        ]"#;
        let creds = parse_admin_credentials(payload, ARN).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn test_array_without_admin_names_secret() {
        let payload = r#"[{"username": "a", "password": "b", "admin": false}]"#;
        let err = parse_admin_credentials(payload, ARN).unwrap_err();
        assert!(matches!(err, ProxyError::Credentials(_)));
        assert!(err.to_string().contains(ARN));
    }

    #[test]
    fn test_yaml_list() {
        let payload = "- username: ops\n  password: x\n- username: root\n  password: y\n  admin: yes-please\n";
        let creds = parse_admin_credentials(payload, ARN).unwrap();
        assert_eq!(creds.username, "root");
    }

    #[test]
    fn test_single_mapping_is_admin() {
        let creds =
            parse_admin_credentials(r#"{"username":"admin","password":"pw"}"#, ARN).unwrap();
        assert_eq!(
            creds,
            AdminCredentials {
                username: "admin".into(),
                password: "pw".into()
            }
        );
    }

    #[test]
    fn test_mapping_without_credentials_is_rejected() {
        let err = parse_admin_credentials(r#"{"foo":"bar"}"#, ARN).unwrap_err();
        assert!(err.to_string().contains("No admin user found"));
    }

    #[test]
    fn test_plain_string_is_invalid_format() {
        let err = parse_admin_credentials("just-a-password", ARN).unwrap_err();
        assert!(err.to_string().contains("not valid"));
    }

    #[test]
    fn test_admin_entry_without_password() {
        let err = parse_admin_credentials(r#"[{"username":"a","admin":1}]"#, ARN).unwrap_err();
        assert!(err.to_string().contains("username/password"));
    }

    #[test]
    fn test_truthiness() {
        use serde_json::json;
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("x")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!([])));
    }

    #[test]
    fn test_needs_assumed_role() {
        assert!(needs_assumed_role(ARN, Some("arn:aws:iam::1:role/r")));
        assert!(!needs_assumed_role("gw-admin", Some("arn:aws:iam::1:role/r")));
        assert!(!needs_assumed_role(ARN, None));
        assert!(!needs_assumed_role(ARN, Some("")));
    }

    #[tokio::test]
    async fn test_resolver_reads_store() {
        let store = InMemorySecretStore::new();
        store.insert_secret(ARN, "v1", r#"[{"username":"admin","password":"pw","admin":true}]"#);

        let creds = AdminCredentialResolver::new(&store)
            .resolve(ARN)
            .await
            .unwrap();
        assert_eq!(creds.username, "admin");
    }

    #[tokio::test]
    async fn test_resolver_missing_identifier() {
        let store = InMemorySecretStore::new();
        let err = AdminCredentialResolver::new(&store)
            .resolve("")
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::Config(_)));
    }

    #[tokio::test]
    async fn test_resolver_propagates_store_errors() {
        let store = InMemorySecretStore::new();
        let err = AdminCredentialResolver::new(&store)
            .resolve(ARN)
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::SecretNotFound(_)));
    }
}
