//! HTTP transport for the proxy admin API

use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::api;
use crate::error::{ProxyError, Result};

use super::endpoint::ApiEndpoint;

/// Username/password pair sent as HTTP Basic auth
#[derive(Clone)]
struct BasicAuth {
    username: String,
    password: String,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Low-level admin API client: base URL, basic auth and status mapping
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    endpoint: ApiEndpoint,
    auth: Option<BasicAuth>,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// Username and password must be given together or not at all.
    /// `ignore_ssl_errors` accepts self-signed certificates; use at own risk.
    pub fn new(
        endpoint: ApiEndpoint,
        username: Option<String>,
        password: Option<String>,
        ignore_ssl_errors: bool,
    ) -> Result<Self> {
        let auth = match (username, password) {
            (Some(username), Some(password)) => Some(BasicAuth { username, password }),
            (None, None) => None,
            _ => {
                return Err(ProxyError::Config(
                    "You must specify both username and password".to_string(),
                ))
            }
        };

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(api::CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(api::REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_certs(ignore_ssl_errors)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            auth,
        })
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    /// Add JSON accept header and basic auth to a request builder
    fn with_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match &self.auth {
            Some(auth) => builder.basic_auth(&auth.username, Some(&auth.password)),
            None => builder,
        }
    }

    /// GET `path`
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = self.endpoint.join(path);
        debug!("GET {}", url);
        self.send(self.with_headers(self.client.get(&url))).await
    }

    /// POST `body` as JSON to `path`
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint.join(path);
        debug!("POST {}", url);
        self.send(self.with_headers(self.client.post(&url)).json(body))
            .await
    }

    /// PUT `body` as JSON to `path`
    pub async fn put<B>(&self, path: &str, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint.join(path);
        debug!("PUT {}", url);
        self.send(self.with_headers(self.client.put(&url)).json(body))
            .await
    }

    /// DELETE `path`
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let url = self.endpoint.join(path);
        debug!("DELETE {}", url);
        self.send(self.with_headers(self.client.delete(&url))).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        check_status(response).await
    }
}

/// Turn any status outside the success set into a typed error.
///
/// The error carries the JSON body when it parses, the raw text otherwise.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status().as_u16();
    if api::SUCCESS_CODES.contains(&status) {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let details = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
    debug!("Request failed with status {}: {}", status, details);
    Err(ProxyError::from_status(status, details))
}

#[cfg(test)]
impl ApiClient {
    /// Create a test client pointed at a mock server
    pub fn test_client(base_url: &str) -> Self {
        Self::new(
            ApiEndpoint::from_url(base_url).unwrap(),
            Some("admin".to_string()),
            Some("pw".to_string()),
            false,
        )
        .unwrap()
    }
}
