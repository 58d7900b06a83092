//! HTTP client for the hosted auth and REST backend.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;

use super::query::QueryBuilder;
use crate::config::BackendConfig;
use crate::error::{AppError, Result};

/// Backend client.
///
/// Every request carries the project's anon key in the `apikey` header. The
/// bearer token is the operator's access token when one is supplied, otherwise
/// the anon key itself, which is how the backend identifies anonymous calls.
///
/// Cloning is cheap: the underlying connection pool is shared.
#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl BackendClient {
    /// Create a new client from backend settings.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("library-link-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            anon_key: config.anon_key.trim().to_string(),
        })
    }

    /// Project URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a query against a table.
    pub fn table(&self, name: &str) -> QueryBuilder {
        QueryBuilder::new(self.clone(), name)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{base}/auth/v1/{path}", base = self.base_url)
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{base}/rest/v1/{table}", base = self.base_url)
    }

    /// Build a request with the key and bearer headers set.
    pub(crate) fn request(&self, method: Method, url: &str, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        self.http
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Check the auth service is reachable and accepts the key.
    pub async fn health(&self) -> Result<()> {
        let response = self
            .request(Method::GET, &self.auth_url("health"), None)
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }
}

/// Error body shapes returned by the auth and REST services.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Extract a human-readable message from an error response body.
pub(crate) fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response".to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        })
}

/// Turn a non-success response into [`AppError::Api`].
pub(crate) async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    tracing::debug!(status = status.as_u16(), %message, "Backend request failed");

    Err(AppError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_client() -> BackendClient {
        let config = BackendConfig {
            url: "https://abc.supabase.co/".to_string(),
            anon_key: "anon-key".to_string(),
            timeout_secs: 5,
        };
        BackendClient::new(&config).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = test_client();
        assert_eq!(client.base_url(), "https://abc.supabase.co");
        assert_eq!(client.auth_url("user"), "https://abc.supabase.co/auth/v1/user");
        assert_eq!(client.rest_url("staff"), "https://abc.supabase.co/rest/v1/staff");
    }

    #[test]
    fn test_anonymous_request_uses_anon_key_as_bearer() {
        let client = test_client();
        let request = client
            .request(Method::GET, &client.auth_url("health"), None)
            .build()
            .unwrap();

        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn test_authenticated_request_uses_access_token() {
        let client = test_client();
        let request = client
            .request(Method::GET, &client.auth_url("user"), Some("jwt-token"))
            .build()
            .unwrap();

        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()["authorization"], "Bearer jwt-token");
    }

    #[test]
    fn test_error_message_variants() {
        assert_eq!(error_message(r#"{"message":"duplicate key"}"#), "duplicate key");
        assert_eq!(error_message(r#"{"msg":"User already registered"}"#), "User already registered");
        assert_eq!(
            error_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#),
            "Invalid login credentials"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "empty response");
    }
}
