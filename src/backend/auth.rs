//! Password auth against the hosted auth service.

use chrono::{DateTime, Duration, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::client::{BackendClient, check_response};
use super::session::Session;
use crate::error::{AppError, Result};

/// Authenticated identity as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthUser {
    /// Email of the identity, required for every admin lookup.
    pub fn require_email(&self) -> Result<&str> {
        self.email
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::auth("signed-in user has no email"))
    }
}

/// Token grant response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl TokenResponse {
    pub(crate) fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .unwrap_or_else(|| now + Duration::seconds(self.expires_in.unwrap_or(3600)));

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Sign-up answers with a full session when email confirmation is off, and
/// with the bare user otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Session(TokenResponse),
    User(AuthUser),
}

impl SignUpResponse {
    pub(crate) fn into_user(self) -> AuthUser {
        match self {
            SignUpResponse::Session(token) => token.user,
            SignUpResponse::User(user) => user,
        }
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

impl BackendClient {
    pub(crate) fn build_sign_in(&self, email: &str, password: &str) -> reqwest::RequestBuilder {
        self.request(Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "password")])
            .json(&Credentials { email, password })
    }

    pub(crate) fn build_sign_up(&self, email: &str, password: &str) -> reqwest::RequestBuilder {
        self.request(Method::POST, &self.auth_url("signup"), None)
            .json(&Credentials { email, password })
    }

    /// Sign in with email and password.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        tracing::info!(email, "Signing in");
        let response = check_response(self.build_sign_in(email, password).send().await?).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.into_session(Utc::now()))
    }

    /// Exchange a refresh token for a new session.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session> {
        tracing::debug!("Refreshing session");
        let response = self
            .request(Method::POST, &self.auth_url("token"), None)
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant { refresh_token })
            .send()
            .await?;
        let token: TokenResponse = check_response(response).await?.json().await?;
        Ok(token.into_session(Utc::now()))
    }

    /// Create a new auth identity.
    ///
    /// Any session issued for the new identity is discarded; the caller's own
    /// session stays in effect.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        tracing::info!(email, "Creating auth identity");
        let response = check_response(self.build_sign_up(email, password).send().await?).await?;
        let body: SignUpResponse = response.json().await?;
        Ok(body.into_user())
    }

    /// Fetch the user an access token belongs to.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        let response = self
            .request(Method::GET, &self.auth_url("user"), Some(access_token))
            .send()
            .await?;
        Ok(check_response(response).await?.json().await?)
    }

    /// Revoke the session server-side.
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        tracing::info!("Signing out");
        let response = self
            .request(Method::POST, &self.auth_url("logout"), Some(access_token))
            .send()
            .await?;
        check_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::client::tests::test_client;
    use chrono::TimeZone;

    #[test]
    fn test_sign_in_request() {
        let request = test_client()
            .build_sign_in("ana@library.ph", "secret")
            .build()
            .unwrap();

        assert_eq!(request.url().path(), "/auth/v1/token");
        assert_eq!(request.url().query(), Some("grant_type=password"));

        let body: serde_json::Value =
            serde_json::from_slice(request.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(body["email"], "ana@library.ph");
        assert_eq!(body["password"], "secret");
    }

    #[test]
    fn test_sign_up_request_is_anonymous() {
        let request = test_client().build_sign_up("new@library.ph", "pw").build().unwrap();
        assert_eq!(request.url().path(), "/auth/v1/signup");
        assert_eq!(request.headers()["authorization"], "Bearer anon-key");
    }

    #[test]
    fn test_token_response_with_expires_in() {
        let json = r#"{
            "access_token": "a",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r",
            "user": { "id": "u-1", "email": "ana@library.ph", "role": "authenticated" }
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let session = token.into_session(now);

        assert_eq!(session.expires_at, now + Duration::hours(1));
        assert_eq!(session.user.email.as_deref(), Some("ana@library.ph"));
    }

    #[test]
    fn test_token_response_prefers_expires_at() {
        let json = r#"{
            "access_token": "a", "refresh_token": "r",
            "expires_in": 3600, "expires_at": 1735693200,
            "user": { "id": "u-1" }
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        let session = token.into_session(Utc::now());
        assert_eq!(session.expires_at.timestamp(), 1735693200);
    }

    #[test]
    fn test_sign_up_response_shapes() {
        let bare = r#"{ "id": "u-2", "email": "new@library.ph", "confirmation_sent_at": "2025-01-01T00:00:00Z" }"#;
        let user = serde_json::from_str::<SignUpResponse>(bare).unwrap().into_user();
        assert_eq!(user.id, "u-2");

        let with_session = r#"{
            "access_token": "a", "refresh_token": "r", "expires_in": 3600,
            "user": { "id": "u-3", "email": "other@library.ph" }
        }"#;
        let user = serde_json::from_str::<SignUpResponse>(with_session)
            .unwrap()
            .into_user();
        assert_eq!(user.id, "u-3");
    }

    #[test]
    fn test_require_email() {
        let user = AuthUser {
            id: "u".to_string(),
            email: None,
        };
        assert!(user.require_email().is_err());

        let user = AuthUser {
            id: "u".to_string(),
            email: Some("ana@library.ph".to_string()),
        };
        assert_eq!(user.require_email().unwrap(), "ana@library.ph");
    }
}
