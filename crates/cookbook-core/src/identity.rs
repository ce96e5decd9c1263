//! Identity service client (password login and account signup).
//!
//! Thin HTTP wrapper over the identity toolkit endpoints. Response and
//! error-body parsing are pure functions so they can be tested without a
//! server.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use cookbook_types::{AuthMode, Credentials, Session};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::IdentityConfig;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Message shown for every failure that has no specific mapping.
pub const GENERIC_ERROR_MESSAGE: &str = "An unknown error occurred!";

// ============================================================================
// Errors
// ============================================================================

/// Server codes that map to a specific user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    EmailExists,
    EmailNotFound,
    InvalidPassword,
}

impl CredentialError {
    /// Maps a server error code, returning `None` for unknown codes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EMAIL_EXISTS" => Some(Self::EmailExists),
            "EMAIL_NOT_FOUND" => Some(Self::EmailNotFound),
            "INVALID_PASSWORD" => Some(Self::InvalidPassword),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::EmailExists => "This email exists already",
            Self::EmailNotFound => "This email does not exist.",
            Self::InvalidPassword => "This password is not correct.",
        }
    }
}

/// Failures of an authentication request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Transport failure, or an error response without a structured body.
    #[error("identity request failed: {0}")]
    Network(String),

    /// The server rejected the credentials with a known code.
    #[error("credentials rejected: {}", .0.message())]
    Credential(CredentialError),

    /// The server rejected the credentials with a code we do not map.
    #[error("credentials rejected with unknown code {0}")]
    UnknownCredential(String),

    /// A success response that could not be understood.
    #[error("malformed identity response: {0}")]
    MalformedResponse(String),

    /// No API key configured.
    #[error("identity API key is not configured (set COOKBOOK_API_KEY or identity.api_key)")]
    MissingApiKey,

    /// The configured base URL / path do not form a valid URL.
    #[error("invalid identity endpoint: {0}")]
    InvalidEndpoint(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl AuthError {
    /// The message surfaced to the user through the auth state.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Credential(code) => code.message(),
            _ => GENERIC_ERROR_MESSAGE,
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Successful login/signup response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id_token: String,
    pub email: String,
    pub local_id: String,
    /// Token lifetime in seconds, sent as a decimal string.
    pub expires_in: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub registered: Option<bool>,
}

impl AuthResponse {
    /// Parses `expiresIn`.
    ///
    /// # Errors
    /// Returns `MalformedResponse` when it is not a whole number of seconds.
    pub fn lifetime(&self) -> Result<TimeDelta, AuthError> {
        self.expires_in
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                AuthError::MalformedResponse(format!("expiresIn = {:?}", self.expires_in))
            })
    }

    /// Builds the session this response grants, expiring `expiresIn`
    /// seconds after `now`.
    ///
    /// # Errors
    /// Returns `MalformedResponse` if `expiresIn` cannot be parsed or the
    /// expiry falls outside the representable date range.
    pub fn into_session(self, now: DateTime<Utc>) -> Result<Session, AuthError> {
        let expires_at = now.checked_add_signed(self.lifetime()?).ok_or_else(|| {
            AuthError::MalformedResponse(format!("expiresIn out of range: {}", self.expires_in))
        })?;
        Ok(Session {
            email: self.email,
            user_id: self.local_id,
            token: self.id_token,
            expires_at,
        })
    }
}

/// Classifies an error response body.
///
/// The code is read from `error.message` (the raw service body) or
/// `error.error.message` (the same body wrapped by an HTTP layer).
pub fn classify_error_body(body: &str) -> AuthError {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return AuthError::Network(format!("unstructured error body: {body}"));
    };

    let code = value
        .pointer("/error/message")
        .or_else(|| value.pointer("/error/error/message"))
        .and_then(serde_json::Value::as_str);

    match code {
        None => AuthError::Network(format!("error body without code: {body}")),
        Some(code) => CredentialError::from_code(code).map_or_else(
            || AuthError::UnknownCredential(code.to_string()),
            AuthError::Credential,
        ),
    }
}

// ============================================================================
// Client
// ============================================================================

/// Authentication backend used by the effect pipeline.
#[async_trait::async_trait]
pub trait IdentityApi: Send + Sync {
    /// Performs one login or signup request.
    async fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthResponse, AuthError>;
}

/// reqwest-backed [`IdentityApi`].
pub struct IdentityClient {
    http: reqwest::Client,
    config: IdentityConfig,
}

impl IdentityClient {
    /// Builds a client from identity configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: IdentityConfig) -> Result<Self, AuthError> {
        let mut builder =
            reqwest::Client::builder().connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| AuthError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Full URL (including the `key` parameter) for a mode.
    ///
    /// # Errors
    /// Returns `MissingApiKey` or `InvalidEndpoint`.
    pub fn endpoint(&self, mode: AuthMode) -> Result<Url, AuthError> {
        endpoint_url(&self.config, mode)
    }
}

fn endpoint_url(config: &IdentityConfig, mode: AuthMode) -> Result<Url, AuthError> {
    let key = config.effective_api_key().ok_or(AuthError::MissingApiKey)?;
    let path = match mode {
        AuthMode::Login => &config.login_path,
        AuthMode::Signup => &config.signup_path,
    };
    let raw = format!(
        "{}/{}",
        config.base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse_with_params(&raw, &[("key", key)])
        .map_err(|e| AuthError::InvalidEndpoint(format!("{raw}: {e}")))
}

#[async_trait::async_trait]
impl IdentityApi for IdentityClient {
    async fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthResponse, AuthError> {
        let url = self.endpoint(mode)?;
        let body = AuthRequest {
            email: &credentials.email,
            password: &credentials.password,
            return_secure_token: true,
        };

        tracing::debug!(mode = mode.as_str(), email = %credentials.email, "identity request");

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "identity request rejected");
            return Err(classify_error_body(&text));
        }

        serde_json::from_str(&text).map_err(|e| AuthError::MalformedResponse(e.to_string()))
    }
}
