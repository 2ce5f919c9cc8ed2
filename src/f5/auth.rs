//! F5 Authentication
//!
//! Token login against the shared authn endpoint, plus the basic-auth
//! credential check used by `test-module`.

use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use url::Url;

use super::http::AsmHttpClient;

/// Login provider used for local BIG-IP accounts
pub const LOGIN_PROVIDER: &str = "tmos";

/// Username and password for the management API
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session token returned by login; lives only as long as one invocation
#[derive(Clone)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: LoginToken,
}

#[derive(Debug, Deserialize)]
struct LoginToken {
    token: String,
}

/// Build the login endpoint for a server origin
pub fn login_url(origin: &Url) -> Result<Url> {
    origin
        .join("mgmt/shared/authn/login")
        .context("Invalid server address")
}

/// Log in and obtain a session token
pub async fn login(
    http: &AsmHttpClient,
    origin: &Url,
    credentials: &Credentials,
) -> Result<SessionToken> {
    let url = login_url(origin)?;
    tracing::info!("Logging in to {} as {}", origin, credentials.username);

    let body = json!({
        "username": credentials.username,
        "password": credentials.password(),
        "loginProviderName": LOGIN_PROVIDER,
    });

    let response = http
        .post(url.as_str(), Some(&body))
        .await
        .context("Authentication failed")?;

    let parsed: LoginResponse =
        serde_json::from_value(response).context("Login response did not contain a token")?;

    tracing::debug!("Session token obtained");
    Ok(SessionToken::new(parsed.token.token))
}

/// Outcome text of the lightweight credential check
pub async fn check_credentials(
    http: &AsmHttpClient,
    base_url: &Url,
    credentials: &Credentials,
) -> Result<String> {
    let url = base_url
        .join("sys/version")
        .context("Invalid server address")?;

    let (status, text) = http.get_with_basic_auth(url.as_str(), credentials).await?;

    let code = status.as_u16();
    let message = if code == 200 {
        "ok".to_string()
    } else if status.is_client_error() || status.is_server_error() {
        format!("Invalid credentials given.\nError: {}: {}", code, text)
    } else {
        format!("Error {}: {}", code, text)
    };

    Ok(message)
}
