//! HTTP utilities for iControl REST calls

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use super::auth::{Credentials, SessionToken};

/// Header carrying the session token on every authenticated call
pub const AUTH_TOKEN_HEADER: &str = "X-F5-Auth-Token";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Maximum length of a server message carried into an error
const MAX_ERROR_MESSAGE_LENGTH: usize = 300;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let cut = floor_char_boundary(body, MAX_LOG_BODY_LENGTH);
        format!("{}... [truncated, {} bytes total]", &body[..cut], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Pull the human-readable part out of an error body.
/// F5 answers failures with `{"code": 404, "message": "..."}`.
fn server_message(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    message
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_ERROR_MESSAGE_LENGTH)
        .collect()
}

/// Connection-level settings shared by the login client and the session client
#[derive(Debug, Clone, Copy)]
pub struct TransportSettings {
    /// Verify the server certificate
    pub verify_tls: bool,
    /// Honour the system proxy environment
    pub use_proxy: bool,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            verify_tls: true,
            use_proxy: false,
        }
    }
}

/// HTTP client wrapper for iControl REST calls
#[derive(Clone)]
pub struct AsmHttpClient {
    client: Client,
}

impl AsmHttpClient {
    /// Create a client without a session (used for login and the credential check)
    pub fn new(settings: TransportSettings) -> Result<Self> {
        Self::build(settings, HeaderMap::new())
    }

    /// Create a client that sends the session token on every request
    pub fn with_token(settings: TransportSettings, token: &SessionToken) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut value = HeaderValue::from_str(token.as_str())
            .context("Session token is not a valid header value")?;
        value.set_sensitive(true);
        headers.insert(AUTH_TOKEN_HEADER, value);

        Self::build(settings, headers)
    }

    fn build(settings: TransportSettings, headers: HeaderMap) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("f5asm/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .danger_accept_invalid_certs(!settings.verify_tls);

        if !settings.use_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Make a GET request
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.send(Method::GET, url, query, None).await
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value> {
        self.send(Method::POST, url, &[], body).await
    }

    /// Make a PATCH request
    pub async fn patch(&self, url: &str, body: Option<&Value>) -> Result<Value> {
        self.send(Method::PATCH, url, &[], body).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str) -> Result<Value> {
        self.send(Method::DELETE, url, &[], None).await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.context("Failed to send request")?;

        let status = response.status();
        let response_body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only the sanitized/truncated body goes to the log
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(anyhow::anyhow!(
                "API request failed: {} - {}",
                status,
                server_message(&response_body)
            ));
        }

        // Handle empty response
        if response_body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body).context("Failed to parse response JSON")
    }

    /// GET with HTTP basic auth and return the raw status and body text
    pub async fn get_with_basic_auth(
        &self,
        url: &str,
        credentials: &Credentials,
    ) -> Result<(StatusCode, String)> {
        tracing::debug!("GET {} (basic auth)", url);

        let response = self
            .client
            .get(url)
            .basic_auth(&credentials.username, Some(credentials.password()))
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read response body")?;
        Ok((status, text))
    }
}
