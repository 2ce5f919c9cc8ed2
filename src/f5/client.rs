//! ASM Client
//!
//! Session context for one invocation: server address, authenticated HTTP
//! client and resolution mode. Every operation receives it explicitly.

use super::auth::{self, Credentials, SessionToken};
use super::http::{AsmHttpClient, TransportSettings};
use crate::resource::ResolveMode;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Everything needed to open a session
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Server origin, always ending in `/` (e.g. `https://10.0.0.5/`)
    pub origin: Url,
    pub credentials: Credentials,
    pub transport: TransportSettings,
    pub resolve_mode: ResolveMode,
}

impl ClientSettings {
    /// Root of the traffic-management REST tree, `{origin}mgmt/tm/`
    pub fn base_url(&self) -> Result<Url> {
        self.origin
            .join("mgmt/tm/")
            .context("Invalid server address")
    }
}

/// Main ASM client
#[derive(Clone)]
pub struct AsmClient {
    pub http: AsmHttpClient,
    base_url: String,
    pub resolve_mode: ResolveMode,
}

impl AsmClient {
    /// Log in and create a client bound to the new session
    pub async fn connect(settings: &ClientSettings) -> Result<Self> {
        let login_http = AsmHttpClient::new(settings.transport)?;
        let token = auth::login(&login_http, &settings.origin, &settings.credentials).await?;
        Self::with_token(settings, &token)
    }

    /// Create a client from an existing session token
    pub fn with_token(settings: &ClientSettings, token: &SessionToken) -> Result<Self> {
        let http = AsmHttpClient::with_token(settings.transport, token)?;
        let base_url = settings.base_url()?.to_string();

        Ok(Self {
            http,
            base_url,
            resolve_mode: settings.resolve_mode,
        })
    }

    /// Make a GET request
    pub async fn get(&self, url: &str) -> Result<Value> {
        self.http.get(url, &[]).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.http.get(url, query).await
    }

    /// Make a POST request
    pub async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        self.http.post(url, Some(body)).await
    }

    /// Make a PATCH request
    pub async fn patch(&self, url: &str, body: &Value) -> Result<Value> {
        self.http.patch(url, Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, url: &str) -> Result<Value> {
        self.http.delete(url).await
    }

    // =========================================================================
    // ASM URL helpers
    // =========================================================================

    /// Build an ASM API URL
    pub fn asm_url(&self, path: &str) -> String {
        format!("{}asm/{}", self.base_url, path)
    }

    /// Policy collection URL
    pub fn policies_url(&self) -> String {
        self.asm_url("policies")
    }

    /// Single policy URL
    pub fn policy_url(&self, policy_id: &str) -> String {
        format!("{}/{}", self.policies_url(), segment(policy_id))
    }

    /// Collection scoped to a policy, e.g. `policies/{id}/methods`
    pub fn policy_collection_url(&self, policy_id: &str, collection: &str) -> String {
        format!("{}/{}", self.policy_url(policy_id), collection)
    }

    /// Member of a policy-scoped collection
    pub fn policy_member_url(&self, policy_id: &str, collection: &str, member_id: &str) -> String {
        format!(
            "{}/{}",
            self.policy_collection_url(policy_id, collection),
            segment(member_id)
        )
    }

    /// Task endpoint, e.g. `tasks/apply-policy`
    pub fn task_url(&self, task: &str) -> String {
        self.asm_url(&format!("tasks/{}", task))
    }
}

/// Encode a caller-supplied identifier for use as one path segment
fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
