//! Configuration Management
//!
//! Connection defaults live in `<config dir>/f5asm/config.json`. Command-line
//! flags and environment variables take precedence over the file.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::f5::auth::Credentials;
use crate::f5::client::ClientSettings;
use crate::f5::http::TransportSettings;
use crate::resource::ResolveMode;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server address, bare host or full URL
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// Accept invalid TLS certificates
    #[serde(default)]
    pub insecure: bool,
    /// Route requests through the system proxy
    #[serde(default)]
    pub proxy: bool,
    /// Fail when a name does not resolve instead of using it as the id
    #[serde(default)]
    pub strict_resolution: bool,
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub insecure: bool,
    pub proxy: bool,
    pub strict: bool,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("f5asm").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file; a missing or unreadable
    /// file yields the defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", path, e);
                return Self::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
            Self::default()
        })
    }

    /// Merge command-line values over the file and build connection settings
    pub fn client_settings(&self, overrides: &Overrides) -> Result<ClientSettings> {
        let Some(server) = overrides.server.as_deref().or(self.server.as_deref()) else {
            bail!("No server configured. Use --server or set F5_SERVER");
        };
        let Some(username) = overrides.username.as_deref().or(self.username.as_deref()) else {
            bail!("No username configured. Use --username or set F5_USERNAME");
        };
        let Some(password) = overrides.password.as_deref() else {
            bail!("No password given. Use --password or set F5_PASSWORD");
        };

        let resolve_mode = if overrides.strict || self.strict_resolution {
            ResolveMode::Strict
        } else {
            ResolveMode::Lenient
        };

        Ok(ClientSettings {
            origin: normalize_origin(server)?,
            credentials: Credentials::new(username, password),
            transport: TransportSettings {
                verify_tls: !(overrides.insecure || self.insecure),
                use_proxy: overrides.proxy || self.proxy,
            },
            resolve_mode,
        })
    }
}

/// Turn a server address into an origin URL ending in `/`.
/// A bare host is assumed to speak https.
pub fn normalize_origin(server: &str) -> Result<Url> {
    let server = server.trim();
    if server.is_empty() {
        bail!("Server address is empty");
    }

    let with_scheme = if server.contains("://") {
        server.to_string()
    } else {
        format!("https://{}", server)
    };

    let mut origin =
        Url::parse(&with_scheme).with_context(|| format!("Invalid server address: {}", server))?;
    if !origin.path().ends_with('/') {
        let path = format!("{}/", origin.path());
        origin.set_path(&path);
    }
    Ok(origin)
}
