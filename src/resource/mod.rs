//! Resource operations
//!
//! One module per policy resource kind. Each operation resolves the policy
//! (and, for update/delete, the member) by name, issues one REST call and
//! renders the response.
//!
//! # Architecture
//!
//! - [`kind`] - Collections below a policy and their natural-key fields
//! - [`resolver`] - Name-to-id resolution by listing and scanning
//! - [`policies`], [`methods`], [`file_types`], [`hostnames`], [`cookies`],
//!   [`blocking_settings`], [`urls`], [`whitelist_ips`] - the operations
//!
//! Parameter structs derive both `clap::Args` (so the binary can expose them
//! as flags) and, where the request body is a straight copy of the fields,
//! `serde::Serialize`. Optional fields are `Option` and skipped when unset, so
//! an update only carries what the caller supplied.
//!
//! # Example
//!
//! ```ignore
//! use f5asm::resource::{hostnames, hostnames::DeleteHostname};
//!
//! async fn drop_host(client: &AsmClient) -> anyhow::Result<()> {
//!     let args = DeleteHostname { policy_name: "api".into(), name: "www.example.com".into() };
//!     let output = hostnames::delete(client, args).await?;
//!     println!("{}", output.readable);
//!     Ok(())
//! }
//! ```

pub mod blocking_settings;
pub mod cookies;
pub mod file_types;
pub mod hostnames;
pub mod kind;
pub mod methods;
pub mod policies;
pub mod resolver;
pub mod urls;
pub mod whitelist_ips;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

pub use kind::{BlockingEndpoint, Collection};
pub use resolver::{Resolution, ResolveMode};

/// Serialize a parameter struct into a JSON request body
pub fn request_body<T: Serialize>(args: &T) -> Result<Value> {
    serde_json::to_value(args).context("Failed to build request body")
}
