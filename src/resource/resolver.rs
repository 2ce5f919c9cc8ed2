//! Identifier Resolver
//!
//! Translates the names a caller types (policy name, method name, IP address,
//! blocking-setting description) into the identifiers the server uses in
//! resource paths. Nothing is cached: every call lists the collection again.
//!
//! A miss is not an error by default. In [`ResolveMode::Lenient`] the caller's
//! key is used as the identifier, so the follow-up request fails (or not) on
//! the server's terms. [`ResolveMode::Strict`] turns a miss into an error.

use anyhow::{anyhow, Result};
use serde_json::Value;

use super::kind::Collection;
use crate::f5::client::AsmClient;

/// Outcome of matching a natural key against a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    NotFound(String),
}

/// What to do with a [`Resolution::NotFound`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Substitute the caller's key for the missing identifier
    #[default]
    Lenient,
    /// Fail with a "not found" error
    Strict,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Collapse into an identifier usable in a path.
    /// `what` names the kind of thing for the strict-mode error.
    pub fn into_id(self, mode: ResolveMode, what: &str) -> Result<String> {
        match (self, mode) {
            (Self::Resolved(id), _) => Ok(id),
            (Self::NotFound(key), ResolveMode::Lenient) => {
                tracing::warn!("No {} named '{}' found, using the name as its id", what, key);
                Ok(key)
            }
            (Self::NotFound(key), ResolveMode::Strict) => {
                Err(anyhow!("{} '{}' not found", what, key))
            }
        }
    }
}

/// Items of a collection response, empty when absent
pub fn listing_items(listing: &Value) -> &[Value] {
    listing
        .get("items")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Last item whose `field` equals `key`; later matches overwrite earlier ones
pub fn last_match<'a>(items: &'a [Value], field: &str, key: &str) -> Option<&'a Value> {
    let mut matched = None;
    for item in items {
        if item.get(field).and_then(|v| v.as_str()) == Some(key) {
            matched = Some(item);
        }
    }
    matched
}

/// Segment following `policies/` in a reference link, up to the next `/` or `?`
pub fn policy_id_from_link(link: &str) -> Option<&str> {
    let (_, rest) = link.split_once("policies/")?;
    let end = rest.find(|c: char| c == '/' || c == '?').unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}

fn link_of<'a>(item: &'a Value, field: &str) -> Option<&'a str> {
    item.get(field)?.get("link")?.as_str()
}

/// Policy id carried by a policy entry
fn policy_id_of(item: &Value) -> Option<String> {
    link_of(item, "plainTextProfileReference")
        .or_else(|| item.get("selfLink").and_then(|v| v.as_str()))
        .and_then(policy_id_from_link)
        .or_else(|| item.get("id").and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Resolve a policy name against a policy listing
pub fn resolve_policy_in(listing: &Value, policy_name: &str) -> Resolution {
    last_match(listing_items(listing), "name", policy_name)
        .and_then(policy_id_of)
        .map(Resolution::Resolved)
        .unwrap_or_else(|| Resolution::NotFound(policy_name.to_string()))
}

/// Resolve a natural key against a sub-resource listing
pub fn resolve_member_in(listing: &Value, key_field: &str, key: &str) -> Resolution {
    last_match(listing_items(listing), key_field, key)
        .and_then(|item| item.get("id"))
        .and_then(|v| v.as_str())
        .map(|id| Resolution::Resolved(id.to_string()))
        .unwrap_or_else(|| Resolution::NotFound(key.to_string()))
}

/// Look up a policy's id by name
pub async fn resolve_policy(client: &AsmClient, policy_name: &str) -> Result<String> {
    let filter = format!("name eq {}", policy_name);
    let listing = client
        .get_with_query(&client.policies_url(), &[("$filter", filter.as_str())])
        .await?;

    let resolution = resolve_policy_in(&listing, policy_name);
    tracing::debug!("Policy '{}' resolved to {:?}", policy_name, resolution);
    resolution.into_id(client.resolve_mode, "policy")
}

/// Look up a sub-resource's id by its natural key within one policy
pub async fn resolve_member(
    client: &AsmClient,
    policy_id: &str,
    collection: Collection,
    key: &str,
) -> Result<String> {
    let listing = client
        .get(&client.policy_collection_url(policy_id, &collection.path()))
        .await?;

    let resolution = resolve_member_in(&listing, collection.key_field(), key);
    tracing::debug!("{} '{}' resolved to {:?}", collection.label(), key, resolution);
    resolution.into_id(client.resolve_mode, collection.label())
}
