//! Whitelisted IP addresses of a policy
//!
//! Both add and update send only the optional fields the caller supplied;
//! the server fills in its own defaults for the rest.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use super::kind::Collection;
use super::{request_body, resolver};
use crate::f5::client::AsmClient;
use crate::render::{CommandOutput, Record, View, NO_DATA};

const COLLECTION: Collection = Collection::WhitelistIps;

const VIEW: View = View {
    context: "f5.WhitelistIP",
    headers: &[
        "id",
        "ip-address",
        "ip-mask",
        "description",
        "block-requests",
        "ignore-anomalies",
        "never-log-requests",
        "never-learn-requests",
        "trusted-by-policy-builder",
        "self-link",
        "last-update",
    ],
    empty: NO_DATA,
};

#[derive(Debug, Clone, Args)]
pub struct ListWhitelistIps {
    #[arg(long)]
    pub policy_name: String,
}

/// Optional whitelist attributes shared by add and update
#[derive(Debug, Clone, Default, Args, Serialize)]
pub struct WhitelistIpOptions {
    #[arg(long)]
    #[serde(rename = "trustedByPolicyBuilder", skip_serializing_if = "Option::is_none")]
    pub trusted_by_builder: Option<bool>,
    #[arg(long)]
    #[serde(rename = "ignoreAnomalies", skip_serializing_if = "Option::is_none")]
    pub ignore_brute_detection: Option<bool>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `policy-default`, `never` or `always`
    #[arg(long)]
    #[serde(rename = "blockRequests", skip_serializing_if = "Option::is_none")]
    pub block_requests: Option<String>,
    #[arg(long)]
    #[serde(rename = "neverLearnRequests", skip_serializing_if = "Option::is_none")]
    pub ignore_learning: Option<bool>,
    #[arg(long)]
    #[serde(rename = "neverLogRequests", skip_serializing_if = "Option::is_none")]
    pub never_log: Option<bool>,
    #[arg(long)]
    #[serde(rename = "ignoreIpReputation", skip_serializing_if = "Option::is_none")]
    pub ignore_intelligence: Option<bool>,
}

#[derive(Debug, Clone, Args, Serialize)]
pub struct AddWhitelistIp {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    #[arg(long)]
    #[serde(rename = "ipAddress")]
    pub ip_address: String,
    #[arg(long)]
    #[serde(rename = "ipMask", skip_serializing_if = "Option::is_none")]
    pub ip_mask: Option<String>,
    #[command(flatten)]
    #[serde(flatten)]
    pub options: WhitelistIpOptions,
}

#[derive(Debug, Clone, Args, Serialize)]
pub struct UpdateWhitelistIp {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    #[arg(long)]
    #[serde(skip)]
    pub ip_address: String,
    #[command(flatten)]
    #[serde(flatten)]
    pub options: WhitelistIpOptions,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteWhitelistIp {
    #[arg(long)]
    pub policy_name: String,
    #[arg(long)]
    pub ip_address: String,
}

fn record(item: &Value) -> Record {
    Record::new()
        .field("id", item, "id")
        .field("self-link", item, "selfLink")
        .field("ip-address", item, "ipAddress")
        .field("ip-mask", item, "ipMask")
        .field("description", item, "description")
        .field("block-requests", item, "blockRequests")
        .field("ignore-anomalies", item, "ignoreAnomalies")
        .field("never-log-requests", item, "neverLogRequests")
        .field("never-learn-requests", item, "neverLearnRequests")
        .field("trusted-by-policy-builder", item, "trustedByPolicyBuilder")
        .last_update("last-update", item)
}

/// `action` is the past-tense verb in the title: created, updated or deleted
fn render(response: Value, action: &str) -> CommandOutput {
    let title = format!("f5 data for {} resource whitelisted IP:", action);
    CommandOutput::single(&VIEW, &title, response, record)
}

pub async fn list(client: &AsmClient, args: ListWhitelistIps) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let response = client
        .get(&client.policy_collection_url(&policy_id, &COLLECTION.path()))
        .await?;
    Ok(CommandOutput::listing(
        &VIEW,
        "f5 data for resource whitelisted IPs:",
        response,
        record,
    ))
}

pub async fn add(client: &AsmClient, args: AddWhitelistIp) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let url = client.policy_collection_url(&policy_id, &COLLECTION.path());
    let response = client.post(&url, &request_body(&args)?).await?;
    Ok(render(response, "created"))
}

pub async fn update(client: &AsmClient, args: UpdateWhitelistIp) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let ip_id = resolver::resolve_member(client, &policy_id, COLLECTION, &args.ip_address).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &ip_id);
    let response = client.patch(&url, &request_body(&args)?).await?;
    Ok(render(response, "updated"))
}

pub async fn delete(client: &AsmClient, args: DeleteWhitelistIp) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let ip_id = resolver::resolve_member(client, &policy_id, COLLECTION, &args.ip_address).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &ip_id);
    let response = client.delete(&url).await?;
    Ok(render(response, "deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_with_only_address() {
        let args = AddWhitelistIp {
            policy_name: "p".into(),
            ip_address: "10.0.0.1".into(),
            ip_mask: None,
            options: WhitelistIpOptions::default(),
        };
        assert_eq!(request_body(&args).unwrap(), json!({"ipAddress": "10.0.0.1"}));
    }

    #[test]
    fn test_option_names_map_to_api_fields() {
        let args = UpdateWhitelistIp {
            policy_name: "p".into(),
            ip_address: "10.0.0.1".into(),
            options: WhitelistIpOptions {
                trusted_by_builder: Some(true),
                ignore_brute_detection: Some(false),
                description: Some("office".into()),
                block_requests: Some("never".into()),
                ignore_learning: Some(true),
                never_log: Some(false),
                ignore_intelligence: Some(true),
            },
        };
        assert_eq!(
            request_body(&args).unwrap(),
            json!({
                "trustedByPolicyBuilder": true,
                "ignoreAnomalies": false,
                "description": "office",
                "blockRequests": "never",
                "neverLearnRequests": true,
                "neverLogRequests": false,
                "ignoreIpReputation": true
            })
        );
    }

    #[test]
    fn test_title_names_the_action() {
        let out = render(json!({"ipAddress": "10.0.0.1", "id": "x"}), "created");
        assert!(out
            .readable
            .starts_with("### f5 data for created resource whitelisted IP:\n"));
    }
}
