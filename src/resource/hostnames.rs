//! Host names protected by a policy

use anyhow::Result;
use clap::{ArgAction, Args};
use serde::Serialize;
use serde_json::Value;

use super::kind::Collection;
use super::{request_body, resolver};
use crate::f5::client::AsmClient;
use crate::render::{CommandOutput, Record, View, NOTHING_TO_SHOW};

const COLLECTION: Collection = Collection::HostNames;

const VIEW: View = View {
    context: "f5.Hostname",
    headers: &[
        "id",
        "name",
        "created-by",
        "include-subdomains",
        "kind",
        "self-link",
        "last-update",
    ],
    empty: NOTHING_TO_SHOW,
};

const TITLE: &str = "f5 information about hosts";

#[derive(Debug, Clone, Args)]
pub struct ListHostnames {
    #[arg(long)]
    pub policy_name: String,
}

#[derive(Debug, Clone, Args, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddHostname {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub include_subdomains: bool,
}

#[derive(Debug, Clone, Args, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHostname {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    #[arg(long)]
    #[serde(skip)]
    pub name: String,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_subdomains: Option<bool>,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteHostname {
    #[arg(long)]
    pub policy_name: String,
    #[arg(long)]
    pub name: String,
}

fn record(item: &Value) -> Record {
    Record::new()
        .field("name", item, "name")
        .field("id", item, "id")
        .field("created-by", item, "createdBy")
        .field("self-link", item, "selfLink")
        .field("include-subdomains", item, "includeSubdomains")
        .last_update("last-update", item)
}

fn render(response: Value) -> CommandOutput {
    CommandOutput::single(&VIEW, TITLE, response, record)
}

pub async fn list(client: &AsmClient, args: ListHostnames) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let response = client
        .get(&client.policy_collection_url(&policy_id, &COLLECTION.path()))
        .await?;
    Ok(CommandOutput::listing(&VIEW, TITLE, response, record))
}

pub async fn add(client: &AsmClient, args: AddHostname) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let url = client.policy_collection_url(&policy_id, &COLLECTION.path());
    let response = client.post(&url, &request_body(&args)?).await?;
    Ok(render(response))
}

pub async fn update(client: &AsmClient, args: UpdateHostname) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let hostname_id = resolver::resolve_member(client, &policy_id, COLLECTION, &args.name).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &hostname_id);
    let response = client.patch(&url, &request_body(&args)?).await?;
    Ok(render(response))
}

pub async fn delete(client: &AsmClient, args: DeleteHostname) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let hostname_id = resolver::resolve_member(client, &policy_id, COLLECTION, &args.name).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &hostname_id);
    let response = client.delete(&url).await?;
    Ok(render(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_body() {
        let args = AddHostname {
            policy_name: "p".into(),
            name: "www.example.com".into(),
            include_subdomains: true,
        };
        assert_eq!(
            request_body(&args).unwrap(),
            json!({"name": "www.example.com", "includeSubdomains": true})
        );
    }

    #[test]
    fn test_update_body_never_renames_host() {
        let args = UpdateHostname {
            policy_name: "p".into(),
            name: "www.example.com".into(),
            include_subdomains: None,
        };
        assert_eq!(request_body(&args).unwrap(), json!({}));
    }

    #[test]
    fn test_empty_listing_marker() {
        let out = CommandOutput::listing(&VIEW, TITLE, json!({"items": []}), record);
        assert_eq!(out.readable, "Nothing to show");
    }
}
