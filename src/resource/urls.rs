//! URLs known to a policy

use anyhow::Result;
use clap::{ArgAction, Args};
use serde::Serialize;
use serde_json::Value;

use super::kind::Collection;
use super::{request_body, resolver};
use crate::f5::client::AsmClient;
use crate::render::{CommandOutput, Record, View, NOTHING_TO_SHOW, NO_DATA};

const COLLECTION: Collection = Collection::Urls;

const HEADERS: &[&str] = &[
    "id",
    "name",
    "description",
    "protocol",
    "type",
    "method",
    "is-allowed",
    "clickjacking-protection",
    "perform-staging",
    "mandatory-body",
    "self-link",
    "last-update",
];

const LIST_VIEW: View = View {
    context: "f5.Url",
    headers: HEADERS,
    empty: NOTHING_TO_SHOW,
};

const SINGLE_VIEW: View = View {
    context: "f5.Url",
    headers: HEADERS,
    empty: NO_DATA,
};

const TITLE: &str = "URL for selected policy";

#[derive(Debug, Clone, Args)]
pub struct ListUrls {
    #[arg(long)]
    pub policy_name: String,
}

#[derive(Debug, Clone, Args, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUrl {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    /// URL path, e.g. `/login.php`
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "http")]
    pub protocol: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, default_value = "*")]
    pub method: String,
    /// `explicit` or `wildcard`
    #[arg(long, default_value = "explicit")]
    #[serde(rename = "type")]
    pub url_type: String,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub is_allowed: bool,
}

#[derive(Debug, Clone, Args, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUrl {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    #[arg(long)]
    #[serde(skip)]
    pub name: String,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perform_staging: Option<bool>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandatory_body: Option<bool>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clickjacking_protection: Option<bool>,
    #[arg(long)]
    #[serde(rename = "urlIsReferrer", skip_serializing_if = "Option::is_none")]
    pub url_isreferrer: Option<bool>,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteUrl {
    #[arg(long)]
    pub policy_name: String,
    #[arg(long)]
    pub name: String,
}

fn record(item: &Value) -> Record {
    Record::new()
        .field("id", item, "id")
        .field("name", item, "name")
        .field("description", item, "description")
        .field("protocol", item, "protocol")
        .field("type", item, "type")
        .field("method", item, "method")
        .field("is-allowed", item, "isAllowed")
        .field("clickjacking-protection", item, "clickjackingProtection")
        .field("perform-staging", item, "performStaging")
        .field("mandatory-body", item, "mandatoryBody")
        .field("self-link", item, "selfLink")
        .last_update("last-update", item)
}

fn render(response: Value) -> CommandOutput {
    CommandOutput::single(&SINGLE_VIEW, TITLE, response, record)
}

pub async fn list(client: &AsmClient, args: ListUrls) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let response = client
        .get(&client.policy_collection_url(&policy_id, &COLLECTION.path()))
        .await?;
    Ok(CommandOutput::listing(&LIST_VIEW, TITLE, response, record))
}

pub async fn add(client: &AsmClient, args: AddUrl) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let url = client.policy_collection_url(&policy_id, &COLLECTION.path());
    let response = client.post(&url, &request_body(&args)?).await?;
    Ok(render(response))
}

pub async fn update(client: &AsmClient, args: UpdateUrl) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let url_id = resolver::resolve_member(client, &policy_id, COLLECTION, &args.name).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &url_id);
    let response = client.patch(&url, &request_body(&args)?).await?;
    Ok(render(response))
}

pub async fn delete(client: &AsmClient, args: DeleteUrl) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let url_id = resolver::resolve_member(client, &policy_id, COLLECTION, &args.name).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &url_id);
    let response = client.delete(&url).await?;
    Ok(render(response))
}
