//! Blocking settings: evasions, violations, web-services securities and
//! HTTP protocol checks. Entries have no name, so the description is used as
//! the natural key.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use super::kind::{BlockingEndpoint, Collection};
use super::{request_body, resolver};
use crate::f5::client::AsmClient;
use crate::render::{CommandOutput, Record, View, NOTHING_TO_SHOW, NO_DATA};

const HEADERS: &[&str] = &[
    "id",
    "description",
    "enabled",
    "learn",
    "alarm",
    "block",
    "kind",
    "reference",
    "self-link",
    "section-reference",
    "last-update",
];

const LIST_VIEW: View = View {
    context: "f5.BlockingSettings",
    headers: HEADERS,
    empty: NOTHING_TO_SHOW,
};

const SINGLE_VIEW: View = View {
    context: "f5.BlockingSettings",
    headers: HEADERS,
    empty: NO_DATA,
};

#[derive(Debug, Clone, Args)]
pub struct ListBlockingSettings {
    #[arg(long)]
    pub policy_name: String,
    #[arg(long, value_enum)]
    pub endpoint: BlockingEndpoint,
}

#[derive(Debug, Clone, Args, Serialize)]
pub struct UpdateBlockingSetting {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    #[arg(long, value_enum)]
    #[serde(skip)]
    pub endpoint: BlockingEndpoint,
    /// Description of the entry to change
    #[arg(long)]
    #[serde(skip)]
    pub description: String,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learn: Option<bool>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm: Option<bool>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<bool>,
}

fn record(item: &Value, endpoint: BlockingEndpoint) -> Record {
    Record::new()
        .field("description", item, "description")
        .field("learn", item, "learn")
        .field("alarm", item, "alarm")
        .field("block", item, "block")
        .field("id", item, "id")
        .field("kind", item, "kind")
        .field("enabled", item, "enabled")
        .field("self-link", item, "selfLink")
        .link("section-reference", item, "sectionReference")
        .last_update("last-update", item)
        .link("reference", item, endpoint.reference_field())
}

pub async fn list(client: &AsmClient, args: ListBlockingSettings) -> Result<CommandOutput> {
    let collection = Collection::BlockingSettings(args.endpoint);
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let response = client
        .get(&client.policy_collection_url(&policy_id, &collection.path()))
        .await?;

    let title = format!("{} for selected policy", args.endpoint.title());
    Ok(CommandOutput::listing(&LIST_VIEW, &title, response, |item| {
        record(item, args.endpoint)
    }))
}

pub async fn update(client: &AsmClient, args: UpdateBlockingSetting) -> Result<CommandOutput> {
    let collection = Collection::BlockingSettings(args.endpoint);
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let setting_id =
        resolver::resolve_member(client, &policy_id, collection, &args.description).await?;
    let url = client.policy_member_url(&policy_id, &collection.path(), &setting_id);
    let response = client.patch(&url, &request_body(&args)?).await?;

    let title = format!("Modified {}", args.endpoint);
    Ok(CommandOutput::single(&SINGLE_VIEW, &title, response, |item| {
        record(item, args.endpoint)
    }))
}
