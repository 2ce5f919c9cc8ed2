//! Cookies enforced by a policy

use anyhow::Result;
use clap::{ArgAction, Args};
use serde::Serialize;
use serde_json::Value;

use super::kind::Collection;
use super::{request_body, resolver};
use crate::f5::client::AsmClient;
use crate::render::{CommandOutput, Record, View, NO_DATA};

const COLLECTION: Collection = Collection::Cookies;

const LIST_VIEW: View = View {
    context: "f5.Cookies",
    headers: &[
        "name",
        "id",
        "self-link",
        "enforcement-type",
        "perform-staging",
        "kind",
        "is-base-64",
        "created-by",
    ],
    empty: NO_DATA,
};

const SINGLE_VIEW: View = View {
    context: "f5.Cookies",
    headers: &[
        "name",
        "id",
        "self-link",
        "enforcement-type",
        "perform-staging",
        "type",
        "is-base-64",
        "created-by",
    ],
    empty: NO_DATA,
};

#[derive(Debug, Clone, Args)]
pub struct ListCookies {
    #[arg(long)]
    pub policy_name: String,
}

#[derive(Debug, Clone, Args, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCookie {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    #[arg(long)]
    #[serde(rename = "name")]
    pub new_cookie_name: String,
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub perform_staging: bool,
}

#[derive(Debug, Clone, Args, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCookie {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    #[arg(long)]
    #[serde(skip)]
    pub cookie_name: String,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perform_staging: Option<bool>,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteCookie {
    #[arg(long)]
    pub policy_name: String,
    #[arg(long)]
    pub cookie_name: String,
}

fn list_record(item: &Value) -> Record {
    Record::new()
        .field("name", item, "name")
        .field("id", item, "id")
        .field("self-link", item, "selfLink")
        .field("enforcement-type", item, "enforcementType")
        .field("perform-staging", item, "performStaging")
        .field("kind", item, "kind")
        .field("is-base-64", item, "isBase64")
        .field("created-by", item, "createdBy")
}

fn single_record(item: &Value) -> Record {
    Record::new()
        .field("name", item, "name")
        .field("id", item, "id")
        .field("self-link", item, "selfLink")
        .field("enforcement-type", item, "enforcementType")
        .field("perform-staging", item, "performStaging")
        .field("type", item, "type")
        .field("is-base-64", item, "isBase64")
        .field("created-by", item, "createdBy")
}

/// `action` is the verb shown in the title: adding, updating or deleting
fn render(response: Value, action: &str) -> CommandOutput {
    let title = format!("f5 data for {} policy cookies:", action);
    CommandOutput::single(&SINGLE_VIEW, &title, response, single_record)
}

pub async fn list(client: &AsmClient, args: ListCookies) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let response = client
        .get(&client.policy_collection_url(&policy_id, &COLLECTION.path()))
        .await?;
    Ok(CommandOutput::listing(
        &LIST_VIEW,
        "f5 data for policy cookies:",
        response,
        list_record,
    ))
}

pub async fn add(client: &AsmClient, args: AddCookie) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let url = client.policy_collection_url(&policy_id, &COLLECTION.path());
    let response = client.post(&url, &request_body(&args)?).await?;
    Ok(render(response, "adding"))
}

pub async fn update(client: &AsmClient, args: UpdateCookie) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let cookie_id =
        resolver::resolve_member(client, &policy_id, COLLECTION, &args.cookie_name).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &cookie_id);
    let response = client.patch(&url, &request_body(&args)?).await?;
    Ok(render(response, "updating"))
}

pub async fn delete(client: &AsmClient, args: DeleteCookie) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let cookie_id =
        resolver::resolve_member(client, &policy_id, COLLECTION, &args.cookie_name).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &cookie_id);
    let response = client.delete(&url).await?;
    Ok(render(response, "deleting"))
}
