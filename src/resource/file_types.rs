//! File types allowed or disallowed by a policy

use anyhow::Result;
use clap::{ArgAction, Args};
use serde::Serialize;
use serde_json::Value;

use super::kind::Collection;
use super::{request_body, resolver};
use crate::f5::client::AsmClient;
use crate::render::{CommandOutput, Record, View, NO_DATA};

const COLLECTION: Collection = Collection::FileTypes;

const LIST_VIEW: View = View {
    context: "f5.FileTypes",
    headers: &[
        "name",
        "id",
        "self-link",
        "query-string-length",
        "check-request-length",
        "kind",
        "allowed",
        "last-updated",
    ],
    empty: NO_DATA,
};

const SINGLE_VIEW: View = View {
    context: "f5.FileType",
    headers: &[
        "name",
        "id",
        "self-link",
        "query-string-length",
        "check-request-length",
        "response-check",
        "check-url-length",
        "url-length",
        "post-data-length",
        "perform-staging",
        "allowed",
        "last-updated",
    ],
    empty: NO_DATA,
};

#[derive(Debug, Clone, Args)]
pub struct ListFileTypes {
    #[arg(long)]
    pub policy_name: String,
}

#[derive(Debug, Clone, Args, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFileType {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    /// File extension to add, e.g. `pdf`
    #[arg(long)]
    #[serde(rename = "name")]
    pub new_file_type: String,
    #[arg(long, default_value_t = 100)]
    pub query_string_length: u64,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub check_post_data_length: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub response_check: bool,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub check_request_length: bool,
    #[arg(long, default_value_t = 100)]
    pub post_data_length: u64,
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    pub perform_staging: bool,
}

#[derive(Debug, Clone, Args, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileType {
    #[arg(long)]
    #[serde(skip)]
    pub policy_name: String,
    #[arg(long)]
    #[serde(skip)]
    pub file_type_name: String,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_string_length: Option<u64>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_post_data_length: Option<bool>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_check: Option<bool>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_request_length: Option<bool>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_data_length: Option<u64>,
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perform_staging: Option<bool>,
}

#[derive(Debug, Clone, Args)]
pub struct DeleteFileType {
    #[arg(long)]
    pub policy_name: String,
    #[arg(long)]
    pub file_type_name: String,
}

fn list_record(item: &Value) -> Record {
    Record::new()
        .field("name", item, "name")
        .field("id", item, "id")
        .field("self-link", item, "selfLink")
        .field("query-string-length", item, "queryStringLength")
        .field("check-request-length", item, "checkRequestLength")
        .field("kind", item, "kind")
        .field("allowed", item, "allowed")
        .last_update("last-updated", item)
}

fn single_record(item: &Value) -> Record {
    Record::new()
        .field("name", item, "name")
        .field("id", item, "id")
        .field("self-link", item, "selfLink")
        .field("query-string-length", item, "queryStringLength")
        .field("check-request-length", item, "checkRequestLength")
        .field("response-check", item, "responseCheck")
        .field("check-url-length", item, "checkUrlLength")
        .field("post-data-length", item, "postDataLength")
        .field("url-length", item, "urlLength")
        .field("perform-staging", item, "performStaging")
        .field("allowed", item, "allowed")
        .last_update("last-updated", item)
}

fn render(response: Value) -> CommandOutput {
    CommandOutput::single(&SINGLE_VIEW, "f5 data for file types:", response, single_record)
}

pub async fn list(client: &AsmClient, args: ListFileTypes) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let response = client
        .get(&client.policy_collection_url(&policy_id, &COLLECTION.path()))
        .await?;
    Ok(CommandOutput::listing(
        &LIST_VIEW,
        "Listing all f5 file type:",
        response,
        list_record,
    ))
}

pub async fn add(client: &AsmClient, args: AddFileType) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let url = client.policy_collection_url(&policy_id, &COLLECTION.path());
    let response = client.post(&url, &request_body(&args)?).await?;
    Ok(render(response))
}

pub async fn update(client: &AsmClient, args: UpdateFileType) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let file_type_id =
        resolver::resolve_member(client, &policy_id, COLLECTION, &args.file_type_name).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &file_type_id);
    let response = client.patch(&url, &request_body(&args)?).await?;
    Ok(render(response))
}

pub async fn delete(client: &AsmClient, args: DeleteFileType) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let file_type_id =
        resolver::resolve_member(client, &policy_id, COLLECTION, &args.file_type_name).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &file_type_id);
    let response = client.delete(&url).await?;
    Ok(render(response))
}
