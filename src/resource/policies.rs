//! Policies: list, apply, export, delete

use anyhow::Result;
use clap::Args;
use serde_json::{json, Value};

use super::resolver;
use crate::f5::client::AsmClient;
use crate::render::{CommandOutput, Record, View, NO_DATA};

const LIST_VIEW: View = View {
    context: "f5.ListPolicies",
    headers: &[
        "name",
        "id",
        "type",
        "enforcement-mode",
        "creator-name",
        "active",
        "created-time",
    ],
    empty: NO_DATA,
};

const APPLY_VIEW: View = View {
    context: "f5.ApplyPolicy",
    headers: &["policy-reference", "status", "id", "start-time", "kind"],
    empty: NO_DATA,
};

const EXPORT_VIEW: View = View {
    context: "f5.ExportPolicy",
    headers: &[
        "status",
        "id",
        "start-time",
        "kind",
        "format",
        "filename",
        "policy-reference",
    ],
    empty: NO_DATA,
};

const DELETE_VIEW: View = View {
    context: "f5.delete-policy",
    headers: &["name", "id", "self-link"],
    empty: NO_DATA,
};

#[derive(Debug, Clone, Args)]
pub struct ApplyPolicy {
    /// Link of the policy to apply
    #[arg(long)]
    pub policy_reference_link: String,
}

#[derive(Debug, Clone, Args)]
pub struct ExportPolicy {
    /// Name of the file to export to
    #[arg(long)]
    pub filename: String,
    /// Export only custom settings
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub minimal: bool,
    /// Link of the policy to export
    #[arg(long)]
    pub policy_reference_link: String,
}

#[derive(Debug, Clone, Args)]
pub struct DeletePolicy {
    #[arg(long)]
    pub policy_name: String,
}

fn policy_record(item: &Value) -> Record {
    Record::new()
        .field("name", item, "name")
        .field("id", item, "id")
        .field("type", item, "type")
        .field("creator-name", item, "creatorName")
        .field("created-time", item, "createdDatetime")
        .field("enforcement-mode", item, "enforcementMode")
        .field("active", item, "active")
}

fn task_record(item: &Value) -> Record {
    Record::new()
        .link("policy-reference", item, "policyReference")
        .field("status", item, "status")
        .field("id", item, "id")
        .field("start-time", item, "startTime")
        .field("kind", item, "kind")
        .field("format", item, "format")
        .field("filename", item, "filename")
}

fn deleted_record(item: &Value) -> Record {
    Record::new()
        .field("name", item, "name")
        .field("id", item, "id")
        .field("self-link", item, "selfLink")
}

/// List all policies on the server
pub async fn list(client: &AsmClient) -> Result<CommandOutput> {
    let response = client.get(&client.policies_url()).await?;
    Ok(CommandOutput::listing(
        &LIST_VIEW,
        "f5 data for listing policies:",
        response,
        policy_record,
    ))
}

/// Start an apply-policy task
pub async fn apply(client: &AsmClient, args: ApplyPolicy) -> Result<CommandOutput> {
    let body = json!({"policyReference": {"link": args.policy_reference_link}});
    let response = client.post(&client.task_url("apply-policy"), &body).await?;
    Ok(CommandOutput::single(
        &APPLY_VIEW,
        "f5 data for applying policy:",
        response,
        task_record,
    ))
}

/// Start an export-policy task
pub async fn export(client: &AsmClient, args: ExportPolicy) -> Result<CommandOutput> {
    let body = json!({
        "filename": args.filename,
        "minimal": args.minimal,
        "policyReference": {"link": args.policy_reference_link},
    });
    let response = client.post(&client.task_url("export-policy"), &body).await?;
    Ok(CommandOutput::single(
        &EXPORT_VIEW,
        "f5 data for exporting policy:",
        response,
        task_record,
    ))
}

/// Delete a policy by name
pub async fn delete(client: &AsmClient, args: DeletePolicy) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let response = client.delete(&client.policy_url(&policy_id)).await?;
    Ok(CommandOutput::single(
        &DELETE_VIEW,
        "f5 data for deleting policy:",
        response,
        deleted_record,
    ))
}
