//! Allowed HTTP methods of a policy

use anyhow::Result;
use clap::Args;
use serde_json::{json, Map, Value};

use super::kind::Collection;
use super::resolver;
use crate::f5::client::AsmClient;
use crate::render::{CommandOutput, Record, View, NO_DATA};

const COLLECTION: Collection = Collection::Methods;

const LIST_VIEW: View = View {
    context: "f5.PolicyMethods",
    headers: &["name", "act-as-method", "id", "self-link", "kind", "last-updated"],
    empty: NO_DATA,
};

const SINGLE_VIEW: View = View {
    context: "f5.PolicyMethods",
    headers: &["name", "act-as-method", "id", "self-link", "kind"],
    empty: NO_DATA,
};

#[derive(Debug, Clone, Args)]
pub struct ListMethods {
    #[arg(long)]
    pub policy_name: String,
}

#[derive(Debug, Clone, Args)]
pub struct AddMethod {
    #[arg(long)]
    pub policy_name: String,
    /// Display name of the new method
    #[arg(long)]
    pub new_method_name: String,
    /// Method whose behavior the new one copies
    #[arg(long, default_value = "GET")]
    pub act_as_method: String,
}

impl AddMethod {
    pub fn body(&self) -> Value {
        json!({
            "name": self.new_method_name,
            "actAsMethod": self.act_as_method.to_uppercase(),
        })
    }
}

#[derive(Debug, Clone, Args)]
pub struct UpdateMethod {
    #[arg(long)]
    pub policy_name: String,
    #[arg(long)]
    pub method_name: String,
    #[arg(long)]
    pub act_as_method: Option<String>,
}

impl UpdateMethod {
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        if let Some(method) = &self.act_as_method {
            body.insert("actAsMethod".into(), Value::String(method.to_uppercase()));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Args)]
pub struct DeleteMethod {
    #[arg(long)]
    pub policy_name: String,
    #[arg(long)]
    pub method_name: String,
}

fn list_record(item: &Value) -> Record {
    Record::new()
        .field("name", item, "name")
        .field("act-as-method", item, "actAsMethod")
        .field("id", item, "id")
        .field("self-link", item, "selfLink")
        .field("kind", item, "kind")
        .last_update("last-updated", item)
}

fn single_record(item: &Value) -> Record {
    Record::new()
        .field("name", item, "name")
        .field("id", item, "id")
        .field("act-as-method", item, "actAsMethod")
        .field("self-link", item, "selfLink")
        .field("kind", item, "kind")
}

fn render(response: Value) -> CommandOutput {
    CommandOutput::single(&SINGLE_VIEW, "f5 data for policy methods:", response, single_record)
}

pub async fn list(client: &AsmClient, args: ListMethods) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let response = client
        .get(&client.policy_collection_url(&policy_id, &COLLECTION.path()))
        .await?;
    Ok(CommandOutput::listing(
        &LIST_VIEW,
        "f5 data for listing all policy methods:",
        response,
        list_record,
    ))
}

pub async fn add(client: &AsmClient, args: AddMethod) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let url = client.policy_collection_url(&policy_id, &COLLECTION.path());
    let response = client.post(&url, &args.body()).await?;
    Ok(render(response))
}

pub async fn update(client: &AsmClient, args: UpdateMethod) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let method_id =
        resolver::resolve_member(client, &policy_id, COLLECTION, &args.method_name).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &method_id);
    let response = client.patch(&url, &args.body()).await?;
    Ok(render(response))
}

pub async fn delete(client: &AsmClient, args: DeleteMethod) -> Result<CommandOutput> {
    let policy_id = resolver::resolve_policy(client, &args.policy_name).await?;
    let method_id =
        resolver::resolve_member(client, &policy_id, COLLECTION, &args.method_name).await?;
    let url = client.policy_member_url(&policy_id, &COLLECTION.path(), &method_id);
    let response = client.delete(&url).await?;
    Ok(render(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_body_uppercases_method() {
        let args = AddMethod {
            policy_name: "p".into(),
            new_method_name: "PURGE".into(),
            act_as_method: "post".into(),
        };
        assert_eq!(args.body(), json!({"name": "PURGE", "actAsMethod": "POST"}));
    }

    #[test]
    fn test_update_body_only_carries_supplied_fields() {
        let mut args = UpdateMethod {
            policy_name: "p".into(),
            method_name: "PURGE".into(),
            act_as_method: None,
        };
        assert_eq!(args.body(), json!({}));

        args.act_as_method = Some("get".into());
        assert_eq!(args.body(), json!({"actAsMethod": "GET"}));
    }
}
