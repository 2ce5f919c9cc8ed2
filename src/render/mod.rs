//! Response Formatter
//!
//! Turns raw ASM JSON into the triple a command reports: a markdown table,
//! a context object keyed by resource kind, and the untouched response.
//!
//! - [`Record`] - ordered display fields of one entry, nulls dropped
//! - [`View`] - per-kind table headers, context key and "nothing" marker
//! - [`CommandOutput`] - the reported triple
//! - [`time`] - microsecond timestamp formatting

pub mod time;

use serde_json::{json, Map, Value};

/// Marker used by most kinds when there is nothing to render
pub const NO_DATA: &str = "No data to show.";

/// Marker used by hostnames, blocking-settings lists and URL lists
pub const NOTHING_TO_SHOW: &str = "Nothing to show";

/// Merge hint appended to every context key
const CONTEXT_SUFFIX: &str = "(val.uid && val.uid == obj.uid)";

/// Ordered display fields of one entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field unless the value is absent or null
    pub fn with(mut self, name: &'static str, value: Option<&Value>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_null()) {
            self.fields.push((name, value.clone()));
        }
        self
    }

    /// Copy `key` of `item` into display field `name`
    pub fn field(self, name: &'static str, item: &Value, key: &str) -> Self {
        self.with(name, item.get(key))
    }

    /// Copy the `link` of reference object `key` into display field `name`
    pub fn link(self, name: &'static str, item: &Value, key: &str) -> Self {
        self.with(name, item.get(key).and_then(|r| r.get("link")))
    }

    /// Format `lastUpdateMicros` of `item` into display field `name`
    pub fn last_update(self, name: &'static str, item: &Value) -> Self {
        let formatted = item
            .get("lastUpdateMicros")
            .and_then(time::micros_of)
            .and_then(time::format_micros)
            .map(Value::String);
        self.with(name, formatted.as_ref())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(n, v)| (n.to_string(), v.clone()))
            .collect();
        Value::Object(map)
    }
}

/// How one resource kind is presented
#[derive(Debug, Clone, Copy)]
pub struct View {
    /// Context namespace, e.g. `f5.Hostname`
    pub context: &'static str,
    /// Table columns in display order
    pub headers: &'static [&'static str],
    /// Text returned when there is nothing to render
    pub empty: &'static str,
}

impl View {
    pub fn context_key(&self) -> String {
        format!("{}{}", self.context, CONTEXT_SUFFIX)
    }
}

/// Result of one command: markdown, context and raw response
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    pub readable: String,
    pub context: Map<String, Value>,
    pub raw: Value,
}

impl CommandOutput {
    /// Nothing to render: the marker text and an empty context
    pub fn nothing(marker: &str, raw: Value) -> Self {
        Self {
            readable: marker.to_string(),
            context: Map::new(),
            raw,
        }
    }

    /// Plain text result with no context
    pub fn message(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            readable: text.clone(),
            context: Map::new(),
            raw: Value::String(text),
        }
    }

    /// Render a single-object response
    pub fn single<F>(view: &View, title: &str, raw: Value, to_record: F) -> Self
    where
        F: Fn(&Value) -> Record,
    {
        if is_blank(&raw) {
            return Self::nothing(view.empty, raw);
        }

        let record = to_record(&raw);
        let readable = markdown_table(title, view.headers, std::slice::from_ref(&record));

        let mut context = Map::new();
        context.insert(view.context_key(), record.to_value());

        Self {
            readable,
            context,
            raw,
        }
    }

    /// Render the `items` of a collection response
    pub fn listing<F>(view: &View, title: &str, raw: Value, to_record: F) -> Self
    where
        F: Fn(&Value) -> Record,
    {
        let records: Vec<Record> = match raw.get("items").and_then(|v| v.as_array()) {
            Some(items) if !items.is_empty() => items.iter().map(&to_record).collect(),
            _ => return Self::nothing(view.empty, raw),
        };

        let readable = markdown_table(title, view.headers, &records);

        let mut context = Map::new();
        context.insert(
            view.context_key(),
            Value::Array(records.iter().map(Record::to_value).collect()),
        );

        Self {
            readable,
            context,
            raw,
        }
    }

    /// Host war-room entry for a successful command
    pub fn to_entry(&self) -> Value {
        json!({
            "Type": 1,
            "ContentsFormat": "json",
            "Contents": self.raw,
            "HumanReadable": self.readable,
            "EntryContext": self.context,
        })
    }
}

/// Host war-room entry for a failed command
pub fn error_entry(message: &str) -> Value {
    json!({
        "Type": 4,
        "ContentsFormat": "text",
        "Contents": message,
    })
}

/// Empty responses render as the "nothing" marker
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(arr) => arr.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Render records as a titled markdown table.
/// Columns with no value in any row are left out.
pub fn markdown_table(title: &str, headers: &[&str], rows: &[Record]) -> String {
    let columns: Vec<&str> = headers
        .iter()
        .copied()
        .filter(|h| rows.iter().any(|r| r.get(h).is_some()))
        .collect();

    let mut out = format!("### {}\n", title);

    if columns.is_empty() {
        out.push_str("**No entries.**\n");
        return out;
    }

    out.push('|');
    for column in &columns {
        out.push_str(column);
        out.push('|');
    }
    out.push('\n');

    out.push('|');
    for _ in &columns {
        out.push_str("---|");
    }
    out.push('\n');

    for row in rows {
        out.push('|');
        for column in &columns {
            out.push(' ');
            if let Some(value) = row.get(column) {
                out.push_str(&escape_cell(&cell_text(value)));
            }
            out.push_str(" |");
        }
        out.push('\n');
    }

    out
}

/// Display text of a JSON value
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: View = View {
        context: "f5.Test",
        headers: &["name", "id", "allowed"],
        empty: NO_DATA,
    };

    fn record(item: &Value) -> Record {
        Record::new()
            .field("name", item, "name")
            .field("id", item, "id")
            .field("allowed", item, "allowed")
    }

    #[test]
    fn test_record_drops_nulls() {
        let item = json!({"name": "a", "id": null});
        let rec = record(&item);
        assert_eq!(rec.names().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(rec.to_value(), json!({"name": "a"}));
    }

    #[test]
    fn test_listing_renders_table_and_context() {
        let raw = json!({"items": [
            {"name": "pdf", "id": "1", "allowed": true},
            {"name": "exe", "id": "2"}
        ]});
        let out = CommandOutput::listing(&VIEW, "File types", raw.clone(), record);

        assert_eq!(
            out.readable,
            "### File types\n|name|id|allowed|\n|---|---|---|\n| pdf | 1 | true |\n| exe | 2 |  |\n"
        );
        assert_eq!(
            out.context["f5.Test(val.uid && val.uid == obj.uid)"],
            json!([
                {"name": "pdf", "id": "1", "allowed": true},
                {"name": "exe", "id": "2"}
            ])
        );
        assert_eq!(out.raw, raw);
    }

    #[test]
    fn test_empty_listing_uses_marker() {
        let out = CommandOutput::listing(&VIEW, "x", json!({"items": []}), record);
        assert_eq!(out.readable, "No data to show.");
        assert!(out.context.is_empty());

        let out = CommandOutput::listing(&VIEW, "x", json!({"kind": "collection"}), record);
        assert_eq!(out.readable, "No data to show.");
    }

    #[test]
    fn test_blank_single_uses_marker() {
        let view = View {
            empty: NOTHING_TO_SHOW,
            ..VIEW
        };
        let out = CommandOutput::single(&view, "x", Value::Null, record);
        assert_eq!(out.readable, "Nothing to show");
        assert!(out.context.is_empty());
    }

    #[test]
    fn test_single_context_is_an_object() {
        let out = CommandOutput::single(&VIEW, "One", json!({"name": "a", "id": "9"}), record);
        assert_eq!(
            out.context[&VIEW.context_key()],
            json!({"name": "a", "id": "9"})
        );
        assert!(out.readable.starts_with("### One\n|name|id|\n"));
    }

    #[test]
    fn test_cells_are_escaped() {
        let rows = vec![Record::new().with("name", Some(&json!("a|b\nc")))];
        let md = markdown_table("t", &["name"], &rows);
        assert!(md.contains("| a\\|b<br>c |"));
    }

    #[test]
    fn test_table_without_columns() {
        let md = markdown_table("t", &["name"], &[Record::new()]);
        assert_eq!(md, "### t\n**No entries.**\n");
    }

    #[test]
    fn test_entries() {
        let out = CommandOutput::message("ok");
        assert_eq!(out.to_entry()["HumanReadable"], "ok");
        assert_eq!(error_entry("boom")["Type"], 4);
    }
}
