//! Ingestion: platform-shaped JSON → typed model, and back.
//!
//! Every field value's shape is decided exactly once here, at ingestion,
//! instead of being re-sniffed by each pass: a plain string, a nested entry
//! (`sys` + `fields`), an array of entries/components, a rich-text document
//! (`nodeType` + `content`), or an opaque leftover.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::document::{DocumentNode, Mark, NodeKind};
use crate::l10n::error::{L10nError, L10nResult};
use crate::model::{ArrayItem, Component, Entry, FieldMap, FieldValue, LocalizedField};

/// Parse a batch of entries: either a bare JSON array or the platform's
/// `{ "items": [...] }` envelope.
pub fn entries_from_value(value: &Value) -> L10nResult<Vec<Entry>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| L10nError::MalformedEntry("expected an array or {\"items\": [...]}".to_string()))?,
        _ => {
            return Err(L10nError::MalformedEntry(
                "expected an array or {\"items\": [...]}".to_string(),
            ));
        }
    };
    items.iter().map(entry_from_value).collect()
}

/// Parse one platform-shaped entry:
/// `{ "sys": { "id", "contentType": { "sys": { "id" } }, "updatedAt" },
///    "metadata": { "tags": [...] }, "fields": { name: { locale: value } } }`.
pub fn entry_from_value(value: &Value) -> L10nResult<Entry> {
    let sys = value
        .get("sys")
        .ok_or_else(|| L10nError::MalformedEntry("entry without sys".to_string()))?;
    let id = sys
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| L10nError::MalformedEntry("entry without sys.id".to_string()))?;
    let content_type = sys
        .get("contentType")
        .and_then(|ct| ct.get("sys"))
        .and_then(|s| s.get("id"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            L10nError::MalformedEntry(format!("entry {} without content type", id))
        })?;

    let mut entry = Entry::new(id, content_type);
    entry.updated_at = sys
        .get("updatedAt")
        .and_then(Value::as_str)
        .map(str::to_string);
    entry.tags = tag_ids(value);
    if let Some(fields) = value.get("fields").and_then(Value::as_object) {
        for (name, locales) in fields {
            let Some(locales) = locales.as_object() else {
                debug!(field = %name, "skipping field without locale map");
                continue;
            };
            let mut localized = LocalizedField::new();
            for (locale, raw) in locales {
                localized.insert(locale.clone(), field_value_from_value(raw)?);
            }
            entry.fields.insert(name.clone(), localized);
        }
    }
    Ok(entry)
}

/// Tag ids from the metadata envelope; only `Tag` links count.
fn tag_ids(value: &Value) -> Vec<String> {
    value
        .get("metadata")
        .and_then(|m| m.get("tags"))
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter(|t| {
                    t.get("sys")
                        .and_then(|s| s.get("linkType"))
                        .and_then(Value::as_str)
                        == Some("Tag")
                })
                .filter_map(|t| t.get("sys").and_then(|s| s.get("id")).and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn is_entry_shaped(value: &Value) -> bool {
    value.get("sys").is_some() && value.get("fields").is_some()
}

fn is_document_shaped(value: &Value) -> bool {
    value.get("nodeType").is_some() && value.get("content").is_some()
}

/// Classify one localized field value into its tagged-union shape.
pub fn field_value_from_value(value: &Value) -> L10nResult<FieldValue> {
    match value {
        Value::String(s) => Ok(FieldValue::Text(s.clone())),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if is_entry_shaped(item) {
                    out.push(ArrayItem::Entry(Box::new(entry_from_value(item)?)));
                } else if let Some(map) = item.as_object() {
                    out.push(ArrayItem::Component(component_from_map(map)));
                } else {
                    out.push(ArrayItem::Other(item.clone()));
                }
            }
            Ok(FieldValue::Array(out))
        }
        _ if is_document_shaped(value) => Ok(FieldValue::Document(document_from_value(value)?)),
        _ if is_entry_shaped(value) => {
            Ok(FieldValue::Reference(Box::new(entry_from_value(value)?)))
        }
        other => Ok(FieldValue::Other(other.clone())),
    }
}

fn component_from_map(map: &Map<String, Value>) -> Component {
    let mut component = Component::default();
    for (key, value) in map {
        match (key.as_str(), value) {
            ("fieldName", Value::String(s)) => component.field_name = s.clone(),
            ("title", Value::String(s)) => component.title = Some(s.clone()),
            ("placeholder", Value::String(s)) => component.placeholder = Some(s.clone()),
            _ => {
                component.extra.insert(key.clone(), value.clone());
            }
        }
    }
    component
}

/// Parse a rich-text document node.
pub fn document_from_value(value: &Value) -> L10nResult<DocumentNode> {
    let node_type = value
        .get("nodeType")
        .and_then(Value::as_str)
        .ok_or_else(|| L10nError::MalformedDocument("node without nodeType".to_string()))?;
    let mut node = DocumentNode::new(NodeKind::from_wire(node_type));

    node.value = value.get("value").and_then(Value::as_str).map(str::to_string);
    if let Some(marks) = value.get("marks").and_then(Value::as_array) {
        node.marks = marks
            .iter()
            .filter_map(|m| m.get("type").and_then(Value::as_str))
            .map(Mark::from_wire)
            .collect();
    }
    if let Some(data) = value.get("data") {
        match data.get("target") {
            Some(target) if is_entry_shaped(target) => {
                node.target = Some(Box::new(entry_from_value(target)?));
            }
            _ => {
                if data.as_object().is_some_and(|m| !m.is_empty()) {
                    node.data = data.clone();
                }
            }
        }
    }
    if let Some(content) = value.get("content").and_then(Value::as_array) {
        node.content = content
            .iter()
            .map(document_from_value)
            .collect::<L10nResult<Vec<_>>>()?;
    }
    Ok(node)
}

/// Serialize an entry back to the platform shape.
pub fn entry_to_value(entry: &Entry) -> Value {
    let mut sys = json!({
        "type": "Entry",
        "id": entry.id,
        "contentType": { "sys": { "type": "Link", "linkType": "ContentType", "id": entry.content_type } },
    });
    if let Some(updated_at) = &entry.updated_at {
        sys["updatedAt"] = json!(updated_at);
    }
    let tags: Vec<Value> = entry
        .tags
        .iter()
        .map(|t| json!({ "sys": { "type": "Link", "linkType": "Tag", "id": t } }))
        .collect();
    json!({
        "sys": sys,
        "metadata": { "tags": tags },
        "fields": fields_to_value(&entry.fields),
    })
}

/// Serialize an entry's field map back to the platform shape.
pub fn fields_to_value(fields: &FieldMap) -> Value {
    let mut out = Map::new();
    for (name, locales) in fields {
        let mut localized = Map::new();
        for (locale, value) in locales {
            localized.insert(locale.clone(), field_value_to_value(value));
        }
        out.insert(name.clone(), Value::Object(localized));
    }
    Value::Object(out)
}

pub fn field_value_to_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(s) => Value::String(s.clone()),
        FieldValue::Reference(entry) => entry_to_value(entry),
        FieldValue::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| match item {
                    ArrayItem::Entry(entry) => entry_to_value(entry),
                    ArrayItem::Component(component) => component_to_value(component),
                    ArrayItem::Other(raw) => raw.clone(),
                })
                .collect(),
        ),
        FieldValue::Document(node) => document_to_value(node),
        FieldValue::Other(raw) => raw.clone(),
    }
}

fn component_to_value(component: &Component) -> Value {
    let mut map = Map::new();
    if !component.field_name.is_empty() {
        map.insert("fieldName".to_string(), json!(component.field_name));
    }
    if let Some(title) = &component.title {
        map.insert("title".to_string(), json!(title));
    }
    if let Some(placeholder) = &component.placeholder {
        map.insert("placeholder".to_string(), json!(placeholder));
    }
    for (key, value) in &component.extra {
        map.insert(key.clone(), value.clone());
    }
    Value::Object(map)
}

pub fn document_to_value(node: &DocumentNode) -> Value {
    let mut map = Map::new();
    map.insert("nodeType".to_string(), json!(node.kind.as_wire()));
    let data = match &node.target {
        Some(target) => json!({ "target": entry_to_value(target) }),
        None if node.data.is_object() => node.data.clone(),
        None => json!({}),
    };
    map.insert("data".to_string(), data);
    if let Some(value) = &node.value {
        map.insert("value".to_string(), json!(value));
        map.insert(
            "marks".to_string(),
            Value::Array(
                node.marks
                    .iter()
                    .map(|m| json!({ "type": m.as_wire() }))
                    .collect(),
            ),
        );
    } else {
        map.insert(
            "content".to_string(),
            Value::Array(node.content.iter().map(document_to_value).collect()),
        );
    }
    Value::Object(map)
}
