//! Core data model: entries, fields, segments and translation units.
//!
//! An [`Entry`] is a node in the content graph. Its fields are keyed first by
//! field name and then by locale tag, and each localized value is classified
//! exactly once at ingestion into a [`FieldValue`] variant (see
//! [`crate::ingest`]). The segment types mirror the wire shape consumed and
//! produced by the external translation step:
//!
//! ```json
//! { "segments": [ { "sid": "...", "str": "...", "nid": "...", "mf": "text", "nstr": ["..."] } ] }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::document::DocumentNode;

/// Fixed resource format tag carried by every [`ResourceRecord`].
pub const RESOURCE_FORMAT: &str = "MNFv1";

/// Field name → localized values for one entry.
pub type FieldMap = BTreeMap<String, LocalizedField>;

/// Locale tag → field value for one field.
pub type LocalizedField = BTreeMap<String, FieldValue>;

/// A node in the content graph with typed fields.
///
/// Entries reference each other through [`FieldValue::Reference`], array
/// elements and embedded document nodes. Shared references (diamonds) are
/// resolved by composite id during traversal, never by pointer identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Stable entry identifier.
    pub id: String,
    /// Content-type identifier governing which fields are localizable.
    pub content_type: String,
    /// Last-modified timestamp, verbatim from the platform.
    pub updated_at: Option<String>,
    /// Classification tag ids (do-not-translate filtering keys on these).
    pub tags: Vec<String>,
    pub fields: FieldMap,
}

impl Entry {
    pub fn new(id: &str, content_type: &str) -> Self {
        Entry {
            id: id.to_string(),
            content_type: content_type.to_string(),
            updated_at: None,
            tags: Vec::new(),
            fields: FieldMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, locale: &str, value: FieldValue) -> Self {
        self.fields
            .entry(name.to_string())
            .or_default()
            .insert(locale.to_string(), value);
        self
    }

    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn with_updated_at(mut self, timestamp: &str) -> Self {
        self.updated_at = Some(timestamp.to_string());
        self
    }

    /// Composite id used for resource identity and dedup: `{contentType}-{entryId}`.
    pub fn composite_id(&self) -> String {
        format!("{}-{}", self.content_type, self.id)
    }

    /// Look up one field's value in one locale.
    pub fn field(&self, name: &str, locale: &str) -> Option<&FieldValue> {
        self.fields.get(name).and_then(|locales| locales.get(locale))
    }
}

/// A single localized field value, classified once at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain translatable string.
    Text(String),
    /// A nested entry reference, resolved inline.
    Reference(Box<Entry>),
    /// Ordered sequence of nested entries or plain components.
    Array(Vec<ArrayItem>),
    /// Rich-text document tree.
    Document(DocumentNode),
    /// Unrecognized shape, carried opaquely and skipped by every pass.
    Other(Value),
}

/// One element of an array-typed field.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItem {
    Entry(Box<Entry>),
    Component(Component),
    /// Scalar or otherwise unrecognized element, preserved verbatim.
    Other(Value),
}

/// A repeating component object, e.g. a form input definition.
///
/// Only the `title` and `placeholder` attributes are translatable by
/// contract; every other attribute is preserved verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Component {
    pub field_name: String,
    pub title: Option<String>,
    pub placeholder: Option<String>,
    pub extra: serde_json::Map<String, Value>,
}

/// Metadata for one translatable unit, derived 1:1 from a qualifying entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
    /// Composite id, unique within one result set.
    pub id: String,
    pub source_lang: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prj: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    pub resource_format: String,
}

/// Content format of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentFormat {
    Text,
    Html,
}

/// One fragment of normalized content: a literal string or an opaque
/// variable marker `{ "v": ... }` substituted verbatim at reinsertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment {
    Text(String),
    Variable { v: String },
}

impl Fragment {
    /// The literal text this fragment contributes when concatenated.
    pub fn render(&self) -> &str {
        match self {
            Fragment::Text(s) => s,
            Fragment::Variable { v } => v,
        }
    }
}

/// Concatenate a fragment sequence into a single markup string, substituting
/// variable markers verbatim.
pub fn concat_fragments(fragments: &[Fragment]) -> String {
    fragments.iter().map(Fragment::render).collect()
}

/// The addressable unit of translatable text handed to translation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment id: composite, positionally derived, reproducible
    /// byte-for-byte across extraction and reinsertion passes.
    pub sid: String,
    /// Source content: raw plain text or a rendered markup string.
    #[serde(rename = "str")]
    pub source: String,
    /// Owning-entry id.
    pub nid: String,
    pub mf: SegmentFormat,
    /// Normalized fragments, initialized to a single element equal to the
    /// source content.
    pub nstr: Vec<Fragment>,
}

impl Segment {
    pub fn new(sid: &str, source: &str, nid: &str, mf: SegmentFormat) -> Self {
        Segment {
            sid: sid.to_string(),
            source: source.to_string(),
            nid: nid.to_string(),
            mf,
            nstr: vec![Fragment::Text(source.to_string())],
        }
    }
}

/// Serialized resource payload: `{ "segments": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPayload {
    pub segments: Vec<Segment>,
}

/// External input to reinsertion: a translated segment keyed by sid.
///
/// Unmatched segments are reported, never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub sid: String,
    #[serde(rename = "str", default, skip_serializing_if = "Option::is_none")]
    pub translated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nstr: Option<Vec<Fragment>>,
}

impl TranslationUnit {
    pub fn text(sid: &str, translated: &str) -> Self {
        TranslationUnit {
            sid: sid.to_string(),
            translated: Some(translated.to_string()),
            nstr: None,
        }
    }

    pub fn fragments(sid: &str, nstr: Vec<Fragment>) -> Self {
        TranslationUnit {
            sid: sid.to_string(),
            translated: None,
            nstr: Some(nstr),
        }
    }

    /// Translated content coerced to a plain string, preferring `str`.
    pub fn translated_text(&self) -> Option<String> {
        self.translated
            .clone()
            .or_else(|| self.nstr.as_deref().map(concat_fragments))
    }

    /// Translated content as a markup string, preferring the fragment list.
    pub fn translated_markup(&self) -> Option<String> {
        self.nstr
            .as_deref()
            .map(concat_fragments)
            .or_else(|| self.translated.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_composite_id() {
        let entry = Entry::new("42", "page");
        assert_eq!(entry.composite_id(), "page-42");
    }

    #[test]
    fn test_segment_wire_shape() {
        let seg = Segment::new("title", "Hello", "42", SegmentFormat::Text);
        let value = serde_json::to_value(&seg).unwrap();
        assert_eq!(
            value,
            json!({
                "sid": "title",
                "str": "Hello",
                "nid": "42",
                "mf": "text",
                "nstr": ["Hello"]
            })
        );
    }

    #[test]
    fn test_segment_payload_roundtrip() {
        let payload = SegmentPayload {
            segments: vec![Segment::new("body-0", "<p>Hi</p>", "42", SegmentFormat::Html)],
        };
        let serialized = serde_json::to_string(&payload).unwrap();
        let back: SegmentPayload = serde_json::from_str(&serialized).unwrap();
        assert_eq!(back, payload);
        assert_eq!(back.segments[0].mf, SegmentFormat::Html);
    }

    #[test]
    fn test_fragment_untagged_deserialization() {
        let fragments: Vec<Fragment> =
            serde_json::from_value(json!(["Hello, ", {"v": "{{name}}"}, "!"])).unwrap();
        assert_eq!(
            fragments,
            vec![
                Fragment::Text("Hello, ".to_string()),
                Fragment::Variable {
                    v: "{{name}}".to_string()
                },
                Fragment::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_concat_fragments_substitutes_variables_verbatim() {
        let fragments = vec![
            Fragment::Text("<p>Hello, ".to_string()),
            Fragment::Variable {
                v: "{{name}}".to_string(),
            },
            Fragment::Text("</p>".to_string()),
        ];
        assert_eq!(concat_fragments(&fragments), "<p>Hello, {{name}}</p>");
    }

    #[test]
    fn test_translation_unit_prefers_str_for_text() {
        let tu = TranslationUnit {
            sid: "title".to_string(),
            translated: Some("Bonjour".to_string()),
            nstr: Some(vec![Fragment::Text("ignored".to_string())]),
        };
        assert_eq!(tu.translated_text(), Some("Bonjour".to_string()));
    }

    #[test]
    fn test_translation_unit_prefers_fragments_for_markup() {
        let tu = TranslationUnit {
            sid: "body-0".to_string(),
            translated: Some("fallback".to_string()),
            nstr: Some(vec![Fragment::Text("<p>Bonjour</p>".to_string())]),
        };
        assert_eq!(tu.translated_markup(), Some("<p>Bonjour</p>".to_string()));
    }

    #[test]
    fn test_resource_record_camel_case() {
        let record = ResourceRecord {
            id: "page-42".to_string(),
            source_lang: "en-US".to_string(),
            prj: Some("website".to_string()),
            modified: Some("2024-01-01T00:00:00Z".to_string()),
            resource_format: RESOURCE_FORMAT.to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["sourceLang"], "en-US");
        assert_eq!(value["resourceFormat"], "MNFv1");
    }
}
