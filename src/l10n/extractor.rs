//! Field-to-segment extractor: one entry in, its ordered segment list out.
//!
//! Dispatch per whitelisted field: a plain string becomes one `text` segment
//! keyed by field name; a repeating-component array contributes
//! `{fieldName}-title` / `{fieldName}-placeholder` segments; a rich-text
//! document is delegated to the segmenter seeded with the field name.
//! Nested entry references contribute nothing here: they are extracted under
//! their own resource.

use tracing::debug;

use crate::l10n::context::L10nContext;
use crate::l10n::segmenter::segment_document;
use crate::model::{ArrayItem, Entry, FieldValue, Segment, SegmentFormat, SegmentPayload};

/// Extract the complete segment list for one entry.
///
/// Returns `None` when the entry has no translatable content, so callers can
/// skip the resource instead of shipping an empty payload.
pub fn extract_segments(entry: &Entry, ctx: &L10nContext) -> Option<SegmentPayload> {
    let mut segments: Vec<Segment> = Vec::new();
    for (name, locales) in &entry.fields {
        if !ctx.is_localized(&entry.content_type, name) {
            continue;
        }
        let Some(value) = locales.get(&ctx.source_lang) else {
            continue;
        };
        match value {
            FieldValue::Text(text) => {
                if text.is_empty() {
                    debug!(field = %name, nid = %entry.id, "skipping empty field");
                    continue;
                }
                segments.push(Segment::new(name, text, &entry.id, SegmentFormat::Text));
            }
            FieldValue::Array(items) => {
                for item in items {
                    let ArrayItem::Component(component) = item else {
                        continue;
                    };
                    if let Some(title) = &component.title {
                        segments.push(Segment::new(
                            &format!("{}-title", component.field_name),
                            title,
                            &entry.id,
                            SegmentFormat::Text,
                        ));
                    }
                    if let Some(placeholder) = &component.placeholder {
                        segments.push(Segment::new(
                            &format!("{}-placeholder", component.field_name),
                            placeholder,
                            &entry.id,
                            SegmentFormat::Text,
                        ));
                    }
                }
            }
            FieldValue::Document(doc) => {
                segment_document(doc, name, &entry.id, 0, ctx, &mut segments);
            }
            FieldValue::Reference(_) | FieldValue::Other(_) => {
                debug!(field = %name, nid = %entry.id, "field contributes no segments");
            }
        }
    }

    if segments.is_empty() {
        debug!(id = %entry.composite_id(), "no translatable content");
        return None;
    }
    Some(SegmentPayload { segments })
}
