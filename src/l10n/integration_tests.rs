//! End-to-end tests for the extraction/reinsertion pipeline.
//!
//! These exercise the full path: platform-shaped JSON → graph walk →
//! segment extraction → reinsertion with a translated payload → change
//! detection. The central property is symmetry: reinserting every segment's
//! own source content reproduces the original structure exactly.

#[cfg(test)]
mod tests {
    use crate::document::{DocumentNode, NodeKind};
    use crate::ingest::{entries_from_value, entry_from_value};
    use crate::l10n::context::L10nContext;
    use crate::l10n::extractor::extract_segments;
    use crate::l10n::reinsert::reinsert_translations;
    use crate::l10n::walker::list_translatable_resources;
    use crate::model::{Entry, FieldValue, TranslationUnit};
    use serde_json::json;

    fn ctx() -> L10nContext {
        L10nContext::new()
            .with_project("website")
            .with_localized_fields("page", &["title", "body"])
            .with_localized_fields("quote", &["text"])
            .with_dnt_tag("doNotTranslate")
    }

    fn identity_units(entry: &Entry, ctx: &L10nContext) -> Vec<TranslationUnit> {
        extract_segments(entry, ctx)
            .map(|payload| {
                payload
                    .segments
                    .into_iter()
                    .map(|seg| TranslationUnit {
                        sid: seg.sid,
                        translated: None,
                        nstr: Some(seg.nstr),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn rich_entry() -> Entry {
        let body = DocumentNode::with_children(
            NodeKind::Document,
            vec![
                DocumentNode::with_children(
                    NodeKind::Heading1,
                    vec![DocumentNode::text("Welcome")],
                ),
                DocumentNode::with_children(
                    NodeKind::Paragraph,
                    vec![
                        DocumentNode::text("Intro with "),
                        DocumentNode::marked_text("emphasis", vec![crate::document::Mark::Bold]),
                        DocumentNode::text("."),
                    ],
                ),
                DocumentNode::with_children(
                    NodeKind::UnorderedList,
                    vec![
                        DocumentNode::with_children(
                            NodeKind::ListItem,
                            vec![DocumentNode::with_children(
                                NodeKind::Paragraph,
                                vec![DocumentNode::text("first point")],
                            )],
                        ),
                        DocumentNode::with_children(
                            NodeKind::ListItem,
                            vec![DocumentNode::with_children(
                                NodeKind::Paragraph,
                                vec![DocumentNode::text("second point")],
                            )],
                        ),
                    ],
                ),
                DocumentNode::with_children(
                    NodeKind::Paragraph,
                    vec![DocumentNode::text("Closing thoughts")],
                ),
            ],
        );
        Entry::new("home", "page")
            .with_field("title", "en-US", FieldValue::Text("Home".to_string()))
            .with_field("body", "en-US", FieldValue::Document(body))
    }

    #[test]
    fn test_identity_reinsertion_reproduces_document() {
        let ctx = ctx();
        let entry = rich_entry();
        let units = identity_units(&entry, &ctx);
        let outcome = reinsert_translations(&entry, "fr", &units, &ctx).unwrap();

        // the target-language copies must be structurally identical to the
        // source-language originals
        for (name, locales) in &outcome.fields {
            let source = &entry.fields[name]["en-US"];
            assert_eq!(
                locales.get("fr"),
                Some(source),
                "field {} must survive identity translation unchanged",
                name
            );
        }
    }

    #[test]
    fn test_identity_reinsertion_twice_is_stable() {
        let ctx = ctx();
        let entry = rich_entry();
        let units = identity_units(&entry, &ctx);
        let first = reinsert_translations(&entry, "fr", &units, &ctx).unwrap();

        let mut translated = entry.clone();
        translated.fields = first.fields.clone();
        let second = reinsert_translations(&translated, "fr", &units, &ctx).unwrap();
        // nothing left to change on the second pass
        assert!(!second.needs_write_back);
        assert_eq!(second.fields, first.fields);
    }

    #[test]
    fn test_extraction_ids_deterministic_across_runs() {
        let ctx = ctx();
        let entry = rich_entry();
        let first: Vec<String> = extract_segments(&entry, &ctx)
            .unwrap()
            .segments
            .into_iter()
            .map(|s| s.sid)
            .collect();
        let second: Vec<String> = extract_segments(&entry, &ctx)
            .unwrap()
            .segments
            .into_iter()
            .map(|s| s.sid)
            .collect();
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec!["body-0", "body-1", "body-2", "body-3", "body-4", "title"]
        );
    }

    #[test]
    fn test_single_text_field_end_to_end() {
        // entry {sys:{id:"42",contentType:page}, fields:{title:{en-US:"Hello"}}}
        let entry = entry_from_value(&json!({
            "sys": { "id": "42", "contentType": { "sys": { "id": "page" } } },
            "fields": { "title": { "en-US": "Hello" } }
        }))
        .unwrap();
        let ctx = ctx();

        let payload = extract_segments(&entry, &ctx).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "segments": [
                { "sid": "title", "str": "Hello", "nid": "42", "mf": "text", "nstr": ["Hello"] }
            ] })
        );

        let units = vec![TranslationUnit::text("title", "Bonjour")];
        let outcome = reinsert_translations(&entry, "fr", &units, &ctx).unwrap();
        assert_eq!(
            outcome.fields["title"]["fr"],
            FieldValue::Text("Bonjour".to_string())
        );
        assert!(outcome.needs_write_back);
    }

    #[test]
    fn test_translated_payload_roundtrips_wire_format() {
        let ctx = ctx();
        let entry = rich_entry();
        let payload = extract_segments(&entry, &ctx).unwrap();
        let serialized = serde_json::to_string(&payload).unwrap();

        // a translated payload comes back in the same envelope
        let units: Vec<TranslationUnit> = serde_json::from_value(
            serde_json::from_str::<serde_json::Value>(&serialized).unwrap()["segments"].clone(),
        )
        .unwrap();
        assert_eq!(units.len(), payload.segments.len());
        let outcome = reinsert_translations(&entry, "de", &units, &ctx).unwrap();
        assert!(outcome.fields["body"].contains_key("de"));
    }

    #[test]
    fn test_graph_walk_extract_reinsert_pipeline() {
        let batch = json!({ "items": [
            {
                "sys": { "id": "p1", "contentType": { "sys": { "id": "page" } }, "updatedAt": "2024-05-01T10:00:00Z" },
                "fields": {
                    "title": { "en-US": "About us" },
                    "body": { "en-US": {
                        "nodeType": "document",
                        "content": [
                            { "nodeType": "paragraph", "data": {},
                              "content": [ { "nodeType": "text", "value": "We exist.", "marks": [], "data": {} } ] },
                            { "nodeType": "embedded-entry-block", "content": [], "data": { "target": {
                                "sys": { "id": "q1", "contentType": { "sys": { "id": "quote" } } },
                                "fields": { "text": { "en-US": "To be" } }
                            } } }
                        ]
                    } }
                }
            },
            {
                "sys": { "id": "p2", "contentType": { "sys": { "id": "page" } } },
                "metadata": { "tags": [ { "sys": { "linkType": "Tag", "id": "doNotTranslate" } } ] },
                "fields": { "title": { "en-US": "Internal" } }
            }
        ] });
        let entries = entries_from_value(&batch).unwrap();
        let ctx = ctx();

        let outcome = list_translatable_resources(&entries, &ctx);
        let ids: Vec<&str> = outcome.resources.iter().map(|r| r.id.as_str()).collect();
        // the DNT page is excluded; the embedded quote registers on its own
        assert_eq!(ids, vec!["page-p1", "quote-q1"]);
        assert_eq!(outcome.resources[0].prj.as_deref(), Some("website"));
        assert_eq!(
            outcome.resources[0].modified.as_deref(),
            Some("2024-05-01T10:00:00Z")
        );

        // each registered entry extracts and reinserts independently
        let quote = &outcome.entries["q1"];
        let payload = extract_segments(quote, &ctx).unwrap();
        assert_eq!(payload.segments[0].sid, "text");
        let units = vec![TranslationUnit::text("text", "Être")];
        let reinserted = reinsert_translations(quote, "fr", &units, &ctx).unwrap();
        assert_eq!(
            reinserted.fields["text"]["fr"],
            FieldValue::Text("Être".to_string())
        );
    }

    #[test]
    fn test_partial_translation_never_corrupts_siblings() {
        let ctx = ctx();
        let entry = rich_entry();
        // translate only the second block; everything else keeps its source
        let units = vec![TranslationUnit::fragments(
            "body-1",
            vec![crate::model::Fragment::Text(
                "<p>Intro traduit.</p>".to_string(),
            )],
        )];
        let outcome = reinsert_translations(&entry, "fr", &units, &ctx).unwrap();
        let FieldValue::Document(doc) = &outcome.fields["body"]["fr"] else {
            panic!("expected document");
        };
        // heading untouched
        assert_eq!(doc.content[0].content[0].value.as_deref(), Some("Welcome"));
        // translated paragraph replaced
        assert_eq!(
            doc.content[1].content[0].value.as_deref(),
            Some("Intro traduit.")
        );
        // list untouched
        let FieldValue::Document(original) = &entry.fields["body"]["en-US"] else {
            panic!("expected document");
        };
        assert_eq!(doc.content[2], original.content[2]);
        assert!(outcome.needs_write_back);
    }
}
