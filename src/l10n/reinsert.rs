//! Reinsertion engine: splices translated segments back into a copy of the
//! original field structure, plus the change detector that gates write-back.
//!
//! The field dispatch and the document walk replay the extractor's traversal
//! exactly, including the whitelist gate and the running-index discipline,
//! so every derived segment id lands on the node it was extracted from. A
//! missing translation leaves the source value in place and never blocks the
//! rest of the entry.

use tracing::{debug, warn};

use crate::document::DocumentNode;
use crate::l10n::context::L10nContext;
use crate::l10n::error::L10nResult;
use crate::l10n::locale::validate_locale;
use crate::model::{ArrayItem, Entry, FieldMap, FieldValue, TranslationUnit};

/// Result of reinserting translations into one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ReinsertOutcome {
    /// The entry's fields with the target-language values spliced in. The
    /// original entry is never mutated.
    pub fields: FieldMap,
    /// Whether the reinserted structure differs from the original.
    pub needs_write_back: bool,
}

/// Splice `units` into a copy of the entry's fields under `target_lang`.
pub fn reinsert_translations(
    entry: &Entry,
    target_lang: &str,
    units: &[TranslationUnit],
    ctx: &L10nContext,
) -> L10nResult<ReinsertOutcome> {
    validate_locale(target_lang)?;

    let mut fields = entry.fields.clone();
    for (name, locales) in fields.iter_mut() {
        if !ctx.is_localized(&entry.content_type, name) {
            continue;
        }
        let Some(source) = locales.get(&ctx.source_lang).cloned() else {
            if ctx.clear_stale_targets && locales.remove(target_lang).is_some() {
                debug!(field = %name, lang = %target_lang, "cleared stale target value");
            }
            continue;
        };
        match source {
            FieldValue::Text(text) => {
                if let Some(unit) = find_unit(units, name) {
                    let translated = unit.translated_text().unwrap_or(text);
                    locales.insert(target_lang.to_string(), FieldValue::Text(translated));
                } else {
                    debug!(sid = %name, nid = %entry.id, "no translation");
                }
            }
            FieldValue::Array(items) => {
                let mut translated = items.clone();
                for item in translated.iter_mut() {
                    let ArrayItem::Component(component) = item else {
                        continue;
                    };
                    if component.title.is_some() {
                        let sid = format!("{}-title", component.field_name);
                        match find_unit(units, &sid).and_then(TranslationUnit::translated_text) {
                            Some(text) => component.title = Some(text),
                            None => debug!(sid = %sid, nid = %entry.id, "no translation"),
                        }
                    }
                    if component.placeholder.is_some() {
                        let sid = format!("{}-placeholder", component.field_name);
                        match find_unit(units, &sid).and_then(TranslationUnit::translated_text) {
                            Some(text) => component.placeholder = Some(text),
                            None => debug!(sid = %sid, nid = %entry.id, "no translation"),
                        }
                    }
                }
                locales.insert(target_lang.to_string(), FieldValue::Array(translated));
            }
            FieldValue::Document(doc) => {
                let mut translated = doc;
                translate_content(&mut translated, units, name, 0, &entry.id, ctx);
                locales.insert(target_lang.to_string(), FieldValue::Document(translated));
            }
            FieldValue::Reference(_) | FieldValue::Other(_) => {}
        }
    }

    let needs = needs_write_back(&entry.fields, &fields);
    Ok(ReinsertOutcome {
        fields,
        needs_write_back: needs,
    })
}

/// Walk a document clone with the segmenter's traversal and replace each
/// matched block-leaf's content with the parsed translation. Returns the
/// updated running index.
fn translate_content(
    node: &mut DocumentNode,
    units: &[TranslationUnit],
    base_id: &str,
    start_index: usize,
    entry_id: &str,
    ctx: &L10nContext,
) -> usize {
    let mut index = start_index;
    for child in node.content.iter_mut() {
        if child.kind.is_embedded_entry() {
            continue;
        }
        if child.kind.is_block_leaf() {
            let markup = ctx.renderer.to_markup(child);
            let plain = ctx.renderer.to_plain_text(child);
            if markup.is_empty() || plain.trim().is_empty() {
                continue;
            }
            let sid = format!("{}-{}", base_id, index);
            index += 1;
            let Some(unit) = find_unit(units, &sid) else {
                debug!(sid = %sid, nid = %entry_id, "no translation");
                continue;
            };
            let Some(translated) = unit.translated_markup() else {
                debug!(sid = %sid, nid = %entry_id, "translation unit without content");
                continue;
            };
            match ctx.parser.parse_markup(&translated) {
                Ok(parsed) => replace_leaf_content(child, parsed),
                Err(err) => {
                    warn!(sid = %sid, nid = %entry_id, error = %err, "keeping source content");
                }
            }
        } else if !child.content.is_empty() {
            index = translate_content(child, units, base_id, index, entry_id, ctx);
        } else {
            debug!(
                sid = %base_id,
                kind = %child.kind.as_wire(),
                "no reinsertion point"
            );
        }
    }
    index
}

/// Replace a block-leaf's content with the parsed translation, preserving
/// the leaf's own kind. A parse that yields a single block of the same kind
/// is unwrapped so the leaf is not nested into itself.
fn replace_leaf_content(leaf: &mut DocumentNode, parsed: DocumentNode) {
    let mut content = parsed.content;
    if content.len() == 1 && content[0].kind == leaf.kind {
        content = content.remove(0).content;
    }
    leaf.content = content;
}

/// Deep structural comparison between the original field set and the
/// reinserted one. Adding a new language key the first time is itself a
/// difference; key order never is.
pub fn needs_write_back(original: &FieldMap, updated: &FieldMap) -> bool {
    original != updated
}

fn find_unit<'a>(units: &'a [TranslationUnit], sid: &str) -> Option<&'a TranslationUnit> {
    units.iter().find(|unit| unit.sid == sid)
}
