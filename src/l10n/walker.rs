//! Entry graph walker: discovers every entry that carries translatable
//! content, applies do-not-translate filtering and produces one
//! [`ResourceRecord`] per qualifying entry.
//!
//! The walk is depth-first over field values in the source language. A child
//! entry is always evaluated before its parent finishes (bottom-up), so a
//! nested entry registers as its own resource regardless of whether the
//! parent ends up qualifying. Shared references (diamonds) are collapsed by
//! a composite-id dedup set owned by one walk invocation.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::document::DocumentNode;
use crate::l10n::context::L10nContext;
use crate::model::{ArrayItem, Entry, FieldMap, FieldValue, RESOURCE_FORMAT, ResourceRecord};

/// Result of one graph walk: resource records sorted by composite id, plus
/// an id-indexed lookup of the registered entries for resource-level fetch.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub resources: Vec<ResourceRecord>,
    pub entries: HashMap<String, Entry>,
}

/// Walk the given root entries and collect every translatable resource.
///
/// Roots whose content type is not whitelisted are skipped entirely; nested
/// and embedded entries are evaluated regardless of the root whitelist, the
/// way the platform resolves them inline.
pub fn list_translatable_resources(roots: &[Entry], ctx: &L10nContext) -> WalkOutcome {
    let mut walk = GraphWalk::default();
    for root in roots {
        if !ctx.is_root_content_type(&root.content_type) {
            continue;
        }
        walk.visit_entry(root, ctx);
    }
    walk.resources.sort_by(|a, b| a.id.cmp(&b.id));
    WalkOutcome {
        resources: walk.resources,
        entries: walk.entries,
    }
}

#[derive(Default)]
struct GraphWalk {
    resources: Vec<ResourceRecord>,
    seen: HashSet<String>,
    entries: HashMap<String, Entry>,
}

impl GraphWalk {
    /// Evaluate one entry and register it if it carries localizable content.
    /// Returns whether the entry is (or already was) registered.
    fn visit_entry(&mut self, entry: &Entry, ctx: &L10nContext) -> bool {
        if self.seen.contains(&entry.composite_id()) {
            return true;
        }
        if ctx.is_do_not_translate(&entry.tags) {
            // the whole subtree is excluded from registration; children
            // reachable through other parents register on those paths
            debug!(id = %entry.id, content_type = %entry.content_type, "DNT");
            return false;
        }
        if self.check_fields(&entry.fields, &entry.content_type, ctx) {
            self.register(entry, ctx);
            true
        } else {
            false
        }
    }

    /// Evaluate a field set; registers qualifying nested entries along the
    /// way and reports whether the fields themselves carry localizable
    /// content.
    fn check_fields(&mut self, fields: &FieldMap, content_type: &str, ctx: &L10nContext) -> bool {
        let mut has_localizable = false;
        for (name, locales) in fields {
            let Some(value) = locales.get(&ctx.source_lang) else {
                // present in other languages only; handled by the
                // stale-target policy at reinsertion
                continue;
            };
            match value {
                FieldValue::Text(_) => {
                    if ctx.is_localized(content_type, name) {
                        has_localizable = true;
                    }
                }
                FieldValue::Reference(child) => {
                    self.visit_entry(child, ctx);
                }
                FieldValue::Array(items) => {
                    for item in items {
                        if let ArrayItem::Entry(child) = item {
                            self.visit_entry(child, ctx);
                        }
                    }
                }
                FieldValue::Document(doc) => {
                    if self.check_document(doc, ctx) {
                        has_localizable = true;
                    }
                }
                FieldValue::Other(raw) => {
                    if ctx.is_localized(content_type, name) {
                        warn!(
                            content_type = %content_type,
                            field = %name,
                            value = %raw,
                            "skipping field with unrecognized shape"
                        );
                    }
                }
            }
        }
        has_localizable
    }

    /// A document is localizable if it holds any block-leaf or a qualifying
    /// embedded entry. Leaves that render to nothing still count here; they
    /// fall out at extraction, where the empty payload becomes the sentinel.
    /// Every embedded entry found anywhere in the tree is independently
    /// evaluated and registered.
    fn check_document(&mut self, node: &DocumentNode, ctx: &L10nContext) -> bool {
        let mut localizable = false;
        for child in &node.content {
            if child.kind.is_embedded_entry() {
                if let Some(target) = &child.target {
                    if self.visit_entry(target, ctx) {
                        localizable = true;
                    }
                }
                continue;
            }
            if child.kind.is_block_leaf() {
                localizable = true;
            }
            if self.check_document(child, ctx) {
                localizable = true;
            }
        }
        localizable
    }

    fn register(&mut self, entry: &Entry, ctx: &L10nContext) {
        let id = entry.composite_id();
        if !self.seen.insert(id.clone()) {
            return;
        }
        self.resources.push(ResourceRecord {
            id,
            source_lang: ctx.source_lang.clone(),
            prj: ctx.prj.clone(),
            modified: entry.updated_at.clone(),
            resource_format: RESOURCE_FORMAT.to_string(),
        });
        self.entries.insert(entry.id.clone(), entry.clone());
    }
}
