//! Shared configuration for one extraction or reinsertion pass.

use std::collections::{HashMap, HashSet};

use crate::l10n::render::{DocumentParser, DocumentRenderer, HtmlParser, HtmlRenderer};

/// Injected capabilities and filtering rules consumed by the walker,
/// extractor and reinsertion engine.
///
/// A context is plain data plus two collaborator objects; nothing in it is
/// mutated by a pass, so one context can serve any number of sequential
/// calls. Traversal-local state (the dedup set, running indices) is owned by
/// each call, never by the context.
pub struct L10nContext {
    /// Source language tag fields are read from (e.g. `en-US`).
    pub source_lang: String,
    /// Project identifier stamped on resource records.
    pub prj: Option<String>,
    /// Localizable field whitelist per content type.
    pub localized_fields: HashMap<String, Vec<String>>,
    /// Content types eligible as traversal roots; `None` admits all.
    pub content_type_whitelist: Option<HashSet<String>>,
    /// Do-not-translate tag ids.
    pub dnt_tags: HashSet<String>,
    /// Policy for fields missing a source-language value: when `true`,
    /// reinsertion removes the target-language value instead of leaving a
    /// stale translation in place.
    pub clear_stale_targets: bool,
    pub renderer: Box<dyn DocumentRenderer>,
    pub parser: Box<dyn DocumentParser>,
}

impl L10nContext {
    pub fn new() -> Self {
        L10nContext {
            source_lang: "en-US".to_string(),
            prj: None,
            localized_fields: HashMap::new(),
            content_type_whitelist: None,
            dnt_tags: HashSet::new(),
            clear_stale_targets: false,
            renderer: Box::new(HtmlRenderer::new()),
            parser: Box::new(HtmlParser::new()),
        }
    }

    pub fn with_source_lang(mut self, lang: &str) -> Self {
        self.source_lang = lang.to_string();
        self
    }

    pub fn with_project(mut self, prj: &str) -> Self {
        self.prj = Some(prj.to_string());
        self
    }

    pub fn with_localized_fields(mut self, content_type: &str, fields: &[&str]) -> Self {
        self.localized_fields.insert(
            content_type.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
        self
    }

    pub fn with_content_type_whitelist(mut self, content_types: &[&str]) -> Self {
        self.content_type_whitelist = Some(
            content_types
                .iter()
                .map(|content_type| content_type.to_string())
                .collect(),
        );
        self
    }

    pub fn with_dnt_tag(mut self, tag: &str) -> Self {
        self.dnt_tags.insert(tag.to_string());
        self
    }

    pub fn with_clear_stale_targets(mut self, clear: bool) -> Self {
        self.clear_stale_targets = clear;
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn DocumentRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_parser(mut self, parser: Box<dyn DocumentParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Whether a field is localizable for a content type.
    pub fn is_localized(&self, content_type: &str, field: &str) -> bool {
        self.localized_fields
            .get(content_type)
            .is_some_and(|fields| fields.iter().any(|f| f == field))
    }

    /// Whether a root entry's content type is eligible for traversal.
    pub fn is_root_content_type(&self, content_type: &str) -> bool {
        self.content_type_whitelist
            .as_ref()
            .is_none_or(|whitelist| whitelist.contains(content_type))
    }

    /// Whether any of the given tags marks an entry as do-not-translate.
    pub fn is_do_not_translate(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.dnt_tags.contains(tag))
    }
}

impl Default for L10nContext {
    fn default() -> Self {
        L10nContext::new()
    }
}
