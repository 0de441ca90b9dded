//! Document rendering and parsing collaborators.
//!
//! The core treats "render node to markup/plain text" and "parse markup into
//! a document node" as injected capabilities behind the [`DocumentRenderer`]
//! and [`DocumentParser`] traits. The default implementations cover the
//! markup subset the segmenter emits: block tags for every block-leaf kind,
//! `<b>`/`<i>`/`<u>`/`<code>` marks and hyperlinks. They are exact inverses
//! of each other over that subset, which is what keeps the
//! extraction/reinsertion symmetry observable end to end.

use regex::Regex;
use serde_json::json;
use tracing::debug;

use crate::document::{DocumentNode, Mark, NodeKind};
use crate::l10n::error::{L10nError, L10nResult};

/// Deterministic renderers for a document node.
pub trait DocumentRenderer {
    fn to_markup(&self, node: &DocumentNode) -> String;
    fn to_plain_text(&self, node: &DocumentNode) -> String;
}

/// Inverse of rendering, used only during reinsertion.
pub trait DocumentParser {
    fn parse_markup(&self, markup: &str) -> L10nResult<DocumentNode>;
}

fn block_tag(kind: &NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::Paragraph => Some("p"),
        NodeKind::Heading1 => Some("h1"),
        NodeKind::Heading2 => Some("h2"),
        NodeKind::Heading3 => Some("h3"),
        NodeKind::Heading4 => Some("h4"),
        NodeKind::Heading5 => Some("h5"),
        NodeKind::Heading6 => Some("h6"),
        NodeKind::Blockquote => Some("blockquote"),
        NodeKind::ListItem => Some("li"),
        NodeKind::OrderedList => Some("ol"),
        NodeKind::UnorderedList => Some("ul"),
        NodeKind::Table => Some("table"),
        NodeKind::TableRow => Some("tr"),
        NodeKind::TableCell => Some("td"),
        NodeKind::TableHeaderCell => Some("th"),
        _ => None,
    }
}

fn kind_for_tag(tag: &str) -> Option<NodeKind> {
    match tag {
        "p" => Some(NodeKind::Paragraph),
        "h1" => Some(NodeKind::Heading1),
        "h2" => Some(NodeKind::Heading2),
        "h3" => Some(NodeKind::Heading3),
        "h4" => Some(NodeKind::Heading4),
        "h5" => Some(NodeKind::Heading5),
        "h6" => Some(NodeKind::Heading6),
        "blockquote" => Some(NodeKind::Blockquote),
        "li" => Some(NodeKind::ListItem),
        "ol" => Some(NodeKind::OrderedList),
        "ul" => Some(NodeKind::UnorderedList),
        "table" => Some(NodeKind::Table),
        "tr" => Some(NodeKind::TableRow),
        "td" => Some(NodeKind::TableCell),
        "th" => Some(NodeKind::TableHeaderCell),
        "a" => Some(NodeKind::Hyperlink),
        _ => None,
    }
}

fn mark_for_tag(tag: &str) -> Option<Mark> {
    match tag {
        "b" | "strong" => Some(Mark::Bold),
        "i" | "em" => Some(Mark::Italic),
        "u" => Some(Mark::Underline),
        "code" => Some(Mark::Code),
        _ => None,
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Default markup renderer.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer
    }
}

impl DocumentRenderer for HtmlRenderer {
    fn to_markup(&self, node: &DocumentNode) -> String {
        match &node.kind {
            NodeKind::Text => {
                let mut out = escape_html(node.value.as_deref().unwrap_or(""));
                for mark in &node.marks {
                    out = match mark {
                        Mark::Bold => format!("<b>{}</b>", out),
                        Mark::Italic => format!("<i>{}</i>", out),
                        Mark::Underline => format!("<u>{}</u>", out),
                        Mark::Code => format!("<code>{}</code>", out),
                        Mark::Other(_) => out,
                    };
                }
                out
            }
            NodeKind::Hr => "<hr/>".to_string(),
            NodeKind::EmbeddedEntry | NodeKind::EmbeddedEntryInline | NodeKind::EmbeddedAsset => {
                String::new()
            }
            kind => {
                let inner: String = node.content.iter().map(|c| self.to_markup(c)).collect();
                if let Some(tag) = block_tag(kind) {
                    format!("<{tag}>{inner}</{tag}>")
                } else if *kind == NodeKind::Hyperlink {
                    let uri = node.data.get("uri").and_then(|u| u.as_str()).unwrap_or("");
                    format!("<a href=\"{}\">{}</a>", escape_html(uri), inner)
                } else {
                    // document root, unknown kinds and other inlines render
                    // their children only
                    inner
                }
            }
        }
    }

    fn to_plain_text(&self, node: &DocumentNode) -> String {
        match &node.kind {
            NodeKind::Text => node.value.clone().unwrap_or_default(),
            NodeKind::EmbeddedEntry | NodeKind::EmbeddedEntryInline | NodeKind::EmbeddedAsset => {
                String::new()
            }
            _ => {
                let mut out = String::new();
                for child in &node.content {
                    let text = self.to_plain_text(child);
                    if text.is_empty() {
                        continue;
                    }
                    if !out.is_empty() && child.kind.is_block() {
                        out.push(' ');
                    }
                    out.push_str(&text);
                }
                out
            }
        }
    }
}

/// Default markup parser: a small tag tokenizer over the renderer's output
/// subset. Unknown tags are skipped with a diagnostic; unbalanced input is
/// tolerated by closing whatever remains open at end of input.
#[derive(Debug, Clone)]
pub struct HtmlParser {
    tag_re: Regex,
    attr_re: Regex,
}

impl HtmlParser {
    pub fn new() -> Self {
        HtmlParser {
            // pattern is a constant, compilation cannot fail
            tag_re: Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:\s+[a-zA-Z-]+="[^"]*")*)\s*(/?)>"#)
                .unwrap(),
            attr_re: Regex::new(r#"([a-zA-Z-]+)="([^"]*)""#).unwrap(),
        }
    }

    fn href(&self, attrs: &str) -> Option<String> {
        self.attr_re
            .captures_iter(attrs)
            .find(|caps| &caps[1] == "href")
            .map(|caps| unescape_html(&caps[2]))
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        HtmlParser::new()
    }
}

fn push_text(stack: &mut [DocumentNode], text: &str, marks: &[Mark]) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    // whitespace between structural tags is layout, not content
    if text.trim().is_empty()
        && !(parent.kind.is_block_leaf() || parent.kind == NodeKind::Hyperlink)
    {
        return;
    }
    let mut node = DocumentNode::text(&unescape_html(text));
    // the innermost enclosing mark tag comes first
    node.marks = marks.iter().rev().cloned().collect();
    parent.content.push(node);
}

impl DocumentParser for HtmlParser {
    fn parse_markup(&self, markup: &str) -> L10nResult<DocumentNode> {
        let mut stack: Vec<DocumentNode> = vec![DocumentNode::new(NodeKind::Document)];
        let mut marks: Vec<Mark> = Vec::new();
        let mut cursor = 0;

        for caps in self.tag_re.captures_iter(markup) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > cursor {
                push_text(&mut stack, &markup[cursor..whole.start()], &marks);
            }
            cursor = whole.end();

            let closing = !caps[1].is_empty();
            let tag = caps[2].to_lowercase();
            let self_closing = !caps[4].is_empty();

            if closing {
                if let Some(mark) = mark_for_tag(&tag) {
                    if let Some(pos) = marks.iter().rposition(|m| *m == mark) {
                        marks.remove(pos);
                    }
                } else if kind_for_tag(&tag).is_some() {
                    if stack.len() < 2 {
                        return Err(L10nError::MarkupParse(format!(
                            "unexpected closing tag </{tag}>"
                        )));
                    }
                    if let Some(node) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.content.push(node);
                        }
                    }
                } else {
                    debug!(tag = %tag, "skipping unsupported closing tag");
                }
            } else if let Some(mark) = mark_for_tag(&tag) {
                if !self_closing {
                    marks.push(mark);
                }
            } else if tag == "hr" {
                if let Some(parent) = stack.last_mut() {
                    parent.content.push(DocumentNode::new(NodeKind::Hr));
                }
            } else if let Some(kind) = kind_for_tag(&tag) {
                let mut node = DocumentNode::new(kind);
                if tag == "a" {
                    if let Some(uri) = self.href(&caps[3]) {
                        node.data = json!({ "uri": uri });
                    }
                }
                if self_closing {
                    if let Some(parent) = stack.last_mut() {
                        parent.content.push(node);
                    }
                } else {
                    stack.push(node);
                }
            } else {
                debug!(tag = %tag, "skipping unsupported tag");
            }
        }
        if cursor < markup.len() {
            push_text(&mut stack, &markup[cursor..], &marks);
        }

        // close anything left open rather than failing the whole segment
        while stack.len() > 1 {
            if let Some(node) = stack.pop() {
                if let Some(parent) = stack.last_mut() {
                    parent.content.push(node);
                }
            }
        }
        stack
            .pop()
            .ok_or_else(|| L10nError::MarkupParse("empty parse stack".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(children: Vec<DocumentNode>) -> DocumentNode {
        DocumentNode::with_children(NodeKind::Paragraph, children)
    }

    #[test]
    fn test_render_paragraph_with_bold() {
        let node = paragraph(vec![
            DocumentNode::text("Hello "),
            DocumentNode::marked_text("world", vec![Mark::Bold]),
        ]);
        let renderer = HtmlRenderer::new();
        assert_eq!(renderer.to_markup(&node), "<p>Hello <b>world</b></p>");
        assert_eq!(renderer.to_plain_text(&node), "Hello world");
    }

    #[test]
    fn test_render_heading() {
        let node = DocumentNode::with_children(NodeKind::Heading2, vec![DocumentNode::text("Title")]);
        assert_eq!(HtmlRenderer::new().to_markup(&node), "<h2>Title</h2>");
    }

    #[test]
    fn test_render_escapes_text() {
        let node = paragraph(vec![DocumentNode::text("a < b & c")]);
        assert_eq!(
            HtmlRenderer::new().to_markup(&node),
            "<p>a &lt; b &amp; c</p>"
        );
    }

    #[test]
    fn test_render_embedded_entry_is_empty() {
        let node = DocumentNode::embedded_entry(crate::model::Entry::new("1", "quote"));
        let renderer = HtmlRenderer::new();
        assert_eq!(renderer.to_markup(&node), "");
        assert_eq!(renderer.to_plain_text(&node), "");
    }

    #[test]
    fn test_render_list_joins_blocks_in_plain_text() {
        let list = DocumentNode::with_children(
            NodeKind::UnorderedList,
            vec![
                DocumentNode::with_children(
                    NodeKind::ListItem,
                    vec![paragraph(vec![DocumentNode::text("one")])],
                ),
                DocumentNode::with_children(
                    NodeKind::ListItem,
                    vec![paragraph(vec![DocumentNode::text("two")])],
                ),
            ],
        );
        let renderer = HtmlRenderer::new();
        assert_eq!(
            renderer.to_markup(&list),
            "<ul><li><p>one</p></li><li><p>two</p></li></ul>"
        );
        assert_eq!(renderer.to_plain_text(&list), "one two");
    }

    #[test]
    fn test_parse_simple_paragraph() {
        let doc = HtmlParser::new().parse_markup("<p>Bonjour</p>").unwrap();
        assert_eq!(doc.kind, NodeKind::Document);
        assert_eq!(doc.content.len(), 1);
        assert_eq!(doc.content[0].kind, NodeKind::Paragraph);
        assert_eq!(doc.content[0].content[0].value.as_deref(), Some("Bonjour"));
    }

    #[test]
    fn test_parse_render_roundtrip_with_marks() {
        let node = paragraph(vec![
            DocumentNode::text("Hello "),
            DocumentNode::marked_text("brave", vec![Mark::Bold, Mark::Italic]),
            DocumentNode::text(" world"),
        ]);
        let renderer = HtmlRenderer::new();
        let markup = renderer.to_markup(&node);
        assert_eq!(markup, "<p>Hello <i><b>brave</b></i> world</p>");
        let doc = HtmlParser::new().parse_markup(&markup).unwrap();
        assert_eq!(doc.content, vec![node]);
    }

    #[test]
    fn test_parse_render_roundtrip_nested_list() {
        let list = DocumentNode::with_children(
            NodeKind::OrderedList,
            vec![DocumentNode::with_children(
                NodeKind::ListItem,
                vec![paragraph(vec![DocumentNode::text("first")])],
            )],
        );
        let renderer = HtmlRenderer::new();
        let doc = HtmlParser::new()
            .parse_markup(&renderer.to_markup(&list))
            .unwrap();
        assert_eq!(doc.content, vec![list]);
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let doc = HtmlParser::new()
            .parse_markup("<p>a &lt; b &amp; c</p>")
            .unwrap();
        assert_eq!(
            doc.content[0].content[0].value.as_deref(),
            Some("a < b & c")
        );
    }

    #[test]
    fn test_parse_hyperlink_href() {
        let doc = HtmlParser::new()
            .parse_markup("<p>see <a href=\"https://example.com\">here</a></p>")
            .unwrap();
        let link = &doc.content[0].content[1];
        assert_eq!(link.kind, NodeKind::Hyperlink);
        assert_eq!(link.data["uri"], "https://example.com");
        assert_eq!(link.content[0].value.as_deref(), Some("here"));
    }

    #[test]
    fn test_hyperlink_with_quoted_uri_roundtrips() {
        let mut link = DocumentNode::with_children(
            NodeKind::Hyperlink,
            vec![DocumentNode::text("here")],
        );
        link.data = json!({ "uri": "https://example.com/?q=\"x\"" });
        let node = paragraph(vec![link.clone()]);
        let renderer = HtmlRenderer::new();
        let markup = renderer.to_markup(&node);
        assert_eq!(
            markup,
            "<p><a href=\"https://example.com/?q=&quot;x&quot;\">here</a></p>"
        );
        let doc = HtmlParser::new().parse_markup(&markup).unwrap();
        assert_eq!(doc.content[0].content[0], link);
    }

    #[test]
    fn test_parse_hr() {
        let doc = HtmlParser::new().parse_markup("<hr/>").unwrap();
        assert_eq!(doc.content[0].kind, NodeKind::Hr);
    }

    #[test]
    fn test_parse_unknown_tag_is_skipped() {
        let doc = HtmlParser::new()
            .parse_markup("<p><span>kept</span></p>")
            .unwrap();
        assert_eq!(doc.content[0].content[0].value.as_deref(), Some("kept"));
    }

    #[test]
    fn test_parse_stray_closing_tag_is_error() {
        assert!(HtmlParser::new().parse_markup("</p>").is_err());
    }

    #[test]
    fn test_parse_unclosed_tag_is_tolerated() {
        let doc = HtmlParser::new().parse_markup("<p>half open").unwrap();
        assert_eq!(doc.content[0].kind, NodeKind::Paragraph);
        assert_eq!(doc.content[0].content[0].value.as_deref(), Some("half open"));
    }
}
