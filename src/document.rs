//! Rich-text document tree model.
//!
//! Node kinds partition into four classes that drive segmentation:
//! *block-containers* hold children but are never themselves segmented,
//! *block-leaves* are the segmentation units, *embedded entities* reference
//! another entry and trigger graph recursion, and *inline/mark* spans are
//! rendered as part of their enclosing block-leaf.

use crate::model::Entry;
use serde_json::Value;

/// Discriminated node kind, mirroring the platform's wire names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    Blockquote,
    Hr,
    OrderedList,
    UnorderedList,
    ListItem,
    Table,
    TableRow,
    TableCell,
    TableHeaderCell,
    EmbeddedEntry,
    EmbeddedEntryInline,
    EmbeddedAsset,
    Hyperlink,
    EntryHyperlink,
    AssetHyperlink,
    Text,
    /// Unknown kind, carried verbatim so unrecognized nodes survive a pass.
    Other(String),
}

impl NodeKind {
    pub fn from_wire(name: &str) -> Self {
        match name {
            "document" => NodeKind::Document,
            "paragraph" => NodeKind::Paragraph,
            "heading-1" => NodeKind::Heading1,
            "heading-2" => NodeKind::Heading2,
            "heading-3" => NodeKind::Heading3,
            "heading-4" => NodeKind::Heading4,
            "heading-5" => NodeKind::Heading5,
            "heading-6" => NodeKind::Heading6,
            "blockquote" => NodeKind::Blockquote,
            "hr" => NodeKind::Hr,
            "ordered-list" => NodeKind::OrderedList,
            "unordered-list" => NodeKind::UnorderedList,
            "list-item" => NodeKind::ListItem,
            "table" => NodeKind::Table,
            "table-row" => NodeKind::TableRow,
            "table-cell" => NodeKind::TableCell,
            "table-header-cell" => NodeKind::TableHeaderCell,
            "embedded-entry-block" => NodeKind::EmbeddedEntry,
            "embedded-entry-inline" => NodeKind::EmbeddedEntryInline,
            "embedded-asset-block" => NodeKind::EmbeddedAsset,
            "hyperlink" => NodeKind::Hyperlink,
            "entry-hyperlink" => NodeKind::EntryHyperlink,
            "asset-hyperlink" => NodeKind::AssetHyperlink,
            "text" => NodeKind::Text,
            other => NodeKind::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading1 => "heading-1",
            NodeKind::Heading2 => "heading-2",
            NodeKind::Heading3 => "heading-3",
            NodeKind::Heading4 => "heading-4",
            NodeKind::Heading5 => "heading-5",
            NodeKind::Heading6 => "heading-6",
            NodeKind::Blockquote => "blockquote",
            NodeKind::Hr => "hr",
            NodeKind::OrderedList => "ordered-list",
            NodeKind::UnorderedList => "unordered-list",
            NodeKind::ListItem => "list-item",
            NodeKind::Table => "table",
            NodeKind::TableRow => "table-row",
            NodeKind::TableCell => "table-cell",
            NodeKind::TableHeaderCell => "table-header-cell",
            NodeKind::EmbeddedEntry => "embedded-entry-block",
            NodeKind::EmbeddedEntryInline => "embedded-entry-inline",
            NodeKind::EmbeddedAsset => "embedded-asset-block",
            NodeKind::Hyperlink => "hyperlink",
            NodeKind::EntryHyperlink => "entry-hyperlink",
            NodeKind::AssetHyperlink => "asset-hyperlink",
            NodeKind::Text => "text",
            NodeKind::Other(name) => name,
        }
    }

    /// Purely structural wrapper: recursed into, never segmented.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::OrderedList
                | NodeKind::UnorderedList
                | NodeKind::Table
                | NodeKind::TableRow
                | NodeKind::TableCell
                | NodeKind::TableHeaderCell
        )
    }

    /// Renderable block that forms one segmentation unit.
    pub fn is_block_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Paragraph
                | NodeKind::Heading1
                | NodeKind::Heading2
                | NodeKind::Heading3
                | NodeKind::Heading4
                | NodeKind::Heading5
                | NodeKind::Heading6
                | NodeKind::Blockquote
                | NodeKind::Hr
                | NodeKind::ListItem
        )
    }

    /// Reference to another entry; triggers graph recursion instead of
    /// text segmentation.
    pub fn is_embedded_entry(&self) -> bool {
        matches!(self, NodeKind::EmbeddedEntry | NodeKind::EmbeddedEntryInline)
    }

    pub fn is_block(&self) -> bool {
        self.is_block_leaf() || self.is_container() || matches!(self, NodeKind::EmbeddedEntry | NodeKind::EmbeddedAsset)
    }
}

/// Inline formatting mark on a text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Code,
    Other(String),
}

impl Mark {
    pub fn from_wire(name: &str) -> Self {
        match name {
            "bold" => Mark::Bold,
            "italic" => Mark::Italic,
            "underline" => Mark::Underline,
            "code" => Mark::Code,
            other => Mark::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Mark::Bold => "bold",
            Mark::Italic => "italic",
            Mark::Underline => "underline",
            Mark::Code => "code",
            Mark::Other(name) => name,
        }
    }
}

/// A node in a rich-text document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentNode {
    pub kind: NodeKind,
    pub content: Vec<DocumentNode>,
    /// Text value; present on `Text` nodes only.
    pub value: Option<String>,
    /// Marks are applied innermost-first when rendering.
    pub marks: Vec<Mark>,
    /// Referenced entry; present on embedded-entity nodes.
    pub target: Option<Box<Entry>>,
    /// Remaining node data (e.g. hyperlink `uri`), preserved verbatim.
    pub data: Value,
}

impl DocumentNode {
    pub fn new(kind: NodeKind) -> Self {
        DocumentNode {
            kind,
            content: Vec::new(),
            value: None,
            marks: Vec::new(),
            target: None,
            data: Value::Null,
        }
    }

    pub fn text(value: &str) -> Self {
        let mut node = DocumentNode::new(NodeKind::Text);
        node.value = Some(value.to_string());
        node
    }

    pub fn marked_text(value: &str, marks: Vec<Mark>) -> Self {
        let mut node = DocumentNode::text(value);
        node.marks = marks;
        node
    }

    pub fn with_children(kind: NodeKind, content: Vec<DocumentNode>) -> Self {
        let mut node = DocumentNode::new(kind);
        node.content = content;
        node
    }

    pub fn embedded_entry(target: Entry) -> Self {
        let mut node = DocumentNode::new(NodeKind::EmbeddedEntry);
        node.target = Some(Box::new(target));
        node
    }
}
