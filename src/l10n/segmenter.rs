//! Document segmenter: turns a rich-text tree into ordered segments.
//!
//! One running index is shared across the whole recursive traversal of a
//! field, so sibling block-leaves at any depth receive monotonically
//! increasing positional suffixes. Containers never consume an index;
//! embedded entries never emit a segment (they are resources of their own).
//! The reinsertion walk in [`crate::l10n::reinsert`] replays exactly this
//! traversal, which is what makes the derived ids line up.

use tracing::debug;

use crate::document::DocumentNode;
use crate::l10n::context::L10nContext;
use crate::model::{Segment, SegmentFormat};

/// Append segments for every renderable block-leaf under `node`, starting at
/// `start_index`, and return the updated running index so a caller can
/// resume numbering across sequential calls.
pub fn segment_document(
    node: &DocumentNode,
    base_id: &str,
    entry_id: &str,
    start_index: usize,
    ctx: &L10nContext,
    segments: &mut Vec<Segment>,
) -> usize {
    let mut index = start_index;
    for child in &node.content {
        if child.kind.is_embedded_entry() {
            // segmented under its own resource, found by the graph walker
            debug!(sid = %base_id, nid = %entry_id, "skipping embedded entry");
            continue;
        }
        if child.kind.is_block_leaf() {
            let markup = ctx.renderer.to_markup(child);
            let plain = ctx.renderer.to_plain_text(child);
            if !markup.is_empty() && !plain.trim().is_empty() {
                let sid = format!("{}-{}", base_id, index);
                segments.push(Segment::new(&sid, &markup, entry_id, SegmentFormat::Html));
                index += 1;
            }
        } else if !child.content.is_empty() {
            index = segment_document(child, base_id, entry_id, index, ctx, segments);
        } else {
            debug!(
                sid = %base_id,
                nid = %entry_id,
                kind = %child.kind.as_wire(),
                "skipping node without segmentable content"
            );
        }
    }
    index
}
