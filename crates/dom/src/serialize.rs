//! Render a subtree back to XML text
//!
//! The output uses the reader's own conventions: attribute values are
//! double-quoted with quotes and backslashes escaped by a backslash, and
//! elements without content are written self-closing. Text is written
//! verbatim since the reader knows no entities.

use crate::arena::Arena;
use crate::node::{ContentItem, NodeId, TextId};

/// Serialize a node and everything below it
pub fn to_xml(arena: &Arena, id: NodeId) -> String {
    let mut output = String::new();
    let mut stack = vec![Frame::Enter(id)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(node_id) => {
                if let Some(close) = open_node(arena, node_id, &mut output) {
                    stack.push(Frame::Exit(close));
                    if let Some(node) = arena.node(node_id) {
                        for item in node.content().iter().rev() {
                            stack.push(match *item {
                                ContentItem::Text(text_id) => Frame::Text(text_id),
                                ContentItem::Element(child_id) => Frame::Enter(child_id),
                            });
                        }
                    }
                }
            }
            Frame::Text(text_id) => {
                if let Some(text) = arena.text(text_id) {
                    output.push_str(text);
                }
            }
            Frame::Exit(close) => {
                output.push_str("</");
                output.push_str(arena.node(close).map(|n| n.tag_name()).unwrap_or(""));
                output.push('>');
            }
        }
    }
    output
}

enum Frame {
    Enter(NodeId),
    Text(TextId),
    Exit(NodeId),
}

/// Write the start tag; `Some` when the element still needs its end tag
fn open_node(arena: &Arena, id: NodeId, output: &mut String) -> Option<NodeId> {
    let node = arena.node(id)?;

    output.push('<');
    output.push_str(node.tag_name());
    for attr in arena.resolve_attributes(node.attributes()) {
        output.push(' ');
        output.push_str(&attr.key);
        if let Some(value) = &attr.value {
            output.push_str("=\"");
            push_escaped(value, output);
            output.push('"');
        }
    }

    if node.is_empty() {
        output.push_str("/>");
        return None;
    }

    output.push('>');
    Some(id)
}

fn push_escaped(value: &str, output: &mut String) {
    for c in value.chars() {
        if matches!(c, '"' | '\'' | '\\') {
            output.push('\\');
        }
        output.push(c);
    }
}
