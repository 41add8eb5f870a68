//! JSON view of a parsed document (for debugging)
//!
//! Elements are listed flat in document order and refer to their children by
//! id, the same way the arena links them, so the output depth stays constant
//! however deep the tree is.

use serde::Serialize;

use sxml_dom::{Arena, Attribute, ContentItem, NodeId, Queryable};
use sxml_parser::ParsedDocument;

#[derive(Debug, Serialize)]
pub struct DocumentView<'a> {
    pub declaration: Vec<AttributeView<'a>>,
    pub root: u32,
    pub nodes: Vec<NodeView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct AttributeView<'a> {
    pub key: &'a str,
    pub value: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct NodeView<'a> {
    pub id: u32,
    pub parent: Option<u32>,
    pub tag: &'a str,
    pub attributes: Vec<AttributeView<'a>>,
    pub content: Vec<ContentView<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentView<'a> {
    Text { text: &'a str },
    Element { id: u32 },
}

impl<'a> From<&'a Attribute> for AttributeView<'a> {
    fn from(attr: &'a Attribute) -> Self {
        Self {
            key: &attr.key,
            value: attr.value(),
        }
    }
}

/// Build the serializable view of a whole parse
pub fn document_view(parsed: &ParsedDocument) -> DocumentView<'_> {
    let arena = &parsed.arena;
    let nodes = std::iter::once(parsed.root)
        .chain(arena.descendants(parsed.root))
        .filter_map(|id| node_view(arena, id))
        .collect();

    DocumentView {
        declaration: parsed.declaration().into_iter().map(AttributeView::from).collect(),
        root: parsed.root.as_u32(),
        nodes,
    }
}

fn node_view(arena: &Arena, id: NodeId) -> Option<NodeView<'_>> {
    let node = arena.node(id)?;

    let content = node
        .content()
        .iter()
        .map(|item| match *item {
            ContentItem::Text(text_id) => ContentView::Text {
                text: arena.text(text_id).unwrap_or(""),
            },
            ContentItem::Element(child_id) => ContentView::Element {
                id: child_id.as_u32(),
            },
        })
        .collect();

    Some(NodeView {
        id: id.as_u32(),
        parent: node.parent.map(|p| p.as_u32()),
        tag: node.tag_name(),
        attributes: arena
            .resolve_attributes(node.attributes())
            .map(AttributeView::from)
            .collect(),
        content,
    })
}

/// Pretty-printed JSON for a parse
pub fn to_json(parsed: &ParsedDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&document_view(parsed))
}
