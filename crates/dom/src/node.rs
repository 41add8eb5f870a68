//! Node, attribute and mixed-content types

use smallvec::SmallVec;
use std::fmt;

/// Identifier of a node registered in an [`Arena`](crate::Arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Identifier of an attribute registered in an [`Arena`](crate::Arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrId(pub u32);

impl AttrId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identifier of a text run registered in an [`Arena`](crate::Arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextId(pub u32);

impl TextId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// A single `key="value"` pair of a start tag or declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    /// `None` for valueless attributes such as `<input disabled>`
    pub value: Option<String>,
}

impl Attribute {
    /// Create an attribute with a key and no value yet
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// Check if this attribute has no value
    pub fn is_valueless(&self) -> bool {
        self.value.is_none()
    }

    /// Value as `&str`, if any
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// One ordered unit of an element's mixed content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentItem {
    /// A run of character data
    Text(TextId),
    /// A child element
    Element(NodeId),
}

impl ContentItem {
    /// Node id if this item is an element
    pub fn as_element(&self) -> Option<NodeId> {
        match self {
            ContentItem::Element(id) => Some(*id),
            ContentItem::Text(_) => None,
        }
    }

    /// Text id if this item is a text run
    pub fn as_text(&self) -> Option<TextId> {
        match self {
            ContentItem::Text(id) => Some(*id),
            ContentItem::Element(_) => None,
        }
    }
}

/// An element in the tree
///
/// `children` is always the `Element` projection of `content`. Both are only
/// ever extended together through [`Arena::create_node`](crate::Arena::create_node),
/// which is why the fields are read-only outside this crate.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// Tag name (`None` for the synthetic root and while the tag is still being read)
    pub tag: Option<String>,
    /// Parent node ID (None for the returned root)
    pub parent: Option<NodeId>,
    pub(crate) content: Vec<ContentItem>,
    pub(crate) children: SmallVec<[NodeId; 8]>,
    pub(crate) attributes: SmallVec<[AttrId; 4]>,
}

impl Node {
    /// Create a new, unattached node
    pub(crate) fn new(id: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            id,
            tag: None,
            parent,
            content: Vec::new(),
            children: SmallVec::new(),
            attributes: SmallVec::new(),
        }
    }

    /// Tag name, or an empty string if none was captured
    pub fn tag_name(&self) -> &str {
        self.tag.as_deref().unwrap_or("")
    }

    /// Mixed text/element content in document order
    pub fn content(&self) -> &[ContentItem] {
        &self.content
    }

    /// Child elements in document order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Attribute ids in document order
    pub fn attributes(&self) -> &[AttrId] {
        &self.attributes
    }

    /// Check if the node has neither content nor children
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
