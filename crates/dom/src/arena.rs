//! Entity arena
//!
//! Every node, attribute and text run created during a parse is registered
//! here at creation time and owned here until [`Arena::release_all`]. The
//! tree only stores ids, so teardown never depends on the tree's shape:
//! entities that ended up unreachable (a second top-level element, the
//! declaration node, the synthetic root) are released like any other.

use std::fmt;

use crate::error::{DomError, DomResult};
use crate::node::{AttrId, Attribute, ContentItem, Node, NodeId, TextId};

/// Number of entities dropped by a bulk release
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Released {
    pub nodes: usize,
    pub attributes: usize,
    pub texts: usize,
}

impl Released {
    /// Total number of released entities
    pub fn total(&self) -> usize {
        self.nodes + self.attributes + self.texts
    }
}

/// Owner of every entity created during one parse session
#[derive(Default)]
pub struct Arena {
    nodes: Vec<Node>,
    attributes: Vec<Attribute>,
    texts: Vec<String>,
}

impl Arena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new node
    ///
    /// With a parent, the node is linked as the parent's last child: an
    /// `Element` item is appended to the parent's content and the id to its
    /// children, in one step.
    pub fn create_node(&mut self, parent: Option<NodeId>) -> DomResult<NodeId> {
        let id = NodeId::new(self.nodes.len() as u32);

        if let Some(parent_id) = parent {
            let parent = self.node_mut(parent_id).ok_or(DomError::NodeNotFound(parent_id.0))?;
            parent.content.push(ContentItem::Element(id));
            parent.children.push(id);
        }

        self.nodes.push(Node::new(id, parent));
        Ok(id)
    }

    /// Register a new attribute with the given key and no value
    pub fn create_attribute(&mut self, key: impl Into<String>) -> AttrId {
        let id = AttrId(self.attributes.len() as u32);
        self.attributes.push(Attribute::new(key));
        id
    }

    /// Register a new text run
    pub fn create_text(&mut self, text: impl Into<String>) -> TextId {
        let id = TextId(self.texts.len() as u32);
        self.texts.push(text.into());
        id
    }

    /// Append a registered text run to a node's content
    pub fn append_text(&mut self, node_id: NodeId, text_id: TextId) -> DomResult<()> {
        if self.text(text_id).is_none() {
            return Err(DomError::TextNotFound(text_id.0));
        }
        let node = self.node_mut(node_id).ok_or(DomError::NodeNotFound(node_id.0))?;
        node.content.push(ContentItem::Text(text_id));
        Ok(())
    }

    /// Append a registered attribute to a node's attribute list
    pub fn push_attribute(&mut self, node_id: NodeId, attr_id: AttrId) -> DomResult<()> {
        if self.attribute(attr_id).is_none() {
            return Err(DomError::AttributeNotFound(attr_id.0));
        }
        let node = self.node_mut(node_id).ok_or(DomError::NodeNotFound(node_id.0))?;
        node.attributes.push(attr_id);
        Ok(())
    }

    /// Set a node's tag name
    pub fn set_tag(&mut self, node_id: NodeId, tag: impl Into<String>) -> DomResult<()> {
        let node = self.node_mut(node_id).ok_or(DomError::NodeNotFound(node_id.0))?;
        node.tag = Some(tag.into());
        Ok(())
    }

    /// Clear a node's parent back-reference
    ///
    /// The former parent keeps its content entry; only the upward link is cut.
    pub fn detach(&mut self, node_id: NodeId) -> DomResult<()> {
        let node = self.node_mut(node_id).ok_or(DomError::NodeNotFound(node_id.0))?;
        node.parent = None;
        Ok(())
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn attribute(&self, id: AttrId) -> Option<&Attribute> {
        self.attributes.get(id.0 as usize)
    }

    pub fn attribute_mut(&mut self, id: AttrId) -> Option<&mut Attribute> {
        self.attributes.get_mut(id.0 as usize)
    }

    pub fn text(&self, id: TextId) -> Option<&str> {
        self.texts.get(id.0 as usize).map(|s| s.as_str())
    }

    /// Resolve a list of attribute ids, skipping any that are no longer live
    pub fn resolve_attributes<'a>(
        &'a self,
        ids: &'a [AttrId],
    ) -> impl Iterator<Item = &'a Attribute> + 'a {
        ids.iter().filter_map(move |&id| self.attribute(id))
    }

    /// Attributes of a node in document order
    pub fn attributes_of(&self, node_id: NodeId) -> Vec<&Attribute> {
        self.node(node_id)
            .map(|n| self.resolve_attributes(n.attributes()).collect())
            .unwrap_or_default()
    }

    /// First attribute of a node with the given key
    pub fn get_attribute(&self, node_id: NodeId, key: &str) -> Option<&Attribute> {
        let node = self.node(node_id)?;
        self.resolve_attributes(node.attributes()).find(|attr| attr.key == key)
    }

    /// Number of registered nodes (including the synthetic root and declaration nodes)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.attributes.is_empty() && self.texts.is_empty()
    }

    /// Drop every registered entity
    ///
    /// Safe after a failed parse and a no-op on an empty arena. Ids handed
    /// out before the release no longer resolve afterwards.
    pub fn release_all(&mut self) -> Released {
        let released = Released {
            nodes: self.nodes.len(),
            attributes: self.attributes.len(),
            texts: self.texts.len(),
        };

        if released.total() == 0 {
            return released;
        }

        self.nodes = Vec::new();
        self.attributes = Vec::new();
        self.texts = Vec::new();

        log::debug!(
            "Released {} nodes, {} attributes, {} text values",
            released.nodes,
            released.attributes,
            released.texts
        );
        released
    }

    /// Indented outline of a subtree, four spaces per level
    pub fn pretty_print(&self, root: NodeId) -> String {
        let mut output = String::new();
        let mut stack = vec![(root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };

            output.push_str(&"    ".repeat(depth));
            output.push_str(node.tag_name());
            for attr in self.resolve_attributes(node.attributes()) {
                match &attr.value {
                    Some(value) => output.push_str(&format!(" {}=\"{}\"", attr.key, value)),
                    None => output.push_str(&format!(" {}", attr.key)),
                }
            }
            output.push('\n');

            stack.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));
        }
        output
    }
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("nodes", &self.nodes.len())
            .field("attributes", &self.attributes.len())
            .field("texts", &self.texts.len())
            .finish()
    }
}
