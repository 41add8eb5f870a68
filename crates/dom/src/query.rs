//! Tree queries over the arena (descendants, lookup by tag, text content)

use rustc_hash::FxHashMap;

use crate::arena::Arena;
use crate::node::{ContentItem, NodeId};

/// Trait for querying a parsed tree
pub trait Queryable {
    /// All element descendants of a node, depth-first in document order
    fn descendants(&self, id: NodeId) -> Vec<NodeId>;

    /// The node itself and its descendants with the given tag name
    fn elements_by_tag_name(&self, root: NodeId, tag_name: &str) -> Vec<NodeId>;

    /// Concatenated text of a node and all its descendants
    fn text_content(&self, id: NodeId) -> String;

    /// Number of elements per tag name in a subtree (root included)
    fn tag_histogram(&self, root: NodeId) -> FxHashMap<String, usize>;
}

impl Queryable for Arena {
    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        collect_descendants(self, id, &mut result);
        result
    }

    fn elements_by_tag_name(&self, root: NodeId, tag_name: &str) -> Vec<NodeId> {
        std::iter::once(root)
            .chain(self.descendants(root))
            .filter(|&node_id| {
                self.node(node_id)
                    .and_then(|n| n.tag.as_deref())
                    .map(|tag| tag == tag_name)
                    .unwrap_or(false)
            })
            .collect()
    }

    fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        collect_text(self, id, &mut result);
        result
    }

    fn tag_histogram(&self, root: NodeId) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for node_id in std::iter::once(root).chain(self.descendants(root)) {
            if let Some(node) = self.node(node_id) {
                *counts.entry(node.tag_name().to_string()).or_insert(0) += 1;
            }
        }
        counts
    }
}

fn collect_descendants(arena: &Arena, id: NodeId, result: &mut Vec<NodeId>) {
    let mut stack: Vec<NodeId> = Vec::new();
    if let Some(node) = arena.node(id) {
        stack.extend(node.children().iter().rev());
    }

    while let Some(node_id) = stack.pop() {
        result.push(node_id);
        if let Some(node) = arena.node(node_id) {
            stack.extend(node.children().iter().rev());
        }
    }
}

fn collect_text(arena: &Arena, id: NodeId, result: &mut String) {
    let mut stack = vec![ContentItem::Element(id)];

    while let Some(item) = stack.pop() {
        match item {
            ContentItem::Text(text_id) => {
                if let Some(text) = arena.text(text_id) {
                    result.push_str(text);
                }
            }
            ContentItem::Element(node_id) => {
                if let Some(node) = arena.node(node_id) {
                    stack.extend(node.content().iter().rev());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // <ul><li>One</li><li>Two <b>bold</b></li></ul>
    fn sample() -> (Arena, NodeId) {
        let mut arena = Arena::new();
        let ul = arena.create_node(None).unwrap();
        arena.set_tag(ul, "ul").unwrap();

        let first = arena.create_node(Some(ul)).unwrap();
        arena.set_tag(first, "li").unwrap();
        let one = arena.create_text("One");
        arena.append_text(first, one).unwrap();

        let second = arena.create_node(Some(ul)).unwrap();
        arena.set_tag(second, "li").unwrap();
        let two = arena.create_text("Two ");
        arena.append_text(second, two).unwrap();
        let b = arena.create_node(Some(second)).unwrap();
        arena.set_tag(b, "b").unwrap();
        let bold = arena.create_text("bold");
        arena.append_text(b, bold).unwrap();

        (arena, ul)
    }

    #[test]
    fn test_descendants_in_document_order() {
        let (arena, ul) = sample();
        let tags: Vec<&str> = arena
            .descendants(ul)
            .into_iter()
            .map(|id| arena.node(id).unwrap().tag_name())
            .collect();
        assert_eq!(tags, vec!["li", "li", "b"]);
    }

    #[test]
    fn test_elements_by_tag_name_includes_root() {
        let (arena, ul) = sample();
        assert_eq!(arena.elements_by_tag_name(ul, "li").len(), 2);
        assert_eq!(arena.elements_by_tag_name(ul, "ul"), vec![ul]);
        assert!(arena.elements_by_tag_name(ul, "table").is_empty());
    }

    #[test]
    fn test_text_content() {
        let (arena, ul) = sample();
        assert_eq!(arena.text_content(ul), "OneTwo bold");
    }

    #[test]
    fn test_tag_histogram() {
        let (arena, ul) = sample();
        let counts = arena.tag_histogram(ul);
        assert_eq!(counts.get("li"), Some(&2));
        assert_eq!(counts.get("ul"), Some(&1));
        assert_eq!(counts.get("b"), Some(&1));
    }

    #[test]
    fn test_deep_tree_queries() {
        let mut arena = Arena::new();
        let root = arena.create_node(None).unwrap();
        arena.set_tag(root, "a").unwrap();
        let mut current = root;
        for _ in 1..100_000 {
            current = arena.create_node(Some(current)).unwrap();
            arena.set_tag(current, "a").unwrap();
        }
        let leaf = arena.create_text("x");
        arena.append_text(current, leaf).unwrap();

        assert_eq!(arena.descendants(root).len(), 99_999);
        assert_eq!(arena.descendants(root).last(), Some(&current));
        assert_eq!(arena.text_content(root), "x");
        assert_eq!(arena.tag_histogram(root).get("a"), Some(&100_000));
    }
}
