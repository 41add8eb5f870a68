//! Start tag sub-parser
//!
//! Reads the inside of a start tag (or of the `<?xml ...?>` declaration)
//! up to its closing `>`, capturing the tag name and the attributes. The
//! `>` itself is left under the cursor for the caller.

use sxml_dom::{Arena, AttrId, NodeId};

use crate::document::Document;
use crate::error::{XmlError, XmlResult};
use crate::options::QuoteStyle;

/// How a start tag ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagClose {
    /// `>`: content and a close tag follow
    Open,
    /// `/>` (or `?>` for the declaration): nothing follows
    SelfClosing,
}

/// Attribute sub-parser for one tag
pub(crate) struct AttributeParser<'a> {
    doc: &'a mut Document,
    arena: &'a mut Arena,
    node: NodeId,
    /// Byte that marks a self-closing end when it directly precedes `>`
    closer: u8,
    quotes: QuoteStyle,
    has_tag: bool,
    /// Attribute whose key was read and which waits for its quoted value
    pending: Option<AttrId>,
}

impl<'a> AttributeParser<'a> {
    pub(crate) fn new(
        doc: &'a mut Document,
        arena: &'a mut Arena,
        node: NodeId,
        closer: u8,
        quotes: QuoteStyle,
    ) -> Self {
        let has_tag = arena.node(node).map(|n| n.tag.is_some()).unwrap_or(false);
        Self {
            doc,
            arena,
            node,
            closer,
            quotes,
            has_tag,
            pending: None,
        }
    }

    /// Consume the tag up to (not including) its `>`
    pub(crate) fn run(mut self) -> XmlResult<TagClose> {
        loop {
            match self.doc.peek() {
                None | Some(b'>') => return Ok(TagClose::Open),
                Some(_) => {}
            }
            self.doc.shift();
            let next = self.doc.peek();

            if next == Some(b' ') && !self.has_tag {
                self.finish_tag_name()?;
                self.doc.bump();
                continue;
            }

            if self.doc.scratch.last() == Some(b' ') {
                self.doc.scratch.pop();
            }

            match next {
                Some(b'=') => {
                    self.begin_attribute();
                    continue;
                }
                Some(quote @ (b'"' | b'\'')) => {
                    self.read_value(quote)?;
                    continue;
                }
                _ => {}
            }

            if next == Some(b'>') && self.doc.scratch.last() == Some(self.closer) {
                self.doc.scratch.pop();
                if !self.has_tag {
                    self.finish_tag_name()?;
                }
                self.doc.scratch.reset();
                return Ok(TagClose::SelfClosing);
            }

            if self.has_tag && !self.doc.scratch.is_empty() && self.at_attribute_end(next) {
                self.valueless_attribute()?;
                if next == Some(b' ') {
                    self.doc.bump();
                }
            }
        }
    }

    /// A space, the tag's `>`, or the closer right before `>`
    fn at_attribute_end(&self, next: Option<u8>) -> bool {
        match next {
            Some(b' ') | Some(b'>') => true,
            Some(b) if b == self.closer => self.doc.peek_at(1) == Some(b'>'),
            _ => false,
        }
    }

    fn finish_tag_name(&mut self) -> XmlResult<()> {
        let tag = self.doc.scratch.snapshot();
        log::trace!("Tag name: {}", tag);
        self.arena.set_tag(self.node, tag)?;
        self.has_tag = true;
        self.doc.scratch.reset();
        Ok(())
    }

    fn begin_attribute(&mut self) {
        let key = self.doc.scratch.snapshot();
        self.pending = Some(self.arena.create_attribute(key));
        self.doc.scratch.reset();
    }

    /// Read a quoted value; the cursor is on the opening quote
    fn read_value(&mut self, quote: u8) -> XmlResult<()> {
        let attr_id = self.pending.take().ok_or(XmlError::AttributeValueWithoutKey)?;

        self.doc.scratch.reset();
        self.doc.bump();
        while let Some(b) = self.doc.next_byte() {
            if b == b'\\' {
                // The escaped byte is taken literally, whatever it is.
                if let Some(escaped) = self.doc.next_byte() {
                    self.doc.scratch.push(escaped);
                }
            } else if self.quotes.closes(quote, b) {
                break;
            } else {
                self.doc.scratch.push(b);
            }
        }

        let value = self.doc.scratch.snapshot();
        if let Some(attr) = self.arena.attribute_mut(attr_id) {
            attr.value = Some(value);
        }
        self.arena.push_attribute(self.node, attr_id)?;
        self.doc.scratch.reset();
        Ok(())
    }

    fn valueless_attribute(&mut self) -> XmlResult<()> {
        let key = self.doc.scratch.snapshot();
        let attr_id = self.arena.create_attribute(key);
        self.arena.push_attribute(self.node, attr_id)?;
        self.doc.scratch.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run the sub-parser over a tag body (the part after `<`)
    fn run(body: &str, quotes: QuoteStyle) -> (XmlResult<TagClose>, Arena, NodeId, Document) {
        let mut doc = Document::from(body);
        let mut arena = Arena::new();
        let node = arena.create_node(None).unwrap();
        let result = AttributeParser::new(&mut doc, &mut arena, node, b'/', quotes).run();
        (result, arena, node, doc)
    }

    fn pairs(arena: &Arena, node: NodeId) -> Vec<(String, Option<String>)> {
        arena
            .attributes_of(node)
            .into_iter()
            .map(|a| (a.key.clone(), a.value.clone()))
            .collect()
    }

    #[test]
    fn test_plain_tag_leaves_name_in_scratch() {
        let (result, arena, node, doc) = run("DOC>", QuoteStyle::Either);
        assert_eq!(result.unwrap(), TagClose::Open);
        assert!(arena.node(node).unwrap().tag.is_none());
        assert_eq!(doc.scratch.snapshot(), "DOC");
        assert_eq!(doc.peek(), Some(b'>'));
    }

    #[test]
    fn test_self_closing_without_attributes() {
        let (result, arena, node, doc) = run("br/>", QuoteStyle::Either);
        assert_eq!(result.unwrap(), TagClose::SelfClosing);
        assert_eq!(arena.node(node).unwrap().tag_name(), "br");
        assert!(doc.scratch.is_empty());
        assert_eq!(doc.peek(), Some(b'>'));
    }

    #[test]
    fn test_self_closing_with_space() {
        let (result, arena, node, _) = run("br />", QuoteStyle::Either);
        assert_eq!(result.unwrap(), TagClose::SelfClosing);
        assert_eq!(arena.node(node).unwrap().tag_name(), "br");
        assert!(arena.attributes_of(node).is_empty());
    }

    #[test]
    fn test_quoted_values_in_order() {
        let (result, arena, node, _) = run(r#"a x="1" y='2' z="3"/>"#, QuoteStyle::Either);
        assert_eq!(result.unwrap(), TagClose::SelfClosing);
        assert_eq!(
            pairs(&arena, node),
            vec![
                ("x".to_string(), Some("1".to_string())),
                ("y".to_string(), Some("2".to_string())),
                ("z".to_string(), Some("3".to_string())),
            ]
        );
    }

    #[test]
    fn test_valueless_attributes() {
        let (result, arena, node, _) = run(r#"window sv title="Good window" mv ev>"#, QuoteStyle::Either);
        assert_eq!(result.unwrap(), TagClose::Open);
        assert_eq!(
            pairs(&arena, node),
            vec![
                ("sv".to_string(), None),
                ("title".to_string(), Some("Good window".to_string())),
                ("mv".to_string(), None),
                ("ev".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_single_byte_valueless_attribute() {
        let (_, arena, node, _) = run("a b>", QuoteStyle::Either);
        assert_eq!(pairs(&arena, node), vec![("b".to_string(), None)]);
    }

    #[test]
    fn test_valueless_before_self_closing() {
        let (result, arena, node, _) = run("input disabled/>", QuoteStyle::Either);
        assert_eq!(result.unwrap(), TagClose::SelfClosing);
        assert_eq!(pairs(&arena, node), vec![("disabled".to_string(), None)]);
    }

    #[test]
    fn test_escaped_quotes() {
        let (_, arena, node, _) = run(r#"a escape="aaa\"test\'bbb"/>"#, QuoteStyle::Either);
        assert_eq!(
            arena.get_attribute(node, "escape").and_then(|a| a.value()),
            Some("aaa\"test'bbb")
        );
    }

    #[test]
    fn test_either_quote_closes_value() {
        let (_, arena, node, _) = run(r#"a t="it's" u="v">"#, QuoteStyle::Either);
        assert_eq!(arena.get_attribute(node, "t").and_then(|a| a.value()), Some("it"));
    }

    #[test]
    fn test_matching_quote_closes_value() {
        let (_, arena, node, _) = run(r#"a t="it's" u="v">"#, QuoteStyle::Matching);
        assert_eq!(arena.get_attribute(node, "t").and_then(|a| a.value()), Some("it's"));
        assert_eq!(arena.get_attribute(node, "u").and_then(|a| a.value()), Some("v"));
    }

    #[test]
    fn test_value_without_key() {
        let (result, _, _, _) = run(r#"a "orphan">"#, QuoteStyle::Either);
        assert!(matches!(result, Err(XmlError::AttributeValueWithoutKey)));
    }

    #[test]
    fn test_value_after_used_key_fails() {
        let (result, _, _, _) = run(r#"a x="1" "2">"#, QuoteStyle::Either);
        assert!(matches!(result, Err(XmlError::AttributeValueWithoutKey)));
    }

    #[test]
    fn test_trailing_space_before_close() {
        let (result, arena, node, doc) = run(r#"a x="1" >"#, QuoteStyle::Either);
        assert_eq!(result.unwrap(), TagClose::Open);
        assert_eq!(arena.attributes_of(node).len(), 1);
        assert!(doc.scratch.is_empty());
    }

    #[test]
    fn test_truncated_tag() {
        let (result, arena, node, doc) = run(r#"a x="unterminated"#, QuoteStyle::Either);
        assert_eq!(result.unwrap(), TagClose::Open);
        assert_eq!(arena.get_attribute(node, "x").and_then(|a| a.value()), Some("unterminated"));
        assert!(doc.at_end());
    }

    #[test]
    fn test_declaration_closer() {
        let mut doc = Document::from(r#" version="1.0" standalone?>"#);
        let mut arena = Arena::new();
        let node = arena.create_node(None).unwrap();
        arena.set_tag(node, "xml").unwrap();

        let result = AttributeParser::new(&mut doc, &mut arena, node, b'?', QuoteStyle::Either).run();
        assert_eq!(result.unwrap(), TagClose::SelfClosing);
        assert_eq!(
            pairs(&arena, node),
            vec![
                ("version".to_string(), Some("1.0".to_string())),
                ("standalone".to_string(), None),
            ]
        );
        assert_eq!(doc.peek(), Some(b'>'));
    }
}
