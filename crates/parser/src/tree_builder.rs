//! XML Tree Builder
//!
//! Single forward scan over a [`Document`] that builds the element tree in
//! an [`Arena`]. Top-level content hangs under a synthetic root node; the
//! first element below it is what the parse returns.

use sxml_dom::{Arena, Attribute, NodeId, Released};

use crate::attributes::{AttributeParser, TagClose};
use crate::document::Document;
use crate::error::{XmlError, XmlResult};
use crate::options::{MismatchPolicy, ParseOptions};

const COMMENT_OPEN: &[u8] = b"<!--";
const COMMENT_CLOSE: &[u8] = b"-->";
const DECLARATION_OPEN: &[u8] = b"<?xml";

/// XML parser that builds a tree into an arena
#[derive(Debug, Clone, Default)]
pub struct XmlParser {
    options: ParseOptions,
}

impl XmlParser {
    /// Create a new XML parser with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with the given options
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a document, registering every entity in `arena`
    ///
    /// Returns the id of the top-level element, detached from the synthetic
    /// root. On error the arena still holds everything created so far.
    pub fn parse(&self, doc: &mut Document, arena: &mut Arena) -> XmlResult<NodeId> {
        if !arena.is_empty() {
            log::warn!("Parsing into an arena that already holds {:?}", arena);
        }

        let result = TreeBuilder::new(doc, arena, self.options).and_then(TreeBuilder::run);
        match &result {
            Ok(_) => log::debug!(
                "Parsed {} bytes: {} nodes, {} attributes, {} text values",
                doc.position(),
                arena.node_count(),
                arena.attribute_count(),
                arena.text_count()
            ),
            Err(err) => log::error!("{}", err),
        }
        result
    }
}

/// State of one parse
struct TreeBuilder<'a> {
    doc: &'a mut Document,
    arena: &'a mut Arena,
    options: ParseOptions,
    /// Synthetic root that collects top-level content
    root: NodeId,
    /// Innermost open element
    current: Option<NodeId>,
}

impl<'a> TreeBuilder<'a> {
    fn new(doc: &'a mut Document, arena: &'a mut Arena, options: ParseOptions) -> XmlResult<Self> {
        let root = arena.create_node(None)?;
        doc.scratch.reset();
        Ok(Self {
            doc,
            arena,
            options,
            root,
            current: Some(root),
        })
    }

    fn run(mut self) -> XmlResult<NodeId> {
        while let Some(b) = self.doc.peek() {
            if b != b'<' {
                self.doc.shift();
                continue;
            }

            self.flush_text()?;

            match self.doc.peek_at(1) {
                Some(b'/') => {
                    if let Some(root) = self.handle_close_tag()? {
                        return Ok(root);
                    }
                }
                Some(b'!') => self.handle_special(),
                Some(b'?') => self.handle_declaration()?,
                _ => self.handle_open_tag()?,
            }
        }

        // Input ended before the top-level element was closed.
        self.finish()
    }

    /// Attach buffered text to the current node
    fn flush_text(&mut self) -> XmlResult<()> {
        if self.doc.scratch.is_empty() {
            return Ok(());
        }
        let node = self.current.ok_or(XmlError::TextOutsideDocument)?;
        let text = self.arena.create_text(self.doc.scratch.snapshot());
        self.arena.append_text(node, text)?;
        self.doc.scratch.reset();
        Ok(())
    }

    /// `</name>`; returns the finished root when the synthetic root is closed
    fn handle_close_tag(&mut self) -> XmlResult<Option<NodeId>> {
        self.doc.bump();
        self.doc.bump();
        self.doc.shift_until(b">");

        let current = self.current.unwrap_or(self.root);
        if current == self.root {
            return self.finish().map(Some);
        }

        let node = self.arena.node(current).ok_or(sxml_dom::DomError::NodeNotFound(current.0))?;
        let expected = node.tag_name();
        if self.doc.scratch.as_bytes() != expected.as_bytes() {
            let err = XmlError::MismatchedTag {
                expected: expected.to_string(),
                found: self.doc.scratch.snapshot(),
            };
            return match self.options.mismatch {
                MismatchPolicy::Abort => Err(err),
                MismatchPolicy::Lenient => {
                    log::warn!("{}, returning partial tree", err);
                    self.finish().map(Some)
                }
            };
        }

        log::trace!("Closed <{}>", expected);
        self.current = node.parent;
        self.doc.scratch.reset();
        self.doc.bump();
        Ok(None)
    }

    /// `<!-- ... -->` and other `<!...>` markup, all discarded
    fn handle_special(&mut self) {
        self.doc.shift_until(b" >");

        if !self.doc.scratch.starts_with(COMMENT_OPEN) {
            log::debug!("Skipping unsupported markup {}", self.doc.scratch.snapshot());
            self.doc.scratch.reset();
            self.doc.skip_past_tag_end();
            return;
        }

        // The closer must not overlap the opener, so `<!-->` keeps going.
        let min_len = COMMENT_OPEN.len() + COMMENT_CLOSE.len();
        while !(self.doc.scratch.len() >= min_len && self.doc.scratch.ends_with(COMMENT_CLOSE)) {
            if self.doc.shift().is_none() {
                break;
            }
        }
        log::trace!("Skipped comment of {} bytes", self.doc.scratch.len());
        self.doc.scratch.reset();
    }

    /// `<?xml ...?>`; other processing instructions are skipped
    fn handle_declaration(&mut self) -> XmlResult<()> {
        self.doc.shift_until(b" >");

        if self.doc.scratch.as_bytes() != DECLARATION_OPEN {
            log::debug!("Skipping processing instruction {}", self.doc.scratch.snapshot());
            self.doc.scratch.reset();
            self.doc.skip_past_tag_end();
            return Ok(());
        }
        self.doc.scratch.reset();

        // Registered like any node, but never attached to the tree.
        let declaration = self.arena.create_node(None)?;
        self.arena.set_tag(declaration, "xml")?;
        AttributeParser::new(self.doc, self.arena, declaration, b'?', self.options.quotes).run()?;

        let attributes = self
            .arena
            .node(declaration)
            .map(|n| n.attributes().to_vec())
            .unwrap_or_default();
        self.doc.set_declaration(attributes);
        self.doc.scratch.reset();
        self.doc.bump();
        Ok(())
    }

    /// `<name ...>` or `<name .../>`
    fn handle_open_tag(&mut self) -> XmlResult<()> {
        let parent = self.current;
        let node = self.arena.create_node(parent)?;
        self.current = Some(node);
        self.doc.bump();

        let close = AttributeParser::new(self.doc, self.arena, node, b'/', self.options.quotes).run()?;
        match close {
            TagClose::SelfClosing => {
                self.current = parent;
            }
            TagClose::Open => {
                let has_tag = self.arena.node(node).map(|n| n.tag.is_some()).unwrap_or(false);
                if !has_tag {
                    self.arena.set_tag(node, self.doc.scratch.snapshot())?;
                }
            }
        }

        self.doc.scratch.reset();
        self.doc.bump();
        Ok(())
    }

    /// Detach and return the first element under the synthetic root
    fn finish(&mut self) -> XmlResult<NodeId> {
        let first = self
            .arena
            .node(self.root)
            .and_then(|root| root.children().first().copied())
            .ok_or(XmlError::EmptyDocument)?;
        self.arena.detach(first)?;
        Ok(first)
    }
}

/// Result of [`parse`]: the arena, the document and the root element
#[derive(Debug)]
pub struct ParsedDocument {
    pub arena: Arena,
    pub document: Document,
    pub root: NodeId,
}

impl ParsedDocument {
    /// Declaration attributes, empty if the input had no `<?xml ...?>`
    pub fn declaration(&self) -> Vec<&Attribute> {
        self.document
            .declaration()
            .map(|ids| self.arena.resolve_attributes(ids).collect())
            .unwrap_or_default()
    }

    /// Release every entity of the session
    pub fn release(mut self) -> Released {
        self.arena.release_all()
    }
}

/// Parse a string with default options
pub fn parse(input: &str) -> XmlResult<ParsedDocument> {
    parse_with_options(Document::from(input), ParseOptions::default())
}

/// Parse a document with the given options into a fresh arena
pub fn parse_with_options(mut document: Document, options: ParseOptions) -> XmlResult<ParsedDocument> {
    let mut arena = Arena::new();
    let root = XmlParser::with_options(options).parse(&mut document, &mut arena)?;
    Ok(ParsedDocument {
        arena,
        document,
        root,
    })
}
