//! Input document: buffer, scan cursor, scratch buffer and declaration

use std::fs;
use std::io;
use std::path::Path;

use sxml_dom::AttrId;

use crate::error::{XmlError, XmlResult};
use crate::scratch::ScratchBuffer;

/// One XML input together with the state of its scan
///
/// A NUL byte ends the input just like the end of the buffer does.
#[derive(Debug)]
pub struct Document {
    buffer: Vec<u8>,
    pub(crate) scratch: ScratchBuffer,
    index: usize,
    declaration: Option<Vec<AttrId>>,
}

impl Document {
    /// Create a document over an in-memory buffer
    pub fn new(buffer: impl Into<Vec<u8>>) -> Self {
        Self {
            buffer: buffer.into(),
            scratch: ScratchBuffer::new(),
            index: 0,
            declaration: None,
        }
    }

    /// Read a whole file into a new document
    pub fn load(path: impl AsRef<Path>) -> XmlResult<Self> {
        let path = path.as_ref();
        let unavailable = |source: io::Error| XmlError::IoUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let buffer = fs::read(path).map_err(unavailable)?;
        if buffer.is_empty() {
            return Err(unavailable(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "file is empty",
            )));
        }

        log::debug!("Loaded {} bytes from {}", buffer.len(), path.display());
        Ok(Self::new(buffer))
    }

    /// Attributes of the `<?xml ...?>` declaration, if one was seen
    ///
    /// The ids resolve against the arena the document was parsed into.
    pub fn declaration(&self) -> Option<&[AttrId]> {
        self.declaration.as_deref()
    }

    pub(crate) fn set_declaration(&mut self, attributes: Vec<AttrId>) {
        self.declaration = Some(attributes);
    }

    /// Raw input bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Current scan position
    pub fn position(&self) -> usize {
        self.index
    }

    /// Check if the scan has reached the end of input
    pub fn at_end(&self) -> bool {
        self.peek().is_none()
    }

    /// Byte under the cursor
    pub(crate) fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Byte `offset` positions past the cursor
    pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
        match self.buffer.get(self.index + offset) {
            Some(0) | None => None,
            Some(&b) => Some(b),
        }
    }

    /// Advance the cursor by one byte
    pub(crate) fn bump(&mut self) {
        if self.index < self.buffer.len() {
            self.index += 1;
        }
    }

    /// Consume and return the byte under the cursor
    pub(crate) fn next_byte(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.index += 1;
        Some(b)
    }

    /// Move the byte under the cursor into the scratch buffer
    pub(crate) fn shift(&mut self) -> Option<u8> {
        let b = self.next_byte()?;
        self.scratch.push(b);
        Some(b)
    }

    /// Shift bytes into scratch until one of `stops` (or the end) is under the cursor
    pub(crate) fn shift_until(&mut self, stops: &[u8]) {
        while let Some(b) = self.peek() {
            if stops.contains(&b) {
                break;
            }
            self.shift();
        }
    }

    /// Discard bytes up to and including the next `>`
    pub(crate) fn skip_past_tag_end(&mut self) {
        while let Some(b) = self.next_byte() {
            if b == b'>' {
                break;
            }
        }
    }
}

impl From<&str> for Document {
    fn from(input: &str) -> Self {
        Self::new(input.as_bytes())
    }
}

impl From<Vec<u8>> for Document {
    fn from(buffer: Vec<u8>) -> Self {
        Self::new(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let doc = Document::from("<DOC></DOC>");
        assert_eq!(doc.position(), 0);
        assert_eq!(doc.as_bytes().len(), 11);
        assert!(doc.declaration().is_none());
        assert!(doc.scratch.is_empty());
    }

    #[test]
    fn test_nul_ends_input() {
        let mut doc = Document::new(b"ab\0cd".to_vec());
        assert_eq!(doc.next_byte(), Some(b'a'));
        assert_eq!(doc.peek_at(1), None);
        assert_eq!(doc.next_byte(), Some(b'b'));
        assert!(doc.at_end());
        assert_eq!(doc.next_byte(), None);
    }

    #[test]
    fn test_shift_until() {
        let mut doc = Document::from("<!-- x -->");
        doc.shift_until(b" >");
        assert_eq!(doc.scratch.snapshot(), "<!--");
        assert_eq!(doc.peek(), Some(b' '));
    }

    #[test]
    fn test_skip_past_tag_end() {
        let mut doc = Document::from("<!DOCTYPE note>rest");
        doc.skip_past_tag_end();
        assert_eq!(doc.peek(), Some(b'r'));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Document::load("/nonexistent/sxml/missing.xml");
        assert!(matches!(result, Err(XmlError::IoUnavailable { .. })));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("sxml-load-{}.xml", std::process::id()));
        fs::write(&path, "<DOC></DOC>").unwrap();

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.as_bytes(), b"<DOC></DOC>");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_empty_file() {
        let path = std::env::temp_dir().join(format!("sxml-empty-{}.xml", std::process::id()));
        fs::write(&path, "").unwrap();

        let result = Document::load(&path);
        assert!(matches!(result, Err(XmlError::IoUnavailable { .. })));

        fs::remove_file(&path).unwrap();
    }
}
