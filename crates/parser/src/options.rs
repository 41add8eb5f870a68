//! Parser configuration

/// What to do when a close tag does not match the open element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MismatchPolicy {
    /// Fail the parse with `MismatchedTag`
    #[default]
    Abort,
    /// Stop scanning and return the tree built so far
    Lenient,
}

/// Which quote characters may close an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Either `"` or `'` closes the value, whichever opened it
    #[default]
    Either,
    /// Only the quote that opened the value closes it
    Matching,
}

impl QuoteStyle {
    /// Check if `byte` ends a value opened with `opening`
    pub fn closes(self, opening: u8, byte: u8) -> bool {
        match self {
            QuoteStyle::Either => matches!(byte, b'"' | b'\''),
            QuoteStyle::Matching => byte == opening,
        }
    }
}

/// Options for one parse session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub mismatch: MismatchPolicy,
    pub quotes: QuoteStyle,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mismatch(mut self, policy: MismatchPolicy) -> Self {
        self.mismatch = policy;
        self
    }

    pub fn quotes(mut self, style: QuoteStyle) -> Self {
        self.quotes = style;
        self
    }
}
