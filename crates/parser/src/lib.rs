//! sxml parser
//!
//! Single-pass XML reader that builds an arena-backed tree.

mod attributes;
mod document;
mod error;
mod options;
mod scratch;
mod tree_builder;

pub use document::Document;
pub use error::{XmlError, XmlResult};
pub use options::{MismatchPolicy, ParseOptions, QuoteStyle};
pub use scratch::{ScratchBuffer, SCRATCH_GROW_STEP};
pub use tree_builder::{parse, parse_with_options, ParsedDocument, XmlParser};
