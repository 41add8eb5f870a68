//! XML parsing error types

use std::path::PathBuf;

use sxml_dom::DomError;
use thiserror::Error;

/// XML parsing result type
pub type XmlResult<T> = Result<T, XmlError>;

/// XML parsing errors
///
/// Running out of memory while growing the scratch buffer is not represented
/// here: it aborts the process.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("Could not load file from '{}': {source}", .path.display())]
    IoUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Mismatched tags ({expected} != {found})")]
    MismatchedTag { expected: String, found: String },

    #[error("Text outside of document")]
    TextOutsideDocument,

    #[error("Value has no key")]
    AttributeValueWithoutKey,

    #[error("Document contains no element")]
    EmptyDocument,

    #[error(transparent)]
    Dom(#[from] DomError),
}
