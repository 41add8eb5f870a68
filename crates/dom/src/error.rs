//! Arena lookup error types

use thiserror::Error;

/// Arena operation result type
pub type DomResult<T> = Result<T, DomError>;

/// Errors raised when an id does not resolve to a live arena entity
#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Attribute not found: {0}")]
    AttributeNotFound(u32),

    #[error("Text value not found: {0}")]
    TextNotFound(u32),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
