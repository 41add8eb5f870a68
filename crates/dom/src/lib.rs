//! sxml DOM - document model for the sxml reader
//!
//! Nodes, attributes and text runs live in an [`Arena`]; the tree built on
//! top of them only holds ids.

mod node;
mod arena;
mod error;
mod query;
mod serialize;

pub use node::{Attribute, AttrId, ContentItem, Node, NodeId, TextId};
pub use arena::{Arena, Released};
pub use error::{DomError, DomResult};
pub use query::Queryable;
pub use serialize::to_xml;
