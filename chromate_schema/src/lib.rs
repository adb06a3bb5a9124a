//! Kernel for the self-describing DevTools protocol schema.
//!
//! The browser publishes its protocol as a JSON document: a tree of domains,
//! each holding type definitions, commands and events. This crate parses that
//! document ([`schema`]) and renders it into descriptor values
//! ([`descriptor`], [`catalog`]): for every command, how its request frame is
//! produced and how its reply decodes; for every event, how a notification's
//! params decode.
//!
//! Building a catalog is deterministic: two runs over the same schema
//! document produce identical descriptors in identical order.

pub mod catalog;
pub mod descriptor;
pub mod schema;

pub use catalog::{Catalog, DomainCatalog};
pub use descriptor::{CommandDescriptor, EventDescriptor, Reply, ReplyShape};
pub use schema::{Domain, Protocol, Type};

use thiserror::Error;

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to parse schema document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{container}` declares a field with neither a type nor a $ref")]
    MissingType { container: String },
    #[error("`{container}` declares unknown type kind `{kind}`")]
    UnknownTypeKind { container: String, kind: String },
    #[error("array field in `{container}` has no item type")]
    MissingItems { container: String },
    #[error("params for `{method}` do not match its schema: {reason}")]
    Params { method: String, reason: String },
    #[error("reply for `{method}` does not match its schema: {reason}")]
    Reply { method: String, reason: String },
    #[error("event `{method}` does not match its schema: {reason}")]
    Event { method: String, reason: String },
}
