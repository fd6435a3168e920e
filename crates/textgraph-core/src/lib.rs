//! Core data structures for the TextGraph text/graph codec.
//!
//! A TextGraph document is a plain-text rendering of a directed node graph.
//! This crate holds the pieces every strategy shares:
//!
//! - [`model`] — plain value snapshots of a graph ([`GraphData`], [`NodeData`],
//!   [`ConnectionData`]) and the units exchanged between strategies.
//! - [`value`] — the closed [`Value`] union stored in a node's custom data.
//! - [`context`] — a read-only adjacency view handed to node coders.
//! - [`strategy`] — the four pluggable codec roles.
//! - [`error`] — the configuration / parse / I/O error taxonomy.

pub mod context;
pub mod error;
pub mod model;
pub mod strategy;
pub mod value;

pub use context::SerializationContext;
pub use error::{ConfigurationError, ParseError, ParseLocation, StrategyFamily, TextGraphError};
pub use model::{
    ConnectionData, GraphData, NodeData, NodeDeserializeResult, ParsedNodeFragment, Position,
};
pub use strategy::{ConnectionStrategy, DocumentFramer, DocumentParser, NodeCoder};
pub use value::{CustomData, Value};
