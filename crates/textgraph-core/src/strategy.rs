//! The pluggable codec roles.
//!
//! A document format is the combination of one [`DocumentParser`] or
//! [`DocumentFramer`] (depending on direction), one [`ConnectionStrategy`],
//! and one [`NodeCoder`] per node type. Strategies are expected to be
//! stateless: the same inputs always give the same output.

use std::collections::HashMap;
use std::io::{self, Write};

use crate::context::SerializationContext;
use crate::error::ParseError;
use crate::model::{ConnectionData, GraphData, NodeData, NodeDeserializeResult, ParsedNodeFragment};

/// Encodes and decodes the fragment for one node type.
pub trait NodeCoder: Send + Sync {
    /// The node type this coder handles.
    fn node_type(&self) -> &str;

    /// Render `node` as a self-contained fragment.
    ///
    /// The fragment must carry enough linkage for the connection strategy
    /// to rebuild the node's outgoing edges on import. Fails when the
    /// node's custom data is missing something the format needs.
    fn encode(
        &self,
        node: &NodeData,
        context: &SerializationContext<'_>,
    ) -> Result<String, ParseError>;

    /// Recover custom data (and optionally a position) from a fragment.
    ///
    /// Left inverse of [`encode`](NodeCoder::encode) for well-formed input.
    /// Malformed text is an error; fields are never silently dropped.
    fn decode(&self, text: &str) -> Result<NodeDeserializeResult, ParseError>;
}

/// Splits a whole document into per-node fragments.
pub trait DocumentParser: Send + Sync {
    fn id(&self) -> &str;

    /// Empty input yields an empty list.
    fn parse(&self, text: &str) -> Result<Vec<ParsedNodeFragment>, ParseError>;
}

/// Orders fragments for export and rebuilds connections on import.
pub trait ConnectionStrategy: Send + Sync {
    fn id(&self) -> &str;

    /// Linearize the encoded fragments of `graph`.
    ///
    /// `fragments` maps node id to fragment text. The returned order must
    /// depend only on the node and connection sets, never on map
    /// iteration order.
    fn order<'f>(&self, graph: &GraphData, fragments: &'f HashMap<String, String>) -> Vec<&'f str>;

    /// Rebuild the connection list from parsed fragments.
    ///
    /// A link naming no known node means "no outgoing connection", not an
    /// error.
    fn restore(
        &self,
        fragments: &[ParsedNodeFragment],
        nodes: &[NodeData],
    ) -> Result<Vec<ConnectionData>, ParseError>;
}

/// Writes the framing around a sequence of fragments.
///
/// Call protocol: [`begin`](DocumentFramer::begin) once, then
/// [`write_fragment`](DocumentFramer::write_fragment) per fragment, then
/// [`end`](DocumentFramer::end) once. Zero fragments is `begin` then `end`.
pub trait DocumentFramer: Send + Sync {
    fn id(&self) -> &str;

    fn begin(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Write one fragment. No separator follows the fragment when `is_last`.
    /// An empty fragment is written as a blank line.
    fn write_fragment(&self, out: &mut dyn Write, fragment: &str, is_last: bool) -> io::Result<()>;

    fn end(&self, out: &mut dyn Write) -> io::Result<()>;
}
