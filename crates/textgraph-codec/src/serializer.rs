//! The graph serializer: drives the configured strategies end to end.
//!
//! Both directions are all-or-nothing. Export buffers the whole document and
//! writes it with a single `write_all` only after every strategy succeeded;
//! import returns a graph only when parsing, decoding, and connection
//! restoration all succeeded.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

use textgraph_core::{
    ConfigurationError, ConnectionStrategy, DocumentFramer, DocumentParser, GraphData, NodeCoder,
    NodeData, ParseError, SerializationContext, StrategyFamily, TextGraphError,
};

/// Orchestrates node coders, a connection strategy, and a parser and/or
/// framer into `serialize` / `deserialize`.
#[derive(Clone)]
pub struct GraphSerializer {
    coders: HashMap<String, Arc<dyn NodeCoder>>,
    connections: Arc<dyn ConnectionStrategy>,
    parser: Option<Arc<dyn DocumentParser>>,
    framer: Option<Arc<dyn DocumentFramer>>,
}

impl GraphSerializer {
    /// Create a serializer from a set of node coders (keyed by their node
    /// type) and a connection strategy. Add a parser for import and a framer
    /// for export.
    pub fn new(
        coders: impl IntoIterator<Item = Arc<dyn NodeCoder>>,
        connections: Arc<dyn ConnectionStrategy>,
    ) -> Self {
        let coders = coders
            .into_iter()
            .map(|c| (c.node_type().to_string(), c))
            .collect();
        Self {
            coders,
            connections,
            parser: None,
            framer: None,
        }
    }

    /// Set the document parser used by [`deserialize`](Self::deserialize).
    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Set the framer used by [`serialize`](Self::serialize).
    pub fn with_framer(mut self, framer: Arc<dyn DocumentFramer>) -> Self {
        self.framer = Some(framer);
        self
    }

    /// Node types this serializer can encode and decode, sorted.
    pub fn node_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.coders.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Write `graph` to `out` as a framed document.
    ///
    /// Nothing is written unless every node encodes successfully.
    pub fn serialize<W: Write + ?Sized>(
        &self,
        out: &mut W,
        graph: &GraphData,
    ) -> Result<(), TextGraphError> {
        let buf = self.render(graph)?;
        out.write_all(&buf)?;
        out.flush()?;
        Ok(())
    }

    /// Serialize into a string.
    pub fn serialize_to_string(&self, graph: &GraphData) -> Result<String, TextGraphError> {
        let buf = self.render(graph)?;
        String::from_utf8(buf).map_err(|e| {
            TextGraphError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Read a whole document from `input` and rebuild the graph.
    pub fn deserialize<R: Read + ?Sized>(
        &self,
        input: &mut R,
    ) -> Result<GraphData, TextGraphError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        self.deserialize_str(&text)
    }

    /// Rebuild a graph from an in-memory document.
    pub fn deserialize_str(&self, text: &str) -> Result<GraphData, TextGraphError> {
        let parser = self
            .parser
            .as_deref()
            .ok_or(ConfigurationError::MissingStrategy {
                family: StrategyFamily::DocumentParser,
            })?;

        let fragments = parser.parse(text)?;
        tracing::debug!(
            parser = parser.id(),
            fragments = fragments.len(),
            "parsed document"
        );
        if fragments.is_empty() {
            return Ok(GraphData::new());
        }

        let mut seen = HashSet::with_capacity(fragments.len());
        for fragment in &fragments {
            if !seen.insert(fragment.node_id.as_str()) {
                return Err(ParseError::in_fragment(
                    &fragment.node_id,
                    &fragment.node_type,
                    format!("duplicate node id '{}'", fragment.node_id),
                )
                .into());
            }
        }

        let mut nodes = Vec::with_capacity(fragments.len());
        for fragment in &fragments {
            let coder = self.coder(&fragment.node_id, &fragment.node_type)?;
            let decoded = coder
                .decode(&fragment.text)
                .map_err(|e| e.locate(&fragment.node_id, &fragment.node_type))?;
            nodes.push(NodeData {
                id: fragment.node_id.clone(),
                node_type: fragment.node_type.clone(),
                position: decoded.position_hint,
                custom_data: decoded.custom_data,
            });
        }

        let connections = self.connections.restore(&fragments, &nodes)?;
        tracing::debug!(
            strategy = self.connections.id(),
            nodes = nodes.len(),
            connections = connections.len(),
            "restored graph"
        );

        Ok(GraphData { nodes, connections })
    }

    fn render(&self, graph: &GraphData) -> Result<Vec<u8>, TextGraphError> {
        let framer = self
            .framer
            .as_deref()
            .ok_or(ConfigurationError::MissingStrategy {
                family: StrategyFamily::DocumentFramer,
            })?;

        // Resolve every coder before encoding anything.
        let coders = graph
            .nodes
            .iter()
            .map(|node| self.coder(&node.id, &node.node_type))
            .collect::<Result<Vec<_>, _>>()?;

        let context = SerializationContext::new(graph);
        let mut fragments: HashMap<String, String> = HashMap::with_capacity(graph.nodes.len());
        for (node, coder) in graph.nodes.iter().zip(coders) {
            if fragments.contains_key(&node.id) {
                tracing::warn!(node = %node.id, "duplicate node id; keeping first fragment");
                continue;
            }
            let text = coder
                .encode(node, &context)
                .map_err(|e| e.locate(&node.id, &node.node_type))?;
            fragments.insert(node.id.clone(), text);
        }

        let ordered = self.connections.order(graph, &fragments);
        if ordered.len() != fragments.len() {
            tracing::debug!(
                strategy = self.connections.id(),
                encoded = fragments.len(),
                ordered = ordered.len(),
                "connection strategy did not order every fragment"
            );
        }

        let mut buf = Vec::new();
        framer.begin(&mut buf)?;
        let last = ordered.len().saturating_sub(1);
        for (i, text) in ordered.iter().enumerate() {
            framer.write_fragment(&mut buf, text, i == last)?;
        }
        framer.end(&mut buf)?;

        tracing::debug!(
            framer = framer.id(),
            fragments = ordered.len(),
            bytes = buf.len(),
            "rendered document"
        );
        Ok(buf)
    }

    fn coder(&self, node_id: &str, node_type: &str) -> Result<&dyn NodeCoder, ConfigurationError> {
        self.coders
            .get(node_type)
            .map(|c| c.as_ref())
            .ok_or_else(|| ConfigurationError::UnknownNodeType {
                node_id: node_id.to_string(),
                node_type: node_type.to_string(),
            })
    }
}

impl fmt::Debug for GraphSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphSerializer")
            .field("node_types", &self.node_types())
            .field("connections", &self.connections.id())
            .field("parser", &self.parser.as_ref().map(|p| p.id()))
            .field("framer", &self.framer.as_ref().map(|w| w.id()))
            .finish()
    }
}
