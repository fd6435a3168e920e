//! Graph snapshot types.
//!
//! A [`GraphData`] is a pure value: the codec never keeps a reference to it
//! past a call, so callers may mutate it freely afterwards. Connection
//! endpoints are expected to name existing nodes, but nothing here enforces
//! that; strategies decide what to do with a dangling reference when they
//! dereference it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::{CustomData, Value};

/// A 2D editor position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A node in a graph snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Identifier, unique within one snapshot.
    pub id: String,
    /// Node type; selects the node coder.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Editor position. `None` means the caller has to lay the node out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Semantic payload owned by the node type's coder.
    #[serde(default)]
    pub custom_data: CustomData,
}

impl NodeData {
    /// Create a node with no position and empty custom data.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            position: None,
            custom_data: CustomData::new(),
        }
    }

    /// Set the editor position.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Insert one custom-data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_data.insert(key.into(), value.into());
        self
    }

    /// Look up a custom-data entry.
    pub fn data(&self, key: &str) -> Option<&Value> {
        self.custom_data.get(key)
    }
}

/// A directed edge from an output port to an input port.
///
/// Duplicate edges between identical endpoints are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionData {
    pub output_node_id: String,
    pub output_port: usize,
    pub input_node_id: String,
    pub input_port: usize,
}

impl ConnectionData {
    pub fn new(
        output_node_id: impl Into<String>,
        output_port: usize,
        input_node_id: impl Into<String>,
        input_port: usize,
    ) -> Self {
        Self {
            output_node_id: output_node_id.into(),
            output_port,
            input_node_id: input_node_id.into(),
            input_port,
        }
    }
}

impl fmt::Display for ConnectionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} port {} -> {} port {}",
            self.output_node_id, self.output_port, self.input_node_id, self.input_port,
        )
    }
}

/// One node's slice of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNodeFragment {
    pub node_id: String,
    pub node_type: String,
    pub text: String,
}

impl ParsedNodeFragment {
    pub fn new(
        node_id: impl Into<String>,
        node_type: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            node_type: node_type.into(),
            text: text.into(),
        }
    }
}

/// What a node coder recovers from a fragment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeDeserializeResult {
    pub custom_data: CustomData,
    pub position_hint: Option<Position>,
}

impl NodeDeserializeResult {
    pub fn new(custom_data: CustomData) -> Self {
        Self {
            custom_data,
            position_hint: None,
        }
    }

    pub fn with_position_hint(mut self, position: Option<Position>) -> Self {
        self.position_hint = position;
        self
    }
}

/// A full graph snapshot: ordered nodes plus connections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub connections: Vec<ConnectionData>,
}

impl GraphData {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: NodeData) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_connection(mut self, connection: ConnectionData) -> Self {
        self.connections.push(connection);
        self
    }

    /// Linear lookup by id. Build a [`SerializationContext`](crate::SerializationContext)
    /// for repeated lookups.
    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.connections.is_empty()
    }

    /// Connections whose output or input endpoint names no node.
    pub fn dangling_connections(&self) -> Vec<&ConnectionData> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.connections
            .iter()
            .filter(|c| {
                !ids.contains(c.output_node_id.as_str()) || !ids.contains(c.input_node_id.as_str())
            })
            .collect()
    }

    /// Node ids that occur more than once, in first-repeat order.
    pub fn duplicate_node_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut dupes = Vec::new();
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) && !dupes.contains(&node.id.as_str()) {
                dupes.push(node.id.as_str());
            }
        }
        dupes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_builder() {
        let node = NodeData::new("1", "dialogue")
            .with_position(Position::new(10.0, 20.0))
            .with_data("text", "Hi");
        assert_eq!(node.id, "1");
        assert_eq!(node.node_type, "dialogue");
        assert_eq!(node.position, Some(Position::new(10.0, 20.0)));
        assert_eq!(node.data("text"), Some(&Value::from("Hi")));
        assert!(node.data("missing").is_none());
    }

    #[test]
    fn dangling_connections_reported() {
        let graph = GraphData::new()
            .with_node(NodeData::new("a", "dialogue"))
            .with_node(NodeData::new("b", "dialogue"))
            .with_connection(ConnectionData::new("a", 0, "b", 0))
            .with_connection(ConnectionData::new("b", 0, "ghost", 0));
        let dangling = graph.dangling_connections();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].input_node_id, "ghost");
    }

    #[test]
    fn duplicate_ids_reported_once() {
        let graph = GraphData::new()
            .with_node(NodeData::new("a", "dialogue"))
            .with_node(NodeData::new("a", "choice"))
            .with_node(NodeData::new("a", "choice"))
            .with_node(NodeData::new("b", "choice"));
        assert_eq!(graph.duplicate_node_ids(), vec!["a"]);
    }

    #[test]
    fn graph_json_shape() {
        let graph = GraphData::new()
            .with_node(NodeData::new("1", "dialogue").with_data("text", "Hi"))
            .with_connection(ConnectionData::new("1", 0, "2", 0));
        let json = serde_json::to_value(&graph).unwrap();
        assert_eq!(json["nodes"][0]["type"], "dialogue");
        assert_eq!(json["nodes"][0]["custom_data"]["text"], "Hi");
        assert!(json["nodes"][0].get("position").is_none());
        assert_eq!(json["connections"][0]["input_node_id"], "2");

        let back: GraphData = serde_json::from_value(json).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let graph: GraphData = serde_json::from_str("{}").unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn connection_display() {
        let c = ConnectionData::new("1", 0, "2", 1);
        assert_eq!(c.to_string(), "1 port 0 -> 2 port 1");
    }
}
