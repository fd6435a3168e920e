//! Read-only adjacency view over a graph snapshot.
//!
//! Node coders receive a [`SerializationContext`] so they can look at their
//! neighbours (for example to write a "next node" link) without walking the
//! connection list themselves.

use std::collections::{HashMap, HashSet};

use crate::model::{ConnectionData, GraphData, NodeData};

/// Indexed view of a [`GraphData`], built once per snapshot.
#[derive(Debug)]
pub struct SerializationContext<'a> {
    graph: &'a GraphData,
    /// Index: node id -> position in `graph.nodes` (first occurrence wins)
    by_id: HashMap<&'a str, usize>,
    /// Index: node id -> connections where it is the output endpoint
    outgoing: HashMap<&'a str, Vec<usize>>,
    /// Index: node id -> connections where it is the input endpoint
    incoming: HashMap<&'a str, Vec<usize>>,
}

impl<'a> SerializationContext<'a> {
    /// Index the given snapshot.
    pub fn new(graph: &'a GraphData) -> Self {
        let mut by_id = HashMap::with_capacity(graph.nodes.len());
        for (i, node) in graph.nodes.iter().enumerate() {
            by_id.entry(node.id.as_str()).or_insert(i);
        }

        let mut outgoing: HashMap<&str, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, c) in graph.connections.iter().enumerate() {
            outgoing.entry(c.output_node_id.as_str()).or_default().push(i);
            incoming.entry(c.input_node_id.as_str()).or_default().push(i);
        }

        Self {
            graph,
            by_id,
            outgoing,
            incoming,
        }
    }

    /// The underlying snapshot.
    pub fn graph(&self) -> &'a GraphData {
        self.graph
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&'a NodeData> {
        self.by_id.get(id).map(|&i| &self.graph.nodes[i])
    }

    /// Connections leaving `node_id`, in connection-list order.
    pub fn outgoing(&self, node_id: &str) -> Vec<&'a ConnectionData> {
        self.collect(&self.outgoing, node_id)
    }

    /// Connections entering `node_id`, in connection-list order.
    pub fn incoming(&self, node_id: &str) -> Vec<&'a ConnectionData> {
        self.collect(&self.incoming, node_id)
    }

    /// Nodes directly connected to `node_id` in either direction.
    ///
    /// Each neighbour appears once, in node-list order. Endpoints that name
    /// no node are skipped. An unknown `node_id` yields an empty list.
    pub fn connected_nodes(&self, node_id: &str) -> Vec<&'a NodeData> {
        if !self.by_id.contains_key(node_id) {
            return Vec::new();
        }

        let neighbours: HashSet<&str> = self
            .outgoing(node_id)
            .into_iter()
            .map(|c| c.input_node_id.as_str())
            .chain(
                self.incoming(node_id)
                    .into_iter()
                    .map(|c| c.output_node_id.as_str()),
            )
            .collect();

        let mut seen = HashSet::new();
        self.graph
            .nodes
            .iter()
            .filter(|n| neighbours.contains(n.id.as_str()) && seen.insert(n.id.as_str()))
            .collect()
    }

    /// Whether the node has no incoming connection.
    pub fn is_entry(&self, node_id: &str) -> bool {
        self.incoming.get(node_id).map_or(true, |v| v.is_empty())
    }

    fn collect(
        &self,
        index: &HashMap<&'a str, Vec<usize>>,
        node_id: &str,
    ) -> Vec<&'a ConnectionData> {
        index
            .get(node_id)
            .map(|ids| ids.iter().map(|&i| &self.graph.connections[i]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> GraphData {
        GraphData::new()
            .with_node(NodeData::new("a", "t"))
            .with_node(NodeData::new("b", "t"))
            .with_node(NodeData::new("c", "t"))
            .with_node(NodeData::new("d", "t"))
            .with_connection(ConnectionData::new("a", 0, "b", 0))
            .with_connection(ConnectionData::new("a", 1, "c", 0))
            .with_connection(ConnectionData::new("b", 0, "d", 0))
            .with_connection(ConnectionData::new("c", 0, "d", 1))
    }

    #[test]
    fn outgoing_and_incoming() {
        let graph = diamond();
        let ctx = SerializationContext::new(&graph);

        let out: Vec<_> = ctx.outgoing("a").iter().map(|c| c.input_node_id.as_str()).collect();
        assert_eq!(out, vec!["b", "c"]);

        let inc: Vec<_> = ctx.incoming("d").iter().map(|c| c.output_node_id.as_str()).collect();
        assert_eq!(inc, vec!["b", "c"]);

        assert!(ctx.outgoing("d").is_empty());
        assert!(ctx.incoming("missing").is_empty());
    }

    #[test]
    fn connected_nodes_deduplicated() {
        let graph = diamond()
            .with_connection(ConnectionData::new("a", 0, "b", 0))
            .with_connection(ConnectionData::new("b", 0, "a", 0));
        let ctx = SerializationContext::new(&graph);

        let ids: Vec<_> = ctx.connected_nodes("b").iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn connected_nodes_skips_dangling_and_unknown() {
        let graph = GraphData::new()
            .with_node(NodeData::new("a", "t"))
            .with_connection(ConnectionData::new("a", 0, "ghost", 0));
        let ctx = SerializationContext::new(&graph);

        assert!(ctx.connected_nodes("a").is_empty());
        assert!(ctx.connected_nodes("ghost").is_empty());
        assert_eq!(ctx.outgoing("a").len(), 1);
    }

    #[test]
    fn node_lookup_and_entry() {
        let graph = diamond();
        let ctx = SerializationContext::new(&graph);

        assert_eq!(ctx.node("c").map(|n| n.id.as_str()), Some("c"));
        assert!(ctx.node("z").is_none());
        assert!(ctx.is_entry("a"));
        assert!(!ctx.is_entry("d"));
    }
}
