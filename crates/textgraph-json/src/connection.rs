//! `json` connection strategy.
//!
//! Export order is a breadth-first walk from the entry nodes (no incoming
//! connection) in ascending id order, enqueuing successors in ascending id
//! order; nodes the walk never reaches follow, sorted by id. Ids compare as
//! plain strings, so `"10"` sorts before `"2"`.
//!
//! Import reads each fragment's `next` field and links the node to that id
//! on ports 0/0. These sample node types have a single port each.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use serde_json::Value;

use textgraph_core::{
    ConnectionData, ConnectionStrategy, GraphData, NodeData, ParseError, ParsedNodeFragment,
};

use crate::link;
use crate::JSON;

const NEXT: &str = "next";

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonConnectionStrategy;

impl JsonConnectionStrategy {
    /// Node ids of `graph` in export order.
    pub fn ordered_ids(graph: &GraphData) -> Vec<&str> {
        let known: BTreeSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        let has_input: HashSet<&str> = graph
            .connections
            .iter()
            .map(|c| c.input_node_id.as_str())
            .collect();

        let mut successors: HashMap<&str, BTreeSet<&str>> = HashMap::new();
        for c in &graph.connections {
            if known.contains(c.input_node_id.as_str()) {
                successors
                    .entry(c.output_node_id.as_str())
                    .or_default()
                    .insert(c.input_node_id.as_str());
            }
        }

        let mut ordered = Vec::with_capacity(known.len());
        let mut visited: HashSet<&str> = HashSet::with_capacity(known.len());
        let mut queue = VecDeque::new();

        for &id in known.iter().filter(|id| !has_input.contains(*id)) {
            visited.insert(id);
            queue.push_back(id);
        }

        while let Some(id) = queue.pop_front() {
            ordered.push(id);
            for &next in successors.get(id).into_iter().flatten() {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        ordered.extend(known.iter().filter(|id| !visited.contains(*id)));
        ordered
    }
}

impl ConnectionStrategy for JsonConnectionStrategy {
    fn id(&self) -> &str {
        JSON
    }

    fn order<'f>(&self, graph: &GraphData, fragments: &'f HashMap<String, String>) -> Vec<&'f str> {
        Self::ordered_ids(graph)
            .into_iter()
            .filter_map(|id| fragments.get(id).map(String::as_str))
            .collect()
    }

    fn restore(
        &self,
        fragments: &[ParsedNodeFragment],
        nodes: &[NodeData],
    ) -> Result<Vec<ConnectionData>, ParseError> {
        let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let mut connections = Vec::new();

        for fragment in fragments {
            if !known.contains(fragment.node_id.as_str()) {
                tracing::debug!(node = %fragment.node_id, "fragment has no matching node; skipped");
                continue;
            }

            let fail = |message: String| {
                ParseError::in_fragment(&fragment.node_id, &fragment.node_type, message)
                    .with_excerpt(&fragment.text)
            };
            let value: Value =
                serde_json::from_str(&fragment.text).map_err(|e| fail(e.to_string()))?;
            let next = match value.get(NEXT) {
                None => continue,
                Some(raw) => link::from_value(raw).ok_or_else(|| {
                    fail("`next` must be a node id string, an integer, or null".to_string())
                })?,
            };

            match next.target() {
                Some(target) if known.contains(target) => {
                    connections.push(ConnectionData::new(&fragment.node_id, 0, target, 0));
                }
                Some(target) => {
                    tracing::warn!(
                        node = %fragment.node_id,
                        %target,
                        "link to unknown node; treating as terminal"
                    );
                }
                None => {}
            }
        }

        Ok(connections)
    }
}

#[cfg(test)]
mod tests {
    use textgraph_core::ParseLocation;

    use super::*;

    fn node(id: &str) -> NodeData {
        NodeData::new(id, "choice")
    }

    fn link(from: &str, to: &str) -> ConnectionData {
        ConnectionData::new(from, 0, to, 0)
    }

    #[test]
    fn breadth_first_from_sorted_entries() {
        // a -> c -> e, b -> d; z isolated
        let graph = GraphData {
            nodes: ["e", "d", "c", "b", "a", "z"].into_iter().map(node).collect(),
            connections: vec![link("a", "c"), link("c", "e"), link("b", "d")],
        };
        assert_eq!(
            JsonConnectionStrategy::ordered_ids(&graph),
            vec!["a", "b", "z", "c", "d", "e"]
        );
    }

    #[test]
    fn successors_in_ascending_order() {
        let graph = GraphData {
            nodes: ["r", "y", "x", "w"].into_iter().map(node).collect(),
            connections: vec![link("r", "y"), link("r", "w"), link("r", "x"), link("r", "x")],
        };
        assert_eq!(JsonConnectionStrategy::ordered_ids(&graph), vec!["r", "w", "x", "y"]);
    }

    #[test]
    fn order_independent_of_list_order() {
        let a = GraphData {
            nodes: ["1", "2", "3"].into_iter().map(node).collect(),
            connections: vec![link("1", "2"), link("1", "3")],
        };
        let b = GraphData {
            nodes: ["3", "1", "2"].into_iter().map(node).collect(),
            connections: vec![link("1", "3"), link("1", "2")],
        };
        assert_eq!(
            JsonConnectionStrategy::ordered_ids(&a),
            JsonConnectionStrategy::ordered_ids(&b)
        );
    }

    #[test]
    fn cycle_without_entry_is_appended_sorted() {
        let graph = GraphData {
            nodes: ["s", "q", "p"].into_iter().map(node).collect(),
            connections: vec![link("q", "p"), link("p", "q"), link("p", "s")],
        };
        // Every node has an input, so nothing is an entry.
        assert_eq!(JsonConnectionStrategy::ordered_ids(&graph), vec!["p", "q", "s"]);
    }

    #[test]
    fn order_keeps_only_encoded_fragments() {
        let graph = GraphData {
            nodes: ["1", "2"].into_iter().map(node).collect(),
            connections: vec![link("1", "2")],
        };
        let mut fragments = HashMap::new();
        fragments.insert("2".to_string(), "two".to_string());
        assert_eq!(JsonConnectionStrategy.order(&graph, &fragments), vec!["two"]);
    }

    #[test]
    fn restore_links_known_targets_on_port_zero() {
        let nodes: Vec<NodeData> = ["1", "2", "3"].into_iter().map(node).collect();
        let fragments = vec![
            ParsedNodeFragment::new("1", "choice", r#"{"id": "1", "next": "2"}"#),
            ParsedNodeFragment::new("2", "choice", r#"{"id": "2", "next": 3}"#),
            ParsedNodeFragment::new("3", "choice", r#"{"id": "3", "next": ""}"#),
        ];
        let connections = JsonConnectionStrategy.restore(&fragments, &nodes).unwrap();
        assert_eq!(connections, vec![link("1", "2"), link("2", "3")]);
    }

    #[test]
    fn restore_treats_dangling_link_as_terminal() {
        let nodes = vec![node("1")];
        let fragments = vec![ParsedNodeFragment::new(
            "1",
            "choice",
            r#"{"id": "1", "next": "99"}"#,
        )];
        assert!(JsonConnectionStrategy.restore(&fragments, &nodes).unwrap().is_empty());
    }

    #[test]
    fn restore_rejects_malformed_fragment() {
        let nodes = vec![node("1")];
        let fragments = vec![ParsedNodeFragment::new("1", "choice", "{not json")];
        let err = JsonConnectionStrategy.restore(&fragments, &nodes).unwrap_err();
        assert_eq!(
            err.location,
            ParseLocation::Fragment {
                node_id: "1".into(),
                node_type: "choice".into()
            }
        );

        let fragments = vec![ParsedNodeFragment::new("1", "choice", r#"{"id": "1", "next": [2]}"#)];
        assert!(JsonConnectionStrategy.restore(&fragments, &nodes).is_err());
    }
}
