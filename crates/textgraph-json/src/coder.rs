//! Node coders for the `dialogue` and `choice` node types.
//!
//! Both encode to one pretty-printed JSON object:
//!
//! ```text
//! {
//!   "id": "1",
//!   "next": "2",
//!   "speaker": "Ann",      // dialogue, optional
//!   "text": "Hi",          // dialogue only
//!   "position": {...}      // only when the node has a position
//! }
//! ```
//!
//! `next` is the smallest id among the node's outgoing connection targets,
//! or `""` when it has none.

use serde::{Deserialize, Serialize};

use textgraph_core::{
    CustomData, NodeCoder, NodeData, NodeDeserializeResult, ParseError, Position,
    SerializationContext, Value,
};

use crate::link::LinkId;
use crate::{CHOICE, DIALOGUE};

const TEXT: &str = "text";
const SPEAKER: &str = "speaker";

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Fragment {
    id: LinkId,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    node_type: Option<String>,
    #[serde(default)]
    next: LinkId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
}

impl Fragment {
    fn for_node(node: &NodeData, context: &SerializationContext<'_>) -> Self {
        Self {
            id: LinkId::new(node.id.as_str()),
            node_type: None,
            next: next_link(node, context),
            speaker: None,
            text: None,
            position: node.position,
        }
    }

    fn parse(text: &str) -> Result<Self, ParseError> {
        serde_json::from_str(text)
            .map_err(|e| ParseError::in_text(e.to_string()).with_excerpt(text))
    }

    fn render(&self) -> Result<String, ParseError> {
        serde_json::to_string_pretty(self).map_err(|e| ParseError::in_text(e.to_string()))
    }
}

/// Smallest target id among the node's outgoing connections that name a
/// node in the snapshot.
fn next_link(node: &NodeData, context: &SerializationContext<'_>) -> LinkId {
    let (known, dangling): (Vec<_>, Vec<_>) = context
        .outgoing(&node.id)
        .into_iter()
        .partition(|c| context.node(&c.input_node_id).is_some());

    for c in &dangling {
        tracing::warn!(
            node = %node.id,
            target = %c.input_node_id,
            "dangling connection not written"
        );
    }

    let mut targets: Vec<&str> = known.iter().map(|c| c.input_node_id.as_str()).collect();
    targets.sort_unstable();
    targets.dedup();
    if targets.len() > 1 {
        tracing::debug!(
            node = %node.id,
            targets = targets.len(),
            "single-port node links to several nodes; writing the smallest id"
        );
    }

    targets
        .first()
        .map(|&target| LinkId::new(target))
        .unwrap_or_default()
}

fn string_field<'n>(node: &'n NodeData, key: &str) -> Result<Option<&'n str>, ParseError> {
    match node.data(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ParseError::in_text(format!(
            "custom data `{key}` must be a string, found {}",
            other.type_name()
        ))),
    }
}

fn warn_ignored(node: &NodeData, owned: &[&str]) {
    for key in node.custom_data.keys() {
        if !owned.contains(&key.as_str()) {
            tracing::warn!(
                node = %node.id,
                %key,
                "custom data key not written by {} coder",
                node.node_type
            );
        }
    }
}

/// A line of dialogue: owns `text` (required) and `speaker` (optional).
#[derive(Debug, Default, Clone, Copy)]
pub struct DialogueCoder;

impl NodeCoder for DialogueCoder {
    fn node_type(&self) -> &str {
        DIALOGUE
    }

    fn encode(
        &self,
        node: &NodeData,
        context: &SerializationContext<'_>,
    ) -> Result<String, ParseError> {
        let text = string_field(node, TEXT)?
            .ok_or_else(|| ParseError::in_text("dialogue node has no `text`"))?;
        warn_ignored(node, &[TEXT, SPEAKER]);

        let mut fragment = Fragment::for_node(node, context);
        fragment.text = Some(text.to_string());
        fragment.speaker = string_field(node, SPEAKER)?.map(str::to_string);
        fragment.render()
    }

    fn decode(&self, text: &str) -> Result<NodeDeserializeResult, ParseError> {
        let fragment = Fragment::parse(text)?;
        let body = fragment
            .text
            .ok_or_else(|| ParseError::in_text("missing field `text`").with_excerpt(text))?;

        let mut data = CustomData::new();
        data.insert(TEXT.to_string(), Value::String(body));
        if let Some(speaker) = fragment.speaker {
            data.insert(SPEAKER.to_string(), Value::String(speaker));
        }
        Ok(NodeDeserializeResult::new(data).with_position_hint(fragment.position))
    }
}

/// A branch point with no payload of its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChoiceCoder;

impl NodeCoder for ChoiceCoder {
    fn node_type(&self) -> &str {
        CHOICE
    }

    fn encode(
        &self,
        node: &NodeData,
        context: &SerializationContext<'_>,
    ) -> Result<String, ParseError> {
        warn_ignored(node, &[]);
        Fragment::for_node(node, context).render()
    }

    fn decode(&self, text: &str) -> Result<NodeDeserializeResult, ParseError> {
        let fragment = Fragment::parse(text)?;
        if fragment.text.is_some() || fragment.speaker.is_some() {
            return Err(
                ParseError::in_text("choice fragments carry no `text` or `speaker`")
                    .with_excerpt(text),
            );
        }
        Ok(NodeDeserializeResult::default().with_position_hint(fragment.position))
    }
}
