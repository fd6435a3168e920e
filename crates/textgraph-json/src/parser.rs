//! `json_array` document parser.
//!
//! The document is a JSON array with one object per node. Each element
//! becomes one fragment; its node type is taken from an explicit `"type"`
//! field, or inferred (`dialogue` when it has `text`, otherwise `choice`).

use serde_json::Value;

use textgraph_core::{DocumentParser, ParseError, ParsedNodeFragment};

use crate::link;
use crate::{CHOICE, DIALOGUE, JSON_ARRAY};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonArrayParser;

impl JsonArrayParser {
    fn fragment(index: usize, element: &Value) -> Result<ParsedNodeFragment, ParseError> {
        let object = element
            .as_object()
            .ok_or_else(|| ParseError::at_element(index, "expected a JSON object"))?;

        let id = object
            .get("id")
            .and_then(link::from_value)
            .and_then(|id| id.target().map(str::to_string))
            .ok_or_else(|| {
                ParseError::at_element(
                    index,
                    "missing or invalid `id` (expected a non-empty string or an integer)",
                )
            })?;

        let node_type = match object.get("type") {
            Some(Value::String(ty)) if !ty.is_empty() => ty.clone(),
            Some(_) => {
                return Err(ParseError::at_element(index, "`type` must be a non-empty string"));
            }
            None if object.contains_key("text") => DIALOGUE.to_string(),
            None => CHOICE.to_string(),
        };

        let text = serde_json::to_string_pretty(element)
            .map_err(|e| ParseError::at_element(index, e.to_string()))?;

        Ok(ParsedNodeFragment::new(id, node_type, text))
    }
}

impl DocumentParser for JsonArrayParser {
    fn id(&self) -> &str {
        JSON_ARRAY
    }

    fn parse(&self, text: &str) -> Result<Vec<ParsedNodeFragment>, ParseError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let root: Value = serde_json::from_str(text)
            .map_err(|e| ParseError::at_position(e.line(), e.column(), e.to_string()))?;
        let elements = root
            .as_array()
            .ok_or_else(|| ParseError::at_position(1, 1, "expected a JSON array of node objects"))?;

        elements
            .iter()
            .enumerate()
            .map(|(index, element)| Self::fragment(index, element))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use textgraph_core::ParseLocation;

    use super::*;

    #[test]
    fn empty_input_is_empty_list() {
        assert!(JsonArrayParser.parse("").unwrap().is_empty());
        assert!(JsonArrayParser.parse("  \n").unwrap().is_empty());
        assert!(JsonArrayParser.parse("[\n]\n").unwrap().is_empty());
    }

    #[test]
    fn one_fragment_per_element_in_document_order() {
        let doc = r#"[
            {"id": "2", "next": "", "text": "Bye"},
            {"id": 1, "next": 2},
            {"id": "x", "type": "dialogue", "next": "", "text": "typed"}
        ]"#;
        let fragments = JsonArrayParser.parse(doc).unwrap();
        assert_eq!(fragments.len(), 3);

        assert_eq!(fragments[0].node_id, "2");
        assert_eq!(fragments[0].node_type, DIALOGUE);
        assert_eq!(fragments[1].node_id, "1");
        assert_eq!(fragments[1].node_type, CHOICE);
        assert_eq!(fragments[2].node_type, DIALOGUE);

        let reparsed: Value = serde_json::from_str(&fragments[0].text).unwrap();
        assert_eq!(reparsed["text"], "Bye");
    }

    #[test]
    fn syntax_error_reports_position() {
        let err = JsonArrayParser.parse("[\n  {\"id\": \"1\",,}\n]").unwrap_err();
        match err.location {
            ParseLocation::Document { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected location {other:?}"),
        }
    }

    #[test]
    fn non_array_root_rejected() {
        let err = JsonArrayParser.parse(r#"{"id": "1"}"#).unwrap_err();
        assert_eq!(err.location, ParseLocation::Document { line: 1, column: 1 });
    }

    #[test]
    fn bad_elements_report_index() {
        let err = JsonArrayParser.parse(r#"[{"id": "1"}, 5]"#).unwrap_err();
        assert_eq!(err.location, ParseLocation::Element { index: 1 });

        let err = JsonArrayParser.parse(r#"[{"next": ""}]"#).unwrap_err();
        assert_eq!(err.location, ParseLocation::Element { index: 0 });

        let err = JsonArrayParser.parse(r#"[{"id": ""}]"#).unwrap_err();
        assert_eq!(err.location, ParseLocation::Element { index: 0 });

        let err = JsonArrayParser.parse(r#"[{"id": "1", "type": 3}]"#).unwrap_err();
        assert!(err.message.contains("type"));
    }
}
