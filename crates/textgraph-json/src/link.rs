//! Node references as they appear in JSON fragments.
//!
//! Ids are written as strings. On read, integers and `null` are accepted too
//! so hand-edited documents using numeric ids still load; `null` and `""`
//! both mean "no link".

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node id inside a fragment (`id` or `next`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub(crate) struct LinkId(String);

impl LinkId {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The linked id, or `None` for an empty link.
    pub(crate) fn target(&self) -> Option<&str> {
        if self.0.is_empty() {
            None
        } else {
            Some(&self.0)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Null(()),
    Integer(i64),
    Text(String),
}

impl From<RawId> for LinkId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Null(()) => LinkId::default(),
            RawId::Integer(i) => LinkId(i.to_string()),
            RawId::Text(s) => LinkId(s),
        }
    }
}

impl From<LinkId> for String {
    fn from(id: LinkId) -> Self {
        id.0
    }
}

/// Read a link out of an already-parsed JSON value.
///
/// Returns `None` when the value is not a string, integer, or null.
pub(crate) fn from_value(value: &Value) -> Option<LinkId> {
    match value {
        Value::Null => Some(LinkId::default()),
        Value::String(s) => Some(LinkId::new(s.as_str())),
        Value::Number(n) => n.as_i64().map(|i| LinkId(i.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strings_integers_and_null() {
        let ids: Vec<LinkId> = serde_json::from_str(r#"["7", 7, null, ""]"#).unwrap();
        assert_eq!(ids[0].target(), Some("7"));
        assert_eq!(ids[1].target(), Some("7"));
        assert_eq!(ids[2].target(), None);
        assert_eq!(ids[3].target(), None);
    }

    #[test]
    fn always_written_as_string() {
        let json = serde_json::to_string(&LinkId::new("3")).unwrap();
        assert_eq!(json, r#""3""#);
    }

    #[test]
    fn from_value_rejects_other_shapes() {
        assert_eq!(from_value(&serde_json::json!(2)), Some(LinkId::new("2")));
        assert_eq!(from_value(&serde_json::json!(true)), None);
        assert_eq!(from_value(&serde_json::json!(1.5)), None);
        assert_eq!(from_value(&serde_json::json!({"id": 1})), None);
    }
}
