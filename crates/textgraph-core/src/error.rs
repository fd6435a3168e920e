//! Error taxonomy for the codec.
//!
//! Every failure falls into one of three kinds: a configuration problem
//! (unresolved strategy or node type), malformed text, or an I/O error from
//! the underlying stream. Any of them aborts the whole serialize/deserialize
//! call.

use std::fmt;
use std::io;

use thiserror::Error;

/// Maximum number of characters kept in a [`ParseError`] excerpt.
const EXCERPT_LEN: usize = 60;

/// The four strategy families plus node coders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyFamily {
    NodeCoder,
    DocumentParser,
    ConnectionStrategy,
    DocumentFramer,
}

impl StrategyFamily {
    pub const ALL: [StrategyFamily; 4] = [
        StrategyFamily::NodeCoder,
        StrategyFamily::DocumentParser,
        StrategyFamily::ConnectionStrategy,
        StrategyFamily::DocumentFramer,
    ];
}

impl fmt::Display for StrategyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyFamily::NodeCoder => "node coder",
            StrategyFamily::DocumentParser => "text parser",
            StrategyFamily::ConnectionStrategy => "connection parser",
            StrategyFamily::DocumentFramer => "fragment writer",
        };
        f.write_str(name)
    }
}

/// Unresolvable configuration: a strategy id or node type with no match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("unknown node type '{node_type}' for node {node_id}")]
    UnknownNodeType { node_id: String, node_type: String },

    #[error("no {family} registered with id '{id}'")]
    UnknownStrategy { family: StrategyFamily, id: String },

    #[error("no {family} configured")]
    MissingStrategy { family: StrategyFamily },
}

/// Where in the input a parse failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseLocation {
    /// A line/column position in the whole document (1-based).
    Document { line: usize, column: usize },
    /// The n-th top-level element of the document (0-based).
    Element { index: usize },
    /// A single node's fragment.
    Fragment { node_id: String, node_type: String },
    /// Somewhere inside a fragment whose node is not known yet.
    Text,
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseLocation::Document { line, column } => {
                write!(f, "at line {line}, column {column}")
            }
            ParseLocation::Element { index } => write!(f, "in element {index}"),
            ParseLocation::Fragment { node_id, node_type } => {
                write!(f, "in fragment of node {node_id} ({node_type})")
            }
            ParseLocation::Text => f.write_str("in fragment text"),
        }
    }
}

/// Malformed input, at document or fragment granularity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    pub location: ParseLocation,
    pub message: String,
    /// Leading part of the offending text, flattened to one line.
    pub excerpt: Option<String>,
}

impl ParseError {
    pub fn new(location: ParseLocation, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            excerpt: None,
        }
    }

    /// Error inside a fragment, before the owning node is known.
    pub fn in_text(message: impl Into<String>) -> Self {
        Self::new(ParseLocation::Text, message)
    }

    pub fn at_element(index: usize, message: impl Into<String>) -> Self {
        Self::new(ParseLocation::Element { index }, message)
    }

    pub fn at_position(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::new(ParseLocation::Document { line, column }, message)
    }

    pub fn in_fragment(
        node_id: impl Into<String>,
        node_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            ParseLocation::Fragment {
                node_id: node_id.into(),
                node_type: node_type.into(),
            },
            message,
        )
    }

    /// Attach an excerpt of the offending text.
    pub fn with_excerpt(mut self, text: &str) -> Self {
        self.excerpt = Some(excerpt(text));
        self
    }

    /// Pin a [`ParseLocation::Text`] error to the fragment it came from.
    /// Errors that already carry a more specific location are unchanged.
    pub fn locate(mut self, node_id: &str, node_type: &str) -> Self {
        if self.location == ParseLocation::Text {
            self.location = ParseLocation::Fragment {
                node_id: node_id.to_string(),
                node_type: node_type.to_string(),
            };
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)?;
        if let Some(ex) = &self.excerpt {
            write!(f, " (near `{ex}`)")?;
        }
        Ok(())
    }
}

fn excerpt(text: &str) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_LEN {
        flat
    } else {
        let mut cut: String = flat.chars().take(EXCERPT_LEN).collect();
        cut.push_str("...");
        cut
    }
}

/// Any failure of a serialize/deserialize call.
#[derive(Debug, Error)]
pub enum TextGraphError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("parse error {0}")]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
