//! Reference JSON-array strategies for TextGraph documents.
//!
//! A document is a JSON array with one object per node:
//!
//! ```text
//! [
//!     {
//!       "id": "1",
//!       "next": "2",
//!       "text": "Hi"
//!     },
//!     {
//!       "id": "2",
//!       "next": ""
//!     }
//! ]
//! ```
//!
//! | Family              | Id           | Type                       |
//! |---------------------|--------------|----------------------------|
//! | node coder          | `dialogue`   | [`DialogueCoder`]          |
//! | node coder          | `choice`     | [`ChoiceCoder`]            |
//! | text parser         | `json_array` | [`JsonArrayParser`]        |
//! | connection parser   | `json`       | [`JsonConnectionStrategy`] |
//! | fragment writer     | `json_array` | [`JsonArrayFramer`]        |
//!
//! Call [`register`] at startup to add all of them to a registry.

mod coder;
mod connection;
mod framer;
mod link;
mod parser;

pub use coder::{ChoiceCoder, DialogueCoder};
pub use connection::JsonConnectionStrategy;
pub use framer::JsonArrayFramer;
pub use parser::JsonArrayParser;

use textgraph_codec::{SerializerConfig, StrategyRegistry};

/// Id shared by the JSON-array parser and framer.
pub const JSON_ARRAY: &str = "json_array";
/// Id of the `next`-field connection strategy.
pub const JSON: &str = "json";
pub const DIALOGUE: &str = "dialogue";
pub const CHOICE: &str = "choice";

/// Add every strategy in this crate to `registry`.
pub fn register(registry: &mut StrategyRegistry) {
    registry
        .register_node_coder(DialogueCoder)
        .register_node_coder(ChoiceCoder)
        .register_parser(JsonArrayParser)
        .register_connection_strategy(JsonConnectionStrategy)
        .register_framer(JsonArrayFramer);
}

/// A registry holding only the strategies in this crate.
pub fn builtin_registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::new();
    register(&mut registry);
    registry
}

/// Configuration selecting the JSON-array strategies for both directions,
/// with every registered node type allowed.
pub fn reference_config() -> SerializerConfig {
    SerializerConfig::new(JSON)
        .with_parser(JSON_ARRAY)
        .with_framer(JSON_ARRAY)
}
