//! Text document codec for TextGraph.
//!
//! Combines the strategy roles defined in `textgraph-core` into two atomic
//! operations:
//!
//! - [`GraphSerializer::serialize`] : graph snapshot → framed text document.
//! - [`GraphSerializer::deserialize`] : text document → fresh graph snapshot.
//!
//! Strategies are looked up by id through a [`StrategyRegistry`], which turns
//! a [`SerializerConfig`] into a ready serializer.
//!
//! ## Export pipeline
//!
//! ```text
//! nodes ──encode──▶ id → fragment ──order──▶ [fragment] ──frame──▶ document
//! ```
//!
//! ## Import pipeline
//!
//! ```text
//! document ──parse──▶ [fragment] ──decode──▶ nodes ──restore──▶ connections
//! ```

mod config;
mod registry;
mod serializer;

pub use config::SerializerConfig;
pub use registry::StrategyRegistry;
pub use serializer::GraphSerializer;
