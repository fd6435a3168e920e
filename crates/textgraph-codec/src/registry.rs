//! Strategy registry: id-indexed lookup per strategy family.
//!
//! Strategies are registered explicitly at startup (see
//! `textgraph_json::register` for the reference set). Registration takes
//! `&mut self`, so it has to finish before the registry is shared with code
//! that serializes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use textgraph_core::{
    ConfigurationError, ConnectionStrategy, DocumentFramer, DocumentParser, NodeCoder,
    StrategyFamily,
};

use crate::config::SerializerConfig;
use crate::serializer::GraphSerializer;

/// Registered strategies, one table per family.
#[derive(Default, Clone)]
pub struct StrategyRegistry {
    node_coders: HashMap<String, Arc<dyn NodeCoder>>,
    parsers: HashMap<String, Arc<dyn DocumentParser>>,
    connections: HashMap<String, Arc<dyn ConnectionStrategy>>,
    framers: HashMap<String, Arc<dyn DocumentFramer>>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node coder under its node type. Replaces any coder
    /// already registered for that type.
    pub fn register_node_coder(&mut self, coder: impl NodeCoder + 'static) -> &mut Self {
        let id = coder.node_type().to_string();
        let coder: Arc<dyn NodeCoder> = Arc::new(coder);
        insert(&mut self.node_coders, StrategyFamily::NodeCoder, id, coder);
        self
    }

    /// Register a document parser under its id. Last registration wins.
    pub fn register_parser(&mut self, parser: impl DocumentParser + 'static) -> &mut Self {
        let id = parser.id().to_string();
        let parser: Arc<dyn DocumentParser> = Arc::new(parser);
        insert(&mut self.parsers, StrategyFamily::DocumentParser, id, parser);
        self
    }

    /// Register a connection strategy under its id. Last registration wins.
    pub fn register_connection_strategy(
        &mut self,
        strategy: impl ConnectionStrategy + 'static,
    ) -> &mut Self {
        let id = strategy.id().to_string();
        let strategy: Arc<dyn ConnectionStrategy> = Arc::new(strategy);
        insert(&mut self.connections, StrategyFamily::ConnectionStrategy, id, strategy);
        self
    }

    /// Register a document framer under its id. Last registration wins.
    pub fn register_framer(&mut self, framer: impl DocumentFramer + 'static) -> &mut Self {
        let id = framer.id().to_string();
        let framer: Arc<dyn DocumentFramer> = Arc::new(framer);
        insert(&mut self.framers, StrategyFamily::DocumentFramer, id, framer);
        self
    }

    pub fn node_coder(&self, node_type: &str) -> Option<Arc<dyn NodeCoder>> {
        self.node_coders.get(node_type).cloned()
    }

    pub fn parser(&self, id: &str) -> Option<Arc<dyn DocumentParser>> {
        self.parsers.get(id).cloned()
    }

    pub fn connection_strategy(&self, id: &str) -> Option<Arc<dyn ConnectionStrategy>> {
        self.connections.get(id).cloned()
    }

    pub fn framer(&self, id: &str) -> Option<Arc<dyn DocumentFramer>> {
        self.framers.get(id).cloned()
    }

    /// Registered ids of one family, sorted.
    pub fn ids(&self, family: StrategyFamily) -> Vec<&str> {
        let mut ids: Vec<&str> = match family {
            StrategyFamily::NodeCoder => self.node_coders.keys().map(String::as_str).collect(),
            StrategyFamily::DocumentParser => self.parsers.keys().map(String::as_str).collect(),
            StrategyFamily::ConnectionStrategy => {
                self.connections.keys().map(String::as_str).collect()
            }
            StrategyFamily::DocumentFramer => self.framers.keys().map(String::as_str).collect(),
        };
        ids.sort_unstable();
        ids
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.node_coders.clear();
        self.parsers.clear();
        self.connections.clear();
        self.framers.clear();
    }

    /// Resolve a configuration into a ready serializer.
    ///
    /// Every configured id must resolve; nothing falls back to a default.
    /// An empty node-type list selects every registered node coder.
    pub fn serializer(
        &self,
        config: &SerializerConfig,
    ) -> Result<GraphSerializer, ConfigurationError> {
        let connections = match config.connection_strategy.as_deref() {
            Some(id) => self
                .connection_strategy(id)
                .ok_or_else(|| unknown(StrategyFamily::ConnectionStrategy, id))?,
            None => {
                return Err(ConfigurationError::MissingStrategy {
                    family: StrategyFamily::ConnectionStrategy,
                })
            }
        };

        let coders: Vec<Arc<dyn NodeCoder>> = if config.node_types.is_empty() {
            self.node_coders.values().cloned().collect()
        } else {
            config
                .node_types
                .iter()
                .map(|ty| {
                    self.node_coder(ty)
                        .ok_or_else(|| unknown(StrategyFamily::NodeCoder, ty))
                })
                .collect::<Result<_, _>>()?
        };

        let mut serializer = GraphSerializer::new(coders, connections);
        if let Some(id) = config.parser.as_deref() {
            let parser = self
                .parser(id)
                .ok_or_else(|| unknown(StrategyFamily::DocumentParser, id))?;
            serializer = serializer.with_parser(parser);
        }
        if let Some(id) = config.framer.as_deref() {
            let framer = self
                .framer(id)
                .ok_or_else(|| unknown(StrategyFamily::DocumentFramer, id))?;
            serializer = serializer.with_framer(framer);
        }

        tracing::debug!(?serializer, "resolved serializer");
        Ok(serializer)
    }
}

fn insert<T: ?Sized>(
    table: &mut HashMap<String, Arc<T>>,
    family: StrategyFamily,
    id: String,
    strategy: Arc<T>,
) {
    if table.contains_key(&id) {
        tracing::warn!(%family, %id, "strategy id registered twice; keeping the last one");
    }
    table.insert(id, strategy);
}

fn unknown(family: StrategyFamily, id: &str) -> ConfigurationError {
    ConfigurationError::UnknownStrategy {
        family,
        id: id.to_string(),
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("node_coders", &self.ids(StrategyFamily::NodeCoder))
            .field("parsers", &self.ids(StrategyFamily::DocumentParser))
            .field("connections", &self.ids(StrategyFamily::ConnectionStrategy))
            .field("framers", &self.ids(StrategyFamily::DocumentFramer))
            .finish()
    }
}
