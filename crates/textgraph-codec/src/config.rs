//! Strategy selection handed to [`StrategyRegistry::serializer`](crate::StrategyRegistry::serializer).

/// Which strategies a serializer should use, by id.
///
/// `parser` is needed for import, `framer` for export. An empty
/// `node_types` list means "every registered node coder".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializerConfig {
    pub connection_strategy: Option<String>,
    pub parser: Option<String>,
    pub framer: Option<String>,
    pub node_types: Vec<String>,
}

impl SerializerConfig {
    /// Start a configuration with the given connection strategy id.
    pub fn new(connection_strategy: impl Into<String>) -> Self {
        Self {
            connection_strategy: Some(connection_strategy.into()),
            ..Self::default()
        }
    }

    pub fn with_parser(mut self, id: impl Into<String>) -> Self {
        self.parser = Some(id.into());
        self
    }

    pub fn with_framer(mut self, id: impl Into<String>) -> Self {
        self.framer = Some(id.into());
        self
    }

    /// Add a node type to the allow-list.
    pub fn allow_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_types.push(node_type.into());
        self
    }
}
