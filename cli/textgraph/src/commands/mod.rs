//! CLI command implementations.

pub mod check;
pub mod export;
pub mod import;
pub mod init;
pub mod strategies;

use anyhow::{Context, Result};
use textgraph_codec::GraphSerializer;

use crate::manifest::{SerializationConfig, StrategyOverrides, TextGraphManifest};

/// A serializer resolved from the manifest and command-line overrides,
/// plus the file filters that go with it.
pub struct Session {
    pub serializer: GraphSerializer,
    pub serialization: SerializationConfig,
}

impl Session {
    pub fn open(
        manifest: Option<&TextGraphManifest>,
        overrides: &StrategyOverrides,
    ) -> Result<Self> {
        let (serialization, config) = match manifest {
            Some(m) => (m.serialization.clone(), m.serializer_config(overrides)),
            None => {
                let serialization = SerializationConfig::default();
                let config = serialization.serializer_config(overrides);
                (serialization, config)
            }
        };

        let serializer = textgraph_json::builtin_registry()
            .serializer(&config)
            .context("selecting strategies")?;

        Ok(Self {
            serializer,
            serialization,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_defaults_without_manifest() {
        let session = testutil::session();
        assert_eq!(session.serializer.node_types(), vec!["choice", "dialogue"]);
        assert!(session.serialization.allow_file_extensions.is_empty());
    }

    #[test]
    fn unknown_override_is_reported() {
        let overrides = StrategyOverrides {
            connections: Some("xml".into()),
            ..StrategyOverrides::default()
        };
        let err = Session::open(None, &overrides).err().unwrap();
        let msg = format!("{err:#}");
        assert!(msg.contains("no connection parser registered with id 'xml'"), "{msg}");
    }

    #[test]
    fn manifest_node_list_restricts_types() {
        let manifest: TextGraphManifest =
            toml::from_str("[project]\nname = \"x\"\n[[nodes]]\nname = \"choice\"\n").unwrap();
        let session = Session::open(Some(&manifest), &StrategyOverrides::default()).unwrap();
        assert_eq!(session.serializer.node_types(), vec!["choice"]);

        let manifest: TextGraphManifest =
            toml::from_str("[project]\nname = \"x\"\n[[nodes]]\nname = \"portal\"\n").unwrap();
        assert!(Session::open(Some(&manifest), &StrategyOverrides::default()).is_err());
    }
}
