//! `textgraph.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use textgraph_codec::SerializerConfig;

pub const MANIFEST_FILE: &str = "textgraph.toml";

/// The top-level manifest structure for a TextGraph project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextGraphManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    /// Strategy selection and file filters.
    #[serde(default)]
    pub serialization: SerializationConfig,
    /// Node types this project uses. Empty means every registered type.
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
}

/// `[serialization]` section.
///
/// Strategy ids default to the built-in JSON-array set when the section or
/// a key is missing. A key set to `""` deselects the strategy, and the
/// operation that needs it then fails with "no ... configured".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializationConfig {
    pub text_parser: String,
    pub connection_parser: String,
    pub fragment_writer: String,
    /// Extensions accepted by `import` and `check`. Empty allows any file.
    pub allow_file_extensions: Vec<String>,
    /// Extensions accepted for `export` output. Empty allows any file.
    pub export_file_extensions: Vec<String>,
}

impl Default for SerializationConfig {
    fn default() -> Self {
        Self {
            text_parser: textgraph_json::JSON_ARRAY.to_string(),
            connection_parser: textgraph_json::JSON.to_string(),
            fragment_writer: textgraph_json::JSON_ARRAY.to_string(),
            allow_file_extensions: Vec::new(),
            export_file_extensions: Vec::new(),
        }
    }
}

/// One `[[nodes]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node type id, matched against registered coders.
    pub name: String,
    /// Human-readable label, for listings only.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NodeConfig {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

/// Strategy ids given on the command line; they win over the manifest.
#[derive(Debug, Clone, Default)]
pub struct StrategyOverrides {
    pub parser: Option<String>,
    pub connections: Option<String>,
    pub framer: Option<String>,
}

impl TextGraphManifest {
    /// Search upward from `start_dir` for a `textgraph.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: TextGraphManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing textgraph.toml")
    }

    /// Generate the default template for `textgraph init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"

[serialization]
text_parser = "{parser}"
connection_parser = "{connections}"
fragment_writer = "{framer}"
allow_file_extensions = ["json"]
export_file_extensions = ["json"]

[[nodes]]
name = "{dialogue}"
display_name = "Dialogue"

[[nodes]]
name = "{choice}"
display_name = "Choice"
"#,
            parser = textgraph_json::JSON_ARRAY,
            connections = textgraph_json::JSON,
            framer = textgraph_json::JSON_ARRAY,
            dialogue = textgraph_json::DIALOGUE,
            choice = textgraph_json::CHOICE,
        )
    }

    /// Build the serializer selection from this manifest.
    pub fn serializer_config(&self, overrides: &StrategyOverrides) -> SerializerConfig {
        let mut config = self.serialization.serializer_config(overrides);
        config.node_types = self.nodes.iter().map(|n| n.name.clone()).collect();
        config
    }
}

impl SerializationConfig {
    /// Build the serializer selection, applying command-line overrides.
    /// Empty ids are left unset so the serializer reports them as missing.
    pub fn serializer_config(&self, overrides: &StrategyOverrides) -> SerializerConfig {
        fn pick(flag: &Option<String>, configured: &str) -> Option<String> {
            let id = flag.as_deref().unwrap_or(configured).trim();
            (!id.is_empty()).then(|| id.to_string())
        }

        SerializerConfig {
            connection_strategy: pick(&overrides.connections, &self.connection_parser),
            parser: pick(&overrides.parser, &self.text_parser),
            framer: pick(&overrides.framer, &self.fragment_writer),
            node_types: Vec::new(),
        }
    }

    /// Reject an input file whose extension is not allowed for import.
    pub fn check_import_path(&self, path: &Path) -> Result<()> {
        check_extension(path, &self.allow_file_extensions, "import")
    }

    /// Reject an output file whose extension is not allowed for export.
    pub fn check_export_path(&self, path: &Path) -> Result<()> {
        check_extension(path, &self.export_file_extensions, "export")
    }
}

fn check_extension(path: &Path, allowed: &[String], direction: &str) -> Result<()> {
    if allowed.is_empty() {
        return Ok(());
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let matches = allowed
        .iter()
        .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(ext));
    if !matches {
        bail!(
            "'{}' does not have an extension allowed for {direction} (expected one of: {})",
            path.display(),
            allowed.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let toml_str = r#"
[project]
name = "quest"

[serialization]
text_parser = "json_array"
connection_parser = "json"
fragment_writer = "json_array"
allow_file_extensions = ["json", "txt"]
export_file_extensions = [".json"]

[[nodes]]
name = "dialogue"
display_name = "Dialogue"

[[nodes]]
name = "choice"
"#;
        let manifest = TextGraphManifest::from_str(toml_str).unwrap();
        assert_eq!(manifest.project.name, "quest");
        assert_eq!(manifest.serialization.allow_file_extensions.len(), 2);
        assert_eq!(manifest.nodes.len(), 2);
        assert_eq!(manifest.nodes[0].label(), "Dialogue");
        assert_eq!(manifest.nodes[1].label(), "choice");

        let config = manifest.serializer_config(&StrategyOverrides::default());
        assert_eq!(config.connection_strategy.as_deref(), Some("json"));
        assert_eq!(config.parser.as_deref(), Some("json_array"));
        assert_eq!(config.framer.as_deref(), Some("json_array"));
        assert_eq!(config.node_types, vec!["dialogue", "choice"]);
    }

    #[test]
    fn parse_minimal_manifest() {
        let manifest = TextGraphManifest::from_str("[project]\nname = \"minimal\"\n").unwrap();
        assert_eq!(manifest.serialization, SerializationConfig::default());
        assert!(manifest.nodes.is_empty());

        let config = manifest.serializer_config(&StrategyOverrides::default());
        assert!(config.node_types.is_empty());
        assert_eq!(config, textgraph_json::reference_config());
    }

    #[test]
    fn empty_ids_stay_unset() {
        let manifest = TextGraphManifest::from_str(
            "[project]\nname = \"x\"\n[serialization]\ntext_parser = \"\"\n",
        )
        .unwrap();
        let config = manifest.serializer_config(&StrategyOverrides::default());
        assert!(config.parser.is_none());
        assert_eq!(config.framer.as_deref(), Some("json_array"));
    }

    #[test]
    fn overrides_win() {
        let manifest = TextGraphManifest::from_str("[project]\nname = \"x\"\n").unwrap();
        let overrides = StrategyOverrides {
            parser: Some("yaml".into()),
            connections: None,
            framer: Some(String::new()),
        };
        let config = manifest.serializer_config(&overrides);
        assert_eq!(config.parser.as_deref(), Some("yaml"));
        assert_eq!(config.connection_strategy.as_deref(), Some("json"));
        assert!(config.framer.is_none());
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(TextGraphManifest::from_str("this is not valid toml [[[").is_err());
        assert!(TextGraphManifest::from_str("[serialization]\n").is_err());
    }

    #[test]
    fn template_is_valid_toml() {
        let manifest = TextGraphManifest::from_str(&TextGraphManifest::template("demo")).unwrap();
        assert_eq!(manifest.project.name, "demo");
        assert_eq!(manifest.nodes.len(), 2);
        assert_eq!(manifest.serialization.allow_file_extensions, vec!["json"]);
    }

    #[test]
    fn extension_filters() {
        let serialization = SerializationConfig {
            allow_file_extensions: vec!["json".into()],
            export_file_extensions: vec![".txt".into()],
            ..SerializationConfig::default()
        };
        assert!(serialization.check_import_path(Path::new("a/b.json")).is_ok());
        assert!(serialization.check_import_path(Path::new("b.JSON")).is_ok());
        assert!(serialization.check_import_path(Path::new("b.txt")).is_err());
        assert!(serialization.check_import_path(Path::new("noext")).is_err());
        assert!(serialization.check_export_path(Path::new("out.txt")).is_ok());

        let open = SerializationConfig::default();
        assert!(open.check_import_path(Path::new("anything.bin")).is_ok());
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "[project]\nname = \"parent\"\n").unwrap();

        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found_dir) = TextGraphManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(manifest.project.name, "parent");
        assert_eq!(found_dir, dir.path());
    }

    #[test]
    fn find_and_load_reports_bad_manifest() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), "[project]\n").unwrap();
        let err = TextGraphManifest::find_and_load(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
