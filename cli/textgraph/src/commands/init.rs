//! `textgraph init` — project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use textgraph_core::GraphData;

use crate::manifest::{TextGraphManifest, MANIFEST_FILE};

pub const GRAPH_FILE: &str = "graph.json";

/// Create a new TextGraph project in the directory `name`, relative to cwd.
pub fn run(name: &str) -> Result<()> {
    let project_dir = Path::new(name);
    create_project(project_dir, name)
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    fs::create_dir_all(project_dir)
        .with_context(|| format!("creating {}", project_dir.display()))?;

    fs::write(project_dir.join(MANIFEST_FILE), TextGraphManifest::template(name))
        .context("writing textgraph.toml")?;

    let mut snapshot = serde_json::to_string_pretty(&GraphData::new())
        .context("serializing empty graph")?;
    snapshot.push('\n');
    fs::write(project_dir.join(GRAPH_FILE), snapshot).context("writing graph.json")?;

    println!("Created project '{name}'");
    println!("  {name}/{MANIFEST_FILE}");
    println!("  {name}/{GRAPH_FILE}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_project_structure() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("story");

        create_project(&project_path, "story").unwrap();

        assert!(project_path.join(MANIFEST_FILE).is_file());
        assert!(project_path.join(GRAPH_FILE).is_file());
    }

    #[test]
    fn init_generates_valid_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("valid-manifest");

        create_project(&project_path, "valid-manifest").unwrap();

        let content = fs::read_to_string(project_path.join(MANIFEST_FILE)).unwrap();
        let manifest = TextGraphManifest::from_str(&content).unwrap();
        assert_eq!(manifest.project.name, "valid-manifest");
    }

    #[test]
    fn init_generates_empty_graph() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("empty-graph");

        create_project(&project_path, "empty-graph").unwrap();

        let content = fs::read_to_string(project_path.join(GRAPH_FILE)).unwrap();
        let graph: GraphData = serde_json::from_str(&content).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn init_refuses_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("existing");
        fs::create_dir(&project_path).unwrap();

        let result = create_project(&project_path, "existing");
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }
}
