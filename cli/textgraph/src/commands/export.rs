//! `textgraph export` — graph snapshot to text document.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use textgraph_core::GraphData;

use super::Session;

/// Export the snapshot at `graph_path` to `output`, or stdout.
pub fn run(session: &Session, graph_path: &Path, output: Option<&Path>) -> Result<()> {
    if let Some(out) = output {
        session.serialization.check_export_path(out)?;
    }

    let graph = read_graph(graph_path)?;
    for connection in graph.dangling_connections() {
        tracing::warn!(%connection, "connection references a missing node");
    }
    for id in graph.duplicate_node_ids() {
        tracing::warn!(node = id, "node id appears more than once");
    }

    match output {
        Some(out) => {
            let document = session
                .serializer
                .serialize_to_string(&graph)
                .with_context(|| format!("exporting {}", graph_path.display()))?;
            fs::write(out, document).with_context(|| format!("writing {}", out.display()))?;
            tracing::info!(
                nodes = graph.nodes.len(),
                output = %out.display(),
                "exported graph"
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            session
                .serializer
                .serialize(&mut stdout, &graph)
                .with_context(|| format!("exporting {}", graph_path.display()))?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub(crate) fn read_graph(path: &Path) -> Result<GraphData> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
