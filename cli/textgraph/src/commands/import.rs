//! `textgraph import` — text document to graph snapshot.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use textgraph_core::GraphData;

use super::Session;

/// Import `document` and write the snapshot as pretty JSON to `output`, or stdout.
pub fn run(session: &Session, document: &Path, output: Option<&Path>) -> Result<()> {
    let graph = read_document(session, document)?;

    let mut snapshot = serde_json::to_string_pretty(&graph).context("serializing graph snapshot")?;
    snapshot.push('\n');
    match output {
        Some(out) => {
            fs::write(out, snapshot).with_context(|| format!("writing {}", out.display()))?;
            tracing::info!(
                nodes = graph.nodes.len(),
                connections = graph.connections.len(),
                output = %out.display(),
                "imported document"
            );
        }
        None => print!("{snapshot}"),
    }
    Ok(())
}

/// Read and deserialize `document`, enforcing the import extension filter.
pub(crate) fn read_document(session: &Session, document: &Path) -> Result<GraphData> {
    let text = read_text(session, document)?;
    decode(session, document, &text)
}

/// Read `document` as text, enforcing the import extension filter.
pub(crate) fn read_text(session: &Session, document: &Path) -> Result<String> {
    session.serialization.check_import_path(document)?;
    fs::read_to_string(document).with_context(|| format!("reading {}", document.display()))
}

/// Deserialize the already-read contents of `document`.
pub(crate) fn decode(session: &Session, document: &Path, text: &str) -> Result<GraphData> {
    session
        .serializer
        .deserialize_str(text)
        .with_context(|| format!("importing {}", document.display()))
}
