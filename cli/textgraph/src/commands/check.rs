//! `textgraph check` — import a document and confirm it re-exports byte for byte.

use std::path::Path;

use anyhow::{bail, Context, Result};

use super::import::{decode, read_text};
use super::Session;

/// Outcome of checking one document.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Report {
    pub nodes: usize,
    pub connections: usize,
    /// 1-based line of the first difference from the canonical re-export.
    pub first_difference: Option<usize>,
}

pub fn run(session: &Session, document: &Path) -> Result<()> {
    let report = check(session, document)?;
    println!(
        "{}: {} node(s), {} connection(s)",
        document.display(),
        report.nodes,
        report.connections
    );
    match report.first_difference {
        None => {
            println!("  canonical form");
            Ok(())
        }
        Some(line) => bail!(
            "{} is not in canonical form (first difference at line {line})",
            document.display()
        ),
    }
}

pub(crate) fn check(session: &Session, document: &Path) -> Result<Report> {
    let original = read_text(session, document)?;
    let graph = decode(session, document, &original)?;
    let canonical = session
        .serializer
        .serialize_to_string(&graph)
        .with_context(|| format!("re-exporting {}", document.display()))?;

    Ok(Report {
        nodes: graph.nodes.len(),
        connections: graph.connections.len(),
        first_difference: first_difference(&original, &canonical),
    })
}

fn first_difference(a: &str, b: &str) -> Option<usize> {
    if a == b {
        return None;
    }
    let mut left = a.split('\n');
    let mut right = b.split('\n');
    let mut line = 1;
    loop {
        match (left.next(), right.next()) {
            (Some(x), Some(y)) if x == y => line += 1,
            _ => return Some(line),
        }
    }
}
