//! `textgraph strategies` — list registered strategy ids.

use anyhow::Result;
use textgraph_codec::StrategyRegistry;
use textgraph_core::StrategyFamily;

use crate::manifest::TextGraphManifest;

pub fn run(manifest: Option<&TextGraphManifest>) -> Result<()> {
    let registry = textgraph_json::builtin_registry();
    print!("{}", listing(&registry, manifest));
    Ok(())
}

pub(crate) fn listing(registry: &StrategyRegistry, manifest: Option<&TextGraphManifest>) -> String {
    let mut out = String::new();
    for family in StrategyFamily::ALL {
        out.push_str(&format!("{family}:\n"));
        for id in registry.ids(family) {
            out.push_str(&format!("  {id}\n"));
        }
    }

    if let Some(manifest) = manifest {
        out.push_str(&format!("\nproject '{}' node types:\n", manifest.project.name));
        if manifest.nodes.is_empty() {
            out.push_str("  (all registered)\n");
        }
        for node in &manifest.nodes {
            let status = if registry.node_coder(&node.name).is_some() {
                ""
            } else {
                "  (not registered)"
            };
            out.push_str(&format!("  {} [{}]{status}\n", node.label(), node.name));
        }
    }
    out
}
