use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use serde_json::Value;

use crate::graph::ConceptGraph;

/// Parses a `{ "nodes": [...], "edges": [...] }` snapshot.
pub fn parse_graph(raw: &str) -> Result<ConceptGraph> {
    let parsed: Value = serde_json::from_str(raw).context("invalid concept graph JSON")?;
    if !parsed.is_object() {
        return Err(anyhow!("expected a JSON object with `nodes` and `edges`"));
    }

    let graph: ConceptGraph =
        serde_json::from_value(parsed).context("unexpected concept graph layout")?;
    if graph.nodes.is_empty() {
        warn!("concept graph has no nodes");
    }

    let blank = graph.nodes.iter().filter(|node| node.id.is_empty()).count();
    if blank > 0 {
        warn!("{blank} concept(s) have an empty id");
    }

    debug!(
        "parsed concept graph with {} nodes and {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(graph)
}

pub fn load_graph(path: &Path) -> Result<ConceptGraph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read concept graph {}", path.display()))?;
    parse_graph(&raw).with_context(|| format!("in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeKind, NodeKind};

    #[test]
    fn parses_camel_case_snapshot() {
        let graph = parse_graph(
            r#"{
                "nodes": [
                    {"id": "limits", "name": "Limits", "subConcepts": ["continuity"], "difficulty": "beginner"},
                    {"id": "ivt", "name": "Intermediate value theorem", "type": "theorem", "prerequisites": ["limits"]}
                ],
                "edges": [
                    {"source": "limits", "target": "ivt"},
                    {"source": "limits", "target": "continuity", "type": "subconcept", "strength": 0.2}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(graph.nodes[0].sub_concepts, vec!["continuity"]);
        assert_eq!(graph.nodes[1].kind, NodeKind::Theorem);
        assert_eq!(graph.edges[0].kind, EdgeKind::Prerequisite);
        assert_eq!(graph.edges[1].strength, Some(0.2));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let graph = parse_graph(r#"{"nodes": [{"id": "solo"}]}"#).unwrap();
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn rejects_non_object_input() {
        assert!(parse_graph("[1, 2, 3]").is_err());
        assert!(parse_graph("{").is_err());
        assert!(parse_graph(r#"{"nodes": [{"name": "no id"}]}"#).is_err());
    }
}
