use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Concept,
    Theorem,
    Problem,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Theorem => "theorem",
            Self::Problem => "problem",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: NodeKind,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub sub_concepts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub theorems: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<String>,
}

impl ConceptNode {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Self::default()
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn has_sub_element(&self, id: &str) -> bool {
        self.theorems.iter().chain(&self.problems).any(|entry| entry == id)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Prerequisite,
    Related,
    Subconcept,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(default, rename = "type")]
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            strength: None,
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/// Edge whose endpoints resolved to indices into the active node list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedEdge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
    pub strength: Option<f32>,
}

/// Snapshot of `{nodes, edges}` handed over by the content layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConceptGraph {
    #[serde(default)]
    pub nodes: Vec<ConceptNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl ConceptGraph {
    pub fn new(nodes: Vec<ConceptNode>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&ConceptNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// First occurrence wins when an id is listed twice.
    pub fn index_by_id(&self) -> HashMap<&str, usize> {
        let mut index_by_id = HashMap::with_capacity(self.nodes.len());
        for (index, node) in self.nodes.iter().enumerate() {
            if index_by_id.contains_key(node.id.as_str()) {
                warn!("duplicate concept id {:?} ignored", node.id);
                continue;
            }
            index_by_id.insert(node.id.as_str(), index);
        }
        index_by_id
    }
}

/// Runtime counterpart of a visible [`ConceptNode`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pin: Option<Vec2>,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, position: Vec2) -> Self {
        Self {
            id: id.into(),
            position,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

pub fn layout_index_by_id(nodes: &[LayoutNode]) -> HashMap<&str, usize> {
    let mut index_by_id = HashMap::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        index_by_id.entry(node.id.as_str()).or_insert(index);
    }
    index_by_id
}

/// Drops edges with a missing endpoint and self loops.
pub fn resolve_edges(edges: &[Edge], index_by_id: &HashMap<&str, usize>) -> Vec<ResolvedEdge> {
    let mut resolved = Vec::with_capacity(edges.len());
    for edge in edges {
        let (Some(&source), Some(&target)) = (
            index_by_id.get(edge.source.as_str()),
            index_by_id.get(edge.target.as_str()),
        ) else {
            debug!("dropping edge {} -> {}: endpoint not in node set", edge.source, edge.target);
            continue;
        };
        if source == target {
            debug!("dropping self loop on {}", edge.source);
            continue;
        }
        resolved.push(ResolvedEdge {
            source,
            target,
            kind: edge.kind,
            strength: edge.strength,
        });
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_snapshot() {
        let raw = r#"{
            "nodes": [
                {"id": "quadratic", "name": "Quadratic Functions", "type": "concept",
                 "prerequisites": ["linear"], "subConcepts": ["vertex-form"],
                 "theorems": ["vertex-form"], "difficulty": "intermediate"},
                {"id": "linear"}
            ],
            "edges": [
                {"source": "linear", "target": "quadratic", "type": "prerequisite", "strength": 1.0},
                {"source": "quadratic", "target": "vertex-form"}
            ]
        }"#;

        let graph: ConceptGraph = serde_json::from_str(raw).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].sub_concepts, vec!["vertex-form".to_owned()]);
        assert_eq!(graph.nodes[0].difficulty, Some(Difficulty::Intermediate));
        assert_eq!(graph.nodes[1].kind, NodeKind::Concept);
        assert_eq!(graph.edges[1].kind, EdgeKind::Prerequisite);
        assert_eq!(graph.edges[0].strength, Some(1.0));
    }

    #[test]
    fn resolve_drops_dangling_edges_and_self_loops() {
        let graph = ConceptGraph::new(
            vec![ConceptNode::new("a"), ConceptNode::new("b")],
            vec![
                Edge::new("a", "b", EdgeKind::Related),
                Edge::new("a", "nonexistent", EdgeKind::Prerequisite),
                Edge::new("b", "b", EdgeKind::Prerequisite),
            ],
        );

        let resolved = resolve_edges(&graph.edges, &graph.index_by_id());
        assert_eq!(resolved.len(), 1);
        assert_eq!((resolved[0].source, resolved[0].target), (0, 1));
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let graph = ConceptGraph::new(
            vec![ConceptNode::new("a"), ConceptNode::new("b"), ConceptNode::new("a")],
            Vec::new(),
        );
        assert_eq!(graph.index_by_id().get("a"), Some(&0));
    }
}
