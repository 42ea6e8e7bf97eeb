//! Focus and visibility policy: which concepts surround a focused node and
//! which ring each one is placed on.

mod rings;

use std::collections::HashMap;

use log::debug;

use crate::graph::{ConceptGraph, ConceptNode, Edge, EdgeKind, resolve_edges};

pub use rings::{Ring, RingSlot, effective_ring_radius, place_rings, ring_radius};

/// Subgraph laid out while a node is focused.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighborhood {
    pub focused: String,
    /// Focused node first, then members in node-list order.
    pub visible_nodes: Vec<String>,
    pub visible_edges: Vec<Edge>,
    /// Ring membership of every visible node except the focused one.
    pub rings: Vec<RingSlot>,
}

impl Neighborhood {
    pub fn contains(&self, id: &str) -> bool {
        self.visible_nodes.iter().any(|visible| visible == id)
    }

    pub fn ring_of(&self, id: &str) -> Option<Ring> {
        self.rings
            .iter()
            .find(|slot| slot.id == id)
            .map(|slot| slot.ring)
    }
}

/// Relation of `candidate` to `focused`, strongest ring first.
fn relation(
    focused: &ConceptNode,
    candidate: &ConceptNode,
    edge_kinds: &HashMap<&str, Vec<EdgeKind>>,
) -> Option<Ring> {
    if focused.has_sub_element(&candidate.id) {
        return Some(Ring::SubElement);
    }

    let edges = edge_kinds.get(candidate.id.as_str());
    let has_edge = |kind: EdgeKind| edges.is_some_and(|kinds| kinds.contains(&kind));

    let prerequisite = focused.prerequisites.contains(&candidate.id)
        || candidate.prerequisites.contains(&focused.id)
        || has_edge(EdgeKind::Prerequisite);
    if prerequisite {
        return Some(Ring::Prerequisite);
    }

    let outer = focused.sub_concepts.contains(&candidate.id)
        || candidate.sub_concepts.contains(&focused.id)
        || has_edge(EdgeKind::Related)
        || has_edge(EdgeKind::Subconcept);
    outer.then_some(Ring::Outer)
}

/// Neighborhood of `focused_id`, or `None` when the id is not in the graph.
pub fn compute_neighborhood(focused_id: &str, graph: &ConceptGraph) -> Option<Neighborhood> {
    let index_by_id = graph.index_by_id();
    let Some(&focused_index) = index_by_id.get(focused_id) else {
        debug!("focus target {focused_id:?} is not in the graph");
        return None;
    };
    let focused = &graph.nodes[focused_index];

    // Edge kinds linking each node to the focused one, in either direction.
    let mut edge_kinds: HashMap<&str, Vec<EdgeKind>> = HashMap::new();
    for edge in resolve_edges(&graph.edges, &index_by_id) {
        let other = if edge.source == focused_index {
            edge.target
        } else if edge.target == focused_index {
            edge.source
        } else {
            continue;
        };
        edge_kinds
            .entry(graph.nodes[other].id.as_str())
            .or_default()
            .push(edge.kind);
    }

    let mut visible_nodes = vec![focused.id.clone()];
    let mut rings = Vec::new();
    for (index, candidate) in graph.nodes.iter().enumerate() {
        if index == focused_index || index_by_id.get(candidate.id.as_str()) != Some(&index) {
            continue;
        }
        let Some(ring) = relation(focused, candidate, &edge_kinds) else {
            continue;
        };
        visible_nodes.push(candidate.id.clone());
        rings.push(RingSlot {
            id: candidate.id.clone(),
            ring,
        });
    }

    let visible_edges = graph
        .edges
        .iter()
        .filter(|edge| {
            edge.source != edge.target
                && visible_nodes.contains(&edge.source)
                && visible_nodes.contains(&edge.target)
        })
        .cloned()
        .collect();

    debug!(
        "focus {focused_id:?}: {} neighbors across {} rings",
        rings.len(),
        Ring::ALL
            .iter()
            .filter(|ring| rings.iter().any(|slot| slot.ring == **ring))
            .count()
    );

    Some(Neighborhood {
        focused: focused.id.clone(),
        visible_nodes,
        visible_edges,
        rings,
    })
}

/// Whether `node_id` is shown while `focused_id` is focused.
pub fn is_visible(node_id: &str, focused_id: Option<&str>, graph: &ConceptGraph) -> bool {
    let Some(focused_id) = focused_id else {
        return true;
    };
    match compute_neighborhood(focused_id, graph) {
        Some(neighborhood) => neighborhood.contains(node_id),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> ConceptNode {
        ConceptNode::new(id)
    }

    #[test]
    fn prerequisite_and_parent_join_neighborhood() {
        let mut a = node("A");
        a.prerequisites = vec!["B".into()];
        let mut c = node("C");
        c.sub_concepts = vec!["A".into()];
        let graph = ConceptGraph::new(vec![a, node("B"), c, node("D")], Vec::new());

        let neighborhood = compute_neighborhood("A", &graph).unwrap();
        assert_eq!(neighborhood.visible_nodes, vec!["A", "B", "C"]);
        assert_eq!(neighborhood.ring_of("B"), Some(Ring::Prerequisite));
        assert_eq!(neighborhood.ring_of("C"), Some(Ring::Outer));
        assert!(!neighborhood.contains("D"));
    }

    #[test]
    fn theorems_and_problems_take_the_inner_ring() {
        let mut quadratic = node("quadratic");
        quadratic.theorems = vec!["vertex-form".into()];
        quadratic.problems = vec!["completing-square".into(), "missing".into()];
        quadratic.prerequisites = vec!["vertex-form".into()];
        let graph = ConceptGraph::new(
            vec![quadratic, node("vertex-form"), node("completing-square")],
            Vec::new(),
        );

        let neighborhood = compute_neighborhood("quadratic", &graph).unwrap();
        assert_eq!(neighborhood.ring_of("vertex-form"), Some(Ring::SubElement));
        assert_eq!(neighborhood.ring_of("completing-square"), Some(Ring::SubElement));
        assert!(!neighborhood.contains("missing"));
    }

    #[test]
    fn edges_define_membership_and_visible_edges() {
        let graph = ConceptGraph::new(
            vec![node("1"), node("2"), node("3"), node("9")],
            vec![
                Edge::new("2", "1", EdgeKind::Prerequisite),
                Edge::new("1", "3", EdgeKind::Related),
                Edge::new("3", "9", EdgeKind::Related),
                Edge::new("1", "nonexistent", EdgeKind::Related),
            ],
        );

        let neighborhood = compute_neighborhood("1", &graph).unwrap();
        assert_eq!(neighborhood.ring_of("2"), Some(Ring::Prerequisite));
        assert_eq!(neighborhood.ring_of("3"), Some(Ring::Outer));
        assert_eq!(neighborhood.visible_edges.len(), 2);
        assert!(
            neighborhood
                .visible_edges
                .iter()
                .all(|edge| edge.target != "nonexistent")
        );
    }

    #[test]
    fn unknown_focus_shows_everything() {
        let graph = ConceptGraph::new(vec![node("a"), node("b")], Vec::new());
        assert!(compute_neighborhood("zzz", &graph).is_none());
        assert!(is_visible("b", Some("zzz"), &graph));
        assert!(is_visible("b", None, &graph));
        assert!(!is_visible("b", Some("a"), &graph));
        assert!(is_visible("a", Some("a"), &graph));
    }
}
