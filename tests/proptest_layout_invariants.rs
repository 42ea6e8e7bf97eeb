//! Property-based invariant tests for the layout engine.
//!
//! 1. Overview positions are finite and inside the inset viewport.
//! 2. A dragged node sits exactly at its (clamped) pin after any number of steps.
//! 3. Pairwise repulsion sums to zero between unlinked nodes.
//! 4. Focus placement does not depend on the RNG seed.
//! 5. Visible edges only join visible nodes.

use std::collections::HashMap;

use concept_atlas::focus::compute_neighborhood;
use concept_atlas::layout::place_focus_nodes;
use concept_atlas::{
    ConceptGraph, ConceptNode, Edge, EdgeKind, ForceParams, LayoutConfig, LayoutNode, Vec2,
    Viewport, compute_forces, create_layout_session, run_overview_layout,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

const EDGE_KINDS: [EdgeKind; 3] = [EdgeKind::Prerequisite, EdgeKind::Related, EdgeKind::Subconcept];

/// Up to 10 nodes; edge endpoints may dangle or loop.
fn graph_strategy() -> impl Strategy<Value = ConceptGraph> {
    (
        0usize..10,
        prop::collection::vec((0usize..12, 0usize..12, 0usize..3), 0..16),
    )
        .prop_map(|(node_count, edges)| {
            let nodes = (0..node_count)
                .map(|index| ConceptNode::new(format!("n{index}")))
                .collect();
            let edges = edges
                .into_iter()
                .map(|(source, target, kind)| {
                    Edge::new(format!("n{source}"), format!("n{target}"), EDGE_KINDS[kind])
                })
                .collect();
            ConceptGraph::new(nodes, edges)
        })
}

fn viewport_strategy() -> impl Strategy<Value = Viewport> {
    (20.0f32..1600.0, 20.0f32..1200.0)
        .prop_map(|(width, height)| Viewport::new(width, height).unwrap())
}

fn seeded(seed: u64) -> LayoutConfig {
    LayoutConfig {
        seed: Some(seed),
        iterations: 120,
        ..LayoutConfig::default()
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Boundary
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn overview_stays_inside_bounds(
        graph in graph_strategy(),
        viewport in viewport_strategy(),
        seed in any::<u64>(),
    ) {
        let config = seeded(seed);
        let nodes = run_overview_layout(&graph, viewport, &config, &HashMap::new());
        prop_assert_eq!(nodes.len(), graph.nodes.len());
        for node in &nodes {
            prop_assert!(node.position.is_finite(), "non-finite {:?}", node);
            prop_assert!(
                viewport.contains(node.position, config.node_radius),
                "{:?} escaped {:?}",
                node,
                viewport
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Pin
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn dragged_node_holds_its_pin(
        graph in graph_strategy().prop_filter("needs a node", |graph| !graph.nodes.is_empty()),
        x in -500.0f32..1500.0,
        y in -500.0f32..1500.0,
        steps in 1usize..60,
        seed in any::<u64>(),
    ) {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        let mut session = create_layout_session(graph, viewport, seeded(seed)).unwrap();
        let id = session.nodes()[0].id.clone();

        session.begin_drag(&id);
        session.update_drag(&id, x, y);
        let expected = viewport.clamp(Vec2::new(x, y), 28.0);
        for _ in 0..steps {
            session.step();
            prop_assert_eq!(session.node(&id).unwrap().position, expected);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Repulsion symmetry
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn unlinked_forces_cancel(
        positions in prop::collection::vec((28.0f32..772.0, 28.0f32..572.0), 2..8),
    ) {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        let params = ForceParams {
            centering: None,
            ..ForceParams::overview(&LayoutConfig::default(), viewport)
        };
        let nodes = positions
            .iter()
            .enumerate()
            .map(|(index, (x, y))| LayoutNode::new(format!("n{index}"), Vec2::new(*x, *y)))
            .collect::<Vec<_>>();

        let forces = compute_forces(&nodes, &[], &params);
        let total = forces.values().fold(Vec2::ZERO, |sum, force| sum + *force);
        let scale = forces.values().map(|force| force.length()).fold(1.0f32, f32::max);
        prop_assert!(total.length() <= scale * 1e-4, "net force {:?}", total);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Ring determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn focus_placement_ignores_seed(
        graph in graph_strategy().prop_filter("needs a node", |graph| !graph.nodes.is_empty()),
        first_seed in any::<u64>(),
        second_seed in any::<u64>(),
    ) {
        let viewport = Viewport::new(800.0, 600.0).unwrap();
        let neighborhood = compute_neighborhood("n0", &graph).unwrap();
        let first = place_focus_nodes(&neighborhood, viewport, &seeded(first_seed), viewport.center());
        let second = place_focus_nodes(&neighborhood, viewport, &seeded(second_seed), viewport.center());
        prop_assert_eq!(first, second);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Visible edges
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn visible_edges_join_visible_nodes(
        graph in graph_strategy().prop_filter("needs a node", |graph| !graph.nodes.is_empty()),
    ) {
        let neighborhood = compute_neighborhood("n0", &graph).unwrap();
        prop_assert_eq!(neighborhood.visible_nodes[0].as_str(), "n0");
        for edge in &neighborhood.visible_edges {
            prop_assert!(neighborhood.contains(&edge.source));
            prop_assert!(neighborhood.contains(&edge.target));
            prop_assert_ne!(&edge.source, &edge.target);
        }
    }
}
