mod forces;

use std::collections::HashMap;

use crate::config::{LayoutConfig, SpringsByKind};
use crate::geometry::{Vec2, Viewport, pair_direction};
use crate::graph::{Edge, LayoutNode, ResolvedEdge, layout_index_by_id, resolve_edges};
use forces::{
    CollisionParams, RepulsionParams, accumulate_pairwise, centering, radial_bias, spring_between,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centering {
    pub center: Vec2,
    pub strength: f32,
}

/// Focus-mode pull toward each node's assigned ring around `center`.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialBias {
    pub center: Vec2,
    pub strength: f32,
    pub target_radius: HashMap<String, f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForceParams {
    pub repulsion_strength: f32,
    pub distance_min: f32,
    pub distance_max: f32,
    pub springs: SpringsByKind,
    pub collision_radius: f32,
    pub collision_strength: f32,
    pub centering: Option<Centering>,
    pub radial: Option<RadialBias>,
}

impl ForceParams {
    fn base(config: &LayoutConfig, viewport: Viewport) -> Self {
        Self {
            repulsion_strength: config.repulsion_strength,
            distance_min: config.distance_min,
            distance_max: config.distance_max.unwrap_or(viewport.diagonal()),
            springs: config.springs,
            collision_radius: config.collision_radius,
            collision_strength: config.collision_strength,
            centering: None,
            radial: None,
        }
    }

    pub fn overview(config: &LayoutConfig, viewport: Viewport) -> Self {
        Self {
            centering: Some(Centering {
                center: viewport.center(),
                strength: config.centering_strength,
            }),
            ..Self::base(config, viewport)
        }
    }

    pub fn focus(
        config: &LayoutConfig,
        viewport: Viewport,
        center: Vec2,
        target_radius: HashMap<String, f32>,
    ) -> Self {
        Self {
            radial: Some(RadialBias {
                center,
                strength: config.radial_strength,
                target_radius,
            }),
            ..Self::base(config, viewport)
        }
    }

    fn repulsion(&self) -> RepulsionParams {
        RepulsionParams {
            strength: self.repulsion_strength,
            distance_min: self.distance_min,
            distance_max: self.distance_max,
        }
    }

    fn collision(&self) -> CollisionParams {
        CollisionParams {
            radius: self.collision_radius,
            strength: self.collision_strength,
        }
    }
}

/// Reusable buffers for the per-step force pass.
#[derive(Debug, Default)]
pub(crate) struct ForceScratch {
    positions: Vec<Vec2>,
    degrees: Vec<u32>,
}

/// Net force per node id. Pinned nodes report zero.
pub fn compute_forces(
    nodes: &[LayoutNode],
    edges: &[Edge],
    params: &ForceParams,
) -> HashMap<String, Vec2> {
    let resolved = resolve_edges(edges, &layout_index_by_id(nodes));
    let mut forces = Vec::new();
    accumulate_forces(
        nodes,
        &resolved,
        params,
        &mut ForceScratch::default(),
        &mut forces,
    );

    nodes
        .iter()
        .zip(forces)
        .map(|(node, force)| (node.id.clone(), force))
        .collect()
}

pub(crate) fn accumulate_forces(
    nodes: &[LayoutNode],
    edges: &[ResolvedEdge],
    params: &ForceParams,
    scratch: &mut ForceScratch,
    forces: &mut Vec<Vec2>,
) {
    let node_count = nodes.len();
    forces.clear();
    forces.resize(node_count, Vec2::ZERO);
    if node_count == 0 {
        return;
    }

    scratch.positions.clear();
    scratch.positions.extend(nodes.iter().map(|node| node.position));
    let positions = &scratch.positions;

    accumulate_pairwise(positions, params.repulsion(), params.collision(), forces);

    scratch.degrees.clear();
    scratch.degrees.resize(node_count, 0);
    for edge in edges {
        if edge.source < node_count && edge.target < node_count {
            scratch.degrees[edge.source] += 1;
            scratch.degrees[edge.target] += 1;
        }
    }

    for edge in edges {
        let (from, to) = (edge.source, edge.target);
        if from >= node_count || to >= node_count || from == to {
            continue;
        }

        let mut spring = params.springs.for_kind(edge.kind);
        if let Some(strength) = edge.strength.filter(|value| value.is_finite()) {
            spring.strength = strength.max(0.0);
        }
        let from_degree = scratch.degrees[from] as f32;
        let bias = from_degree / (from_degree + scratch.degrees[to] as f32);
        let (on_source, on_target) = spring_between(
            positions[from],
            positions[to],
            spring,
            bias,
            pair_direction(from, to),
        );
        forces[from] += on_source;
        forces[to] += on_target;
    }

    if let Some(centering_force) = params.centering {
        for (force, &position) in forces.iter_mut().zip(positions) {
            *force += centering(position, centering_force.center, centering_force.strength);
        }
    }

    if let Some(radial) = &params.radial {
        for (index, node) in nodes.iter().enumerate() {
            let Some(&target_radius) = radial.target_radius.get(&node.id) else {
                continue;
            };
            forces[index] += radial_bias(
                positions[index],
                radial.center,
                target_radius,
                radial.strength,
                index,
            );
        }
    }

    for (force, node) in forces.iter_mut().zip(nodes) {
        if node.is_pinned() || !force.is_finite() {
            *force = Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeKind;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0).unwrap()
    }

    fn params_without_centering() -> ForceParams {
        ForceParams {
            centering: None,
            collision_strength: 0.0,
            ..ForceParams::overview(&LayoutConfig::default(), viewport())
        }
    }

    #[test]
    fn two_unlinked_nodes_repel_symmetrically() {
        let nodes = vec![
            LayoutNode::new("1", Vec2::new(300.0, 280.0)),
            LayoutNode::new("2", Vec2::new(420.0, 330.0)),
        ];
        let forces = compute_forces(&nodes, &[], &params_without_centering());

        let on_first = forces["1"];
        let on_second = forces["2"];
        assert!((on_first.x + on_second.x).abs() < 1e-6);
        assert!((on_first.y + on_second.y).abs() < 1e-6);
        assert!(on_first.x < 0.0 && on_second.x > 0.0);
    }

    #[test]
    fn dangling_edge_is_ignored() {
        let nodes = vec![
            LayoutNode::new("X", Vec2::new(300.0, 300.0)),
            LayoutNode::new("Y", Vec2::new(500.0, 300.0)),
        ];
        let with_dangling = compute_forces(
            &nodes,
            &[Edge::new("X", "nonexistent", EdgeKind::Prerequisite)],
            &params_without_centering(),
        );
        let without = compute_forces(&nodes, &[], &params_without_centering());
        assert_eq!(with_dangling, without);
    }

    #[test]
    fn pinned_node_feels_no_force() {
        let mut pinned = LayoutNode::new("a", Vec2::new(400.0, 300.0));
        pinned.pin = Some(pinned.position);
        let nodes = vec![pinned, LayoutNode::new("b", Vec2::new(410.0, 300.0))];
        let forces = compute_forces(
            &nodes,
            &[Edge::new("a", "b", EdgeKind::Related)],
            &ForceParams::overview(&LayoutConfig::default(), viewport()),
        );
        assert_eq!(forces["a"], Vec2::ZERO);
        assert_ne!(forces["b"], Vec2::ZERO);
    }

    #[test]
    fn edge_strength_overrides_kind_default() {
        let nodes = vec![
            LayoutNode::new("a", Vec2::new(100.0, 300.0)),
            LayoutNode::new("b", Vec2::new(700.0, 300.0)),
        ];
        let params = ForceParams {
            repulsion_strength: 0.0,
            ..params_without_centering()
        };
        let mut weak = Edge::new("a", "b", EdgeKind::Prerequisite);
        weak.strength = Some(0.05);

        let default_edge = Edge::new("a", "b", EdgeKind::Prerequisite);
        let default_pull = compute_forces(&nodes, &[default_edge], &params)["a"];
        let weak_pull = compute_forces(&nodes, &[weak], &params)["a"];
        assert!(weak_pull.x > 0.0);
        assert!(weak_pull.x < default_pull.x);
    }

    #[test]
    fn isolated_node_still_feels_centering() {
        let nodes = vec![LayoutNode::new("lonely", Vec2::new(100.0, 100.0))];
        let forces = compute_forces(
            &nodes,
            &[],
            &ForceParams::overview(&LayoutConfig::default(), viewport()),
        );
        let force = forces["lonely"];
        assert!(force.x > 0.0 && force.y > 0.0);
    }

    #[test]
    fn portrait_viewport_keeps_far_nodes_repelling() {
        let portrait = Viewport::new(300.0, 900.0).unwrap();
        let params = ForceParams {
            centering: None,
            collision_strength: 0.0,
            ..ForceParams::overview(&LayoutConfig::default(), portrait)
        };
        assert!((params.distance_max - portrait.diagonal()).abs() < 1e-3);

        let nodes = vec![
            LayoutNode::new("top", Vec2::new(150.0, 40.0)),
            LayoutNode::new("bottom", Vec2::new(150.0, 860.0)),
        ];
        let forces = compute_forces(&nodes, &[], &params);
        assert!(forces["top"].y < 0.0);
        assert!(forces["bottom"].y > 0.0);
    }
}
