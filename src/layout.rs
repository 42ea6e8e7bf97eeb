use std::collections::HashMap;
use std::f32::consts::TAU;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::LayoutConfig;
use crate::focus::{Neighborhood, effective_ring_radius, place_rings, ring_radius};
use crate::geometry::{Vec2, Viewport};
use crate::graph::{ConceptGraph, Edge, LayoutNode, ResolvedEdge, layout_index_by_id, resolve_edges};
use crate::physics::{ForceParams, ForceScratch, accumulate_forces};

/// RNG for overview placement; seeded when the config asks for reproducible runs.
pub fn layout_rng(config: &LayoutConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Velocity-Verlet style relaxation over one node set, with d3-like alpha cooling.
#[derive(Debug)]
pub struct Simulation {
    nodes: Vec<LayoutNode>,
    edges: Vec<ResolvedEdge>,
    viewport: Viewport,
    margin: f32,
    params: ForceParams,
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
    alpha_min: f32,
    velocity_decay: f32,
    anchor: Option<(usize, Vec2)>,
    scratch: ForceScratch,
    forces: Vec<Vec2>,
}

impl Simulation {
    pub fn new(
        mut nodes: Vec<LayoutNode>,
        edges: &[Edge],
        viewport: Viewport,
        config: &LayoutConfig,
        params: ForceParams,
    ) -> Self {
        let margin = config.node_radius;
        for node in &mut nodes {
            if !node.position.is_finite() {
                node.position = viewport.center();
            }
            node.position = viewport.clamp(node.position, margin);
            node.pin = node
                .pin
                .filter(|pin| pin.is_finite())
                .map(|pin| viewport.clamp(pin, margin));
        }
        let edges = resolve_edges(edges, &layout_index_by_id(&nodes));

        Self {
            nodes,
            edges,
            viewport,
            margin,
            params,
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: config.alpha_decay,
            alpha_min: config.alpha_min,
            velocity_decay: config.velocity_decay,
            anchor: None,
            scratch: ForceScratch::default(),
            forces: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<LayoutNode> {
        self.nodes
    }

    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn params(&self) -> &ForceParams {
        &self.params
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.id == id)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, alpha_target: f32) {
        self.alpha_target = alpha_target.clamp(0.0, 1.0);
    }

    pub fn is_hot(&self) -> bool {
        self.alpha >= self.alpha_min || self.alpha_target >= self.alpha_min
    }

    /// Holds the node at `index` fixed at `point` until cleared.
    pub fn set_anchor(&mut self, index: usize, point: Vec2) {
        if index < self.nodes.len() && point.is_finite() {
            let point = self.viewport.clamp(point, self.margin);
            self.anchor = Some((index, point));
            self.nodes[index].position = point;
            self.nodes[index].velocity = Vec2::ZERO;
        }
    }

    pub fn anchor(&self) -> Option<(usize, Vec2)> {
        self.anchor
    }

    /// Pins the node and moves it there immediately. Non-finite points are ignored.
    pub fn pin(&mut self, index: usize, point: Vec2) {
        if !point.is_finite() {
            debug!("ignoring non-finite pin {point:?} for node {index}");
            return;
        }
        let point = self.viewport.clamp(point, self.margin);
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(point);
            node.position = point;
            node.velocity = Vec2::ZERO;
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    /// Swaps bounds and force parameters, re-clamping every node.
    pub fn set_viewport(&mut self, viewport: Viewport, params: ForceParams) {
        self.viewport = viewport;
        self.params = params;
        for node in &mut self.nodes {
            node.position = viewport.clamp(node.position, self.margin);
            if let Some(pin) = node.pin {
                node.pin = Some(viewport.clamp(pin, self.margin));
            }
        }
        if let Some((index, point)) = self.anchor {
            self.set_anchor(index, point);
        }
    }

    pub fn step(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        accumulate_forces(
            &self.nodes,
            &self.edges,
            &self.params,
            &mut self.scratch,
            &mut self.forces,
        );

        let alpha = self.alpha;
        let retain = 1.0 - self.velocity_decay;
        for (index, node) in self.nodes.iter_mut().enumerate() {
            let fixed = node.pin.or(match self.anchor {
                Some((anchor_index, point)) if anchor_index == index => Some(point),
                _ => None,
            });
            if let Some(point) = fixed {
                node.position = self.viewport.clamp(point, self.margin);
                node.velocity = Vec2::ZERO;
                continue;
            }

            let previous = node.position;
            node.velocity = (node.velocity + self.forces[index] * alpha) * retain;
            node.position += node.velocity;
            if !node.position.is_finite() || !node.velocity.is_finite() {
                warn!("node {} diverged; restoring last valid position", node.id);
                node.position = previous;
                node.velocity = Vec2::ZERO;
            }
            node.position = self.viewport.clamp(node.position, self.margin);
        }
    }

    /// Steps until the budget is spent or alpha cools below `alpha_min`.
    pub fn run(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && self.is_hot() {
            self.step();
            steps += 1;
        }
        steps
    }
}

fn random_near(center: Vec2, spread: f32, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.random::<f32>() * TAU;
    let radius = spread * rng.random::<f32>().sqrt();
    center + Vec2::angled(angle) * radius
}

/// One node per distinct concept id. Known positions are kept, others start
/// at a random point near the viewport center.
pub fn initial_overview_nodes(
    graph: &ConceptGraph,
    viewport: Viewport,
    config: &LayoutConfig,
    known: &HashMap<String, Vec2>,
    rng: &mut impl Rng,
) -> Vec<LayoutNode> {
    let index_by_id = graph.index_by_id();
    graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(index, node)| index_by_id.get(node.id.as_str()) == Some(index))
        .map(|(_, node)| {
            let position = known
                .get(&node.id)
                .copied()
                .filter(|point| point.is_finite())
                .unwrap_or_else(|| random_near(viewport.center(), config.initial_spread, rng));
            LayoutNode::new(node.id.clone(), viewport.clamp(position, config.node_radius))
        })
        .collect()
}

pub fn overview_simulation(
    graph: &ConceptGraph,
    viewport: Viewport,
    config: &LayoutConfig,
    known: &HashMap<String, Vec2>,
    rng: &mut impl Rng,
) -> Simulation {
    let nodes = initial_overview_nodes(graph, viewport, config, known, rng);
    Simulation::new(
        nodes,
        &graph.edges,
        viewport,
        config,
        ForceParams::overview(config, viewport),
    )
}

/// Relaxes the whole graph for `config.iterations` steps (or until cool).
pub fn run_overview_layout(
    graph: &ConceptGraph,
    viewport: Viewport,
    config: &LayoutConfig,
    known: &HashMap<String, Vec2>,
) -> Vec<LayoutNode> {
    let mut rng = layout_rng(config);
    let mut simulation = overview_simulation(graph, viewport, config, known, &mut rng);
    let steps = simulation.run(config.iterations);
    debug!(
        "overview layout of {} nodes settled after {steps} steps (alpha {:.4})",
        simulation.nodes().len(),
        simulation.alpha()
    );
    simulation.into_nodes()
}

/// Focused node at `anchor`, ring members at their ring angle. Deterministic.
pub fn place_focus_nodes(
    neighborhood: &Neighborhood,
    viewport: Viewport,
    config: &LayoutConfig,
    anchor: Vec2,
) -> Vec<LayoutNode> {
    let margin = config.node_radius;
    let center = viewport.clamp(anchor, margin);
    let base_radius = effective_ring_radius(neighborhood, viewport, center, config);

    let mut nodes = Vec::with_capacity(neighborhood.visible_nodes.len());
    nodes.push(LayoutNode::new(neighborhood.focused.clone(), center));
    for (id, polar) in place_rings(neighborhood, base_radius, config) {
        nodes.push(LayoutNode::new(id, viewport.clamp(polar.to_point(center), margin)));
    }
    nodes
}

/// Ring placement plus a cool relaxation pass that only separates overlaps:
/// no springs, and the focused node stays anchored.
pub fn focus_simulation(
    neighborhood: &Neighborhood,
    viewport: Viewport,
    config: &LayoutConfig,
    anchor: Vec2,
) -> Simulation {
    let center = viewport.clamp(anchor, config.node_radius);
    let base_radius = effective_ring_radius(neighborhood, viewport, center, config);
    let target_radius = neighborhood
        .rings
        .iter()
        .map(|slot| (slot.id.clone(), ring_radius(slot.ring, base_radius, config)))
        .collect();

    let nodes = place_focus_nodes(neighborhood, viewport, config, center);
    let params = ForceParams::focus(config, viewport, center, target_radius);
    let mut simulation = Simulation::new(nodes, &[], viewport, config, params);
    simulation.set_anchor(0, center);
    simulation.set_alpha(config.focus_alpha);
    simulation
}

pub fn run_focus_layout(
    neighborhood: &Neighborhood,
    viewport: Viewport,
    config: &LayoutConfig,
    anchor: Vec2,
) -> Vec<LayoutNode> {
    let mut simulation = focus_simulation(neighborhood, viewport, config, anchor);
    simulation.run(config.focus_iterations);
    simulation.into_nodes()
}
