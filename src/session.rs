//! Owned layout session: the single writer of node positions, driven by
//! frame ticks, focus changes and drag events from the renderer.

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;

use crate::config::{FocusAnchor, LayoutConfig};
use crate::error::LayoutError;
use crate::focus::{Neighborhood, compute_neighborhood};
use crate::geometry::{Vec2, Viewport};
use crate::graph::{ConceptGraph, Edge, LayoutNode};
use crate::layout::{Simulation, focus_simulation, layout_rng, overview_simulation};
use crate::physics::ForceParams;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Relax until alpha cools, then stay still until the next interaction.
    #[default]
    SettleOnce,
    /// Like `SettleOnce`, plus a small alpha bump every `continuous_interval_ms`.
    Continuous,
}

pub struct LayoutSession {
    graph: ConceptGraph,
    config: LayoutConfig,
    viewport: Viewport,
    run_mode: RunMode,
    simulation: Simulation,
    neighborhood: Option<Neighborhood>,
    visible_edges: Vec<Edge>,
    overview_positions: HashMap<String, Vec2>,
    dragging: Option<String>,
    running: bool,
    keep_alive_elapsed: Duration,
    rng: StdRng,
}

pub fn create_layout_session(
    graph: ConceptGraph,
    viewport: Viewport,
    config: LayoutConfig,
) -> Result<LayoutSession, LayoutError> {
    config.validate()?;

    let mut rng = layout_rng(&config);
    let mut simulation = overview_simulation(&graph, viewport, &config, &HashMap::new(), &mut rng);
    let steps = simulation.run(config.iterations);
    let visible_edges = valid_edges(&graph);
    info!(
        "layout session over {} concepts and {} edges, settled after {steps} steps",
        simulation.nodes().len(),
        visible_edges.len()
    );

    Ok(LayoutSession {
        graph,
        config,
        viewport,
        run_mode: RunMode::default(),
        simulation,
        neighborhood: None,
        visible_edges,
        overview_positions: HashMap::new(),
        dragging: None,
        running: true,
        keep_alive_elapsed: Duration::ZERO,
        rng,
    })
}

fn valid_edges(graph: &ConceptGraph) -> Vec<Edge> {
    let index_by_id = graph.index_by_id();
    graph
        .edges
        .iter()
        .filter(|edge| {
            matches!(
                (index_by_id.get(edge.source.as_str()), index_by_id.get(edge.target.as_str())),
                (Some(source), Some(target)) if source != target
            )
        })
        .cloned()
        .collect()
}

impl LayoutSession {
    pub fn with_run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = run_mode;
        self
    }

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    pub fn set_run_mode(&mut self, run_mode: RunMode) {
        self.run_mode = run_mode;
        self.keep_alive_elapsed = Duration::ZERO;
    }

    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        self.simulation.nodes()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes().iter().find(|node| node.id == id)
    }

    pub fn visible_edges(&self) -> &[Edge] {
        &self.visible_edges
    }

    pub fn focus(&self) -> Option<&str> {
        self.neighborhood
            .as_ref()
            .map(|neighborhood| neighborhood.focused.as_str())
    }

    pub fn neighborhood(&self) -> Option<&Neighborhood> {
        self.neighborhood.as_ref()
    }

    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    pub fn alpha(&self) -> f32 {
        self.simulation.alpha()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_hot(&self) -> bool {
        self.simulation.is_hot()
    }

    /// One solver step. Returns whether positions changed.
    pub fn step(&mut self) -> bool {
        if !self.running || !self.simulation.is_hot() {
            return false;
        }
        self.simulation.step();
        true
    }

    /// Frame/timer driver: feeds the keep-alive clock, then steps once.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.running {
            return false;
        }

        if self.run_mode == RunMode::Continuous {
            self.keep_alive_elapsed += elapsed;
            let interval = self.config.continuous_interval();
            if self.keep_alive_elapsed >= interval {
                self.keep_alive_elapsed = Duration::ZERO;
                let bumped = self.simulation.alpha().max(self.config.continuous_alpha);
                self.simulation.set_alpha(bumped);
                debug!("keep-alive bump to alpha {bumped:.3}");
            }
        }

        self.step()
    }

    /// Runs the current mode's step budget synchronously.
    pub fn settle(&mut self) -> usize {
        if !self.running {
            return 0;
        }
        let budget = if self.neighborhood.is_some() {
            self.config.focus_iterations
        } else {
            self.config.iterations
        };
        self.simulation.run(budget)
    }

    /// Halts stepping at once; the last positions stay valid.
    pub fn stop(&mut self) {
        self.running = false;
        self.keep_alive_elapsed = Duration::ZERO;
    }

    pub fn restart(&mut self) {
        self.running = true;
    }

    pub fn dispose(mut self) -> Vec<LayoutNode> {
        self.stop();
        self.simulation.into_nodes()
    }

    /// Focuses `id`, or clears focus for `None`, the focused id again, or an
    /// id that is not in the graph.
    pub fn set_focus(&mut self, id: Option<&str>) {
        let current = self.focus().map(str::to_owned);
        let next = match id {
            Some(id) if current.as_deref() == Some(id) => {
                debug!("focus toggled off {id:?}");
                None
            }
            Some(id) if self.graph.node(id).is_none() => {
                debug!("focus on unknown concept {id:?}; showing overview");
                None
            }
            other => other.map(str::to_owned),
        };

        if next.is_none() && current.is_none() {
            return;
        }

        let anchor = next
            .as_deref()
            .and_then(|id| self.node(id))
            .map(|node| node.position);
        self.teardown();

        match next.as_deref().and_then(|id| compute_neighborhood(id, &self.graph)) {
            Some(neighborhood) => self.enter_focus(neighborhood, anchor),
            None => self.enter_overview(),
        }
    }

    /// Drops the active neighborhood (or snapshots overview positions) before
    /// the node set changes.
    fn teardown(&mut self) {
        self.release_drag();
        match self.neighborhood.take() {
            Some(previous) => info!("closing neighborhood of {:?}", previous.focused),
            None => {
                self.overview_positions = self
                    .simulation
                    .nodes()
                    .iter()
                    .map(|node| (node.id.clone(), node.position))
                    .collect();
            }
        }
    }

    fn enter_focus(&mut self, neighborhood: Neighborhood, last_position: Option<Vec2>) {
        let anchor = match self.config.focus_anchor {
            FocusAnchor::ViewportCenter => self.viewport.center(),
            FocusAnchor::LastPosition => last_position.unwrap_or_else(|| self.viewport.center()),
        };
        info!(
            "focusing {:?} with {} neighbors",
            neighborhood.focused,
            neighborhood.rings.len()
        );

        let mut simulation = focus_simulation(&neighborhood, self.viewport, &self.config, anchor);
        simulation.run(self.config.focus_iterations);
        self.simulation = simulation;
        self.visible_edges = neighborhood.visible_edges.clone();
        self.neighborhood = Some(neighborhood);
        self.keep_alive_elapsed = Duration::ZERO;
    }

    fn enter_overview(&mut self) {
        let mut simulation = overview_simulation(
            &self.graph,
            self.viewport,
            &self.config,
            &self.overview_positions,
            &mut self.rng,
        );
        let all_known = simulation
            .nodes()
            .iter()
            .all(|node| self.overview_positions.contains_key(&node.id));
        if all_known {
            simulation.set_alpha(self.config.continuous_alpha);
        }
        info!("showing overview of {} concepts", simulation.nodes().len());

        self.simulation = simulation;
        self.visible_edges = valid_edges(&self.graph);
        self.keep_alive_elapsed = Duration::ZERO;
    }

    pub fn begin_drag(&mut self, id: &str) {
        let Some(index) = self.simulation.index_of(id) else {
            debug!("drag on unknown node {id:?} ignored");
            return;
        };

        if self.dragging.as_deref().is_some_and(|current| current != id) {
            self.release_drag();
        }

        let position = self.simulation.nodes()[index].position;
        self.simulation.pin(index, position);
        if self.run_mode == RunMode::Continuous {
            self.simulation.set_alpha_target(self.config.drag_alpha_target);
        }
        self.dragging = Some(id.to_owned());
    }

    pub fn update_drag(&mut self, id: &str, x: f32, y: f32) {
        if self.dragging.as_deref() != Some(id) || !(x.is_finite() && y.is_finite()) {
            return;
        }
        if let Some(index) = self.simulation.index_of(id) {
            self.simulation.pin(index, Vec2::new(x, y));
        }
    }

    pub fn end_drag(&mut self, id: &str) {
        if self.dragging.as_deref() != Some(id) {
            return;
        }
        self.release_drag();
    }

    fn release_drag(&mut self) {
        let Some(id) = self.dragging.take() else {
            return;
        };
        if let Some(index) = self.simulation.index_of(&id) {
            self.simulation.unpin(index);
        }
        self.simulation.set_alpha_target(0.0);
    }

    /// New bounds; every node (and any pin) is clamped into them.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;

        match self.neighborhood.take() {
            Some(neighborhood) => {
                self.release_drag();
                let anchor = self.simulation.anchor().map(|(_, point)| point);
                self.enter_focus(neighborhood, anchor);
            }
            None => {
                let params = ForceParams::overview(&self.config, viewport);
                self.simulation.set_viewport(viewport, params);
            }
        }
    }
}
