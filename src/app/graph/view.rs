use std::collections::HashMap;
use std::time::Duration;

use concept_atlas::focus::{Ring, effective_ring_radius, ring_radius};
use concept_atlas::{RunMode, Viewport};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, vec2};

use super::super::ViewModel;
use super::super::render_utils::{
    blend_color, circle_visible, draw_background, draw_bounds, edge_stroke, kind_color,
    world_to_screen,
};

const IDLE_REPAINT: Duration = Duration::from_millis(500);

impl ViewModel {
    /// Keeps the layout bounds matched to the canvas size.
    fn sync_viewport(&mut self, rect: Rect) {
        let current = self.session.viewport();
        if (current.width() - rect.width()).abs() < 0.5
            && (current.height() - rect.height()).abs() < 0.5
        {
            return;
        }
        if let Ok(viewport) = Viewport::new(rect.width(), rect.height()) {
            self.session.resize(viewport);
        }
    }

    fn tick_layout(&mut self, ui: &Ui) {
        let now = ui.input(|input| input.time);
        let elapsed = self
            .last_tick_secs
            .map(|last| (now - last).max(0.0))
            .unwrap_or(0.0);
        self.last_tick_secs = Some(now);

        let moved = self.session.advance(Duration::from_secs_f64(elapsed));
        if moved || self.session.dragging().is_some() {
            ui.ctx().request_repaint();
        } else if self.session.run_mode() == RunMode::Continuous && self.session.is_running() {
            ui.ctx().request_repaint_after(IDLE_REPAINT);
        }
    }

    fn screen_positions(&self, rect: Rect) -> Vec<Pos2> {
        let viewport = self.session.viewport();
        self.session
            .nodes()
            .iter()
            .map(|node| world_to_screen(rect, self.pan, self.zoom, viewport, node.position))
            .collect()
    }

    fn screen_radius(&self) -> f32 {
        (self.session.config().node_radius * 0.55 * self.zoom).clamp(4.0, 36.0)
    }

    fn draw_rings(&self, painter: &egui::Painter, rect: Rect) {
        let Some(neighborhood) = self.session.neighborhood() else {
            return;
        };
        let Some(focused) = self.session.node(&neighborhood.focused) else {
            return;
        };

        let config = self.session.config();
        let viewport = self.session.viewport();
        let base = effective_ring_radius(neighborhood, viewport, focused.position, config);
        let center = world_to_screen(rect, self.pan, self.zoom, viewport, focused.position);
        for ring in Ring::ALL {
            if !neighborhood.rings.iter().any(|slot| slot.ring == ring) {
                continue;
            }
            painter.circle_stroke(
                center,
                ring_radius(ring, base, config) * self.zoom,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(160, 170, 190, 45)),
            );
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.sync_viewport(rect);
        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let screen_radius = self.screen_radius();
        let hovered = Self::hovered_index(ui, &self.screen_positions(rect), screen_radius)
            .and_then(|index| self.session.nodes().get(index))
            .map(|node| node.id.clone());
        self.handle_node_pointer(ui, rect, &response, hovered.as_deref());
        self.tick_layout(ui);

        // Focus changes above may have swapped the node set.
        let hovered = hovered.filter(|id| self.session.node(id).is_some());
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }
        self.hovered = hovered;

        let viewport = self.session.viewport();
        draw_bounds(
            &painter,
            rect,
            self.pan,
            self.zoom,
            viewport,
            self.session.config().node_radius,
        );
        if self.show_rings {
            self.draw_rings(&painter, rect);
        }

        let screen_positions = self.screen_positions(rect);
        let position_by_id = self
            .session
            .nodes()
            .iter()
            .zip(&screen_positions)
            .map(|(node, position)| (node.id.as_str(), *position))
            .collect::<HashMap<_, _>>();

        let focused = self.session.focus();
        let emphasized = self.hovered.as_deref().or(focused);
        for edge in self.session.visible_edges() {
            let (Some(&start), Some(&end)) = (
                position_by_id.get(edge.source.as_str()),
                position_by_id.get(edge.target.as_str()),
            ) else {
                continue;
            };
            let highlighted = emphasized.is_some_and(|id| edge.touches(id));
            painter.line_segment([start, end], edge_stroke(edge.kind, self.zoom, highlighted));
        }

        let focus_color = Color32::from_rgb(245, 206, 93);
        for (node, position) in self.session.nodes().iter().zip(&screen_positions) {
            let position = *position;
            if !circle_visible(rect, position, screen_radius) {
                continue;
            }

            let concept = self.session.graph().node(&node.id);
            let base_color = kind_color(concept.map(|concept| concept.kind).unwrap_or_default());
            let is_focused = focused == Some(node.id.as_str());
            let is_hovered = self.hovered.as_deref() == Some(node.id.as_str());
            let color = if is_focused {
                blend_color(base_color, focus_color, 0.75)
            } else if is_hovered {
                blend_color(base_color, Color32::WHITE, 0.35)
            } else {
                base_color
            };

            let radius = if is_focused {
                screen_radius * 1.3
            } else {
                screen_radius
            };
            painter.circle_filled(position, radius, color);
            let outline = if node.is_pinned() {
                Stroke::new(2.0, Color32::from_gray(240))
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
            };
            painter.circle_stroke(position, radius, outline);

            if self.show_labels || is_hovered || is_focused {
                let label = concept.map_or(node.id.as_str(), |concept| concept.display_name());
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    label,
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if let Some(concept) = self
            .hovered
            .as_deref()
            .and_then(|id| self.session.graph().node(id))
        {
            let mut panel_text = format!("{}  |  {}", concept.display_name(), concept.kind.label());
            if let Some(difficulty) = concept.difficulty {
                panel_text.push_str("  |  ");
                panel_text.push_str(difficulty.label());
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
