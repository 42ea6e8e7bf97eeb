use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::screen_to_world;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let anchor = pointer - rect.center() - self.pan;
        let previous_zoom = self.zoom;

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.2, 4.0);
        self.pan += anchor - anchor * (self.zoom / previous_zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Closest node whose disc contains the pointer.
    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        screen_positions: &[Pos2],
        screen_radius: f32,
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        screen_positions
            .iter()
            .enumerate()
            .filter_map(|(index, position)| {
                let distance = position.distance(pointer);
                (distance <= screen_radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Primary-button drags move a node; clicks focus it. Double-clicking the
    /// empty canvas returns to the overview.
    pub(in crate::app) fn handle_node_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        hovered: Option<&str>,
    ) {
        let viewport = self.session.viewport();

        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(id) = hovered
        {
            self.session.begin_drag(id);
        }

        if let Some(dragging) = self.session.dragging().map(str::to_owned) {
            if response.dragged_by(egui::PointerButton::Primary)
                && let Some(pointer) = ui.input(|input| input.pointer.interact_pos())
            {
                let world = screen_to_world(rect, self.pan, self.zoom, viewport, pointer);
                self.session.update_drag(&dragging, world.x, world.y);
            }
            if response.drag_stopped() {
                self.session.end_drag(&dragging);
            }
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(id) = hovered
        {
            self.session.set_focus(Some(id));
        } else if response.double_clicked() && hovered.is_none() {
            self.session.set_focus(None);
        }
    }
}
