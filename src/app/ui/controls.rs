use concept_atlas::RunMode;
use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout");
        ui.add_space(6.0);

        let mut continuous = self.session.run_mode() == RunMode::Continuous;
        if ui
            .checkbox(&mut continuous, "Keep-alive nudges")
            .on_hover_text("Gently reheat the layout on a fixed interval once it has settled.")
            .changed()
        {
            self.session.set_run_mode(if continuous {
                RunMode::Continuous
            } else {
                RunMode::SettleOnce
            });
        }

        ui.horizontal(|ui| {
            if self.session.is_running() {
                if ui.button("Stop").clicked() {
                    self.session.stop();
                }
            } else if ui.button("Resume").clicked() {
                self.session.restart();
            }
            if ui
                .add_enabled(self.session.is_running(), egui::Button::new("Settle now"))
                .clicked()
            {
                self.session.settle();
            }
        });

        ui.separator();
        ui.label(RichText::new("View").strong());
        ui.checkbox(&mut self.show_labels, "Show labels");
        ui.checkbox(&mut self.show_rings, "Show focus rings");
        ui.horizontal(|ui| {
            ui.label(format!("zoom {:.2}", self.zoom));
            if ui.button("Reset view").clicked() {
                self.pan = egui::Vec2::ZERO;
                self.zoom = 1.0;
            }
        });

        ui.separator();
        ui.label(RichText::new("Focus").strong());
        match self.session.focus().map(str::to_owned) {
            Some(focused) => {
                let name = self
                    .session
                    .graph()
                    .node(&focused)
                    .map_or(focused.clone(), |concept| concept.display_name().to_owned());
                ui.label(format!("Focused on {name}"));
                if ui.button("Back to overview").clicked() {
                    self.session.set_focus(None);
                }
            }
            None => {
                ui.label("Click a concept to focus it. Double-click empty space to return.");
            }
        }

        ui.separator();
        ui.small("Drag a concept to move it. Right or middle drag pans, scroll zooms.");
    }
}
