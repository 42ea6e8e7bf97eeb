use eframe::egui::Context;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 180;

        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if self.fps_samples.is_empty() {
            return None;
        }

        let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
        Some(format!("FPS {:.0} | avg {avg:.1}", self.fps_current))
    }

    pub(in crate::app) fn layout_status_text(&self) -> String {
        let state = if !self.session.is_running() {
            "stopped"
        } else if self.session.is_hot() {
            "relaxing"
        } else {
            "settled"
        };
        format!(
            "{} nodes / {} edges | alpha {:.3} | {state}",
            self.session.nodes().len(),
            self.session.visible_edges().len(),
            self.session.alpha()
        )
    }
}
