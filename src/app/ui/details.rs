use concept_atlas::{ConceptNode, Ring};
use eframe::egui::{self, RichText, Ui};

use super::super::ViewModel;

fn ring_title(ring: Ring) -> &'static str {
    match ring {
        Ring::SubElement => "Theorems and problems",
        Ring::Prerequisite => "Prerequisites and dependents",
        Ring::Outer => "Related concepts",
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Concept Details");
        ui.add_space(6.0);

        let Some(selected_id) = self
            .session
            .focus()
            .or(self.hovered.as_deref())
            .map(str::to_owned)
        else {
            ui.label("Hover or click a concept in the graph.");
            return;
        };

        let Some(node) = self.session.graph().node(&selected_id).cloned() else {
            ui.label("Selected concept no longer exists in the graph.");
            return;
        };

        Self::draw_concept_summary(ui, &node);

        let mut pending_focus = None;
        if let Some(neighborhood) = self.session.neighborhood() {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for ring in Ring::ALL {
                        let members = neighborhood
                            .rings
                            .iter()
                            .filter(|slot| slot.ring == ring)
                            .collect::<Vec<_>>();
                        if members.is_empty() {
                            continue;
                        }

                        ui.separator();
                        ui.label(
                            RichText::new(format!("{} ({})", ring_title(ring), members.len()))
                                .strong(),
                        );
                        for slot in members {
                            let label = self
                                .session
                                .graph()
                                .node(&slot.id)
                                .map_or(slot.id.as_str(), ConceptNode::display_name);
                            if ui.link(label).clicked() {
                                pending_focus = Some(slot.id.clone());
                            }
                        }
                    }
                });
        }

        if let Some(id) = pending_focus {
            self.session.set_focus(Some(&id));
        }
    }

    fn draw_concept_summary(ui: &mut Ui, node: &ConceptNode) {
        ui.label(RichText::new(node.display_name()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Kind: {}", node.kind.label()));
        if let Some(difficulty) = node.difficulty {
            ui.label(format!("Difficulty: {}", difficulty.label()));
        }
        if let Some(description) = &node.description {
            ui.add_space(4.0);
            ui.label(description.as_str());
        }

        for (title, entries) in [
            ("Prerequisites", &node.prerequisites),
            ("Sub-concepts", &node.sub_concepts),
            ("Theorems", &node.theorems),
            ("Problems", &node.problems),
        ] {
            if !entries.is_empty() {
                ui.label(format!("{title}: {}", entries.join(", ")));
            }
        }
    }
}
