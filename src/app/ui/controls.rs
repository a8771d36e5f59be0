use eframe::egui::{self, RichText, Ui};

use crate::simulation::Reheat;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Location types");
        ui.separator();
        ui.add_space(4.0);

        if self.filter.categories().is_empty() {
            ui.label("No location types in this dataset.");
        } else {
            ui.horizontal(|ui| {
                if ui.button("Enable all").clicked() {
                    self.set_all_categories(true);
                }
                if ui.button("Disable all").clicked() {
                    self.set_all_categories(false);
                }
            });
            ui.add_space(4.0);

            let mut toggled = None;
            egui::ScrollArea::vertical()
                .id_salt("category_toggles")
                .max_height(ui.available_height() * 0.6)
                .show(ui, |ui| {
                    for category in self.filter.categories() {
                        let mut enabled = category.enabled;
                        if ui.checkbox(&mut enabled, category.name.as_str()).changed() {
                            toggled = Some((category.id.clone(), enabled));
                        }
                    }
                });

            if let Some((id, enabled)) = toggled {
                self.set_category_enabled(&id, enabled);
            }
        }

        ui.add_space(8.0);
        ui.separator();
        ui.label(RichText::new("Simulation").strong());
        ui.checkbox(&mut self.live_physics, "Live layout")
            .on_hover_text("Advance the force layout one step per frame.");

        let status = if self.simulation.is_running() {
            "running"
        } else {
            "settled"
        };
        ui.label(format!(
            "alpha {:.4} ({status}), tick {}",
            self.simulation.alpha(),
            self.simulation.snapshot().tick
        ));
        ui.label(format!(
            "{} nodes, {} links in layout",
            self.simulation.visible_count(),
            self.simulation.active_link_count()
        ));

        ui.horizontal(|ui| {
            if ui.button("Reheat").clicked() {
                self.simulation.reheat(Reheat::Full);
            }
            if ui.button("Stop").clicked() {
                self.simulation.stop();
            }
            if ui.button("Restart layout").clicked() {
                self.simulation.start(&self.model.nodes, &self.model.edges);
                self.controller.reset();
                self.apply_filter();
            }
        });

        ui.add_space(8.0);
        ui.separator();
        let viewport = self.controller.viewport();
        ui.small(format!(
            "zoom {:.2}x, pan ({:.0}, {:.0})",
            viewport.scale, viewport.translate.x, viewport.translate.y
        ));
        ui.small("Drag background to pan, scroll to zoom, drag nodes to pin, click to highlight.");
    }
}
