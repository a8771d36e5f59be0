use eframe::egui::{self, RichText, Ui};

use crate::graph::NodeKind;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(selected_id) = self.controller.highlight().selected() else {
            ui.label("Click a node to highlight its relations.");
            return;
        };

        let Some(node) = self.model.node(selected_id) else {
            ui.label("Selected node no longer exists in the graph.");
            return;
        };

        let label = node.label();
        ui.label(RichText::new(if label.is_empty() { "(unnamed)" } else { label.as_str() }).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Relations: {}", node.weight));
        match &node.kind {
            NodeKind::Person { .. } => {
                ui.label("Kind: person");
            }
            NodeKind::Location { categories, .. } => {
                ui.label("Kind: location");
                if categories.is_empty() {
                    ui.label("Location types: none");
                } else {
                    let names = self
                        .filter
                        .categories()
                        .iter()
                        .filter(|category| categories.contains(&category.id))
                        .map(|category| category.name.as_str())
                        .collect::<Vec<_>>();
                    ui.label(format!("Location types: {}", names.join(", ")));
                }
            }
        }
        if !self.visible_ids.contains(selected_id) {
            ui.label(RichText::new("Hidden by the current filter").italics());
        }

        ui.separator();
        let mut neighbors = self
            .controller
            .highlight()
            .neighbors()
            .iter()
            .filter_map(|id| self.model.node(id))
            .map(|neighbor| (neighbor.label(), neighbor.weight))
            .collect::<Vec<_>>();
        neighbors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        ui.label(RichText::new(format!("Related ({})", neighbors.len())).strong());
        egui::ScrollArea::vertical()
            .id_salt("related_nodes")
            .show(ui, |ui| {
                for (label, weight) in neighbors {
                    ui.label(format!("{label}  ·  {weight}"));
                }
            });
    }
}
