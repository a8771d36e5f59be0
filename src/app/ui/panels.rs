use eframe::egui::{self, Align, Context, Layout};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        data_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("relgraph");
                    ui.separator();
                    ui.label(format!("data: {data_path}"));
                    ui.label(format!("nodes: {}", self.model.nodes.len()));
                    ui.label(format!("edges: {}", self.model.edges.len()));
                    ui.label(format!("categories: {}", self.filter.categories().len()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload relations"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    fn visible_graph_text(&self) -> String {
        format!(
            "visible {} / {} nodes, {} links",
            self.visible_ids.len(),
            self.model.nodes.len(),
            self.visible_edge_count
        )
    }
}
