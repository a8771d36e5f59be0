use std::collections::HashSet;
use std::ops::ControlFlow;

use eframe::egui::Context;

use crate::config::AppConfig;
use crate::graph::{CategoryFilter, build};
use crate::interaction::InteractionController;
use crate::relations::RelationsDataset;
use crate::simulation::Simulation;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(ctx: &Context, dataset: &RelationsDataset, config: AppConfig) -> Self {
        let model = build(&dataset.relations, &dataset.categories);
        let filter = CategoryFilter::new(model.categories.clone());

        let mut simulation = Simulation::new(config.simulation);
        let repaint = ctx.clone();
        simulation.on_tick(move |_snapshot| {
            repaint.request_repaint();
            ControlFlow::Continue(())
        });
        simulation.start(&model.nodes, &model.edges);

        let mut view_model = Self {
            model,
            filter,
            simulation,
            controller: InteractionController::new(&config),
            live_physics: true,
            visible_ids: HashSet::new(),
            visible_edge_count: 0,
        };
        view_model.apply_filter();
        view_model
    }

    /// Recomputes the visible set after a category toggle and hands it to the running layout.
    pub(in crate::app) fn apply_filter(&mut self) {
        self.visible_ids = self.filter.compute_visible(&self.model.nodes);
        self.visible_edge_count = self
            .model
            .edges
            .iter()
            .filter(|edge| {
                let (source, target) = self.model.edge_ids(**edge);
                self.visible_ids.contains(source) && self.visible_ids.contains(target)
            })
            .count();

        if self.simulation.set_visible(&self.visible_ids) {
            log::info!(
                "{} of {} nodes visible after filter change",
                self.visible_ids.len(),
                self.model.nodes.len()
            );
        }
    }

    pub(in crate::app) fn set_category_enabled(&mut self, id: &str, enabled: bool) {
        if self.filter.set_enabled(id, enabled) {
            self.apply_filter();
        }
    }

    pub(in crate::app) fn set_all_categories(&mut self, enabled: bool) {
        let ids = self
            .filter
            .categories()
            .iter()
            .map(|category| category.id.clone())
            .collect::<Vec<_>>();

        let mut changed = false;
        for id in &ids {
            changed |= self.filter.set_enabled(id, enabled);
        }
        if changed {
            self.apply_filter();
        }
    }
}
