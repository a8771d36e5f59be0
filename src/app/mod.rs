use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::config::AppConfig;
use crate::graph::{CategoryFilter, GraphModel};
use crate::interaction::InteractionController;
use crate::relations::{RelationsDataset, load_dataset};
use crate::simulation::Simulation;

mod graph;
mod render_utils;
mod ui;

pub struct RelgraphApp {
    data_path: String,
    config: AppConfig,
    state: AppState,
    reload_rx: Option<Receiver<Result<RelationsDataset, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<RelationsDataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    model: GraphModel,
    filter: CategoryFilter,
    simulation: Simulation,
    controller: InteractionController,
    live_physics: bool,
    visible_ids: HashSet<String>,
    visible_edge_count: usize,
}

impl RelgraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: String, config: AppConfig) -> Self {
        let state = Self::start_load(data_path.clone());
        Self {
            data_path,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(data_path: String) -> Receiver<Result<RelationsDataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&data_path).map_err(|error| {
                log::error!("{error:#}");
                format!("{error:#}")
            });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(data_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(data_path),
        }
    }

    fn ready(&self, ctx: &Context, dataset: RelationsDataset) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(ctx, &dataset, self.config)))
    }
}

impl eframe::App for RelgraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(result);
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading relation graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load relations");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.state = Self::start_load(self.data_path.clone());
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.data_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(dataset) => self.ready(ctx, dataset),
                Err(error) => AppState::Error(error),
            };
        } else if matches!(self.state, AppState::Loading { .. }) {
            ctx.request_repaint();
        }
    }
}
