use std::fs;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Tunables for the force layout. Defaults reproduce the classic d3-force behaviour
/// (about 300 ticks from a cold start to convergence).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub initial_alpha: f32,
    pub reheat_alpha: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub drag_alpha_target: f32,
    pub velocity_decay: f32,
    pub link_distance: f32,
    pub repulsion_strength: f32,
    pub repulsion_distance_min: f32,
    pub barnes_hut_theta: f32,
    pub collision_iterations: usize,
    pub collision_strength: f32,
    pub center_strength: f32,
    pub center: [f32; 2],
    pub base_radius: f32,
    pub radius_scale: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_alpha: 1.0,
            reheat_alpha: 0.3,
            alpha_min: 0.001,
            alpha_decay: 0.0228,
            drag_alpha_target: 0.3,
            velocity_decay: 0.4,
            link_distance: 100.0,
            repulsion_strength: 30.0,
            repulsion_distance_min: 1.0,
            barnes_hut_theta: 0.9,
            collision_iterations: 2,
            collision_strength: 1.0,
            center_strength: 1.0,
            center: [0.0, 0.0],
            base_radius: 10.0,
            radius_scale: 0.6,
        }
    }
}

impl SimulationConfig {
    pub fn node_radius(&self, weight: u32) -> f32 {
        self.base_radius + (weight as f32 * self.radius_scale)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f32,
    pub height: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_sensitivity: f32,
    pub click_distance: f32,
    pub tooltip_offset: [f32; 2],
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            min_zoom: 0.1,
            max_zoom: 8.0,
            zoom_sensitivity: 0.0018,
            click_distance: 3.0,
            tooltip_offset: [10.0, -28.0],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub viewport: ViewportConfig,
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let Some(config_path) = config_path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file {config_path}"))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {config_path}"))?;
        log::info!("loaded configuration from {config_path}");
        Ok(config)
    }
}
