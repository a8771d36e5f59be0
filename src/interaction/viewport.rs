use eframe::egui::Vec2;

use crate::config::ViewportConfig;

/// Translate + uniform scale from world space to canvas space. The world origin sits at the
/// canvas centre when `translate` is zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub translate: Vec2,
    pub scale: f32,
    size: Vec2,
    min_zoom: f32,
    max_zoom: f32,
}

impl Viewport {
    pub fn new(config: &ViewportConfig) -> Self {
        let min_zoom = config.min_zoom.max(f32::EPSILON);
        Self {
            translate: Vec2::ZERO,
            scale: 1.0_f32.clamp(min_zoom, config.max_zoom.max(min_zoom)),
            size: Vec2::new(config.width, config.height),
            min_zoom,
            max_zoom: config.max_zoom.max(min_zoom),
        }
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    fn center(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        self.center() + self.translate + world * self.scale
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.center() - self.translate) / self.scale
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    /// Zooms by `factor` keeping the world point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Vec2, factor: f32) {
        let world_before = self.screen_to_world(anchor);
        self.scale = (self.scale * factor).clamp(self.min_zoom, self.max_zoom);
        self.translate = anchor - self.center() - (world_before * self.scale);
    }
}
