use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::graph::NodeKind;
use crate::interaction::Viewport;

pub(super) const EDGE_COLOR: Color32 = Color32::from_rgb(0xaa, 0xaa, 0xaa);
pub(super) const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(0xff, 0x00, 0x00);
pub(super) const NODE_STROKE_COLOR: Color32 = Color32::from_rgb(0x42, 0x42, 0x42);

pub(super) fn node_color(kind: &NodeKind) -> Color32 {
    match kind {
        NodeKind::Location { .. } => Color32::from_rgb(0xff, 0xd2, 0x48),
        NodeKind::Person { .. } => Color32::from_rgb(0x90, 0xa2, 0xfc),
    }
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, viewport: &Viewport) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(250, 250, 250));

    let step = (56.0 * viewport.scale.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.min + viewport.world_to_screen(Vec2::ZERO);
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(180, 186, 194, 60));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn to_screen(rect: Rect, viewport: &Viewport, world: Vec2) -> Pos2 {
    rect.min + viewport.world_to_screen(world)
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn offscreen_circles_are_culled() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(-5.0, 50.0), 10.0));
        assert!(!circle_visible(rect, pos2(-20.0, 50.0), 10.0));
    }

    #[test]
    fn edge_bounding_box_cull() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 1.0));
        assert!(!edge_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, -20.0), 1.0));
    }
}
