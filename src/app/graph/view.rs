use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use super::super::render_utils::{
    EDGE_COLOR, HIGHLIGHT_COLOR, NODE_STROKE_COLOR, circle_visible, dim_color, draw_background,
    edge_visible, node_color, to_screen,
};
use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.controller.set_viewport_size(rect.size());
        draw_background(&painter, rect, self.controller.viewport());

        self.forward_pointer_events(ui, rect, &response);

        if self.live_physics || self.controller.dragged_node().is_some() {
            self.simulation.tick();
        }

        if self.simulation.snapshot().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                if self.model.is_empty() {
                    "The relation dump contains no complete person/location records."
                } else {
                    "No nodes match the enabled categories."
                },
                FontId::proportional(15.0),
                Color32::from_gray(90),
            );
            return;
        }

        let viewport = *self.controller.viewport();
        let highlight = self.controller.highlight();
        let snapshot = self.simulation.snapshot();
        let zoom_sqrt = viewport.scale.sqrt();

        for (edge_index, edge) in self.model.edges.iter().enumerate() {
            let (Some(source), Some(target)) =
                (snapshot.get(edge.source), snapshot.get(edge.target))
            else {
                continue;
            };

            let start = to_screen(rect, &viewport, source);
            let end = to_screen(rect, &viewport, target);
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }

            let stroke = if highlight.is_edge_highlighted(edge_index) {
                Stroke::new((2.2 * zoom_sqrt).clamp(1.2, 4.4), HIGHLIGHT_COLOR)
            } else if highlight.is_active() {
                Stroke::new((1.0 * zoom_sqrt).clamp(0.5, 2.5), dim_color(EDGE_COLOR, 0.8))
            } else {
                Stroke::new((1.0 * zoom_sqrt).clamp(0.5, 2.5), EDGE_COLOR)
            };
            painter.line_segment([start, end], stroke);
        }

        let dragged = self.controller.dragged_node();
        let hovered = self.controller.tooltip().map(|tooltip| tooltip.node_id.as_str());
        for node_position in snapshot.nodes() {
            let node = &self.model.nodes[node_position.index];
            let radius = self
                .simulation
                .radius(node_position.index)
                .unwrap_or_default()
                * viewport.scale;
            let center = to_screen(rect, &viewport, node_position.position);
            if !circle_visible(rect, center, radius) {
                continue;
            }

            let id = &*node_position.id;
            let highlighted = highlight.is_node_highlighted(id);
            let stroke = if highlighted {
                Stroke::new(2.0, HIGHLIGHT_COLOR)
            } else {
                Stroke::new(1.0, NODE_STROKE_COLOR)
            };

            painter.circle_filled(center, radius, node_color(&node.kind));
            painter.circle_stroke(center, radius, stroke);

            let emphasised =
                highlight.selected() == Some(id) || dragged == Some(id) || hovered == Some(id);
            if emphasised || viewport.scale > 2.5 {
                painter.text(
                    center + vec2(radius + 4.0, 0.0),
                    Align2::LEFT_CENTER,
                    node.label(),
                    FontId::proportional(12.0),
                    Color32::from_gray(40),
                );
            }
        }

        if hovered.is_some() || dragged.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = if dragged.is_some() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        }

        if let Some(tooltip) = self.controller.tooltip()
            && !tooltip.text.is_empty()
        {
            let galley = painter.layout_no_wrap(
                tooltip.text.clone(),
                FontId::proportional(13.0),
                Color32::from_gray(20),
            );
            let anchor = rect.min + tooltip.anchor;
            let frame = egui::Rect::from_min_size(anchor, galley.size()).expand(4.0);
            painter.rect_filled(frame, 3.0, Color32::from_rgba_unmultiplied(255, 255, 255, 235));
            painter.rect_stroke(
                frame,
                3.0,
                Stroke::new(1.0, NODE_STROKE_COLOR),
                egui::StrokeKind::Outside,
            );
            painter.galley(anchor, galley, Color32::from_gray(20));
        }

        if self.simulation.is_running() || response.dragged() {
            ui.ctx().request_repaint();
        }
    }
}
