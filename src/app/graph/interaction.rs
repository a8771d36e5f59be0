use eframe::egui::{self, Pos2, Rect, Ui};

use crate::interaction::PointerEvent;

use super::super::ViewModel;

impl ViewModel {
    /// Translates this frame's egui pointer state into controller events, in press, move,
    /// release order so a click within one frame still resolves.
    pub(in crate::app) fn forward_pointer_events(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let (latest, interact, pressed, released, primary_down, scroll) = ui.input(|input| {
            (
                input.pointer.latest_pos(),
                input.pointer.interact_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.primary_down(),
                input.raw_scroll_delta.y,
            )
        });
        let local = |pos: Pos2| pos - rect.min;
        let inside = latest.is_some_and(|pos| rect.contains(pos));
        let gesture_active = self.controller.dragged_node().is_some() || self.controller.is_panning();

        let mut events = Vec::with_capacity(4);
        if let Some(pos) = latest
            && inside
            && response.hovered()
            && scroll.abs() > f32::EPSILON
        {
            events.push(PointerEvent::Scroll {
                at: local(pos),
                delta: scroll,
            });
        }

        if let Some(pos) = latest
            && pressed
            && inside
        {
            events.push(PointerEvent::Press(local(pos)));
        }

        match latest {
            Some(pos) if inside || gesture_active || pressed => {
                events.push(PointerEvent::Move(local(pos)));
            }
            _ => events.push(PointerEvent::Leave),
        }

        if released {
            events.push(match latest.or(interact) {
                Some(pos) => PointerEvent::Release(local(pos)),
                None => PointerEvent::Cancel,
            });
        } else if gesture_active && !primary_down {
            events.push(PointerEvent::Cancel);
        }

        for event in events {
            self.controller
                .handle(event, &self.model, &mut self.simulation);
        }
    }
}
