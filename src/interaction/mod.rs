mod highlight;
mod viewport;

use eframe::egui::Vec2;

use crate::config::AppConfig;
use crate::graph::GraphModel;
use crate::simulation::{Reheat, Simulation};

pub use highlight::HighlightState;
pub use viewport::Viewport;

/// Raw pointer input in canvas coordinates (origin at the canvas top-left).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Press(Vec2),
    Move(Vec2),
    Release(Vec2),
    Scroll { at: Vec2, delta: f32 },
    Leave,
    /// The button went up where no position was reported (e.g. outside the window).
    Cancel,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub node_id: String,
    pub text: String,
    pub anchor: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
enum Gesture {
    Idle,
    Pan {
        origin: Vec2,
        last: Vec2,
        moved: bool,
    },
    Drag {
        id: String,
        origin: Vec2,
        grab_offset: Vec2,
        moved: bool,
    },
}

/// Turns pointer input into viewport changes, pins on the simulation, or highlight changes.
/// A press on a node starts a drag, which wins over panning for that pointer. Out-of-order
/// events (a move or release without a press) are ignored.
pub struct InteractionController {
    viewport: Viewport,
    gesture: Gesture,
    tooltip: Option<Tooltip>,
    highlight: HighlightState,
    click_distance: f32,
    zoom_sensitivity: f32,
    tooltip_offset: Vec2,
    drag_alpha_target: f32,
}

impl InteractionController {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            viewport: Viewport::new(&config.viewport),
            gesture: Gesture::Idle,
            tooltip: None,
            highlight: HighlightState::default(),
            click_distance: config.viewport.click_distance,
            zoom_sensitivity: config.viewport.zoom_sensitivity,
            tooltip_offset: Vec2::new(
                config.viewport.tooltip_offset[0],
                config.viewport.tooltip_offset[1],
            ),
            drag_alpha_target: config.simulation.drag_alpha_target,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport.set_size(size);
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn dragged_node(&self) -> Option<&str> {
        match &self.gesture {
            Gesture::Drag { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.gesture, Gesture::Pan { .. })
    }

    /// Drops per-graph state after a full rebuild. The viewport is kept.
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
        self.tooltip = None;
        self.highlight.clear();
    }

    /// Index of the visible node under `point`, nearest centre first.
    pub fn hit_test(&self, point: Vec2, simulation: &Simulation) -> Option<usize> {
        simulation
            .snapshot()
            .nodes()
            .iter()
            .filter_map(|node| {
                let radius = simulation.radius(node.index)? * self.viewport.scale;
                let distance = (self.viewport.world_to_screen(node.position) - point).length();
                (distance <= radius).then_some((node.index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub fn handle(&mut self, event: PointerEvent, model: &GraphModel, simulation: &mut Simulation) {
        match event {
            PointerEvent::Press(point) => self.press(point, model, simulation),
            PointerEvent::Move(point) => self.pointer_moved(point, model, simulation),
            PointerEvent::Release(point) => self.release(point, model, simulation),
            PointerEvent::Scroll { at, delta } => {
                let factor = (1.0 + (delta * self.zoom_sensitivity)).clamp(0.85, 1.15);
                self.viewport.zoom_at(at, factor);
            }
            PointerEvent::Leave => {
                self.tooltip = None;
            }
            PointerEvent::Cancel => self.cancel(simulation),
        }
    }

    fn press(&mut self, point: Vec2, model: &GraphModel, simulation: &mut Simulation) {
        if self.gesture != Gesture::Idle {
            return;
        }

        let Some(index) = self.hit_test(point, simulation) else {
            self.gesture = Gesture::Pan {
                origin: point,
                last: point,
                moved: false,
            };
            return;
        };

        let Some(node_position) = simulation.snapshot().get(index) else {
            return;
        };
        let id = model.nodes[index].id.clone();
        let grab_offset = node_position - self.viewport.screen_to_world(point);

        simulation.pin(&id, node_position);
        if !simulation.is_running() {
            simulation.reheat(Reheat::Minor);
        }
        simulation.set_alpha_target(self.drag_alpha_target);
        log::debug!("drag started on {id}");

        self.gesture = Gesture::Drag {
            id,
            origin: point,
            grab_offset,
            moved: false,
        };
    }

    fn pointer_moved(&mut self, point: Vec2, model: &GraphModel, simulation: &mut Simulation) {
        if self.gesture == Gesture::Idle {
            self.update_tooltip(point, model, simulation);
            return;
        }

        let click_distance = self.click_distance;
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Pan {
                origin,
                last,
                moved,
            } => {
                let delta = point - *last;
                *last = point;
                *moved |= (*origin - point).length() > click_distance;
                self.viewport.pan_by(delta);
            }
            Gesture::Drag {
                id,
                origin,
                grab_offset,
                moved,
            } => {
                *moved |= (*origin - point).length() > click_distance;
                let target = self.viewport.screen_to_world(point) + *grab_offset;
                simulation.pin(id, target);
                if let Some(tooltip) = self.tooltip.as_mut() {
                    tooltip.anchor = point + self.tooltip_offset;
                }
            }
        }
    }

    fn release(&mut self, point: Vec2, model: &GraphModel, simulation: &mut Simulation) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        let click_distance = self.click_distance;
        match gesture {
            Gesture::Idle => {}
            Gesture::Pan { origin, moved, .. } => {
                if !moved && (origin - point).length() <= click_distance {
                    self.highlight.clear();
                }
            }
            Gesture::Drag {
                id, origin, moved, ..
            } => {
                simulation.unpin(&id);
                simulation.set_alpha_target(0.0);
                if !moved && (origin - point).length() <= click_distance {
                    self.highlight.select(model, &id);
                    log::debug!("highlighted {id}");
                }
            }
        }
    }

    /// Ends any gesture without treating it as a click.
    fn cancel(&mut self, simulation: &mut Simulation) {
        if let Gesture::Drag { id, .. } = std::mem::replace(&mut self.gesture, Gesture::Idle) {
            simulation.unpin(&id);
            simulation.set_alpha_target(0.0);
            log::debug!("drag on {id} cancelled");
        }
    }

    fn update_tooltip(&mut self, point: Vec2, model: &GraphModel, simulation: &Simulation) {
        self.tooltip = self.hit_test(point, simulation).map(|index| {
            let node = &model.nodes[index];
            Tooltip {
                node_id: node.id.clone(),
                text: node.label(),
                anchor: point + self.tooltip_offset,
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::graph::build;
    use crate::graph::fixtures::scenario_records;

    struct Harness {
        model: GraphModel,
        simulation: Simulation,
        controller: InteractionController,
    }

    impl Harness {
        fn new() -> Self {
            let config = AppConfig::default();
            let model = build(&scenario_records(), &[]);
            let mut simulation = Simulation::new(config.simulation);
            simulation.start(&model.nodes, &model.edges);
            Self {
                model,
                simulation,
                controller: InteractionController::new(&config),
            }
        }

        fn converge(&mut self) {
            while self.simulation.tick() {}
        }

        fn screen_of(&self, id: &str) -> Vec2 {
            let index = self.simulation.index_of(id).expect("known node");
            let world = self.simulation.snapshot().get(index).expect("visible");
            self.controller.viewport().world_to_screen(world)
        }

        fn send(&mut self, event: PointerEvent) {
            self.controller
                .handle(event, &self.model, &mut self.simulation);
        }
    }

    const BACKGROUND: Vec2 = Vec2::new(5.0, 5.0);

    #[test]
    fn click_on_node_highlights_neighbors_and_background_clears() {
        let mut harness = Harness::new();
        harness.converge();
        let l1 = harness.screen_of("L1");

        harness.send(PointerEvent::Press(l1));
        harness.send(PointerEvent::Release(l1));
        let highlight = harness.controller.highlight();
        assert_eq!(highlight.selected(), Some("L1"));
        assert_eq!(
            highlight.neighbors(),
            harness.model.neighbors("L1").expect("adjacency")
        );
        assert!(!harness.simulation.is_pinned("L1"));

        harness.send(PointerEvent::Press(BACKGROUND));
        harness.send(PointerEvent::Release(BACKGROUND));
        assert!(!harness.controller.highlight().is_active());
        assert!(harness.controller.highlight().neighbors().is_empty());
    }

    #[test]
    fn drag_pins_follows_pointer_and_reheats() {
        let mut harness = Harness::new();
        harness.converge();
        assert!(!harness.simulation.is_running());
        let start = harness.screen_of("P2");

        harness.send(PointerEvent::Press(start));
        assert_eq!(harness.controller.dragged_node(), Some("P2"));
        assert!(harness.simulation.is_pinned("P2"));
        assert!(harness.simulation.is_running());

        let target = start + vec2(40.0, 25.0);
        harness.send(PointerEvent::Move(target));
        harness.simulation.tick();
        assert!((harness.screen_of("P2") - target).length() < 1e-3);
        assert_eq!(harness.controller.viewport().translate, Vec2::ZERO);

        harness.send(PointerEvent::Release(target));
        assert!(!harness.simulation.is_pinned("P2"));
        assert!(harness.controller.dragged_node().is_none());
        assert!(!harness.controller.highlight().is_active(), "drag is not a click");

        let mut ticks = 0;
        while harness.simulation.tick() {
            ticks += 1;
            assert!(ticks <= 400);
        }
    }

    #[test]
    fn drag_cancelled_outside_window_unpins_and_settles() {
        let mut harness = Harness::new();
        harness.converge();
        let start = harness.screen_of("P2");

        harness.send(PointerEvent::Press(start));
        harness.send(PointerEvent::Move(start + vec2(30.0, 0.0)));
        harness.send(PointerEvent::Leave);
        harness.send(PointerEvent::Cancel);

        assert!(harness.controller.dragged_node().is_none());
        assert!(!harness.simulation.is_pinned("P2"));
        assert!(!harness.controller.highlight().is_active());

        let mut ticks = 0;
        while harness.simulation.tick() {
            ticks += 1;
            assert!(ticks <= 400);
        }

        let l1 = harness.screen_of("L1");
        harness.send(PointerEvent::Press(l1));
        assert_eq!(harness.controller.dragged_node(), Some("L1"));
    }

    #[test]
    fn out_of_order_events_are_ignored() {
        let mut harness = Harness::new();
        let before = harness.simulation.snapshot().nodes().to_vec();

        harness.send(PointerEvent::Release(BACKGROUND));
        harness.send(PointerEvent::Move(BACKGROUND));
        harness.send(PointerEvent::Leave);

        assert!(harness.controller.dragged_node().is_none());
        assert!(!harness.controller.highlight().is_active());
        assert_eq!(harness.controller.viewport().translate, Vec2::ZERO);
        assert_eq!(harness.simulation.snapshot().nodes().len(), before.len());
        assert!(
            harness
                .model
                .nodes
                .iter()
                .all(|node| !harness.simulation.is_pinned(&node.id))
        );
    }

    #[test]
    fn background_drag_pans_without_moving_nodes() {
        let mut harness = Harness::new();
        let l1_world = harness
            .simulation
            .snapshot()
            .get(harness.simulation.index_of("L1").expect("L1"))
            .expect("visible");

        harness.send(PointerEvent::Press(BACKGROUND));
        assert!(harness.controller.is_panning());
        harness.send(PointerEvent::Move(BACKGROUND + vec2(30.0, 0.0)));
        harness.send(PointerEvent::Move(BACKGROUND + vec2(30.0, 20.0)));
        harness.send(PointerEvent::Release(BACKGROUND + vec2(30.0, 20.0)));

        assert_eq!(harness.controller.viewport().translate, vec2(30.0, 20.0));
        let l1_after = harness
            .simulation
            .snapshot()
            .get(harness.simulation.index_of("L1").expect("L1"))
            .expect("visible");
        assert_eq!(l1_world, l1_after);
    }

    #[test]
    fn panning_keeps_highlight() {
        let mut harness = Harness::new();
        harness.converge();
        let p1 = harness.screen_of("P1");
        harness.send(PointerEvent::Press(p1));
        harness.send(PointerEvent::Release(p1));

        harness.send(PointerEvent::Press(BACKGROUND));
        harness.send(PointerEvent::Move(BACKGROUND + vec2(50.0, 0.0)));
        harness.send(PointerEvent::Release(BACKGROUND + vec2(50.0, 0.0)));
        assert_eq!(harness.controller.highlight().selected(), Some("P1"));
    }

    #[test]
    fn scroll_zoom_is_clamped() {
        let mut harness = Harness::new();
        for _ in 0..100 {
            harness.send(PointerEvent::Scroll {
                at: vec2(500.0, 300.0),
                delta: 500.0,
            });
        }
        assert_eq!(harness.controller.viewport().scale, 8.0);

        for _ in 0..200 {
            harness.send(PointerEvent::Scroll {
                at: vec2(500.0, 300.0),
                delta: -500.0,
            });
        }
        assert_eq!(harness.controller.viewport().scale, 0.1);
    }

    #[test]
    fn hover_shows_and_hides_tooltip() {
        let mut harness = Harness::new();
        harness.converge();
        let p1 = harness.screen_of("P1");

        harness.send(PointerEvent::Move(p1));
        let tooltip = harness.controller.tooltip().expect("tooltip shown");
        assert_eq!(tooltip.node_id, "P1");
        assert_eq!(tooltip.text, "P1-last P1-first");
        assert_eq!(tooltip.anchor, p1 + vec2(10.0, -28.0));

        harness.send(PointerEvent::Move(BACKGROUND));
        assert!(harness.controller.tooltip().is_none());

        harness.send(PointerEvent::Move(p1));
        harness.send(PointerEvent::Leave);
        assert!(harness.controller.tooltip().is_none());
    }

    #[test]
    fn second_press_during_drag_is_ignored() {
        let mut harness = Harness::new();
        harness.converge();
        let p1 = harness.screen_of("P1");
        harness.send(PointerEvent::Press(p1));
        harness.send(PointerEvent::Press(BACKGROUND));
        assert_eq!(harness.controller.dragged_node(), Some("P1"));
        assert!(!harness.controller.is_panning());
    }
}
