mod forces;
mod quadtree;

use std::collections::{HashMap, HashSet};
use std::f32::consts::PI;
use std::ops::ControlFlow;
use std::rc::Rc;

use eframe::egui::{Vec2, vec2};

use crate::config::SimulationConfig;
use crate::graph::{Edge, Node};
use forces::{
    CollisionParams, Jiggle, Link, RepulsionParams, apply_centering, apply_collision, apply_links,
    apply_repulsion,
};

const INITIAL_RADIUS: f32 = 10.0;

/// How much energy to put back into a running or converged layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reheat {
    /// Local change (drag, filter toggle): raise alpha to the reheat level.
    Minor,
    /// Restart from the cold-start alpha.
    Full,
}

#[derive(Clone, Debug)]
pub struct NodePosition {
    pub index: usize,
    pub id: Rc<str>,
    pub position: Vec2,
}

/// Settled positions of every visible node after the latest completed tick.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub tick: u64,
    pub alpha: f32,
    nodes: Vec<NodePosition>,
    slots: Vec<Option<usize>>,
}

impl Snapshot {
    pub fn nodes(&self) -> &[NodePosition] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        let slot = (*self.slots.get(index)?)?;
        Some(self.nodes[slot].position)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

type TickCallback = Box<dyn FnMut(&Snapshot) -> ControlFlow<()>>;

/// Frame-driven force layout.
///
/// The engine owns the node arena (positions, velocities, pins, visibility). Outside code
/// reads settled [`Snapshot`]s and writes only through [`Simulation::pin`],
/// [`Simulation::unpin`] and [`Simulation::set_visible`]. Arena indices match the order of
/// the node slice passed to [`Simulation::start`].
pub struct Simulation {
    config: SimulationConfig,
    ids: Vec<Rc<str>>,
    index_by_id: HashMap<Rc<str>, usize>,
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    radii: Vec<f32>,
    pins: Vec<Option<Vec2>>,
    visible: Vec<bool>,
    edges: Vec<(usize, usize)>,
    links: Vec<Link>,
    active: Vec<usize>,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    tick_count: u64,
    snapshot: Snapshot,
    on_tick: Option<TickCallback>,
    jiggle: Jiggle,
    predicted: Vec<Vec2>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            ids: Vec::new(),
            index_by_id: HashMap::new(),
            positions: Vec::new(),
            velocities: Vec::new(),
            radii: Vec::new(),
            pins: Vec::new(),
            visible: Vec::new(),
            edges: Vec::new(),
            links: Vec::new(),
            active: Vec::new(),
            alpha: 0.0,
            alpha_target: 0.0,
            running: false,
            tick_count: 0,
            snapshot: Snapshot::default(),
            on_tick: None,
            jiggle: Jiggle::default(),
            predicted: Vec::new(),
        }
    }

    /// Cold start: discards all prior positions and pins, reseeds on a phyllotaxis spiral,
    /// and makes every node visible.
    pub fn start(&mut self, nodes: &[Node], edges: &[Edge]) {
        let center = self.center();
        let golden_angle = PI * (3.0 - 5.0_f32.sqrt());

        self.ids.clear();
        self.index_by_id.clear();
        self.positions.clear();
        self.radii.clear();
        for (index, node) in nodes.iter().enumerate() {
            let id: Rc<str> = Rc::from(node.id.as_str());
            let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
            let angle = index as f32 * golden_angle;

            self.index_by_id.insert(Rc::clone(&id), index);
            self.ids.push(id);
            self.positions
                .push(center + vec2(radius * angle.cos(), radius * angle.sin()));
            self.radii.push(self.config.node_radius(node.weight));
        }

        let count = nodes.len();
        self.velocities = vec![Vec2::ZERO; count];
        self.pins = vec![None; count];
        self.visible = vec![true; count];
        self.edges = edges
            .iter()
            .filter(|edge| edge.source < count && edge.target < count && edge.source != edge.target)
            .map(|edge| (edge.source, edge.target))
            .collect();

        self.rebuild_active();
        self.alpha = self.config.initial_alpha;
        self.alpha_target = 0.0;
        self.tick_count = 0;
        self.running = !self.active.is_empty();
        self.refresh_snapshot();

        log::debug!(
            "simulation started with {} nodes and {} edges",
            count,
            self.edges.len()
        );
    }

    pub fn reheat(&mut self, reheat: Reheat) {
        self.alpha = match reheat {
            Reheat::Minor => self.alpha.max(self.config.reheat_alpha),
            Reheat::Full => self.config.initial_alpha,
        };
        self.running = !self.active.is_empty();
        log::debug!("simulation reheated ({reheat:?}) to alpha {:.3}", self.alpha);
    }

    /// Alpha decays toward this value instead of zero; a non-zero target keeps the layout live.
    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    /// Reconciles the visible set without a cold restart: hidden nodes keep their positions
    /// for when they come back. Returns whether anything changed.
    pub fn set_visible(&mut self, ids: &HashSet<String>) -> bool {
        let mut changed = false;
        for (index, id) in self.ids.iter().enumerate() {
            let visible = ids.contains(&**id);
            if self.visible[index] != visible {
                self.visible[index] = visible;
                self.velocities[index] = Vec2::ZERO;
                changed = true;
            }
        }

        if !changed {
            return false;
        }

        self.rebuild_active();
        self.refresh_snapshot();
        log::debug!(
            "visible set changed: {} of {} nodes, {} active links",
            self.active.len(),
            self.ids.len(),
            self.links.len()
        );
        if self.active.is_empty() {
            self.running = false;
        } else {
            self.reheat(Reheat::Minor);
        }
        true
    }

    pub fn on_tick(&mut self, callback: impl FnMut(&Snapshot) -> ControlFlow<()> + 'static) {
        self.on_tick = Some(Box::new(callback));
    }

    pub fn pin(&mut self, id: &str, position: Vec2) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.pins[index] = Some(position);
        true
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.pins[index].take().is_some()
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("simulation stopped at alpha {:.4}", self.alpha);
        }
        self.running = false;
    }

    /// Advances one step. Returns whether the engine wants another frame.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        if self.active.is_empty() {
            self.running = false;
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        self.apply_forces();
        self.integrate();
        self.tick_count += 1;
        self.refresh_snapshot();

        let flow = match self.on_tick.as_mut() {
            Some(callback) => callback(&self.snapshot),
            None => ControlFlow::Continue(()),
        };
        if flow.is_break() {
            self.stop();
            return false;
        }

        if self.alpha < self.config.alpha_min {
            self.running = false;
            log::debug!("simulation converged after {} ticks", self.tick_count);
        }
        self.running
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn radius(&self, index: usize) -> Option<f32> {
        self.radii.get(index).copied()
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.index_of(id)
            .is_some_and(|index| self.pins[index].is_some())
    }

    pub fn visible_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_link_count(&self) -> usize {
        self.links.len()
    }

    fn center(&self) -> Vec2 {
        vec2(self.config.center[0], self.config.center[1])
    }

    fn rebuild_active(&mut self) {
        self.active.clear();
        self.active
            .extend((0..self.ids.len()).filter(|&index| self.visible[index]));

        let mut degree = vec![0u32; self.ids.len()];
        let active_edges = self
            .edges
            .iter()
            .copied()
            .filter(|&(source, target)| self.visible[source] && self.visible[target])
            .collect::<Vec<_>>();
        for &(source, target) in &active_edges {
            degree[source] += 1;
            degree[target] += 1;
        }

        self.links.clear();
        self.links
            .extend(active_edges.into_iter().map(|(source, target)| {
                let source_degree = degree[source] as f32;
                let target_degree = degree[target] as f32;
                Link {
                    source,
                    target,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            }));
    }

    fn apply_forces(&mut self) {
        let config = self.config;
        let alpha = self.alpha;

        apply_links(
            &self.links,
            &self.positions,
            &mut self.velocities,
            config.link_distance,
            alpha,
            &mut self.jiggle,
        );

        apply_repulsion(
            &self.active,
            &self.positions,
            &self.radii,
            &mut self.velocities,
            RepulsionParams {
                strength: config.repulsion_strength,
                alpha,
                theta: config.barnes_hut_theta,
                distance_min_sq: config.repulsion_distance_min * config.repulsion_distance_min,
            },
            &mut self.jiggle,
        );

        for _ in 0..config.collision_iterations {
            apply_collision(
                &self.active,
                &self.positions,
                &self.radii,
                &mut self.velocities,
                &mut self.predicted,
                CollisionParams {
                    strength: config.collision_strength,
                },
                &mut self.jiggle,
            );
        }

        let center = self.center();
        apply_centering(
            &self.active,
            &mut self.positions,
            center,
            config.center_strength,
        );
    }

    fn integrate(&mut self) {
        let retain = 1.0 - self.config.velocity_decay;
        for &index in &self.active {
            match self.pins[index] {
                Some(pin) => {
                    self.positions[index] = pin;
                    self.velocities[index] = Vec2::ZERO;
                }
                None => {
                    self.velocities[index] *= retain;
                    self.positions[index] += self.velocities[index];
                }
            }
        }
    }

    fn refresh_snapshot(&mut self) {
        let snapshot = &mut self.snapshot;
        snapshot.tick = self.tick_count;
        snapshot.alpha = self.alpha;
        snapshot.nodes.clear();
        snapshot.slots.clear();
        snapshot.slots.resize(self.ids.len(), None);

        for &index in &self.active {
            snapshot.slots[index] = Some(snapshot.nodes.len());
            snapshot.nodes.push(NodePosition {
                index,
                id: Rc::clone(&self.ids[index]),
                position: self.positions[index],
            });
        }
    }
}
