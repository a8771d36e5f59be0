use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

/// Active spring between two visible nodes, with d3-style degree weighting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct Link {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

#[derive(Clone, Copy)]
pub(super) struct RepulsionParams {
    pub(super) strength: f32,
    pub(super) alpha: f32,
    pub(super) theta: f32,
    pub(super) distance_min_sq: f32,
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
}

/// Deterministic nudge for coincident points, so runs are reproducible.
pub(super) struct Jiggle {
    state: u32,
}

impl Default for Jiggle {
    fn default() -> Self {
        Self { state: 1 }
    }
}

impl Jiggle {
    fn next_unit(&mut self) -> f32 {
        self.state = self
            .state
            .wrapping_mul(1_664_525)
            .wrapping_add(1_013_904_223);
        self.state as f32 / 4_294_967_296.0
    }

    fn offset(&mut self) -> f32 {
        (self.next_unit() - 0.5) * 1e-6
    }

    pub(super) fn nonzero(&mut self, delta: Vec2) -> Vec2 {
        let x = if delta.x == 0.0 { self.offset() } else { delta.x };
        let y = if delta.y == 0.0 { self.offset() } else { delta.y };
        vec2(x, y)
    }
}

pub(super) fn apply_links(
    links: &[Link],
    positions: &[Vec2],
    velocities: &mut [Vec2],
    distance: f32,
    alpha: f32,
    jiggle: &mut Jiggle,
) {
    for link in links {
        let (source, target) = (link.source, link.target);
        let mut delta =
            (positions[target] + velocities[target]) - (positions[source] + velocities[source]);
        if delta == Vec2::ZERO {
            delta = jiggle.nonzero(delta);
        }

        let length = delta.length();
        let scale = (length - distance) / length * alpha * link.strength;
        let shift = delta * scale;

        velocities[target] -= shift * link.bias;
        velocities[source] += shift * (1.0 - link.bias);
    }
}

fn repulsion_between(delta: Vec2, charge: f32, params: RepulsionParams) -> Vec2 {
    let mut distance_sq = delta.length_sq();
    if distance_sq < params.distance_min_sq {
        distance_sq = (params.distance_min_sq * distance_sq).sqrt();
    }
    delta * (params.strength * charge * params.alpha / distance_sq)
}

pub(super) fn accumulate_repulsion_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: RepulsionParams,
    jiggle: &mut Jiggle,
    force: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            let mut delta = point - positions[other_index];
            if delta == Vec2::ZERO {
                delta = jiggle.nonzero(delta);
            }
            *force += repulsion_between(delta, 1.0, params);
        }
        return;
    }

    let delta = point - node.center_of_mass;
    let distance_sq = delta.length_sq();
    let side = node.bounds.side_length();
    let can_approximate = !node.bounds.contains(point)
        && (side * side) < (params.theta * params.theta * distance_sq);

    if can_approximate {
        *force += repulsion_between(delta, node.mass, params);
        return;
    }

    for child in node.children() {
        accumulate_repulsion_for_node(child, index, positions, params, jiggle, force);
    }
}

/// Barnes-Hut many-body repulsion over the active subset.
pub(super) fn apply_repulsion(
    active: &[usize],
    positions: &[Vec2],
    radii: &[f32],
    velocities: &mut [Vec2],
    params: RepulsionParams,
    jiggle: &mut Jiggle,
) {
    let Some(tree) = QuadNode::build(positions, radii, active.to_vec()) else {
        return;
    };

    for &index in active {
        let mut force = Vec2::ZERO;
        accumulate_repulsion_for_node(&tree, index, positions, params, jiggle, &mut force);
        velocities[index] += force;
    }
}

fn resolve_collisions_for_node(
    node: &QuadNode,
    index: usize,
    predicted: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    jiggle: &mut Jiggle,
    velocities: &mut [Vec2],
) {
    let point = predicted[index];
    let radius = radii[index];
    let reach = radius + node.max_radius;
    if node.bounds.distance_sq_to_point(point) > reach * reach {
        return;
    }

    if !node.is_leaf() {
        for child in node.children() {
            resolve_collisions_for_node(
                child, index, predicted, radii, params, jiggle, velocities,
            );
        }
        return;
    }

    for &other in &node.indices {
        if other <= index {
            continue;
        }

        let mut delta = point - predicted[other];
        let combined = radius + radii[other];
        let distance_sq = delta.length_sq();
        if distance_sq >= combined * combined {
            continue;
        }

        if delta == Vec2::ZERO {
            delta = jiggle.nonzero(delta);
        }
        let distance = delta.length();
        let shift = delta * ((combined - distance) / distance * params.strength);
        let own_share = (radii[other] * radii[other])
            / ((radius * radius) + (radii[other] * radii[other])).max(f32::EPSILON);

        velocities[index] += shift * own_share;
        velocities[other] -= shift * (1.0 - own_share);
    }
}

/// One relaxation pass of circle collision on predicted positions (`p + v`).
pub(super) fn apply_collision(
    active: &[usize],
    positions: &[Vec2],
    radii: &[f32],
    velocities: &mut [Vec2],
    predicted: &mut Vec<Vec2>,
    params: CollisionParams,
    jiggle: &mut Jiggle,
) {
    predicted.clear();
    predicted.extend(
        positions
            .iter()
            .zip(velocities.iter())
            .map(|(position, velocity)| *position + *velocity),
    );

    let Some(tree) = QuadNode::build(predicted, radii, active.to_vec()) else {
        return;
    };

    for &index in active {
        resolve_collisions_for_node(&tree, index, predicted, radii, params, jiggle, velocities);
    }
}

/// Translates the active set so its centroid moves toward `center`.
pub(super) fn apply_centering(
    active: &[usize],
    positions: &mut [Vec2],
    center: Vec2,
    strength: f32,
) {
    if active.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for &index in active {
        centroid += positions[index];
    }
    centroid /= active.len() as f32;

    let shift = (centroid - center) * strength;
    if shift.length_sq() <= f32::EPSILON * f32::EPSILON {
        return;
    }
    for &index in active {
        positions[index] -= shift;
    }
}
