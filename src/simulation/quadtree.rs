use eframe::egui::{Vec2, vec2};

const QUADTREE_LEAF_CAPACITY: usize = 8;
const QUADTREE_MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
    pub(super) center: Vec2,
    pub(super) half_extent: f32,
}

impl QuadBounds {
    fn from_points(points: &[Vec2], indices: &[usize]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);

        for &index in indices {
            let point = points[index];
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
        }

        if !min.x.is_finite() || !min.y.is_finite() || !max.x.is_finite() || !max.y.is_finite() {
            return None;
        }

        let center = (min + max) * 0.5;
        let span_x = (max.x - min.x).max(1.0);
        let span_y = (max.y - min.y).max(1.0);
        let half_extent = (span_x.max(span_y) * 0.5) + 1.0;

        Some(Self {
            center,
            half_extent,
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_extent
            && (point.y - self.center.y).abs() <= self.half_extent
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half_extent * 0.5;
        let offset = match quadrant {
            0 => vec2(-quarter, -quarter),
            1 => vec2(quarter, -quarter),
            2 => vec2(-quarter, quarter),
            _ => vec2(quarter, quarter),
        };

        Self {
            center: self.center + offset,
            half_extent: quarter,
        }
    }

    fn quadrant_for(self, point: Vec2) -> usize {
        let right = point.x >= self.center.x;
        let lower = point.y >= self.center.y;
        match (right, lower) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    pub(super) fn side_length(self) -> f32 {
        self.half_extent * 2.0
    }

    /// Squared distance from `point` to the nearest point of this cell (zero when inside).
    pub(super) fn distance_sq_to_point(self, point: Vec2) -> f32 {
        let dx = ((point.x - self.center.x).abs() - self.half_extent).max(0.0);
        let dy = ((point.y - self.center.y).abs() - self.half_extent).max(0.0);
        (dx * dx) + (dy * dy)
    }
}

/// Region quadtree over a subset of node positions. Each cell aggregates the point count
/// (uniform charge), centre of mass, and the largest collision radius below it.
pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    pub(super) center_of_mass: Vec2,
    pub(super) mass: f32,
    pub(super) max_radius: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2], radii: &[f32], indices: Vec<usize>) -> Option<Self> {
        if indices.is_empty() {
            return None;
        }
        let bounds = QuadBounds::from_points(positions, &indices)?;
        Some(Self::build_node(bounds, indices, positions, radii, 0))
    }

    fn build_node(
        bounds: QuadBounds,
        indices: Vec<usize>,
        positions: &[Vec2],
        radii: &[f32],
        depth: usize,
    ) -> Self {
        let mut center_of_mass = Vec2::ZERO;
        let mut max_radius = 0.0_f32;
        for &index in &indices {
            center_of_mass += positions[index];
            max_radius = max_radius.max(radii[index]);
        }

        let mass = indices.len() as f32;
        if mass > 0.0 {
            center_of_mass /= mass;
        }

        let mut node = Self {
            bounds,
            center_of_mass,
            mass,
            max_radius,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= QUADTREE_MAX_DEPTH || node.indices.len() <= QUADTREE_LEAF_CAPACITY {
            return node;
        }

        let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
        for &index in &node.indices {
            let quadrant = bounds.quadrant_for(positions[index]);
            buckets[quadrant].push(index);
        }

        let non_empty = buckets.iter().filter(|bucket| !bucket.is_empty()).count();
        if non_empty <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }

            node.children[quadrant] = Some(Box::new(Self::build_node(
                bounds.child(quadrant),
                bucket,
                positions,
                radii,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &QuadNode> {
        self.children.iter().filter_map(|child| child.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(count: usize) -> Vec<Vec2> {
        (0..count)
            .map(|index| vec2((index % 10) as f32 * 15.0, (index / 10) as f32 * 15.0))
            .collect()
    }

    fn count_points(node: &QuadNode) -> usize {
        node.indices.len() + node.children().map(count_points).sum::<usize>()
    }

    #[test]
    fn empty_subset_has_no_tree() {
        assert!(QuadNode::build(&grid(4), &[1.0; 4], Vec::new()).is_none());
    }

    #[test]
    fn tree_aggregates_every_point_once() {
        let positions = grid(100);
        let radii = (0..100).map(|index| index as f32).collect::<Vec<_>>();
        let tree = QuadNode::build(&positions, &radii, (0..100).collect()).expect("tree");

        assert!(!tree.is_leaf());
        assert_eq!(tree.mass, 100.0);
        assert_eq!(tree.max_radius, 99.0);
        assert_eq!(count_points(&tree), 100);
        for position in &positions {
            assert!(tree.bounds.contains(*position));
        }
    }

    #[test]
    fn subset_only_covers_selected_points() {
        let positions = vec![vec2(0.0, 0.0), vec2(1000.0, 1000.0), vec2(10.0, 0.0)];
        let tree = QuadNode::build(&positions, &[1.0; 3], vec![0, 2]).expect("tree");

        assert_eq!(tree.mass, 2.0);
        assert!(!tree.bounds.contains(positions[1]));
        assert!((tree.center_of_mass - vec2(5.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn coincident_points_stay_in_one_leaf() {
        let positions = vec![vec2(3.0, 3.0); 40];
        let tree = QuadNode::build(&positions, &[1.0; 40], (0..40).collect()).expect("tree");
        assert!(tree.is_leaf());
        assert_eq!(tree.indices.len(), 40);
    }

    #[test]
    fn point_distance_is_zero_inside() {
        let bounds = QuadBounds {
            center: Vec2::ZERO,
            half_extent: 5.0,
        };
        assert_eq!(bounds.distance_sq_to_point(vec2(2.0, -3.0)), 0.0);
        assert_eq!(bounds.distance_sq_to_point(vec2(8.0, 0.0)), 9.0);
    }
}
