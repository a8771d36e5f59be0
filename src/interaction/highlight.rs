use std::collections::HashSet;

use crate::graph::GraphModel;

/// Click selection: the selected node, its direct neighbours and its incident edges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightState {
    selected: Option<String>,
    neighbors: HashSet<String>,
    edges: HashSet<usize>,
}

impl HighlightState {
    pub fn select(&mut self, model: &GraphModel, id: &str) {
        let Some(index) = model.index_of(id) else {
            self.clear();
            return;
        };

        self.selected = Some(id.to_owned());
        self.neighbors = model.neighbors(id).cloned().unwrap_or_default();
        self.edges = model
            .edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.source == index || edge.target == index)
            .map(|(edge_index, _)| edge_index)
            .collect();
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.neighbors.clear();
        self.edges.clear();
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn neighbors(&self) -> &HashSet<String> {
        &self.neighbors
    }

    pub fn is_active(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_node_highlighted(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id) || self.neighbors.contains(id)
    }

    pub fn is_edge_highlighted(&self, edge_index: usize) -> bool {
        self.edges.contains(&edge_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use crate::graph::fixtures::scenario_records;

    #[test]
    fn selecting_marks_neighbors_and_incident_edges() {
        let model = build(&scenario_records(), &[]);
        let mut highlight = HighlightState::default();

        highlight.select(&model, "L1");
        assert_eq!(highlight.selected(), Some("L1"));
        assert_eq!(
            highlight.neighbors(),
            &HashSet::from(["P1".to_owned(), "P2".to_owned()])
        );
        assert!(highlight.is_node_highlighted("P2"));
        assert!(!highlight.is_node_highlighted("L2"));

        let incident = (0..model.edges.len())
            .filter(|&index| highlight.is_edge_highlighted(index))
            .map(|index| model.edge_ids(model.edges[index]))
            .collect::<HashSet<_>>();
        assert_eq!(incident, HashSet::from([("P1", "L1"), ("P2", "L1")]));

        highlight.clear();
        assert_eq!(highlight, HighlightState::default());
    }

    #[test]
    fn selecting_unknown_node_clears() {
        let model = build(&scenario_records(), &[]);
        let mut highlight = HighlightState::default();
        highlight.select(&model, "P1");
        highlight.select(&model, "ghost");
        assert!(!highlight.is_active());
    }
}
