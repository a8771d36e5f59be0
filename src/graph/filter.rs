use std::collections::{HashMap, HashSet};

use super::model::{Node, NodeKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub enabled: bool,
}

impl Category {
    pub fn new(id: String, name: String) -> Self {
        Self {
            id,
            name,
            enabled: true,
        }
    }
}

/// Toggleable location categories. Toggling is a constant-time state change; recomputing
/// visibility walks the node list once and never touches the graph model.
#[derive(Clone, Debug, Default)]
pub struct CategoryFilter {
    categories: Vec<Category>,
    index_by_id: HashMap<String, usize>,
}

impl CategoryFilter {
    pub fn new(categories: Vec<Category>) -> Self {
        let index_by_id = categories
            .iter()
            .enumerate()
            .map(|(index, category)| (category.id.clone(), index))
            .collect();
        Self {
            categories,
            index_by_id,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_enabled(&self, id: &str) -> Option<bool> {
        self.index_by_id
            .get(id)
            .map(|&index| self.categories[index].enabled)
    }

    /// Returns the new state, or `None` when the id is unknown.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let index = *self.index_by_id.get(id)?;
        let category = &mut self.categories[index];
        category.enabled = !category.enabled;
        log::debug!(
            "category {} ({}) {}",
            category.id,
            category.name,
            if category.enabled { "enabled" } else { "disabled" }
        );
        Some(category.enabled)
    }

    /// Returns whether the state changed.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.is_enabled(id) {
            Some(current) if current != enabled => self.toggle(id).is_some(),
            _ => false,
        }
    }

    pub fn node_visible(&self, node: &Node) -> bool {
        match &node.kind {
            NodeKind::Person { .. } => true,
            NodeKind::Location { categories, .. } => {
                // Uncategorized locations are never hidden; ids missing from the toggle list
                // count as enabled since they default to on.
                categories.is_empty()
                    || categories
                        .iter()
                        .any(|id| self.is_enabled(id).unwrap_or(true))
            }
        }
    }

    pub fn compute_visible(&self, nodes: &[Node]) -> HashSet<String> {
        nodes
            .iter()
            .filter(|node| self.node_visible(node))
            .map(|node| node.id.clone())
            .collect()
    }
}
