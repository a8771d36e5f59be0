use std::collections::{BTreeSet, HashMap, HashSet};

use crate::relations::{CategoryLabel, LocationRef, PersonRef, RelationRecord};

use super::filter::Category;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Person {
        first_name: Option<String>,
        last_name: Option<String>,
        patronymic: Option<String>,
    },
    Location {
        name: Option<String>,
        categories: BTreeSet<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub weight: u32,
    pub kind: NodeKind,
}

impl Node {
    fn person(person: &PersonRef) -> Self {
        Self {
            id: person.id.clone(),
            weight: 1,
            kind: NodeKind::Person {
                first_name: person.first_name.clone(),
                last_name: person.last_name.clone(),
                patronymic: person.patronymic.clone(),
            },
        }
    }

    fn location(location: &LocationRef) -> Self {
        Self {
            id: location.id.clone(),
            weight: 1,
            kind: NodeKind::Location {
                name: location.name.clone(),
                categories: location.category_ids().map(str::to_owned).collect(),
            },
        }
    }

    pub fn is_person(&self) -> bool {
        matches!(self.kind, NodeKind::Person { .. })
    }

    /// Tooltip text: the location name, or `last first patronymic` with missing parts skipped.
    pub fn label(&self) -> String {
        match &self.kind {
            NodeKind::Location { name, .. } => name.clone().unwrap_or_default(),
            NodeKind::Person {
                first_name,
                last_name,
                patronymic,
            } => [last_name, first_name, patronymic]
                .into_iter()
                .filter_map(|part| part.as_deref())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Undirected person/location pair, stored as node indices into [`GraphModel::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
}

#[derive(Clone, Debug, Default)]
pub struct GraphModel {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub adjacency: HashMap<String, HashSet<String>>,
    pub categories: Vec<Category>,
    index_by_id: HashMap<String, usize>,
}

impl GraphModel {
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn neighbors(&self, id: &str) -> Option<&HashSet<String>> {
        self.adjacency.get(id)
    }

    pub fn edge_ids(&self, edge: Edge) -> (&str, &str) {
        (
            self.nodes[edge.source].id.as_str(),
            self.nodes[edge.target].id.as_str(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn upsert_person(&mut self, person: &PersonRef) -> usize {
        if let Some(index) = self.index_of(&person.id) {
            self.nodes[index].weight += 1;
            return index;
        }

        self.push_node(Node::person(person))
    }

    fn upsert_location(&mut self, location: &LocationRef) -> usize {
        let Some(index) = self.index_of(&location.id) else {
            return self.push_node(Node::location(location));
        };

        let node = &mut self.nodes[index];
        node.weight += 1;
        if let NodeKind::Location { categories, .. } = &mut node.kind {
            categories.extend(location.category_ids().map(str::to_owned));
        }
        index
    }

    fn push_node(&mut self, node: Node) -> usize {
        let index = self.nodes.len();
        self.index_by_id.insert(node.id.clone(), index);
        self.adjacency.entry(node.id.clone()).or_default();
        self.nodes.push(node);
        index
    }

    fn kind_conflict(&self, id: &str, expect_person: bool) -> bool {
        self.node(id)
            .is_some_and(|node| node.is_person() != expect_person)
    }
}

/// Builds the relation graph from raw records.
///
/// This is a cleaning pass, not a validator: records missing either side, or whose ids collide
/// with a node of the other kind, are dropped and never reported as errors. Repeated
/// person/location pairs collapse into one edge while still counting toward both weights.
pub fn build(records: &[RelationRecord], labels: &[CategoryLabel]) -> GraphModel {
    let mut model = GraphModel::default();
    let mut seen_edges = HashSet::new();
    let mut skipped = 0usize;

    for record in records {
        let (Some(person), Some(location)) = (&record.person, &record.location_instance) else {
            log::debug!("skipping relation {:?} with a missing side", record.id);
            skipped += 1;
            continue;
        };

        if person.id == location.id
            || model.kind_conflict(&person.id, true)
            || model.kind_conflict(&location.id, false)
        {
            log::warn!(
                "dropping relation {:?}: id collision between person {} and location {}",
                record.id,
                person.id,
                location.id
            );
            skipped += 1;
            continue;
        }

        let source = model.upsert_person(person);
        let target = model.upsert_location(location);

        if seen_edges.insert((source, target)) {
            model.edges.push(Edge { source, target });
        }

        model
            .adjacency
            .entry(person.id.clone())
            .or_default()
            .insert(location.id.clone());
        model
            .adjacency
            .entry(location.id.clone())
            .or_default()
            .insert(person.id.clone());
    }

    model.categories = collect_categories(&model.nodes, labels);

    log::info!(
        "built relation graph: {} nodes, {} edges, {} categories ({skipped} records skipped)",
        model.nodes.len(),
        model.edges.len(),
        model.categories.len()
    );

    model
}

fn collect_categories(nodes: &[Node], labels: &[CategoryLabel]) -> Vec<Category> {
    let mut categories = Vec::new();
    let mut known = HashSet::new();

    for label in labels {
        if known.insert(label.id.clone()) {
            categories.push(Category::new(label.id.clone(), label.name.clone()));
        }
    }

    for node in nodes {
        let NodeKind::Location {
            categories: node_categories,
            ..
        } = &node.kind
        else {
            continue;
        };

        for id in node_categories {
            if known.insert(id.clone()) {
                categories.push(Category::new(id.clone(), id.clone()));
            }
        }
    }

    categories
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;
    use crate::relations::LocationTypeRef;

    pub(crate) fn person(id: &str) -> PersonRef {
        PersonRef {
            id: id.to_owned(),
            first_name: Some(format!("{id}-first")),
            last_name: Some(format!("{id}-last")),
            patronymic: None,
        }
    }

    pub(crate) fn location(id: &str, categories: &[&str]) -> LocationRef {
        LocationRef {
            id: id.to_owned(),
            name: Some(format!("{id}-name")),
            location_types: Some(
                categories
                    .iter()
                    .map(|id| {
                        Some(LocationTypeRef {
                            id: Some((*id).to_owned()),
                        })
                    })
                    .collect(),
            ),
        }
    }

    pub(crate) fn relation(person_id: &str, location_ref: LocationRef) -> RelationRecord {
        RelationRecord {
            id: format!("{person_id}->{}", location_ref.id),
            person: Some(person(person_id)),
            location_instance: Some(location_ref),
        }
    }

    pub(crate) fn scenario_records() -> Vec<RelationRecord> {
        vec![
            relation("P1", location("L1", &[])),
            relation("P1", location("L2", &["T1"])),
            relation("P2", location("L1", &[])),
        ]
    }

    fn edge_set(model: &GraphModel) -> HashSet<(String, String)> {
        model
            .edges
            .iter()
            .map(|edge| {
                let (source, target) = model.edge_ids(*edge);
                (source.to_owned(), target.to_owned())
            })
            .collect()
    }

    fn weights(model: &GraphModel) -> BTreeMap<String, u32> {
        model
            .nodes
            .iter()
            .map(|node| (node.id.clone(), node.weight))
            .collect()
    }

    #[test]
    fn builds_scenario_graph() {
        let model = build(&scenario_records(), &[]);

        assert_eq!(
            weights(&model),
            BTreeMap::from([
                ("L1".to_owned(), 2),
                ("L2".to_owned(), 1),
                ("P1".to_owned(), 2),
                ("P2".to_owned(), 1),
            ])
        );
        assert_eq!(
            edge_set(&model),
            HashSet::from([
                ("P1".to_owned(), "L1".to_owned()),
                ("P1".to_owned(), "L2".to_owned()),
                ("P2".to_owned(), "L1".to_owned()),
            ])
        );
        assert_eq!(
            model.neighbors("L1"),
            Some(&HashSet::from(["P1".to_owned(), "P2".to_owned()]))
        );
    }

    #[test]
    fn skips_records_missing_a_side() {
        let mut records = scenario_records();
        records.push(RelationRecord {
            id: "orphan-person".to_owned(),
            person: Some(person("P9")),
            location_instance: None,
        });
        records.push(RelationRecord {
            id: "orphan-location".to_owned(),
            person: None,
            location_instance: Some(location("L9", &[])),
        });

        let model = build(&records, &[]);
        assert_eq!(model.nodes.len(), 4);
        assert!(model.node("P9").is_none());
        assert!(model.node("L9").is_none());
    }

    #[test]
    fn repeated_pairs_collapse_but_count_weight() {
        let records = vec![
            relation("P1", location("L1", &["T1"])),
            relation("P1", location("L1", &["T2"])),
        ];

        let model = build(&records, &[]);
        assert_eq!(model.edges.len(), 1);
        assert_eq!(model.node("P1").map(|node| node.weight), Some(2));

        let l1 = model.node("L1").expect("L1 exists");
        assert_eq!(l1.weight, 2);
        assert_eq!(
            l1.kind,
            NodeKind::Location {
                name: Some("L1-name".to_owned()),
                categories: BTreeSet::from(["T1".to_owned(), "T2".to_owned()]),
            }
        );
    }

    #[test]
    fn colliding_ids_across_kinds_are_dropped() {
        let records = vec![
            relation("X", location("L1", &[])),
            relation("P1", location("X", &[])),
        ];

        let model = build(&records, &[]);
        assert_eq!(model.nodes.len(), 2);
        assert!(model.node("X").is_some_and(Node::is_person));
        assert!(model.node("P1").is_none());
    }

    #[test]
    fn categories_merge_labels_and_seen_ids() {
        let labels = vec![
            CategoryLabel {
                id: "T0".to_owned(),
                name: "Unused".to_owned(),
            },
            CategoryLabel {
                id: "T1".to_owned(),
                name: "Villages".to_owned(),
            },
        ];
        let records = vec![
            relation("P1", location("L1", &["T1", "T5"])),
            relation("P2", location("L2", &["T5"])),
        ];

        let model = build(&records, &labels);
        let summary = model
            .categories
            .iter()
            .map(|category| (category.id.as_str(), category.name.as_str(), category.enabled))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![
                ("T0", "Unused", true),
                ("T1", "Villages", true),
                ("T5", "T5", true),
            ]
        );
    }

    #[test]
    fn person_label_skips_missing_parts() {
        let node = Node::person(&PersonRef {
            id: "p".to_owned(),
            first_name: Some("Ivan".to_owned()),
            last_name: Some("Petrov".to_owned()),
            patronymic: None,
        });
        assert_eq!(node.label(), "Petrov Ivan");

        let unnamed = Node::location(&LocationRef {
            id: "l".to_owned(),
            name: None,
            location_types: None,
        });
        assert_eq!(unnamed.label(), "");
    }

    pub(crate) fn arbitrary_records() -> impl Strategy<Value = Vec<RelationRecord>> {
        let record = (
            proptest::option::weighted(0.9, 0..6usize),
            proptest::option::weighted(0.9, 0..6usize),
            proptest::collection::vec(0..3usize, 0..3),
        )
            .prop_map(|(person_id, location_id, categories)| {
                let categories = categories
                    .iter()
                    .map(|id| format!("T{id}"))
                    .collect::<Vec<_>>();
                let category_refs = categories.iter().map(String::as_str).collect::<Vec<_>>();
                RelationRecord {
                    id: String::new(),
                    person: person_id.map(|id| person(&format!("P{id}"))),
                    location_instance: location_id
                        .map(|id| location(&format!("L{id}"), &category_refs)),
                }
            });
        proptest::collection::vec(record, 0..24)
    }

    proptest! {
        #[test]
        fn build_is_idempotent(records in arbitrary_records()) {
            let first = build(&records, &[]);
            let second = build(&records, &[]);

            prop_assert_eq!(weights(&first), weights(&second));
            prop_assert_eq!(edge_set(&first), edge_set(&second));
            prop_assert_eq!(first.adjacency, second.adjacency);
        }

        #[test]
        fn weight_counts_valid_records(records in arbitrary_records()) {
            let model = build(&records, &[]);

            for node in &model.nodes {
                let touching = records
                    .iter()
                    .filter(|record| record.person.is_some() && record.location_instance.is_some())
                    .filter(|record| {
                        record.person.as_ref().is_some_and(|person| person.id == node.id)
                            || record
                                .location_instance
                                .as_ref()
                                .is_some_and(|location| location.id == node.id)
                    })
                    .count();
                prop_assert_eq!(node.weight as usize, touching);
            }
        }
    }
}
