use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct PersonRef {
    pub id: String,
    #[serde(default, rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub patronymic: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LocationTypeRef {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LocationRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "locationTypes")]
    pub location_types: Option<Vec<Option<LocationTypeRef>>>,
}

impl LocationRef {
    /// Category ids attached to this location, skipping null entries and null ids.
    pub fn category_ids(&self) -> impl Iterator<Item = &str> {
        self.location_types
            .iter()
            .flatten()
            .flatten()
            .filter_map(|location_type| location_type.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RelationRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub person: Option<PersonRef>,
    #[serde(default, rename = "locationInstance")]
    pub location_instance: Option<LocationRef>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CategoryLabel {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct RelationEdge {
    node: RelationRecord,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum RelationList {
    Connection { edges: Vec<RelationEdge> },
    Flat(Vec<RelationRecord>),
}

impl RelationList {
    fn into_records(self) -> Vec<RelationRecord> {
        match self {
            Self::Connection { edges } => edges.into_iter().map(|edge| edge.node).collect(),
            Self::Flat(records) => records,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct RawDataset {
    relations: RelationList,
    #[serde(default, rename = "locationTypes")]
    location_types: Vec<CategoryLabel>,
}

#[derive(Clone, Debug, Default)]
pub struct RelationsDataset {
    pub relations: Vec<RelationRecord>,
    pub categories: Vec<CategoryLabel>,
}

impl RelationsDataset {
    pub(super) fn from_json(raw: &str) -> serde_json::Result<Self> {
        let raw: RawDataset = serde_json::from_str(raw)?;
        Ok(Self {
            relations: raw.relations.into_records(),
            categories: raw.location_types,
        })
    }
}
