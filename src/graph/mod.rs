mod filter;
mod model;

pub use filter::CategoryFilter;
pub use model::{Edge, GraphModel, Node, NodeKind, build};

#[cfg(test)]
pub(crate) use model::tests as fixtures;
