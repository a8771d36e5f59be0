mod load;
mod records;

pub use load::load_dataset;
pub use records::{CategoryLabel, LocationRef, PersonRef, RelationRecord, RelationsDataset};

#[cfg(test)]
pub use records::LocationTypeRef;
