use std::fs;

use anyhow::{Context, Result};

use super::records::RelationsDataset;

pub fn load_dataset(data_path: &str) -> Result<RelationsDataset> {
    let raw = fs::read_to_string(data_path)
        .with_context(|| format!("failed to read relation dump {data_path}"))?;

    let dataset = RelationsDataset::from_json(&raw)
        .with_context(|| format!("failed to parse relation dump {data_path}"))?;

    log::info!(
        "loaded {} relation records and {} category labels from {data_path}",
        dataset.relations.len(),
        dataset.categories.len()
    );

    Ok(dataset)
}
