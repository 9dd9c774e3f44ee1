use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thali_core::service::find_dishes_by_ingredients;
use thali_core::{MatchResult, MemoryCatalog, NewDish};

/// Run the ingredient matcher over a JSON dish file.
pub fn match_file(data: &Path, ingredients: &[String]) -> Result<Vec<MatchResult>> {
    let file = File::open(data).with_context(|| format!("Failed to open {}", data.display()))?;
    let dishes: Vec<NewDish> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", data.display()))?;

    let catalog = MemoryCatalog::from_new_dishes(dishes);
    let results = find_dishes_by_ingredients(&catalog, ingredients)?;

    tracing::info!(matches = results.len(), "matched pantry");
    Ok(results)
}
