use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use thali_core::import::read_dishes;
use thali_core::NewDish;
use thali_store::{create_pool, PgCatalog};

/// Connections needed for a one-shot import.
const IMPORT_POOL_SIZE: u32 = 1;

fn read_csv(path: &Path) -> Result<Vec<NewDish>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_dishes(BufReader::new(file)).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Replace the catalog in `database_url` with the dishes from `csv_path`.
pub fn import_csv(csv_path: &Path, database_url: &str) -> Result<()> {
    let dishes = read_csv(csv_path)?;

    let pool = create_pool(database_url, IMPORT_POOL_SIZE).context("Failed to connect to database")?;
    let inserted = PgCatalog::new(pool)
        .replace_all(&dishes)
        .context("Failed to load dishes")?;

    println!("Imported {} dishes from {}", inserted, csv_path.display());
    Ok(())
}

/// Write the cleaned dishes from `csv_path` to `out_path` as pretty JSON.
pub fn convert_csv(csv_path: &Path, out_path: &Path) -> Result<()> {
    let dishes = read_csv(csv_path)?;

    let file = File::create(out_path)
        .with_context(|| format!("Failed to create {}", out_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &dishes)?;
    writer.flush()?;

    println!(
        "Converted {} dishes from {} to {}",
        dishes.len(),
        csv_path.display(),
        out_path.display()
    );
    Ok(())
}
