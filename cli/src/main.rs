mod import;
mod matching;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "thali")]
#[command(about = "Thali dish catalog tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a dish CSV into PostgreSQL, replacing the current catalog
    Import {
        /// Path to the CSV file
        #[arg(long)]
        csv: PathBuf,
        /// PostgreSQL connection string
        #[arg(long, env = "DATABASE_URL")]
        database_url: String,
    },
    /// Transform a dish CSV into JSON without touching the database
    Convert {
        /// Path to the CSV file
        #[arg(long)]
        csv: PathBuf,
        /// Where to write the JSON output
        #[arg(long)]
        out: PathBuf,
    },
    /// Rank dishes from a JSON file against the given ingredients
    Match {
        /// JSON file written by `convert`
        #[arg(long)]
        data: PathBuf,
        /// Ingredients on hand
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import { csv, database_url } => {
            import::import_csv(&csv, &database_url)?;
        }
        Commands::Convert { csv, out } => {
            import::convert_csv(&csv, &out)?;
        }
        Commands::Match { data, ingredients } => {
            let results = matching::match_file(&data, &ingredients)?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
