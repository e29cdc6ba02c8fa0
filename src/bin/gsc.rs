use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use gamestore_catalog::config::Config;
use gamestore_catalog::query::{GameFilter, PageRequest, DEFAULT_PAGE_SIZE};
use gamestore_catalog::tracing::init_tracing;
use gamestore_catalog::{genres, snapshot, Catalog};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gsc", version, about = "GameStore catalog admin CLI")]
struct Cli {
    /// Override the snapshot file path (otherwise CATALOG_SNAPSHOT or the default)
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// List catalog records with optional filters, one page at a time
    List {
        /// Minimum price (inclusive)
        #[arg(long)]
        min_price: Option<f64>,
        /// Maximum price (inclusive)
        #[arg(long)]
        max_price: Option<f64>,
        /// Case-insensitive title substring
        #[arg(long)]
        title: Option<String>,
        /// Required genre id; repeat the flag to require several at once
        #[arg(long = "genre")]
        genres: Vec<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Print a single record by id
    Get { id: String },
    /// Print the genre taxonomy
    Genres,
    /// Print catalog totals (records, keys, per-genre distribution)
    Counts,
    /// Normalize every record in the snapshot in place, backing up the old file
    Migrate,
}

fn main() -> Result<()> {
    init_tracing("info")?;
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(path) = cli.snapshot {
        config.snapshot_path = path;
    }

    match cli.command {
        Commands::List { min_price, max_price, title, genres, page, page_size } => {
            let filter = GameFilter { min_price, max_price, title, genres };
            let result = Catalog::init(config).query(&filter, PageRequest::new(page, page_size));
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Get { id } => {
            let Some(game) = Catalog::init(config).get_by_id(&id) else {
                bail!("no catalog record with id {id}");
            };
            println!("{}", serde_json::to_string_pretty(&game)?);
        }
        Commands::Genres => {
            for genre in genres::all() {
                println!("{:<14} {}", genre.id, genre.label);
            }
        }
        Commands::Counts => run_counts(&Catalog::init(config)),
        Commands::Migrate => {
            let (records, backup) = snapshot::migrate(&config.snapshot_path)?;
            info!(
                target: "migrate",
                records,
                backup = %backup.display(),
                "snapshot migration complete"
            );
            println!("Migration complete. Backup saved to {}", backup.display());
        }
    }
    Ok(())
}

fn run_counts(catalog: &Catalog) {
    let games = catalog.list();
    let total_keys: u64 = games.iter().map(|g| g.count).sum();
    let mut by_genre: BTreeMap<&str, usize> = BTreeMap::new();
    for game in &games {
        for genre in &game.genres {
            *by_genre.entry(genre.title.as_str()).or_insert(0) += 1;
        }
    }

    println!("CATALOG COUNTS SUMMARY:");
    println!("records: {}", games.len());
    println!("available keys: {total_keys}");
    println!("genres in use: {}", by_genre.len());
    let mut ranked: Vec<(&str, usize)> = by_genre.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    for (genre, records) in ranked {
        println!("  {genre:<14} {records}");
    }
}
