//! PepperVault CLI
//!
//! Command-line interface for the pepper cultivation tracker:
//! - Sync local and remote copies
//! - Add and promote plants
//! - Show growth, diary, and lineage statistics

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peppervault::config::{generate_default_config, Config};
use peppervault::model::{Collection, Plant, Stage};
use peppervault::stats::{diary_stats, growth_stats, stage_distribution};
use peppervault::store::SyncStore;
use peppervault::{GenerationBucket, LineageFilter, LineageGraph};

#[derive(Parser)]
#[command(name = "peppervault")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chili pepper cultivation tracker with remote sync")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (default: standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile the local and remote copies
    Sync,

    /// Show store status and remote connectivity
    Status,

    /// Show statistics for the whole dataset or one plant
    Stats {
        /// Plant id for a growth summary (omit for dataset totals)
        plant: Option<u64>,
    },

    /// Add a plant to the tracker
    Add {
        /// Plant name
        name: String,
        /// Species (e.g. "Capsicum chinense")
        species: String,
        /// Initial growth stage
        #[arg(short, long, default_value = "semina")]
        stage: String,
    },

    /// Start tracking a cultivar from the reference database
    Promote {
        /// Cultivar id
        cultivar: u64,
    },

    /// Replace the quick-notes scratchpad
    Note {
        /// Note text
        text: String,
    },

    /// Show the cultivar lineage graph
    Lineage {
        /// Keep only this species
        #[arg(short, long)]
        species: Option<String>,
        /// Keep only this generation (pure, f1, f2, f3+)
        #[arg(short, long)]
        generation: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_logging(&config);

    // Config generation needs no store
    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let store = SyncStore::from_config(&config)?;

    match cli.command {
        Commands::Sync => {
            let (doc, outcome) = store.sync_with_outcome().await;
            println!("Sync outcome: {:?}", outcome);
            println!(
                "{} plants, {} cultivars, {} diary entries, {} measurements",
                doc.peppers.len(),
                doc.database_peppers.len(),
                doc.diary_entries.len(),
                doc.tracker_entries.len()
            );
        }

        Commands::Status => {
            let doc = store.load_local();

            println!("PepperVault v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Data directory: {}", config.local.data_dir);
            match store.last_local_save() {
                Some(ts) => println!("Last local save: {}", ts.to_rfc3339()),
                None => println!("Last local save: never"),
            }
            match doc.last_update {
                Some(ts) => println!("Document updated: {}", ts.to_rfc3339()),
                None => println!("Document updated: unknown"),
            }
            println!();
            println!("Remote provider: {:?}", config.remote.provider);
            if store.check_connection().await {
                println!("Remote: reachable");
            } else {
                println!("Remote: unreachable (local-only)");
            }
        }

        Commands::Stats { plant } => {
            let doc = store.load_local();

            match plant {
                Some(id) => {
                    let Some(plant) = doc.plant(id) else {
                        eprintln!("No plant with id {}", id);
                        std::process::exit(1);
                    };
                    let stats = growth_stats(plant, &doc.measurements_for(id));

                    println!("{} ({})", plant.name, plant.species);
                    println!("  Stage: {}", stats.current_stage);
                    match stats.current_height {
                        Some(h) => println!("  Height: {:.1} cm", h),
                        None => println!("  Height: unmeasured"),
                    }
                    println!(
                        "  Growth: {:.1} cm over {} days ({:.2} cm/day)",
                        stats.total_growth, stats.days_tracked, stats.avg_growth_per_day
                    );
                    println!("  Measurements: {}", stats.measurements);
                }
                None => {
                    println!("Plants: {}", doc.peppers.len());
                    for (stage, count) in stage_distribution(&doc.peppers) {
                        println!("  {:<16} {}", stage.to_string(), count);
                    }

                    let diary = diary_stats(&doc.diary_entries);
                    println!();
                    println!("Diary: {} entries, {} photos", diary.entries, diary.photos);
                    println!(
                        "  {} plants documented, {} tags in use",
                        diary.plants_documented, diary.tags_used
                    );
                    println!();
                    println!("Cultivar database: {}", doc.database_peppers.len());
                }
            }
        }

        Commands::Add {
            name,
            species,
            stage,
        } => {
            let Some(stage) = Stage::parse(&stage) else {
                eprintln!("Unknown stage: {}", stage);
                eprintln!(
                    "Valid stages: {}",
                    Stage::all()
                        .iter()
                        .map(|s| s.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                std::process::exit(1);
            };

            let (doc, outcome) = store
                .update(|doc| {
                    let id = doc.next_id(Collection::Peppers);
                    let mut plant = Plant::new(id, name, species);
                    plant.stage = stage;
                    doc.peppers.insert(0, plant);
                })
                .await;

            let added = &doc.peppers[0];
            println!("Added plant {} (id {}) - {:?}", added.name, added.id, outcome);
        }

        Commands::Promote { cultivar } => {
            if store.load_local().cultivar(cultivar).is_none() {
                eprintln!("No cultivar with id {}", cultivar);
                std::process::exit(1);
            }

            let (doc, outcome) = store
                .update(|doc| {
                    doc.promote_cultivar(cultivar);
                })
                .await;

            let plant = &doc.peppers[0];
            println!(
                "Now tracking {} (plant id {}) - {:?}",
                plant.name, plant.id, outcome
            );
        }

        Commands::Note { text } => {
            let (_, outcome) = store.update(|doc| doc.quick_notes = text).await;
            println!("Notes saved - {:?}", outcome);
        }

        Commands::Lineage {
            species,
            generation,
        } => {
            let doc = store.load_local();

            let generation = match generation.as_deref() {
                None => None,
                Some("pure") => Some(GenerationBucket::Pure),
                Some("f1") => Some(GenerationBucket::F1),
                Some("f2") => Some(GenerationBucket::F2),
                Some("f3+") | Some("f3") => Some(GenerationBucket::F3Plus),
                Some(other) => {
                    eprintln!("Unknown generation filter: {}", other);
                    eprintln!("Valid filters: pure, f1, f2, f3+");
                    std::process::exit(1);
                }
            };

            let graph = LineageGraph::build_filtered(
                &doc.database_peppers,
                &LineageFilter {
                    species,
                    generation,
                },
            );

            if graph.nodes.is_empty() {
                println!("No cultivars match the filter.");
                return Ok(());
            }

            println!("{:<24} {:<22} {:<6} Parents", "Name", "Species", "Gen");
            println!("{}", "-".repeat(70));
            for node in &graph.nodes {
                let parents = if node.is_hybrid {
                    format!(
                        "{} x {}",
                        node.mother_plant_name.as_deref().unwrap_or("?"),
                        node.father_plant_name.as_deref().unwrap_or("?")
                    )
                } else {
                    "-".to_string()
                };
                println!(
                    "{:<24} {:<22} F{:<5} {}",
                    node.name, node.species, node.generation, parents
                );
            }
            println!();
            println!("{} cultivars, {} lineage links", graph.nodes.len(), graph.links.len());
        }

        Commands::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("peppervault={}", config.logging.level)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
