//! # PepperVault
//!
//! Chili pepper cultivation tracker - a local-first document store with
//! optional remote synchronization, built around one shared dataset of
//! plants, cultivars, diary entries, and growth measurements.
//!
//! ## Features
//!
//! - **Local-first storage**: the document always lives on disk; remote
//!   trouble never loses data
//! - **Whole-document sync**: last-writer-wins reconciliation on a single
//!   `lastUpdate` timestamp
//! - **Two remote shapes**: a single JSON blob (get/put) or a
//!   per-collection file tree behind a repository contents API
//! - **Photo redaction**: diary photo payloads stay local; the remote
//!   only ever sees metadata
//! - **Lineage graph**: cultivar genealogy with computed generations
//!
//! ## Modules
//!
//! - [`model`]: The document and its collections
//! - [`store`]: Local store, remote providers, and the sync policy
//! - [`genealogy`]: Derived cultivar lineage graph
//! - [`stats`]: Derived growth and diary statistics
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use peppervault::config::Config;
//! use peppervault::model::Collection;
//! use peppervault::store::SyncStore;
//! use peppervault::model::Plant;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let store = SyncStore::from_config(&config)?;
//!
//!     // Reconcile local and remote copies
//!     let doc = store.sync().await;
//!     println!("Tracking {} plants", doc.peppers.len());
//!
//!     // Mutate and persist atomically
//!     let (doc, outcome) = store
//!         .update(|doc| {
//!             let id = doc.next_id(Collection::Peppers);
//!             doc.peppers.push(Plant::new(id, "Habanero", "Capsicum chinense"));
//!         })
//!         .await;
//!     println!("Saved {} plants ({outcome:?})", doc.peppers.len());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod genealogy;
pub mod model;
pub mod stats;
pub mod store;

// Re-export top-level types for convenience
pub use model::{
    Collection, Cultivar, DiaryEntry, Document, Measurement, Photo, Plant, Stage,
};

pub use store::{
    remote_from_config, BlobStore, FileTreeStore, LocalStore, NoRedaction, PhotoRedaction,
    RemoteStore, RemoteTransform, SaveOutcome, StoreError, StoreResult, SyncOutcome, SyncStore,
};

pub use genealogy::{
    GenerationBucket, LineageEdge, LineageFilter, LineageGraph, LineageNode, ParentRole,
};

pub use stats::{diary_stats, growth_stats, stage_distribution, DiaryStats, GrowthStats};

pub use config::{
    BlobProviderConfig, Config, ConfigError, FilesProviderConfig, LocalConfig, LoggingConfig,
    RemoteConfig, RemoteProvider, SyncConfig,
};
