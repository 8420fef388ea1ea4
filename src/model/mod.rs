//! Data model for the cultivation tracker
//!
//! - **document**: the [`Document`], the whole dataset and the unit of sync
//! - **plant**: tracked specimens and the [`Stage`] lifecycle enum
//! - **cultivar**: the variety reference database, with hybrid lineage
//! - **diary**: diary entries with embedded photo payloads
//! - **tracker**: time-stamped growth measurements

pub mod cultivar;
pub mod diary;
pub mod document;
pub mod plant;
pub mod tracker;

pub use cultivar::Cultivar;
pub use diary::{DiaryEntry, Photo};
pub use document::{Collection, Document};
pub use plant::{Plant, Stage};
pub use tracker::Measurement;
