//! The Document: the whole dataset and the unit of synchronization
//!
//! Every page of the tracker reads and mutates one shared `Document`.
//! It is persisted as a single JSON object; `lastUpdate` is the sole
//! input to conflict resolution between the local and remote copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::cultivar::Cultivar;
use super::diary::DiaryEntry;
use super::plant::Plant;
use super::tracker::Measurement;

/// Names the top-level collections of a [`Document`]
///
/// Used to pick the "primary" collection whose emptiness decides the
/// has-local/has-cloud branches during sync, and to map collections to
/// per-file remote paths.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    /// Tracked plants
    Peppers,
    /// Cultivar reference database
    DatabasePeppers,
    /// Photo diary entries
    DiaryEntries,
    /// Growth measurements
    TrackerEntries,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::Peppers => write!(f, "peppers"),
            Collection::DatabasePeppers => write!(f, "databasePeppers"),
            Collection::DiaryEntries => write!(f, "diaryEntries"),
            Collection::TrackerEntries => write!(f, "trackerEntries"),
        }
    }
}

/// The entire application dataset
///
/// Field names are the persisted JSON contract; every collection defaults
/// to empty so a partially written blob still deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    /// Tracked plants
    pub peppers: Vec<Plant>,
    /// Cultivar reference database
    pub database_peppers: Vec<Cultivar>,
    /// Photo diary
    pub diary_entries: Vec<DiaryEntry>,
    /// Growth measurements, referencing plants by id
    pub tracker_entries: Vec<Measurement>,
    /// Free-text scratchpad
    pub quick_notes: String,
    /// Timestamp of the last mutation; the only conflict-resolution input.
    /// Unparseable values deserialize as absent rather than failing the
    /// whole document.
    #[serde(
        deserialize_with = "lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_update: Option<DateTime<Utc>>,
}

/// Accept RFC 3339, treat anything else (or null) as absent
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }))
}

impl Document {
    /// A fresh empty document with no `lastUpdate`
    pub fn empty() -> Self {
        Self::default()
    }

    /// Refresh `lastUpdate` to now. Must be called before every persist
    /// that follows a mutation.
    pub fn touch(&mut self) {
        self.last_update = Some(Utc::now());
    }

    /// `lastUpdate` as an instant, with missing treated as the epoch
    pub fn last_update_or_epoch(&self) -> DateTime<Utc> {
        self.last_update.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Number of records in a collection
    pub fn collection_len(&self, collection: Collection) -> usize {
        match collection {
            Collection::Peppers => self.peppers.len(),
            Collection::DatabasePeppers => self.database_peppers.len(),
            Collection::DiaryEntries => self.diary_entries.len(),
            Collection::TrackerEntries => self.tracker_entries.len(),
        }
    }

    /// Whether a collection holds any records
    pub fn has_data(&self, collection: Collection) -> bool {
        self.collection_len(collection) > 0
    }

    /// Next free identifier for a collection: `max(existing) + 1`,
    /// starting at 1. Collision-free within a single document.
    pub fn next_id(&self, collection: Collection) -> u64 {
        let max = match collection {
            Collection::Peppers => self.peppers.iter().map(|p| p.id).max(),
            Collection::DatabasePeppers => self.database_peppers.iter().map(|c| c.id).max(),
            Collection::DiaryEntries => self.diary_entries.iter().map(|e| e.id).max(),
            Collection::TrackerEntries => self.tracker_entries.iter().map(|m| m.id).max(),
        };
        max.map(|m| m + 1).unwrap_or(1)
    }

    /// Find a tracked plant by id
    pub fn plant(&self, id: u64) -> Option<&Plant> {
        self.peppers.iter().find(|p| p.id == id)
    }

    /// Find a cultivar by id
    pub fn cultivar(&self, id: u64) -> Option<&Cultivar> {
        self.database_peppers.iter().find(|c| c.id == id)
    }

    /// Measurements belonging to one plant
    pub fn measurements_for(&self, plant_id: u64) -> Vec<&Measurement> {
        self.tracker_entries
            .iter()
            .filter(|m| m.pepper_id == plant_id)
            .collect()
    }

    /// Start tracking a cultivar from the reference database as a plant
    ///
    /// The new plant gets tracker defaults (stage `semina`, height 0,
    /// light 50, tap water) and a back-reference to the cultivar. It is
    /// inserted at the front of the list, matching the tracker page's
    /// newest-first ordering. Returns the new plant's id, or `None` when
    /// the cultivar does not exist.
    pub fn promote_cultivar(&mut self, cultivar_id: u64) -> Option<u64> {
        let cultivar = self.cultivar(cultivar_id)?.clone();
        let id = self.next_id(Collection::Peppers);

        let mut plant = Plant::new(id, cultivar.name, cultivar.species);
        plant.database_ref = Some(cultivar_id);

        self.peppers.insert(0, plant);
        self.touch();
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::plant::Stage;
    use chrono::TimeZone;

    #[test]
    fn test_empty_document_round_trip() {
        let doc = Document::empty();
        let json = serde_json::to_string(&doc).unwrap();
        let restored: Document = serde_json::from_str(&json).unwrap();

        assert_eq!(doc, restored);
        assert!(restored.last_update.is_none());
        assert_eq!(restored.quick_notes, "");
    }

    #[test]
    fn test_wire_collection_names() {
        let mut doc = Document::empty();
        doc.peppers.push(Plant::new(1, "Habanero", "Capsicum chinense"));
        doc.quick_notes = "check pH".to_string();
        doc.touch();

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("peppers").is_some());
        assert!(json.get("databasePeppers").is_some());
        assert!(json.get("diaryEntries").is_some());
        assert!(json.get("trackerEntries").is_some());
        assert_eq!(json["quickNotes"], "check pH");
        assert!(json.get("lastUpdate").is_some());
    }

    #[test]
    fn test_partial_document_deserializes() {
        // A blob written by an older page that only knew about peppers
        let json = r#"{"peppers": [], "lastUpdate": "2024-06-01T00:00:00Z"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();

        assert!(doc.database_peppers.is_empty());
        assert!(doc.diary_entries.is_empty());
        assert_eq!(
            doc.last_update.unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unparseable_last_update_is_epoch() {
        let json = r#"{"peppers": [], "lastUpdate": "not a date"}"#;
        let doc: Document = serde_json::from_str(json).unwrap();

        assert!(doc.last_update.is_none());
        assert_eq!(doc.last_update_or_epoch().timestamp(), 0);
    }

    #[test]
    fn test_next_id_is_max_plus_one() {
        let mut doc = Document::empty();
        assert_eq!(doc.next_id(Collection::Peppers), 1);

        doc.peppers.push(Plant::new(4, "A", "x"));
        doc.peppers.push(Plant::new(2, "B", "x"));
        assert_eq!(doc.next_id(Collection::Peppers), 5);

        // Independent per collection
        assert_eq!(doc.next_id(Collection::DiaryEntries), 1);
    }

    #[test]
    fn test_promote_cultivar() {
        let mut doc = Document::empty();
        doc.database_peppers
            .push(crate::model::Cultivar::new(10, "Rocoto", "Capsicum pubescens"));

        let id = doc.promote_cultivar(10).unwrap();
        let plant = doc.plant(id).unwrap();

        assert_eq!(plant.name, "Rocoto");
        assert_eq!(plant.species, "Capsicum pubescens");
        assert_eq!(plant.stage, Stage::Semina);
        assert_eq!(plant.database_ref, Some(10));
        assert!(doc.last_update.is_some());

        assert_eq!(doc.promote_cultivar(99), None);
    }

    #[test]
    fn test_touch_refreshes_last_update() {
        let mut doc = Document::empty();
        let before = Utc::now();
        doc.touch();
        let stamped = doc.last_update.unwrap();

        assert!(stamped >= before);
        assert!(stamped <= Utc::now());
    }
}
