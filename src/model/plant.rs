//! Tracked plant records and the growth stage enum

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Growth stage of a plant, from sowing to seed harvest
///
/// Stage names are the Italian labels used on the wire
/// (`semina`, `germinazione`, ...); they are part of the
/// persisted JSON contract and must not be translated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Sowing
    Semina,
    /// Germination
    Germinazione,
    /// Vegetative growth
    Crescita,
    /// Flowering
    Fioritura,
    /// Fruiting
    Fruttificazione,
    /// Harvest
    Raccolta,
    /// Seed harvest
    RaccoltaSemi,
}

impl Stage {
    /// All stages in lifecycle order
    pub fn all() -> &'static [Stage] {
        &[
            Stage::Semina,
            Stage::Germinazione,
            Stage::Crescita,
            Stage::Fioritura,
            Stage::Fruttificazione,
            Stage::Raccolta,
            Stage::RaccoltaSemi,
        ]
    }

    /// Parse a wire label back into a stage
    pub fn parse(label: &str) -> Option<Stage> {
        Stage::all()
            .iter()
            .copied()
            .find(|s| s.to_string() == label)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Semina => write!(f, "semina"),
            Stage::Germinazione => write!(f, "germinazione"),
            Stage::Crescita => write!(f, "crescita"),
            Stage::Fioritura => write!(f, "fioritura"),
            Stage::Fruttificazione => write!(f, "fruttificazione"),
            Stage::Raccolta => write!(f, "raccolta"),
            Stage::RaccoltaSemi => write!(f, "raccoltasemi"),
        }
    }
}

/// One individually grown specimen being tracked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    /// Unique identifier within the document
    pub id: u64,
    /// Display name (usually the cultivar name)
    pub name: String,
    /// Botanical species (e.g. "Capsicum chinense")
    pub species: String,
    /// Day the plant entered the tracker
    pub date_added: NaiveDate,
    /// Current growth stage
    pub stage: Stage,
    /// Height in centimeters, if measured
    #[serde(default)]
    pub height: Option<f64>,
    /// Light exposure, 0..=100
    #[serde(default = "default_light")]
    pub light: u8,
    /// Watering source (e.g. "rubinetto", "piovana")
    #[serde(default)]
    pub water_type: String,
    /// Fertilizers in use
    #[serde(default)]
    pub fertilizers: Vec<String>,
    /// Fertilizer dose in ml/l, if any
    #[serde(default)]
    pub fertilizer_amount: Option<f64>,
    /// Cultivar this plant was promoted from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_ref: Option<u64>,
}

fn default_light() -> u8 {
    50
}

impl Plant {
    /// Create a plant with today's date and tracker defaults
    pub fn new(id: u64, name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            species: species.into(),
            date_added: Utc::now().date_naive(),
            stage: Stage::Semina,
            height: Some(0.0),
            light: default_light(),
            water_type: "rubinetto".to_string(),
            fertilizers: Vec::new(),
            fertilizer_amount: Some(0.0),
            database_ref: None,
        }
    }

    /// Builder: set the growth stage
    pub fn stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    /// Builder: set the current height in cm
    pub fn height(mut self, cm: f64) -> Self {
        self.height = Some(cm);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wire_names() {
        assert_eq!(
            serde_json::to_string(&Stage::Semina).unwrap(),
            "\"semina\""
        );
        assert_eq!(
            serde_json::to_string(&Stage::RaccoltaSemi).unwrap(),
            "\"raccoltasemi\""
        );

        let parsed: Stage = serde_json::from_str("\"fruttificazione\"").unwrap();
        assert_eq!(parsed, Stage::Fruttificazione);
    }

    #[test]
    fn test_stage_parse_round_trip() {
        for stage in Stage::all() {
            assert_eq!(Stage::parse(&stage.to_string()), Some(*stage));
        }
        assert_eq!(Stage::parse("harvest"), None);
    }

    #[test]
    fn test_plant_serializes_camel_case() {
        let plant = Plant::new(1, "Habanero", "Capsicum chinense");
        let json = serde_json::to_value(&plant).unwrap();

        assert!(json.get("dateAdded").is_some());
        assert!(json.get("waterType").is_some());
        assert!(json.get("fertilizerAmount").is_some());
        // databaseRef is omitted until the plant is promoted from a cultivar
        assert!(json.get("databaseRef").is_none());
    }

    #[test]
    fn test_plant_defaults_on_sparse_input() {
        let json = r#"{
            "id": 3,
            "name": "Jalapeno",
            "species": "Capsicum annuum",
            "dateAdded": "2024-03-01",
            "stage": "crescita"
        }"#;

        let plant: Plant = serde_json::from_str(json).unwrap();
        assert_eq!(plant.light, 50);
        assert_eq!(plant.height, None);
        assert!(plant.fertilizers.is_empty());
    }
}
