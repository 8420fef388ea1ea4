//! Time-stamped growth measurements

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::plant::Stage;

/// One dated measurement of a tracked plant
///
/// `pepper_id` should reference an existing plant; the reference is not
/// enforced and orphan measurements are simply ignored by derived views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Unique identifier within the document
    pub id: u64,
    /// Plant this measurement belongs to
    pub pepper_id: u64,
    /// Day of the measurement
    pub date: NaiveDate,
    /// Observed growth stage
    pub stage: Stage,
    /// Height in centimeters
    #[serde(default)]
    pub height: Option<f64>,
    /// Light exposure, 0..=100
    #[serde(default)]
    pub light: Option<f64>,
    /// Fertilizer dose in ml/l
    #[serde(default)]
    pub fertilizer_amount: Option<f64>,
    /// Free-text observations
    #[serde(default)]
    pub notes: Option<String>,
}

impl Measurement {
    /// Create a measurement for a plant, dated today
    pub fn new(id: u64, pepper_id: u64, stage: Stage) -> Self {
        Self {
            id,
            pepper_id,
            date: Utc::now().date_naive(),
            stage,
            height: None,
            light: None,
            fertilizer_amount: None,
            notes: None,
        }
    }

    /// Builder: set the measurement date
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Builder: set the measured height in cm
    pub fn height(mut self, cm: f64) -> Self {
        self.height = Some(cm);
        self
    }

    /// Builder: attach notes
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_wire_names() {
        let m = Measurement::new(1, 7, Stage::Crescita).height(12.5);
        let json = serde_json::to_value(&m).unwrap();

        assert_eq!(json["pepperId"], 7);
        assert_eq!(json["stage"], "crescita");
        assert_eq!(json["height"], 12.5);
        assert!(json.get("fertilizerAmount").is_some());
    }

    #[test]
    fn test_measurement_optional_fields_default() {
        let json = r#"{"id":1,"pepperId":2,"date":"2024-05-01","stage":"semina"}"#;
        let m: Measurement = serde_json::from_str(json).unwrap();

        assert_eq!(m.height, None);
        assert_eq!(m.light, None);
        assert_eq!(m.notes, None);
    }
}
