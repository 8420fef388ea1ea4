//! Cultivar records for the reference database
//!
//! A cultivar is a named variety, possibly a hybrid carrying two parent
//! references. Parent references may dangle (the referenced cultivar was
//! deleted); derived views drop dangling edges rather than failing.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A named pepper variety in the reference database
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cultivar {
    /// Unique identifier within the document
    pub id: u64,
    /// Variety name (e.g. "Carolina Reaper")
    pub name: String,
    /// Botanical species
    pub species: String,
    /// Whether this variety is a cross of two others
    #[serde(default)]
    pub is_hybrid: bool,
    /// Mother cultivar id, for hybrids
    #[serde(default)]
    pub mother_plant: Option<u64>,
    /// Father cultivar id, for hybrids
    #[serde(default)]
    pub father_plant: Option<u64>,
    /// Mother name snapshot, kept for display when the parent is deleted
    #[serde(default)]
    pub mother_plant_name: Option<String>,
    /// Father name snapshot
    #[serde(default)]
    pub father_plant_name: Option<String>,
    /// Day the variety was added to the database
    pub date_added: NaiveDate,
}

impl Cultivar {
    /// Create a pure (non-hybrid) variety dated today
    pub fn new(id: u64, name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            species: species.into(),
            is_hybrid: false,
            mother_plant: None,
            father_plant: None,
            mother_plant_name: None,
            father_plant_name: None,
            date_added: Utc::now().date_naive(),
        }
    }

    /// Builder: mark as a hybrid of two parent cultivars
    pub fn hybrid_of(mut self, mother: &Cultivar, father: &Cultivar) -> Self {
        self.is_hybrid = true;
        self.mother_plant = Some(mother.id);
        self.father_plant = Some(father.id);
        self.mother_plant_name = Some(mother.name.clone());
        self.father_plant_name = Some(father.name.clone());
        self
    }

    /// Both parent references, when this is a hybrid with both set
    pub fn parents(&self) -> Option<(u64, u64)> {
        if !self.is_hybrid {
            return None;
        }
        match (self.mother_plant, self.father_plant) {
            (Some(m), Some(f)) => Some((m, f)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cultivar_wire_names() {
        let mother = Cultivar::new(1, "Habanero", "Capsicum chinense");
        let father = Cultivar::new(2, "Ghost Pepper", "Capsicum chinense");
        let hybrid = Cultivar::new(3, "Haboro Cross", "Capsicum chinense")
            .hybrid_of(&mother, &father);

        let json = serde_json::to_value(&hybrid).unwrap();
        assert_eq!(json["isHybrid"], true);
        assert_eq!(json["motherPlant"], 1);
        assert_eq!(json["fatherPlantName"], "Ghost Pepper");
    }

    #[test]
    fn test_parents_only_for_complete_hybrids() {
        let pure = Cultivar::new(1, "Cayenne", "Capsicum annuum");
        assert_eq!(pure.parents(), None);

        let mut partial = Cultivar::new(2, "Mystery", "Capsicum annuum");
        partial.is_hybrid = true;
        partial.mother_plant = Some(1);
        assert_eq!(partial.parents(), None);

        let mother = Cultivar::new(3, "A", "x");
        let father = Cultivar::new(4, "B", "x");
        let hybrid = Cultivar::new(5, "AB", "x").hybrid_of(&mother, &father);
        assert_eq!(hybrid.parents(), Some((3, 4)));
    }
}
